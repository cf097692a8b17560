/// Display string for a zero elapsed duration.
pub const ZERO_DISPLAY: &str = "00:00.00";

/// Formats a duration in milliseconds as `MM:SS.HH`.
///
/// Minutes are zero-padded to two digits and grow unbounded beyond that;
/// seconds and hundredths are truncated rather than rounded so the string
/// never reads `60.00` inside a minute.
pub fn format_duration(milliseconds: u64) -> String {
    let minutes = milliseconds / 60_000;
    let seconds = (milliseconds / 1_000) % 60;
    let hundredths = (milliseconds / 10) % 100;
    format!("{:02}:{:02}.{:02}", minutes, seconds, hundredths)
}
