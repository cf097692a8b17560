/// Text surface showing the pre-formatted elapsed time.
pub trait ElapsedSink: Send {
    fn show_elapsed(&mut self, text: &str);
}

/// Image surface with a visibility toggle.
///
/// `source` is either a resource reference or a `data:` URI, already
/// converted for the hosting platform.
pub trait PhotoSink: Send {
    fn show(&mut self, source: &str);
    fn hide(&mut self);
}
