use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Action, Canvas, Event, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::Deserialize;
use std::time::Duration;
use trackcore::GeoPoint;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Tracker Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(300)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    view: ViewPayload,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    ViewFetched(Result<ViewPayload, String>),
    MapTapped {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    StartPressed,
    StopPressed,
    PhotoPressed,
    TriggerSent(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                view: ViewPayload::default(),
                status: "Waiting for the tracker bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_view(), Message::ViewFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_view(), Message::ViewFetched),
            Message::ViewFetched(Ok(view)) => {
                state.status = if view.elapsed.is_empty() {
                    "Connected; stopwatch idle".into()
                } else {
                    format!("Stopwatch {}", view.elapsed)
                };
                state.view = view;
                Task::none()
            }
            Message::ViewFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::MapTapped {
                x,
                y,
                width,
                height,
            } => {
                if width <= 0.0 || height <= 0.0 {
                    return Task::none();
                }
                // The bridge projects taps in its own viewport coordinates.
                let viewport = state.view.viewport;
                let bridge_x = f64::from(x) / f64::from(width) * viewport.width;
                let bridge_y = f64::from(y) / f64::from(height) * viewport.height;
                state.push_history(format!("Tap at {bridge_x:.0}, {bridge_y:.0}"));
                Task::perform(post_tap(bridge_x, bridge_y), Message::TriggerSent)
            }
            Message::StartPressed => Task::perform(post_trigger("start"), Message::TriggerSent),
            Message::StopPressed => Task::perform(post_trigger("stop"), Message::TriggerSent),
            Message::PhotoPressed => Task::perform(post_trigger("capture"), Message::TriggerSent),
            Message::TriggerSent(Ok(message)) => {
                state.push_history(message);
                Task::none()
            }
            Message::TriggerSent(Err(err)) => {
                state.status = format!("Trigger error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let elapsed_text = if state.view.elapsed.is_empty() {
            "--:--.--".to_string()
        } else {
            state.view.elapsed.clone()
        };

        let photo_panel: Column<'_, Message> = if state.view.photo_visible {
            let source = state.view.photo.as_deref().unwrap_or_default();
            column![
                text("Photo").size(16),
                text(describe_photo_source(source)).size(12),
            ]
            .spacing(4)
        } else {
            column![text("Photo").size(16), text("No photo shown").size(12)].spacing(4)
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let control_column = column![
            text("Stopwatch").size(26),
            text(elapsed_text).size(42),
            row![
                button("Start").on_press(Message::StartPressed).padding(10),
                button("Stop").on_press(Message::StopPressed).padding(10),
                button("Photo").on_press(Message::PhotoPressed).padding(10),
            ]
            .spacing(10),
            text(&state.status).size(14),
            photo_panel,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(140.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(320.0));

        let map_canvas = Canvas::new(MapCanvas {
            view: state.view.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(480.0));

        let map_column = column![
            text("Live map").size(26),
            map_canvas,
            text("Tap the map to pick a destination").size(12),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![control_column, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn describe_photo_source(source: &str) -> String {
    if let Some(rest) = source.strip_prefix("data:image/jpeg;base64,") {
        format!("embedded JPEG ({} base64 chars)", rest.len())
    } else {
        source.to_string()
    }
}

async fn fetch_view() -> Result<ViewPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/view")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<ViewPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_trigger(name: &'static str) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://127.0.0.1:9000/{name}"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(format!("Sent {name}"))
    } else {
        Err(format!("{}: {name} not accepted", response.status()))
    }
}

async fn post_tap(x: f64, y: f64) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9000/tap")
        .json(&serde_json::json!({ "x": x, "y": y }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Destination selected".into())
    } else {
        Err(format!("{}: tap not accepted", response.status()))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ViewPayload {
    #[serde(default)]
    elapsed: String,
    #[serde(default)]
    center: Option<GeoPoint>,
    #[serde(default)]
    marker: Option<MarkerPin>,
    #[serde(default)]
    destination: Option<GeoPoint>,
    #[serde(default)]
    bubble: Option<BubbleNote>,
    #[serde(default)]
    photo: Option<String>,
    #[serde(default)]
    photo_visible: bool,
    #[serde(default)]
    viewport: Viewport,
}

#[derive(Debug, Clone, Deserialize)]
struct MarkerPin {
    #[serde(default)]
    #[allow(dead_code)]
    id: u64,
    point: GeoPoint,
}

#[derive(Debug, Clone, Deserialize)]
struct BubbleNote {
    #[serde(default)]
    #[allow(dead_code)]
    id: u64,
    anchor: GeoPoint,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Viewport {
    width: f64,
    height: f64,
    lat_span: f64,
    lng_span: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            lat_span: 0.02,
            lng_span: 0.03,
        }
    }
}

#[derive(Clone)]
struct MapCanvas {
    view: ViewPayload,
}

impl MapCanvas {
    fn project(&self, center: GeoPoint, point: GeoPoint, bounds: Rectangle) -> Point {
        let viewport = self.view.viewport;
        let x = (0.5 + (point.lng - center.lng) / viewport.lng_span) * f64::from(bounds.width);
        let y = (0.5 - (point.lat - center.lat) / viewport.lat_span) * f64::from(bounds.height);
        Point::new(x as f32, y as f32)
    }
}

impl canvas::Program<Message> for MapCanvas {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        if let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if let Some(position) = cursor.position_in(bounds) {
                return Some(Action::publish(Message::MapTapped {
                    x: position.x,
                    y: position.y,
                    width: bounds.width,
                    height: bounds.height,
                }));
            }
        }
        None
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        let center = match self.view.center {
            Some(center) => center,
            None => {
                frame.fill_text(canvas::Text {
                    content: "Waiting for the first fix...".into(),
                    position: Point::new(16.0, 16.0),
                    color: Color::from_rgb(0.6, 0.6, 0.7),
                    size: 16.0.into(),
                    ..canvas::Text::default()
                });
                return vec![frame.into_geometry()];
            }
        };

        let center_px = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 12.0;

        for ring in 1..=3 {
            let ring_radius = radius * (ring as f32 / 3.0);
            let ring_path = Path::new(|builder| builder.circle(center_px, ring_radius));
            frame.stroke(
                &ring_path,
                Stroke::default().with_color(Color::from_rgb(0.2, 0.2, 0.26)),
            );
        }

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(center_px.x - radius, center_px.y));
            builder.line_to(Point::new(center_px.x + radius, center_px.y));
            builder.move_to(Point::new(center_px.x, center_px.y - radius));
            builder.line_to(Point::new(center_px.x, center_px.y + radius));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.3, 0.3, 0.38))
                .with_width(1.0),
        );

        let destination = self
            .view
            .destination
            .or_else(|| self.view.bubble.as_ref().map(|note| note.anchor));
        if let Some(destination) = destination {
            let position = self.project(center, destination, bounds);
            let dot = Path::new(|builder| builder.circle(position, 5.0));
            frame.fill(&dot, Color::from_rgb(0.25, 0.55, 0.95));
        }

        if let Some(bubble) = &self.view.bubble {
            let anchor = self.project(center, bubble.anchor, bounds);
            frame.fill_text(canvas::Text {
                content: bubble.content.clone(),
                position: Point::new(anchor.x + 8.0, anchor.y - 16.0),
                color: Color::from_rgb(0.8, 0.85, 0.95),
                size: 13.0.into(),
                ..canvas::Text::default()
            });
        }

        if let Some(marker) = &self.view.marker {
            let position = self.project(center, marker.point, bounds);
            let dot = Path::new(|builder| builder.circle(position, 6.0));
            frame.fill(&dot, Color::from_rgb(0.95, 0.55, 0.2));
        }

        vec![frame.into_geometry()]
    }
}
