use conecore::chart::{ChartSummary, SavedChart};
use conecore::geo::GeoCoordinate;
use conecore::plot::{
    CanvasSize, PlotFrame, PlotParams, RenderHint, ScalingMode, ROTATION_RANGE, ZOOM_RANGE,
};
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, slider, text, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::Deserialize;
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Autocross Course Viewer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

const DIRECT_SCALE: f64 = 4.0;

#[derive(Debug)]
struct Visualizer {
    payload: Option<VisualizationPayload>,
    zoom: f32,
    rotation: f32,
    scaling: ScalingMode,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<VisualizationPayload, String>),
    ZoomChanged(f32),
    RotationChanged(f32),
    ToggleScaling,
    ResetRotation,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                payload: None,
                zoom: 1.0,
                rotation: 0.0,
                scaling: ScalingMode::AutoFit,
                status: "Waiting for a chart...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                let previous = state.chart().map(|chart| chart.name.clone());
                if let Some(chart) = &payload.chart {
                    if previous.as_deref() != Some(chart.name.as_str()) {
                        state.rotation = chart.rotation_angle as f32;
                        state.push_history(format!(
                            "Loaded {} ({} cones)",
                            chart.name,
                            chart.cone_data.len()
                        ));
                    }
                }
                state.status = if payload.status.is_empty() {
                    format!("{} charts stored", payload.charts.len())
                } else {
                    payload.status.clone()
                };
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::ZoomChanged(zoom) => {
                state.zoom = zoom;
                Task::none()
            }
            Message::RotationChanged(rotation) => {
                state.rotation = rotation;
                Task::none()
            }
            Message::ToggleScaling => {
                state.scaling = match state.scaling {
                    ScalingMode::AutoFit => ScalingMode::Direct {
                        scale_factor: DIRECT_SCALE,
                    },
                    ScalingMode::Direct { .. } => ScalingMode::AutoFit,
                };
                Task::none()
            }
            Message::ResetRotation => {
                if let Some(angle) = state.chart().map(|chart| chart.rotation_angle) {
                    state.rotation = angle as f32;
                }
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let charts = state
            .payload
            .as_ref()
            .map(|payload| payload.charts.clone())
            .unwrap_or_default();

        let scaling_label = match state.scaling {
            ScalingMode::AutoFit => "Scaling: auto-fit",
            ScalingMode::Direct { .. } => "Scaling: direct",
        };

        let controls = column![
            text("Course").size(26),
            text(format!("Zoom Level: {:.1}x", state.zoom)).size(14),
            slider(
                (*ZOOM_RANGE.start() as f32)..=(*ZOOM_RANGE.end() as f32),
                state.zoom,
                Message::ZoomChanged
            )
            .step(0.05),
            text(format!("Rotation Angle: {}°", state.rotation.round() as i32)).size(14),
            slider(
                (*ROTATION_RANGE.start() as f32)..=(*ROTATION_RANGE.end() as f32),
                state.rotation,
                Message::RotationChanged
            )
            .step(1.0),
            row![
                button(scaling_label)
                    .on_press(Message::ToggleScaling)
                    .padding(8),
                button("Saved rotation")
                    .on_press(Message::ResetRotation)
                    .padding(8),
            ]
            .spacing(8),
            text(&state.status).size(14),
            text("Saved charts").size(16),
            Container::new(scrollable(chart_list(&charts)).height(Length::Fixed(160.0)))
                .padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list(&state.history)).height(Length::Fixed(90.0)))
                .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0));

        let map: Element<'_, Message> = match state.chart() {
            Some(chart) => Canvas::new(CourseMap {
                chart: chart.clone(),
                current_location: state
                    .payload
                    .as_ref()
                    .and_then(|payload| payload.current_location),
                zoom: f64::from(state.zoom),
                rotation: f64::from(state.rotation),
                scaling: state.scaling,
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            None => text("No cones tagged yet.").size(16).into(),
        };

        let layout = row![controls, map]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn chart(&self) -> Option<&SavedChart> {
        self.payload
            .as_ref()
            .and_then(|payload| payload.chart.as_ref())
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn chart_list(charts: &[ChartSummary]) -> Column<'static, Message> {
    if charts.is_empty() {
        Column::new().push(text("No saved charts yet.").size(12))
    } else {
        charts
            .iter()
            .enumerate()
            .fold(Column::new().spacing(4), |col, (idx, summary)| {
                col.push(text(format!("Chart {}: {}", idx + 1, summary)).size(12))
            })
    }
}

fn history_list(history: &[String]) -> Column<'static, Message> {
    if history.is_empty() {
        Column::new().push(text("No activity yet").size(12))
    } else {
        history
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, entry| {
                col.push(text(entry.clone()).size(12))
            })
    }
}

async fn fetch_payload() -> Result<VisualizationPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/payload")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisualizationPayload>()
        .await
        .map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Deserialize)]
struct VisualizationPayload {
    #[serde(default)]
    chart: Option<SavedChart>,
    #[serde(default)]
    charts: Vec<ChartSummary>,
    #[serde(default)]
    current_location: Option<GeoCoordinate>,
    #[serde(default)]
    status: String,
}

/// Canvas that re-plots a chart at its drawn size.
#[derive(Clone)]
struct CourseMap {
    chart: SavedChart,
    current_location: Option<GeoCoordinate>,
    zoom: f64,
    rotation: f64,
    scaling: ScalingMode,
}

impl canvas::Program<Message> for CourseMap {
    type State = ();

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

        let params = PlotParams::new(
            CanvasSize::new(f64::from(bounds.width), f64::from(bounds.height)),
            self.zoom,
            self.rotation,
            self.scaling,
        );
        let Some(reference) = self.chart.reference() else {
            return vec![frame.into_geometry()];
        };
        let Ok(plot) = PlotFrame::new(&self.chart.cone_data, reference, params) else {
            return vec![frame.into_geometry()];
        };
        let plotted = plot.plot(&self.chart.cone_data);

        let orange = Color::from_rgb(0.95, 0.55, 0.2);
        for cone in &plotted {
            let center = Point::new(cone.position.x as f32, cone.position.y as f32);
            let radius = (cone.marker_size as f32 / 2.0).max(1.5);
            let marker = Path::new(|builder| builder.circle(center, radius));

            match cone.hint {
                RenderHint::Start => frame.fill(&marker, Color::from_rgb(0.2, 0.8, 0.3)),
                RenderHint::Single => frame.fill(&marker, orange),
                RenderHint::Pointer { heading_deg } => {
                    frame.fill(&marker, orange);
                    let (sin, cos) = (heading_deg as f32).to_radians().sin_cos();
                    let length = radius * 3.0;
                    let dash = Path::new(|builder| {
                        builder.move_to(center);
                        builder.line_to(Point::new(center.x + cos * length, center.y + sin * length));
                    });
                    frame.stroke(
                        &dash,
                        Stroke::default()
                            .with_width((radius * 0.6).max(1.0))
                            .with_color(orange),
                    );
                }
                RenderHint::Unknown => frame.stroke(
                    &marker,
                    Stroke::default().with_color(Color::from_rgb(0.5, 0.5, 0.55)),
                ),
            }
        }

        if let Some(location) = self.current_location {
            let position = plot.place(location);
            let radius = (plot.marker_size() as f32 / 2.5).max(1.5);
            let dot = Path::new(|builder| {
                builder.circle(Point::new(position.x as f32, position.y as f32), radius)
            });
            frame.fill(&dot, Color::from_rgb(0.2, 0.45, 0.95));
        }

        vec![frame.into_geometry()]
    }
}
