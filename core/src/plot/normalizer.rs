//! Screen placement of projected cones.
//!
//! Cones are projected against a reference, scaled onto the canvas
//! (auto-fit or direct), then the whole field is rotated about the canvas
//! centre by the world rotation. Stored coordinates are never touched.

use crate::course::{Cone, ConeType};
use crate::geo::{project, GeoCoordinate, PlanarPoint};
use crate::prelude::{PlotError, PlotResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Zoom range offered by the interactive views.
pub const ZOOM_RANGE: RangeInclusive<f64> = 0.05..=3.0;
/// World rotation range offered by the interactive views, in degrees.
pub const ROTATION_RANGE: RangeInclusive<f64> = -180.0..=180.0;
/// Number of leading cones drawn as start markers.
pub const START_MARKERS: usize = 1;

const AUTO_FIT_MARKER: f64 = 10.0;
const DIRECT_MARKER: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScalingMode {
    /// Scale so the farthest cone lands on the canvas edge at zoom 1.
    AutoFit,
    /// Fixed pixels per metre; the spread grows with the real course.
    Direct { scale_factor: f64 },
}

impl Default for ScalingMode {
    fn default() -> Self {
        ScalingMode::AutoFit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotParams {
    pub canvas: CanvasSize,
    pub zoom: f64,
    pub world_rotation_deg: f64,
    pub scaling: ScalingMode,
}

impl PlotParams {
    pub fn new(canvas: CanvasSize, zoom: f64, world_rotation_deg: f64, scaling: ScalingMode) -> Self {
        Self {
            canvas,
            zoom,
            world_rotation_deg,
            scaling,
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(PlotError::InvalidZoom(self.zoom));
        }
        if !self.world_rotation_deg.is_finite() {
            return Err(PlotError::InvalidRotation(self.world_rotation_deg));
        }
        let CanvasSize { width, height } = self.canvas;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PlotError::InvalidCanvas { width, height });
        }
        if let ScalingMode::Direct { scale_factor } = self.scaling {
            if !(scale_factor.is_finite() && scale_factor > 0.0) {
                return Err(PlotError::InvalidScaleFactor(scale_factor));
            }
        }
        Ok(())
    }
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::new(1000.0, 1000.0),
            zoom: 1.0,
            world_rotation_deg: 0.0,
            scaling: ScalingMode::AutoFit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How a plotted cone should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderHint {
    Start,
    /// Heading on screen: the cone's own rotation plus the world rotation.
    Pointer { heading_deg: f64 },
    Single,
    Unknown,
}

impl RenderHint {
    /// Positional override first, then the stored type.
    pub fn for_cone(index: usize, cone: &Cone, world_rotation_deg: f64) -> Self {
        if index < START_MARKERS {
            return RenderHint::Start;
        }
        match &cone.cone_type {
            ConeType::Starting => RenderHint::Start,
            ConeType::Pointer => RenderHint::Pointer {
                heading_deg: cone.rotation + world_rotation_deg,
            },
            ConeType::Single => RenderHint::Single,
            ConeType::Unknown(_) => RenderHint::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlottedCone {
    pub index: usize,
    pub position: ScreenPoint,
    pub hint: RenderHint,
    pub marker_size: f64,
}

/// Transform shared by every point drawn in one plot.
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame {
    reference: GeoCoordinate,
    params: PlotParams,
    max_distance: f64,
}

impl PlotFrame {
    pub fn new(cones: &[Cone], reference: GeoCoordinate, params: PlotParams) -> PlotResult<Self> {
        params.validate()?;
        let max_distance = cones
            .iter()
            .map(|cone| project(cone.location, reference).magnitude())
            .fold(0.0, f64::max);
        Ok(Self {
            reference,
            params,
            max_distance,
        })
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn params(&self) -> &PlotParams {
        &self.params
    }

    pub fn marker_size(&self) -> f64 {
        match self.params.scaling {
            ScalingMode::AutoFit => AUTO_FIT_MARKER * self.params.zoom,
            ScalingMode::Direct { .. } => DIRECT_MARKER * self.params.zoom,
        }
    }

    /// Screen position of any coordinate, e.g. the live location.
    pub fn place(&self, coordinate: GeoCoordinate) -> ScreenPoint {
        let planar = project(coordinate, self.reference);
        self.rotate(self.normalize(planar))
    }

    pub fn plot(&self, cones: &[Cone]) -> Vec<PlottedCone> {
        let marker_size = self.marker_size();
        cones
            .iter()
            .enumerate()
            .map(|(index, cone)| PlottedCone {
                index,
                position: self.place(cone.location),
                hint: RenderHint::for_cone(index, cone, self.params.world_rotation_deg),
                marker_size,
            })
            .collect()
    }

    fn normalize(&self, point: PlanarPoint) -> ScreenPoint {
        let center = self.params.canvas.center();
        let zoom = self.params.zoom;
        match self.params.scaling {
            ScalingMode::AutoFit => {
                if self.max_distance == 0.0 {
                    return center;
                }
                ScreenPoint::new(
                    (point.x / self.max_distance) * center.x * zoom + center.x,
                    (point.y / self.max_distance) * center.y * zoom + center.y,
                )
            }
            ScalingMode::Direct { scale_factor } => ScreenPoint::new(
                point.x * scale_factor * zoom + center.x,
                point.y * scale_factor * zoom + center.y,
            ),
        }
    }

    fn rotate(&self, point: ScreenPoint) -> ScreenPoint {
        let center = self.params.canvas.center();
        let (sin, cos) = self.params.world_rotation_deg.to_radians().sin_cos();
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        ScreenPoint::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }
}

/// Plots `cones` against an explicit reference.
pub fn plot_cones(
    cones: &[Cone],
    reference: GeoCoordinate,
    params: PlotParams,
) -> PlotResult<Vec<PlottedCone>> {
    Ok(PlotFrame::new(cones, reference, params)?.plot(cones))
}

/// Plots a course against its own first cone. An empty course plots nothing.
pub fn plot_course(cones: &[Cone], params: PlotParams) -> PlotResult<Vec<PlottedCone>> {
    match cones.first() {
        Some(first) => plot_cones(cones, first.location, params),
        None => {
            params.validate()?;
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn cone(lat: f64, lon: f64, cone_type: ConeType, rotation: f64) -> Cone {
        Cone::new(GeoCoordinate::new(lat, lon), cone_type, rotation)
    }

    fn params(zoom: f64, rotation: f64, scaling: ScalingMode) -> PlotParams {
        PlotParams::new(CanvasSize::new(1000.0, 600.0), zoom, rotation, scaling)
    }

    fn assert_close(actual: ScreenPoint, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < EPSILON && (actual.y - y).abs() < EPSILON,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn single_cone_sits_at_center_for_any_zoom() {
        let cones = [cone(40.0, -75.0, ConeType::Single, 0.0)];
        for zoom in [0.05, 1.0, 2.5] {
            let plotted = plot_course(&cones, params(zoom, 37.0, ScalingMode::AutoFit)).unwrap();
            assert_eq!(plotted[0].position, ScreenPoint::new(500.0, 300.0));
        }
    }

    #[test]
    fn coincident_cones_do_not_divide_by_zero() {
        let cones = [
            cone(40.0, -75.0, ConeType::Starting, 0.0),
            cone(40.0, -75.0, ConeType::Single, 0.0),
        ];
        let plotted = plot_course(&cones, params(1.0, 0.0, ScalingMode::AutoFit)).unwrap();
        for item in plotted {
            assert_eq!(item.position, ScreenPoint::new(500.0, 300.0));
        }
    }

    #[test]
    fn auto_fit_puts_farthest_cone_on_the_edge() {
        let cones = [
            cone(40.0, -75.0, ConeType::Starting, 0.0),
            cone(40.0001, -75.0, ConeType::Single, 0.0),
            cone(40.00005, -75.0, ConeType::Single, 0.0),
        ];
        let plotted = plot_course(&cones, params(1.0, 0.0, ScalingMode::AutoFit)).unwrap();
        assert_close(plotted[0].position, 500.0, 300.0);
        assert_close(plotted[1].position, 500.0, 600.0);
        assert_close(plotted[2].position, 500.0, 450.0);
        assert_eq!(plotted[1].marker_size, 10.0);
    }

    #[test]
    fn direct_scale_grows_with_distance() {
        let cones = [
            cone(40.0, -75.0, ConeType::Starting, 0.0),
            cone(40.0001, -75.0, ConeType::Single, 0.0),
        ];
        let mode = ScalingMode::Direct { scale_factor: 2.0 };
        let plotted = plot_course(&cones, params(0.5, 0.0, mode)).unwrap();
        // 11.1 m * 2 px/m * 0.5
        assert_close(plotted[1].position, 500.0, 300.0 + 11.1);
        assert!((plotted[1].marker_size - 1.25).abs() < EPSILON);
    }

    #[test]
    fn world_rotation_turns_the_field_about_the_center() {
        let cones = [
            cone(40.0, -75.0, ConeType::Starting, 0.0),
            cone(40.0001, -75.0, ConeType::Pointer, 10.0),
        ];
        let plotted = plot_course(&cones, params(1.0, 90.0, ScalingMode::AutoFit)).unwrap();
        assert_close(plotted[0].position, 500.0, 300.0);
        // (0, +300) from centre rotates onto (-300, 0).
        assert_close(plotted[1].position, 200.0, 300.0);
        assert_eq!(plotted[1].hint, RenderHint::Pointer { heading_deg: 100.0 });
    }

    #[test]
    fn first_cone_is_always_start() {
        let cones = [
            cone(40.0, -75.0, ConeType::Single, 0.0),
            cone(40.0001, -75.0, ConeType::Single, 0.0),
            cone(40.0002, -75.0, ConeType::Unknown("leftPointer".into()), 0.0),
            cone(40.0003, -75.0, ConeType::Starting, 0.0),
        ];
        let plotted = plot_course(&cones, PlotParams::default()).unwrap();
        let hints: Vec<_> = plotted.iter().map(|p| p.hint).collect();
        assert_eq!(
            hints,
            [
                RenderHint::Start,
                RenderHint::Single,
                RenderHint::Unknown,
                RenderHint::Start
            ]
        );
    }

    #[test]
    fn place_uses_the_same_transform() {
        let cones = [
            cone(40.0, -75.0, ConeType::Starting, 0.0),
            cone(40.0001, -75.0, ConeType::Single, 0.0),
        ];
        let reference = cones[0].location;
        let frame = PlotFrame::new(&cones, reference, params(1.0, 0.0, ScalingMode::AutoFit)).unwrap();
        assert_close(frame.place(GeoCoordinate::new(40.00005, -75.0)), 500.0, 450.0);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let cones = [cone(40.0, -75.0, ConeType::Starting, 0.0)];
        assert_eq!(
            plot_course(&cones, params(0.0, 0.0, ScalingMode::AutoFit)).unwrap_err(),
            PlotError::InvalidZoom(0.0)
        );
        assert!(plot_course(&cones, params(1.0, f64::NAN, ScalingMode::AutoFit)).is_err());
        let flat = PlotParams::new(CanvasSize::new(0.0, 10.0), 1.0, 0.0, ScalingMode::AutoFit);
        assert!(plot_course(&cones, flat).is_err());
        let mode = ScalingMode::Direct { scale_factor: -1.0 };
        assert!(plot_course(&cones, params(1.0, 0.0, mode)).is_err());
    }

    #[test]
    fn slider_ranges_do_not_limit_validation() {
        let cones = [
            cone(40.0, -75.0, ConeType::Starting, 0.0),
            cone(40.0001, -75.0, ConeType::Single, 0.0),
        ];
        assert!(!ZOOM_RANGE.contains(&5.0));
        assert!(!ROTATION_RANGE.contains(&540.0));
        let wide = plot_course(&cones, params(5.0, 540.0, ScalingMode::AutoFit)).unwrap();
        let turned = plot_course(&cones, params(5.0, 180.0, ScalingMode::AutoFit)).unwrap();
        assert_close(wide[1].position, turned[1].position.x, turned[1].position.y);
    }

    #[test]
    fn empty_course_plots_nothing() {
        assert!(plot_course(&[], PlotParams::default()).unwrap().is_empty());
    }
}
