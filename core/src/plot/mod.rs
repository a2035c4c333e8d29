pub mod normalizer;

pub use normalizer::{
    plot_cones, plot_course, CanvasSize, PlotFrame, PlotParams, PlottedCone, RenderHint,
    ScalingMode, ScreenPoint, ROTATION_RANGE, START_MARKERS, ZOOM_RANGE,
};
