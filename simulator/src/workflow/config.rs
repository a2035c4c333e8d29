use crate::generator::walk::WalkConfig;
use anyhow::Context;
use conecore::location::AccuracyGate;
use conecore::plot::{CanvasSize, PlotParams, ScalingMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub zoom: f64,
    pub rotation_deg: f64,
    pub scaling: ScalingMode,
    pub accuracy_threshold_m: f64,
    pub storage_dir: PathBuf,
    pub export_dir: PathBuf,
    pub walk: WalkConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            canvas_height: 1000.0,
            zoom: 1.0,
            rotation_deg: 0.0,
            scaling: ScalingMode::AutoFit,
            accuracy_threshold_m: AccuracyGate::DEFAULT_THRESHOLD_M,
            storage_dir: PathBuf::from("tools/data"),
            export_dir: PathBuf::from("tools/data/exports"),
            walk: WalkConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(zoom: f64, rotation_deg: f64, accuracy_threshold_m: f64) -> Self {
        Self {
            zoom,
            rotation_deg,
            accuracy_threshold_m,
            ..Default::default()
        }
    }

    pub fn to_plot_params(&self) -> PlotParams {
        PlotParams::new(
            CanvasSize::new(self.canvas_width, self.canvas_height),
            self.zoom,
            self.rotation_deg,
            self.scaling,
        )
    }

    pub fn gate(&self) -> AccuracyGate {
        AccuracyGate::new(self.accuracy_threshold_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_plot_params() {
        let cfg = WorkflowConfig::from_args(2.0, -45.0, 8.0);
        let params = cfg.to_plot_params();
        assert_eq!(params.zoom, 2.0);
        assert_eq!(params.world_rotation_deg, -45.0);
        assert_eq!(cfg.gate().threshold_m(), 8.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"zoom: 0.5\nscaling:\n  mode: direct\n  scale_factor: 4.0\nwalk:\n  cone_count: 6\n  seed: 3\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.zoom, 0.5);
        assert_eq!(cfg.scaling, ScalingMode::Direct { scale_factor: 4.0 });
        assert_eq!(cfg.walk.cone_count, 6);
        assert_eq!(cfg.walk.spacing_m, WalkConfig::default().spacing_m);
        assert_eq!(cfg.canvas_width, 1000.0);
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"zoom: [not a number\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
