use anyhow::ensure;
use conecore::course::ConeType;
use conecore::geo::METERS_PER_DEGREE;
use conecore::location::{LocationEvent, LocationFix};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic course walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub cone_count: usize,
    pub spacing_m: f64,
    pub heading_deg: f64,
    /// Heading change applied after every cone, producing a slalom-like arc.
    pub turn_deg: f64,
    pub accuracy_m: f64,
    pub noise_m: f64,
    /// Every n-th cone first receives a fix too coarse to tag. Zero disables.
    pub bad_fix_every: usize,
    /// Every n-th cone is a pointer. Zero disables.
    pub pointer_every: usize,
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            origin_latitude: 40.0,
            origin_longitude: -75.0,
            cone_count: 24,
            spacing_m: 15.0,
            heading_deg: 0.0,
            turn_deg: 12.0,
            accuracy_m: 3.0,
            noise_m: 0.5,
            bad_fix_every: 7,
            pointer_every: 3,
            seed: 0,
        }
    }
}

/// One tag attempt: the fix delivered just before it and the requested cone.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkStep {
    pub event: LocationEvent,
    pub cone_type: ConeType,
    pub rotation: f64,
}

const COARSE_ACCURACY_M: f64 = 25.0;

fn offset_to_fix(config: &WalkConfig, east_m: f64, north_m: f64, accuracy_m: f64) -> LocationFix {
    let latitude = config.origin_latitude + north_m / METERS_PER_DEGREE;
    let longitude = config.origin_longitude
        + east_m / (METERS_PER_DEGREE * config.origin_latitude.to_radians().cos());
    LocationFix::new(latitude, longitude, accuracy_m)
}

pub fn build_walk(config: &WalkConfig) -> anyhow::Result<Vec<WalkStep>> {
    ensure!(config.cone_count > 0, "a walk needs at least one cone");
    ensure!(
        config.origin_latitude.abs() < 89.0,
        "origin latitude {} too close to a pole for a local projection",
        config.origin_latitude
    );
    ensure!(
        config.spacing_m.is_finite() && config.spacing_m >= 0.0,
        "spacing must be a non-negative distance"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut steps = Vec::with_capacity(config.cone_count + config.cone_count / 2);
    let (mut east, mut north) = (0.0_f64, 0.0_f64);
    let mut heading = config.heading_deg;

    for cone_index in 0..config.cone_count {
        if cone_index > 0 {
            let (sin, cos) = heading.to_radians().sin_cos();
            east += config.spacing_m * sin;
            north += config.spacing_m * cos;
            heading += config.turn_deg;
        }

        let (jitter_east, jitter_north) = if config.noise_m > 0.0 {
            (
                rng.gen_range(-config.noise_m..config.noise_m),
                rng.gen_range(-config.noise_m..config.noise_m),
            )
        } else {
            (0.0, 0.0)
        };

        let cone_type = if cone_index == 0 {
            ConeType::Starting
        } else if config.pointer_every > 0 && cone_index % config.pointer_every == 0 {
            ConeType::Pointer
        } else {
            ConeType::Single
        };
        let rotation = match cone_type {
            ConeType::Pointer => (heading + 90.0).rem_euclid(360.0),
            _ => 0.0,
        };

        if config.bad_fix_every > 0 && cone_index > 0 && cone_index % config.bad_fix_every == 0 {
            let coarse = offset_to_fix(config, east, north, COARSE_ACCURACY_M);
            steps.push(WalkStep {
                event: LocationEvent::Fix(coarse),
                cone_type: cone_type.clone(),
                rotation,
            });
        }

        let fix = offset_to_fix(
            config,
            east + jitter_east,
            north + jitter_north,
            config.accuracy_m,
        );
        steps.push(WalkStep {
            event: LocationEvent::Fix(fix),
            cone_type,
            rotation,
        });
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixes(steps: &[WalkStep]) -> Vec<LocationFix> {
        steps
            .iter()
            .filter_map(|step| match &step.event {
                LocationEvent::Fix(fix) => Some(*fix),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn walk_starts_at_origin_with_a_start_cone() {
        let config = WalkConfig {
            noise_m: 0.0,
            ..Default::default()
        };
        let steps = build_walk(&config).unwrap();
        assert_eq!(steps[0].cone_type, ConeType::Starting);
        let first = fixes(&steps)[0];
        assert_eq!(first.coordinate.latitude, 40.0);
        assert_eq!(first.coordinate.longitude, -75.0);
    }

    #[test]
    fn coarse_fixes_are_inserted_before_retakes() {
        let config = WalkConfig {
            cone_count: 8,
            bad_fix_every: 4,
            ..Default::default()
        };
        let steps = build_walk(&config).unwrap();
        assert_eq!(steps.len(), 9);
        let coarse = fixes(&steps)
            .iter()
            .filter(|fix| fix.horizontal_accuracy_m > config.accuracy_m)
            .count();
        assert_eq!(coarse, 1);
    }

    #[test]
    fn same_seed_replays_the_same_walk() {
        let config = WalkConfig {
            seed: 99,
            ..Default::default()
        };
        assert_eq!(build_walk(&config).unwrap(), build_walk(&config).unwrap());
    }

    #[test]
    fn pointer_cones_get_a_heading() {
        let config = WalkConfig {
            pointer_every: 2,
            bad_fix_every: 0,
            cone_count: 5,
            ..Default::default()
        };
        let steps = build_walk(&config).unwrap();
        assert_eq!(steps[2].cone_type, ConeType::Pointer);
        assert!(steps[2].rotation > 0.0);
        assert_eq!(steps[1].rotation, 0.0);
    }

    #[test]
    fn empty_walk_is_rejected() {
        let config = WalkConfig {
            cone_count: 0,
            ..Default::default()
        };
        assert!(build_walk(&config).is_err());
    }
}
