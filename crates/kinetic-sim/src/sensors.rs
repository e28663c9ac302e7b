//! Synthetic sensors: Gaussian noise over ground truth.

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use kinetic_core::constants::*;
use kinetic_core::error::{require_non_negative, ConfigError};

use crate::estimation::{polar_measurement, PolarMeasurement, PositionVelocity};

fn normal(what: &'static str, std: f64) -> Result<Normal<f64>, ConfigError> {
    let std = require_non_negative(what, std)?;
    Normal::new(0.0, std).map_err(|_| ConfigError::Negative { what, value: std })
}

fn sample3(dist: &Normal<f64>, rng: &mut ChaCha8Rng) -> DVec3 {
    DVec3::new(dist.sample(rng), dist.sample(rng), dist.sample(rng))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Per-axis position noise std (m).
    pub position_noise: f64,
    /// Per-axis velocity noise std (m/s).
    pub velocity_noise: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            position_noise: RADAR_POSITION_NOISE,
            velocity_noise: RADAR_VELOCITY_NOISE,
        }
    }
}

/// Ground radar reporting absolute target position and velocity.
#[derive(Debug, Clone)]
pub struct Radar {
    position_noise: Normal<f64>,
    velocity_noise: Normal<f64>,
    rng: ChaCha8Rng,
}

impl Radar {
    pub fn new(config: RadarConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            position_noise: normal("radar position noise", config.position_noise)?,
            velocity_noise: normal("radar velocity noise", config.velocity_noise)?,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn measure(&mut self, position: DVec3, velocity: DVec3) -> PositionVelocity {
        PositionVelocity {
            position: position + sample3(&self.position_noise, &mut self.rng),
            velocity: velocity + sample3(&self.velocity_noise, &mut self.rng),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekerConfig {
    /// Range noise std (m).
    pub range_noise: f64,
    /// Azimuth and elevation noise std (rad).
    pub angle_noise: f64,
}

impl Default for SeekerConfig {
    fn default() -> Self {
        Self {
            range_noise: SEEKER_RANGE_NOISE,
            angle_noise: SEEKER_ANGLE_NOISE,
        }
    }
}

/// On-board seeker reporting the target in polar coordinates relative to
/// the interceptor.
#[derive(Debug, Clone)]
pub struct Seeker {
    range_noise: Normal<f64>,
    angle_noise: Normal<f64>,
    rng: ChaCha8Rng,
}

impl Seeker {
    pub fn new(config: SeekerConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            range_noise: normal("seeker range noise", config.range_noise)?,
            angle_noise: normal("seeker angle noise", config.angle_noise)?,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Measure the target at `relative` = target minus interceptor.
    pub fn measure(&mut self, relative: DVec3) -> PolarMeasurement {
        let exact = polar_measurement(relative);
        PolarMeasurement {
            range: exact.range + self.range_noise.sample(&mut self.rng),
            azimuth: exact.azimuth + self.angle_noise.sample(&mut self.rng),
            elevation: exact.elevation + self.angle_noise.sample(&mut self.rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_noise_free_radar_reports_truth() {
        let config = RadarConfig {
            position_noise: 0.0,
            velocity_noise: 0.0,
        };
        let mut radar = Radar::new(config, 1).unwrap();
        let z = radar.measure(DVec3::new(1.0, 2.0, 3.0), DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(z.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(z.velocity, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_radar_noise_statistics() {
        let mut radar = Radar::new(RadarConfig::default(), 21).unwrap();
        let n = 4_000;
        let mut sum = DVec3::ZERO;
        let mut sum_sq = DVec3::ZERO;
        for _ in 0..n {
            let error = radar.measure(DVec3::ZERO, DVec3::ZERO).position;
            sum += error;
            sum_sq += error * error;
        }
        let mean = sum / n as f64;
        let std = (sum_sq / n as f64 - mean * mean).powf(0.5);
        assert!(mean.abs().max_element() < 0.5);
        assert_relative_eq!(std.x, RADAR_POSITION_NOISE, max_relative = 0.1);
    }

    #[test]
    fn test_seeker_is_seeded() {
        let relative = DVec3::new(3_000.0, -1_000.0, 800.0);
        let mut a = Seeker::new(SeekerConfig::default(), 4).unwrap();
        let mut b = Seeker::new(SeekerConfig::default(), 4).unwrap();
        assert_eq!(a.measure(relative), b.measure(relative));
        let z = a.measure(relative);
        assert_relative_eq!(z.range, relative.length(), epsilon = 10.0);
    }

    #[test]
    fn test_rejects_negative_noise() {
        let config = SeekerConfig {
            range_noise: -1.0,
            ..Default::default()
        };
        assert!(Seeker::new(config, 0).is_err());
    }
}
