//! Recursive Bayesian estimators of target kinematics.
//!
//! Both filters share one predict/update protocol. A filter that has not
//! been given an initial state seeds its mean from the first measurement,
//! and predictions before that are no-ops.

mod extended;
mod linear;

pub use extended::{
    measurement_jacobian, polar_measurement, wrap_angle, ExtendedFilterConfig,
    ExtendedKalmanFilter,
};
pub use linear::{LinearFilterConfig, LinearKalmanFilter};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Common protocol of the linear and extended filters.
pub trait StateEstimator {
    type Measurement;
    type State;
    type Covariance;

    /// Propagate the belief one filter step.
    fn predict(&mut self);

    /// Fold one measurement into the belief.
    fn update(&mut self, measurement: &Self::Measurement);

    /// Mean of the belief.
    fn state(&self) -> &Self::State;

    fn covariance(&self) -> &Self::Covariance;

    /// Whether the mean has been seeded.
    fn is_initialized(&self) -> bool;

    /// Estimated position part of the mean.
    fn position(&self) -> DVec3;

    /// Estimated velocity part of the mean.
    fn velocity(&self) -> DVec3;
}

/// Direct noisy observation of absolute position and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionVelocity {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Range (m), azimuth and elevation (rad) of a relative position.
///
/// Azimuth is measured from +x toward +y; elevation is above the
/// horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarMeasurement {
    pub range: f64,
    pub azimuth: f64,
    pub elevation: f64,
}

impl PolarMeasurement {
    /// Cartesian vector with this range and direction.
    pub fn to_cartesian(&self) -> DVec3 {
        let (se, ce) = self.elevation.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.range * DVec3::new(ce * ca, ce * sa, se)
    }
}
