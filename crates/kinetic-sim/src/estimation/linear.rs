use glam::DVec3;
use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kinetic_core::constants::*;
use kinetic_core::error::{require_non_negative, require_positive, require_time_step, ConfigError};

use super::{PositionVelocity, StateEstimator};

type Vector6 = SVector<f64, 6>;
type Matrix6 = SMatrix<f64, 6, 6>;

/// Parameters of the constant-velocity filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFilterConfig {
    /// Filter step (s).
    pub dt: f64,
    /// Position measurement noise std (m).
    pub position_noise: f64,
    /// Velocity measurement noise std (m/s).
    pub velocity_noise: f64,
    /// Diagonal process noise.
    pub process_noise: f64,
    /// Diagonal of the initial covariance.
    pub initial_variance: f64,
}

impl Default for LinearFilterConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            position_noise: RADAR_POSITION_NOISE,
            velocity_noise: RADAR_VELOCITY_NOISE,
            process_noise: KF_PROCESS_NOISE,
            initial_variance: KF_INITIAL_VARIANCE,
        }
    }
}

/// Six-state constant-velocity Kalman filter over absolute position and
/// velocity, observed directly.
#[derive(Debug, Clone)]
pub struct LinearKalmanFilter {
    x: Vector6,
    p: Matrix6,
    f: Matrix6,
    q: Matrix6,
    r: Matrix6,
    initialized: bool,
}

impl LinearKalmanFilter {
    pub fn new(config: LinearFilterConfig) -> Result<Self, ConfigError> {
        let dt = require_time_step(config.dt)?;
        require_positive("position noise", config.position_noise)?;
        require_positive("velocity noise", config.velocity_noise)?;
        require_non_negative("process noise", config.process_noise)?;
        require_positive("initial variance", config.initial_variance)?;

        let mut f = Matrix6::identity();
        for i in 0..3 {
            f[(i, i + 3)] = dt;
        }
        let pos_var = config.position_noise.powi(2);
        let vel_var = config.velocity_noise.powi(2);
        let r = Matrix6::from_diagonal(&Vector6::new(
            pos_var, pos_var, pos_var, vel_var, vel_var, vel_var,
        ));

        Ok(Self {
            x: Vector6::zeros(),
            p: Matrix6::identity() * config.initial_variance,
            f,
            q: Matrix6::identity() * config.process_noise,
            r,
            initialized: false,
        })
    }

    /// Start from a known state instead of the first measurement.
    pub fn with_initial_state(mut self, position: DVec3, velocity: DVec3) -> Self {
        self.x = Vector6::new(
            position.x, position.y, position.z, velocity.x, velocity.y, velocity.z,
        );
        self.initialized = true;
        self
    }
}

fn to_vector(z: &PositionVelocity) -> Vector6 {
    let (p, v) = (z.position, z.velocity);
    Vector6::new(p.x, p.y, p.z, v.x, v.y, v.z)
}

impl StateEstimator for LinearKalmanFilter {
    type Measurement = PositionVelocity;
    type State = Vector6;
    type Covariance = Matrix6;

    fn predict(&mut self) {
        if !self.initialized {
            return;
        }
        self.x = self.f * self.x;
        self.p = self.f * self.p * self.f.transpose() + self.q;
    }

    fn update(&mut self, measurement: &PositionVelocity) {
        let z = to_vector(measurement);
        if !self.initialized {
            self.x = z;
            self.initialized = true;
            return;
        }

        // H is the identity.
        let s = self.p + self.r;
        let Some(s_inv) = s.try_inverse() else {
            debug!("linear filter: singular innovation covariance, update skipped");
            return;
        };
        let k = self.p * s_inv;
        self.x += k * (z - self.x);
        let p = (Matrix6::identity() - k) * self.p;
        self.p = (p + p.transpose()) * 0.5;
    }

    fn state(&self) -> &Vector6 {
        &self.x
    }

    fn covariance(&self) -> &Matrix6 {
        &self.p
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn position(&self) -> DVec3 {
        DVec3::new(self.x[0], self.x[1], self.x[2])
    }

    fn velocity(&self) -> DVec3 {
        DVec3::new(self.x[3], self.x[4], self.x[5])
    }
}
