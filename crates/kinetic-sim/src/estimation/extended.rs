use std::f64::consts::{PI, TAU};

use glam::DVec3;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kinetic_core::constants::*;
use kinetic_core::error::{require_non_negative, require_positive, require_time_step, ConfigError};

use super::{PolarMeasurement, StateEstimator};

type Vector9 = SVector<f64, 9>;
type Matrix9 = SMatrix<f64, 9, 9>;
type Jacobian = SMatrix<f64, 3, 9>;

/// Parameters of the polar-measurement filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedFilterConfig {
    /// Filter step (s).
    pub dt: f64,
    /// Diagonal process noise.
    pub process_noise: f64,
    /// Range noise std (m).
    pub range_noise: f64,
    /// Azimuth and elevation noise std (rad).
    pub angle_noise: f64,
    /// Per-step retention of the acceleration estimate.
    pub acceleration_decay: f64,
    /// Diagonal of the initial covariance.
    pub initial_variance: f64,
}

impl Default for ExtendedFilterConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            process_noise: EKF_PROCESS_NOISE,
            range_noise: SEEKER_RANGE_NOISE,
            angle_noise: SEEKER_ANGLE_NOISE,
            acceleration_decay: EKF_ACCELERATION_DECAY,
            initial_variance: EKF_INITIAL_VARIANCE,
        }
    }
}

/// Wrap an angle into (-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    PI - (PI - angle).rem_euclid(TAU)
}

/// Range, azimuth and elevation of a relative position.
pub fn polar_measurement(relative: DVec3) -> PolarMeasurement {
    let horizontal = relative.x.hypot(relative.y);
    PolarMeasurement {
        range: relative.length(),
        azimuth: relative.y.atan2(relative.x),
        elevation: relative.z.atan2(horizontal),
    }
}

/// Jacobian of [`polar_measurement`] with respect to the 9-state.
///
/// Only the position columns are non-zero. Rows are left zero when the
/// range or the horizontal range is below [`JACOBIAN_MIN_RANGE`], where the
/// angles are undefined.
pub fn measurement_jacobian(relative: DVec3) -> Jacobian {
    let mut h = Jacobian::zeros();
    let (px, py, pz) = (relative.x, relative.y, relative.z);
    let r2 = relative.length_squared();
    let r = r2.sqrt();
    let rho2 = px * px + py * py;
    let rho = rho2.sqrt();

    if r > JACOBIAN_MIN_RANGE {
        h[(0, 0)] = px / r;
        h[(0, 1)] = py / r;
        h[(0, 2)] = pz / r;
    }
    if rho > JACOBIAN_MIN_RANGE {
        h[(1, 0)] = -py / rho2;
        h[(1, 1)] = px / rho2;
        h[(2, 0)] = -px * pz / (rho * r2);
        h[(2, 1)] = -py * pz / (rho * r2);
        h[(2, 2)] = rho / r2;
    }
    h
}

/// Nine-state extended Kalman filter over relative position, velocity and
/// a slowly decaying target acceleration, observed through range and angles.
#[derive(Debug, Clone)]
pub struct ExtendedKalmanFilter {
    dt: f64,
    decay: f64,
    x: Vector9,
    p: Matrix9,
    q: Matrix9,
    r: Matrix3<f64>,
    initialized: bool,
}

impl ExtendedKalmanFilter {
    pub fn new(config: ExtendedFilterConfig) -> Result<Self, ConfigError> {
        let dt = require_time_step(config.dt)?;
        require_non_negative("process noise", config.process_noise)?;
        require_positive("range noise", config.range_noise)?;
        require_positive("angle noise", config.angle_noise)?;
        require_non_negative("acceleration decay", config.acceleration_decay)?;
        require_positive("initial variance", config.initial_variance)?;

        let angle_var = config.angle_noise.powi(2);
        Ok(Self {
            dt,
            decay: config.acceleration_decay,
            x: Vector9::zeros(),
            p: Matrix9::identity() * config.initial_variance,
            q: Matrix9::identity() * config.process_noise,
            r: Matrix3::from_diagonal(&Vector3::new(
                config.range_noise.powi(2),
                angle_var,
                angle_var,
            )),
            initialized: false,
        })
    }

    /// Start from a known `[position, velocity, acceleration]` state.
    pub fn with_initial_state(mut self, state: Vector9) -> Self {
        self.x = state;
        self.initialized = true;
        self
    }

    /// Estimated acceleration part of the mean.
    pub fn acceleration(&self) -> DVec3 {
        DVec3::new(self.x[6], self.x[7], self.x[8])
    }

    /// Propagate one step while the observer accelerates at
    /// `own_acceleration`.
    ///
    /// The acceleration part of the mean belongs to the target; the
    /// observer's is subtracted from it. The covariance update is the same
    /// as [`StateEstimator::predict`].
    pub fn predict_with_input(&mut self, own_acceleration: DVec3) {
        if !self.initialized {
            return;
        }
        let dt = self.dt;
        let (p, v, a) = (self.position(), self.velocity(), self.acceleration());
        let relative = a - own_acceleration;
        let p_next = p + v * dt + relative * (0.5 * dt * dt);
        let v_next = v + relative * dt;
        let a_next = a * self.decay;
        self.x = Vector9::from_iterator(
            p_next
                .to_array()
                .into_iter()
                .chain(v_next.to_array())
                .chain(a_next.to_array()),
        );

        let f = self.transition();
        self.p = f * self.p * f.transpose() + self.q;
    }

    /// Linearized state transition of one step.
    fn transition(&self) -> Matrix9 {
        let dt = self.dt;
        let mut f = Matrix9::identity();
        for i in 0..3 {
            f[(i, i + 3)] = dt;
            f[(i, i + 6)] = 0.5 * dt * dt;
            f[(i + 3, i + 6)] = dt;
            f[(i + 6, i + 6)] = self.decay;
        }
        f
    }

    /// Measurement minus prediction, with both angle residuals wrapped.
    pub fn innovation(&self, measurement: &PolarMeasurement) -> Vector3<f64> {
        let predicted = polar_measurement(self.position());
        Vector3::new(
            measurement.range - predicted.range,
            wrap_angle(measurement.azimuth - predicted.azimuth),
            wrap_angle(measurement.elevation - predicted.elevation),
        )
    }
}

impl StateEstimator for ExtendedKalmanFilter {
    type Measurement = PolarMeasurement;
    type State = Vector9;
    type Covariance = Matrix9;

    fn predict(&mut self) {
        self.predict_with_input(DVec3::ZERO);
    }

    fn update(&mut self, measurement: &PolarMeasurement) {
        if !self.initialized {
            let position = measurement.to_cartesian();
            self.x = Vector9::zeros();
            self.x[0] = position.x;
            self.x[1] = position.y;
            self.x[2] = position.z;
            self.initialized = true;
            return;
        }

        let h = measurement_jacobian(self.position());
        let y = self.innovation(measurement);
        let s = h * self.p * h.transpose() + self.r;
        let k = match s.try_inverse() {
            Some(s_inv) => self.p * h.transpose() * s_inv,
            None => {
                debug!("extended filter: singular innovation covariance, zero gain");
                SMatrix::<f64, 9, 3>::zeros()
            }
        };

        self.x += k * y;
        let p = (Matrix9::identity() - k * h) * self.p;
        self.p = (p + p.transpose()) * 0.5;
    }

    fn state(&self) -> &Vector9 {
        &self.x
    }

    fn covariance(&self) -> &Matrix9 {
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

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Normal};

    use super::*;

    fn state_at(position: DVec3) -> Vector9 {
        let mut x = Vector9::zeros();
        x[0] = position.x;
        x[1] = position.y;
        x[2] = position.z;
        x
    }

    #[test]
    fn test_azimuth_residual_wraps_across_pi() {
        let range = 1_000.0;
        let predicted = DVec3::new(range * 3.13f64.cos(), range * 3.13f64.sin(), 0.0);
        let ekf = ExtendedKalmanFilter::new(ExtendedFilterConfig::default())
            .unwrap()
            .with_initial_state(state_at(predicted));

        let y = ekf.innovation(&PolarMeasurement {
            range,
            azimuth: -3.13,
            elevation: 0.0,
        });
        assert_relative_eq!(y[1], TAU - 6.26, epsilon = 1e-9);
        assert!(y[1].abs() < 0.03);
    }

    #[test]
    fn test_polar_round_trip_direction() {
        let relative = DVec3::new(300.0, -400.0, 1200.0);
        let z = polar_measurement(relative);
        assert_relative_eq!(z.range, 1300.0);
        assert!(z.to_cartesian().abs_diff_eq(relative, 1e-9));
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let p = DVec3::new(800.0, 450.0, -220.0);
        let h = measurement_jacobian(p);
        let eps = 1e-4;
        for (col, axis) in [DVec3::X, DVec3::Y, DVec3::Z].into_iter().enumerate() {
            let plus = polar_measurement(p + axis * eps);
            let minus = polar_measurement(p - axis * eps);
            let numeric = [
                (plus.range - minus.range) / (2.0 * eps),
                (plus.azimuth - minus.azimuth) / (2.0 * eps),
                (plus.elevation - minus.elevation) / (2.0 * eps),
            ];
            for row in 0..3 {
                assert_relative_eq!(h[(row, col)], numeric[row], epsilon = 1e-8);
            }
        }
        for col in 3..9 {
            for row in 0..3 {
                assert_eq!(h[(row, col)], 0.0);
            }
        }
    }

    #[test]
    fn test_degenerate_geometry_gives_zero_jacobian() {
        assert_eq!(measurement_jacobian(DVec3::ZERO), Jacobian::zeros());
        // Straight overhead: range row survives, angle rows vanish.
        let h = measurement_jacobian(DVec3::new(0.0, 0.0, 500.0));
        assert_relative_eq!(h[(0, 2)], 1.0);
        assert_eq!(h[(1, 0)], 0.0);
        assert_eq!(h[(2, 2)], 0.0);
    }

    #[test]
    fn test_singular_innovation_leaves_mean_unchanged() {
        // At the origin H is zero, so with R zeroed S is singular.
        let mut ekf = ExtendedKalmanFilter::new(ExtendedFilterConfig::default())
            .unwrap()
            .with_initial_state(Vector9::zeros());
        ekf.r = Matrix3::zeros();
        let before = *ekf.state();
        ekf.update(&PolarMeasurement {
            range: 10.0,
            azimuth: 1.0,
            elevation: 0.2,
        });
        assert_eq!(*ekf.state(), before);
        assert!(ekf.state().iter().all(|v| v.is_finite()));
        assert!(ekf.covariance().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_first_update_seeds_position() {
        let mut ekf = ExtendedKalmanFilter::new(ExtendedFilterConfig::default()).unwrap();
        ekf.predict();
        let truth = DVec3::new(1_000.0, 500.0, 200.0);
        ekf.update(&polar_measurement(truth));
        assert!(ekf.is_initialized());
        assert!(ekf.position().abs_diff_eq(truth, 1e-9));
        assert_eq!(ekf.velocity(), DVec3::ZERO);
    }

    #[test]
    fn test_predict_follows_motion_model() {
        let config = ExtendedFilterConfig {
            dt: 0.1,
            ..Default::default()
        };
        let mut x = Vector9::zeros();
        x[3] = 10.0;
        x[6] = 2.0;
        let mut ekf = ExtendedKalmanFilter::new(config).unwrap().with_initial_state(x);
        ekf.predict();
        assert_relative_eq!(ekf.position().x, 10.0 * 0.1 + 0.5 * 2.0 * 0.01);
        assert_relative_eq!(ekf.velocity().x, 10.0 + 2.0 * 0.1);
        assert_relative_eq!(ekf.acceleration().x, 2.0 * 0.99);
    }

    #[test]
    fn test_own_acceleration_moves_relative_state() {
        let config = ExtendedFilterConfig {
            dt: 0.1,
            ..Default::default()
        };
        let mut x = Vector9::zeros();
        x[3] = 10.0;
        x[6] = 2.0;
        let mut ekf = ExtendedKalmanFilter::new(config).unwrap().with_initial_state(x);
        let mut reference = ekf.clone();

        ekf.predict_with_input(DVec3::new(12.0, 0.0, -5.0));
        reference.predict();

        assert_relative_eq!(ekf.position().x, 10.0 * 0.1 + 0.5 * (2.0 - 12.0) * 0.01);
        assert_relative_eq!(ekf.velocity().x, 10.0 + (2.0 - 12.0) * 0.1);
        assert_relative_eq!(ekf.velocity().z, 5.0 * 0.1);
        // Target acceleration and covariance are unaffected by the input.
        assert_eq!(ekf.acceleration(), reference.acceleration());
        assert_eq!(ekf.covariance(), reference.covariance());
    }

    #[test]
    fn test_position_error_converges() {
        let config = ExtendedFilterConfig {
            dt: 0.1,
            process_noise: 1e-3,
            range_noise: 1.0,
            angle_noise: 1e-3,
            ..Default::default()
        };
        let mut truth = DVec3::new(1_000.0, 500.0, 200.0);
        let velocity = DVec3::new(-20.0, 5.0, 0.0);
        let mut ekf = ExtendedKalmanFilter::new(config)
            .unwrap()
            .with_initial_state(state_at(truth + DVec3::new(50.0, -40.0, 30.0)));

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let range_noise = Normal::new(0.0, config.range_noise).unwrap();
        let angle_noise = Normal::new(0.0, config.angle_noise).unwrap();

        let mut errors = Vec::new();
        for _ in 0..200 {
            truth += velocity * config.dt;
            ekf.predict();
            let exact = polar_measurement(truth);
            ekf.update(&PolarMeasurement {
                range: exact.range + range_noise.sample(&mut rng),
                azimuth: exact.azimuth + angle_noise.sample(&mut rng),
                elevation: exact.elevation + angle_noise.sample(&mut rng),
            });
            errors.push(ekf.position().distance(truth));
        }

        let windows: Vec<f64> = errors
            .chunks(40)
            .map(|w| w.iter().sum::<f64>() / w.len() as f64)
            .collect();
        for pair in windows.windows(2) {
            assert!(pair[1] <= pair[0] + 0.5, "window means {windows:?}");
        }
        assert!(windows[4] < windows[0], "window means {windows:?}");
        assert!(windows[4] < 2.0, "window means {windows:?}");
        assert!(errors[0] < 50.0);
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_range(a in -100.0f64..100.0) {
            let w = wrap_angle(a);
            prop_assert!(w > -PI && w <= PI);
            let turns = (a - w) / TAU;
            prop_assert!((turns - turns.round()).abs() < 1e-9);
        }
    }
}
