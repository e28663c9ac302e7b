//! Six-degree-of-freedom rigid-body flight dynamics.
//!
//! State layout follows [`RigidBodyState`]: inertial position, body-frame
//! velocity, 3-2-1 Euler attitude and body rates. Inertial z is up.

use std::f64::consts::FRAC_PI_2;
use std::fmt::Debug;
use std::sync::Arc;

use glam::{DMat3, DVec3};

use kinetic_core::components::AeroCoefficients;
use kinetic_core::constants::*;
use kinetic_core::error::{require_positive, ConfigError};
use kinetic_core::types::RigidBodyState;

use crate::atmosphere;
use crate::integrator::rk4_step;

/// Source of aerodynamic coefficients for an airframe.
pub trait AeroModel: Debug + Send + Sync {
    /// Total drag coefficient at a Mach number and angle of attack (rad).
    fn drag_coefficient(&self, mach: f64, alpha: f64) -> f64;

    /// Lift-curve slope (per rad).
    fn lift_slope(&self) -> f64;

    /// Pitching-moment slope (per rad). Negative is statically stable.
    fn pitching_moment_slope(&self) -> f64;
}

impl AeroModel for AeroCoefficients {
    /// Zero-lift drag with a Prandtl-Glauert style compressibility
    /// correction, plus induced drag quadratic in `alpha`.
    fn drag_coefficient(&self, mach: f64, alpha: f64) -> f64 {
        let beta = (1.0 - mach * mach).abs().sqrt();
        self.cd0 / beta.max(COMPRESSIBILITY_FLOOR) + INDUCED_DRAG_FACTOR * alpha * alpha
    }

    fn lift_slope(&self) -> f64 {
        self.cl_alpha
    }

    fn pitching_moment_slope(&self) -> f64 {
        self.cm_alpha
    }
}

/// Constant properties of a 6-DOF airframe. Mass varies with fuel and is
/// passed separately.
#[derive(Debug, Clone)]
pub struct Airframe {
    inertia: DMat3,
    inverse_inertia: DMat3,
    reference_area: f64,
    aero: Arc<dyn AeroModel>,
}

impl Airframe {
    pub fn new(
        inertia: DMat3,
        reference_area: f64,
        aero: Arc<dyn AeroModel>,
    ) -> Result<Self, ConfigError> {
        require_positive("reference area", reference_area)?;
        let diagonal = DVec3::new(inertia.x_axis.x, inertia.y_axis.y, inertia.z_axis.z);
        let det = inertia.determinant();
        if !inertia.is_finite() || diagonal.min_element() <= 0.0 || det <= 0.0 {
            return Err(ConfigError::InvalidInertia);
        }
        Ok(Self {
            inertia,
            inverse_inertia: inertia.inverse(),
            reference_area,
            aero,
        })
    }

    pub fn inertia(&self) -> DMat3 {
        self.inertia
    }

    pub fn reference_area(&self) -> f64 {
        self.reference_area
    }
}

/// Externally supplied inputs, held constant over one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceInputs {
    /// Motor thrust along body x (N).
    pub thrust: f64,
    /// Control force from fin deflection, body frame (N).
    pub control_force: DVec3,
    /// Wind velocity, inertial frame (m/s).
    pub wind: DVec3,
}

/// Inertial-to-body rotation for the 3-2-1 (yaw, pitch, roll) sequence.
pub fn direction_cosine_matrix(euler: DVec3) -> DMat3 {
    let (sp, cp) = euler.x.sin_cos();
    let (st, ct) = euler.y.sin_cos();
    let (ss, cs) = euler.z.sin_cos();

    let rows = [
        DVec3::new(ct * cs, ct * ss, -st),
        DVec3::new(sp * st * cs - cp * ss, sp * st * ss + cp * cs, sp * ct),
        DVec3::new(cp * st * cs + sp * ss, cp * st * ss - sp * cs, cp * ct),
    ];
    DMat3::from_cols(rows[0], rows[1], rows[2]).transpose()
}

/// Euler angle rates from body rates.
///
/// Singular at pitch = ±90°, where `cos θ` is zero and the yaw and roll
/// rates are undefined. The result there is infinite or NaN; callers keep
/// pitch away from the singularity (see [`validate_attitude`]).
pub fn euler_rates(euler: DVec3, body_rates: DVec3) -> DVec3 {
    let (sp, cp) = euler.x.sin_cos();
    let ct = euler.y.cos();
    let tt = euler.y.tan();
    let (p, q, r) = (body_rates.x, body_rates.y, body_rates.z);

    DVec3::new(
        p + tt * (q * sp + r * cp),
        q * cp - r * sp,
        (q * sp + r * cp) / ct,
    )
}

/// Reject initial attitudes inside the Euler singularity band.
pub fn validate_attitude(euler: DVec3) -> Result<(), ConfigError> {
    if !euler.is_finite() {
        return Err(ConfigError::NonFiniteState);
    }
    if (euler.y.abs() - FRAC_PI_2).abs() < GIMBAL_LOCK_MARGIN {
        return Err(ConfigError::GimbalLock(euler.y));
    }
    Ok(())
}

/// Inertial velocity of a rigid body.
pub fn inertial_velocity(state: &RigidBodyState) -> DVec3 {
    direction_cosine_matrix(state.euler).transpose() * state.body_velocity
}

/// Time derivative of the rigid-body state.
///
/// The returned struct holds rates, not a state: `position` is the
/// inertial velocity, `body_velocity` the body-frame acceleration, and so on.
pub fn state_derivative(
    state: &RigidBodyState,
    airframe: &Airframe,
    mass: f64,
    inputs: &ForceInputs,
    constants: &PhysicsConstants,
) -> RigidBodyState {
    let dcm = direction_cosine_matrix(state.euler);
    let v_inertial = dcm.transpose() * state.body_velocity;

    // Airspeed in the body frame.
    let air_body = dcm * (v_inertial - inputs.wind);
    let airspeed = air_body.length();
    let air = atmosphere::properties(constants, state.position.z);
    let mach = airspeed / air.speed_of_sound;
    let alpha = air_body.z.atan2(air_body.x);
    let beta = air_body.y.atan2(air_body.x);

    let q_s = 0.5 * air.density * airspeed * airspeed * airframe.reference_area;
    let drag = q_s * airframe.aero.drag_coefficient(mach, alpha);
    let lift = q_s * airframe.aero.lift_slope() * alpha;
    let side = q_s * airframe.aero.lift_slope() * beta;

    let gravity_body = dcm * DVec3::new(0.0, 0.0, -mass * constants.gravity);
    let force = DVec3::new(inputs.thrust - drag, -side, -lift) + gravity_body + inputs.control_force;

    let omega = state.body_rates;
    let cm = airframe.aero.pitching_moment_slope();
    let moment = DVec3::new(
        -ROLL_DAMPING * omega.x,
        q_s * PITCH_MOMENT_ARM * cm * alpha - PITCH_YAW_DAMPING * omega.y,
        -q_s * PITCH_MOMENT_ARM * cm * beta - PITCH_YAW_DAMPING * omega.z,
    );

    let acceleration = force / mass - omega.cross(state.body_velocity);
    let angular_acceleration =
        airframe.inverse_inertia * (moment - omega.cross(airframe.inertia * omega));

    RigidBodyState {
        position: v_inertial,
        body_velocity: acceleration,
        euler: euler_rates(state.euler, omega),
        body_rates: angular_acceleration,
    }
}

/// Advance a rigid body by one RK4 step with inputs held constant.
pub fn step(
    state: &RigidBodyState,
    t: f64,
    dt: f64,
    airframe: &Airframe,
    mass: f64,
    inputs: &ForceInputs,
    constants: &PhysicsConstants,
) -> RigidBodyState {
    let next = rk4_step(&state.to_array(), t, dt, |_, x| {
        let s = RigidBodyState::from_array(x);
        state_derivative(&s, airframe, mass, inputs, constants).to_array()
    });
    RigidBodyState::from_array(&next)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// No aerodynamic forces or moments at all.
    #[derive(Debug)]
    struct Vacuum;

    impl AeroModel for Vacuum {
        fn drag_coefficient(&self, _mach: f64, _alpha: f64) -> f64 {
            0.0
        }
        fn lift_slope(&self) -> f64 {
            0.0
        }
        fn pitching_moment_slope(&self) -> f64 {
            0.0
        }
    }

    fn default_aero() -> Arc<dyn AeroModel> {
        Arc::new(AeroCoefficients {
            cd0: INTERCEPTOR_CD0,
            cl_alpha: INTERCEPTOR_CL_ALPHA,
            cm_alpha: INTERCEPTOR_CM_ALPHA,
        })
    }

    fn airframe(aero: Arc<dyn AeroModel>) -> Airframe {
        let inertia = DMat3::from_diagonal(DVec3::from_array(INTERCEPTOR_INERTIA));
        Airframe::new(inertia, DEFAULT_REFERENCE_AREA, aero).unwrap()
    }

    #[test]
    fn test_dcm_is_orthonormal() {
        let dcm = direction_cosine_matrix(DVec3::new(0.3, -0.7, 2.1));
        let product = dcm * dcm.transpose();
        assert!(product.abs_diff_eq(DMat3::IDENTITY, 1e-12));
        assert_relative_eq!(dcm.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dcm_yaw_points_nose_north() {
        let dcm = direction_cosine_matrix(DVec3::new(0.0, 0.0, FRAC_PI_2));
        let nose_inertial = dcm.transpose() * DVec3::X;
        assert!(nose_inertial.abs_diff_eq(DVec3::Y, 1e-12));
    }

    #[test]
    fn test_zero_attitude_body_axes() {
        let to_inertial = direction_cosine_matrix(DVec3::ZERO).transpose();
        // Nose east, left wing north, top up.
        assert_eq!(to_inertial * DVec3::X, DVec3::X);
        assert_eq!(to_inertial * DVec3::Y, DVec3::Y);
        assert_eq!(to_inertial * DVec3::Z, DVec3::Z);
    }

    #[test]
    fn test_positive_pitch_lowers_nose() {
        let dcm = direction_cosine_matrix(DVec3::new(0.0, 0.3, 0.0));
        let nose_inertial = dcm.transpose() * DVec3::X;
        assert!(nose_inertial.z < 0.0);
    }

    #[test]
    fn test_euler_rates_at_level_attitude() {
        let rates = euler_rates(DVec3::ZERO, DVec3::new(0.1, 0.2, 0.3));
        assert!(rates.abs_diff_eq(DVec3::new(0.1, 0.2, 0.3), 1e-15));
    }

    #[test]
    fn test_validate_attitude_rejects_vertical_pitch() {
        assert!(validate_attitude(DVec3::new(0.0, FRAC_PI_2, 0.0)).is_err());
        assert!(validate_attitude(DVec3::new(0.0, -FRAC_PI_2 + 1e-4, 0.0)).is_err());
        assert!(validate_attitude(DVec3::new(0.0, -1.3, 0.5)).is_ok());
        assert_eq!(
            validate_attitude(DVec3::new(f64::NAN, 0.0, 0.0)),
            Err(ConfigError::NonFiniteState)
        );
    }

    #[test]
    fn test_airframe_rejects_bad_inertia() {
        let singular = DMat3::from_diagonal(DVec3::new(2.0, 0.0, 15.0));
        assert_eq!(
            Airframe::new(singular, 0.02, default_aero()).unwrap_err(),
            ConfigError::InvalidInertia
        );
        let inertia = DMat3::from_diagonal(DVec3::ONE);
        assert!(Airframe::new(inertia, 0.0, default_aero()).is_err());
    }

    #[test]
    fn test_compressibility_floor_caps_sonic_drag() {
        let aero = AeroCoefficients {
            cd0: 0.3,
            cl_alpha: 4.0,
            cm_alpha: -2.0,
        };
        assert_relative_eq!(aero.drag_coefficient(1.0, 0.0), 3.0);
        assert_relative_eq!(aero.drag_coefficient(0.0, 0.0), 0.3);
        assert_relative_eq!(aero.drag_coefficient(0.0, 1.0), 0.4);
    }

    #[test]
    fn test_free_fall_matches_closed_form() {
        let frame = airframe(Arc::new(Vacuum));
        let constants = PhysicsConstants::STANDARD;
        let mut state = RigidBodyState {
            position: DVec3::new(0.0, 0.0, 5_000.0),
            ..Default::default()
        };
        let dt = 1e-3;
        let steps = 2_000;
        for i in 0..steps {
            state = step(
                &state,
                i as f64 * dt,
                dt,
                &frame,
                90.0,
                &ForceInputs::default(),
                &constants,
            );
        }
        let t = steps as f64 * dt;
        let velocity = inertial_velocity(&state);
        assert_relative_eq!(velocity.z, -constants.gravity * t, epsilon = 1e-9);
        assert_relative_eq!(
            state.position.z,
            5_000.0 - 0.5 * constants.gravity * t * t,
            epsilon = 1e-6
        );
        assert!(state.body_rates.abs_diff_eq(DVec3::ZERO, 1e-15));
    }

    #[test]
    fn test_drag_decelerates_level_flight() {
        let frame = airframe(default_aero());
        let state = RigidBodyState {
            position: DVec3::new(0.0, 0.0, 1_000.0),
            body_velocity: DVec3::new(300.0, 0.0, 0.0),
            ..Default::default()
        };
        let rates = state_derivative(
            &state,
            &frame,
            90.0,
            &ForceInputs::default(),
            &PhysicsConstants::STANDARD,
        );
        assert!(rates.body_velocity.x < 0.0);
        assert!(rates.position.abs_diff_eq(DVec3::new(300.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_thrust_accelerates_along_nose() {
        let frame = airframe(Arc::new(Vacuum));
        let state = RigidBodyState {
            position: DVec3::new(0.0, 0.0, 1_000.0),
            ..Default::default()
        };
        let inputs = ForceInputs {
            thrust: 900.0,
            ..Default::default()
        };
        let rates = state_derivative(&state, &frame, 90.0, &inputs, &PhysicsConstants::STANDARD);
        assert_relative_eq!(rates.body_velocity.x, 10.0);
    }

    #[test]
    fn test_angle_of_attack_produces_restoring_moment() {
        let frame = airframe(default_aero());
        // Nose 0.1 rad above a horizontal velocity vector.
        let euler = DVec3::new(0.0, -0.1, 0.0);
        let body_velocity = direction_cosine_matrix(euler) * DVec3::new(250.0, 0.0, 0.0);
        let state = RigidBodyState {
            position: DVec3::new(0.0, 0.0, 2_000.0),
            body_velocity,
            euler,
            body_rates: DVec3::ZERO,
        };
        let rates = state_derivative(
            &state,
            &frame,
            90.0,
            &ForceInputs::default(),
            &PhysicsConstants::STANDARD,
        );
        // Pitch acceleration lowers the nose toward the velocity vector.
        assert!(rates.body_rates.y > 0.0);
    }
}
