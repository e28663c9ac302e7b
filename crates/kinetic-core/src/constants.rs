//! Physical constants and simulation tuning parameters.

use serde::{Deserialize, Serialize};

/// Physical constants used by the atmosphere and dynamics models.
///
/// Passed by reference wherever atmosphere or force calculations happen,
/// so a run can be evaluated against a non-standard planet or atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConstants {
    /// Gravitational acceleration at the surface (m/s²).
    pub gravity: f64,
    /// Specific gas constant for dry air (J/(kg·K)).
    pub gas_constant: f64,
    /// Ratio of specific heats for air.
    pub heat_capacity_ratio: f64,
    /// Sea-level temperature (K).
    pub sea_level_temperature: f64,
    /// Sea-level pressure (Pa).
    pub sea_level_pressure: f64,
    /// Tropospheric temperature lapse rate (K/m).
    pub lapse_rate: f64,
    /// Altitude of the troposphere/stratosphere boundary (m).
    pub tropopause_altitude: f64,
}

impl PhysicsConstants {
    /// International Standard Atmosphere values.
    pub const STANDARD: Self = Self {
        gravity: 9.80665,
        gas_constant: 287.05,
        heat_capacity_ratio: 1.4,
        sea_level_temperature: 288.15,
        sea_level_pressure: 101_325.0,
        lapse_rate: 0.0065,
        tropopause_altitude: 11_000.0,
    };

    /// Exponent of the tropospheric barometric formula, g / (L·R).
    pub fn barometric_exponent(&self) -> f64 {
        self.gravity / (self.lapse_rate * self.gas_constant)
    }

    /// Temperature at the tropopause (K). Held constant above it.
    pub fn tropopause_temperature(&self) -> f64 {
        self.sea_level_temperature - self.lapse_rate * self.tropopause_altitude
    }

    /// Pressure at the tropopause (Pa), from the tropospheric branch.
    pub fn tropopause_pressure(&self) -> f64 {
        let ratio = self.tropopause_temperature() / self.sea_level_temperature;
        self.sea_level_pressure * ratio.powf(self.barometric_exponent())
    }
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self::STANDARD
    }
}

// --- Battle defaults ---

/// Default interceptor-threat distance below which a threat is killed (meters).
pub const DEFAULT_KILL_RADIUS: f64 = 10.0;

/// Default maximum simulated time before the run is abandoned (seconds).
pub const DEFAULT_MAX_TIME: f64 = 40.0;

/// Default fixed integration step (seconds).
pub const DEFAULT_DT: f64 = 0.05;

/// Altitude below which an entity has impacted the ground (meters).
pub const GROUND_LEVEL: f64 = 0.0;

/// Default battle RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Guidance ---

/// Default proportional navigation gain (dimensionless).
pub const DEFAULT_NAVIGATION_GAIN: f64 = 3.0;

/// Range below which proportional navigation commands nothing (meters).
pub const GUIDANCE_MIN_RANGE: f64 = 0.1;

/// Default structural g-limit for guided interceptors (multiples of g).
pub const DEFAULT_MAX_G: f64 = 40.0;

// --- Aerodynamics ---

/// Aerodynamic reference area of the default interceptor (m²).
pub const DEFAULT_REFERENCE_AREA: f64 = 0.02;

/// Lower bound on the Prandtl-Glauert factor in the drag model.
pub const COMPRESSIBILITY_FLOOR: f64 = 0.1;

/// Induced drag factor applied to alpha² in the drag model.
pub const INDUCED_DRAG_FACTOR: f64 = 0.1;

/// Moment arm factor applied to the pitching-moment slope (m-equivalent).
pub const PITCH_MOMENT_ARM: f64 = 0.1;

/// Roll damping coefficient (N·m·s/rad).
pub const ROLL_DAMPING: f64 = 0.1;

/// Pitch and yaw damping coefficient (N·m·s/rad).
pub const PITCH_YAW_DAMPING: f64 = 50.0;

/// Initial pitch closer than this to ±90° is rejected at construction (rad).
pub const GIMBAL_LOCK_MARGIN: f64 = 1e-3;

// --- Default interceptor airframe and motor ---

/// Dry mass of the default interceptor (kg).
pub const INTERCEPTOR_DRY_MASS: f64 = 40.0;

/// Fuel mass of the default interceptor (kg).
pub const INTERCEPTOR_FUEL_MASS: f64 = 50.0;

/// Specific impulse of the default motor (s).
pub const INTERCEPTOR_SPECIFIC_IMPULSE: f64 = 270.0;

/// Burn time of the default motor at full thrust (s).
pub const INTERCEPTOR_BURN_TIME: f64 = 12.0;

/// Principal moments of inertia of the default interceptor (kg·m²).
pub const INTERCEPTOR_INERTIA: [f64; 3] = [2.0, 15.0, 15.0];

/// Zero-lift drag coefficient of the default interceptor.
pub const INTERCEPTOR_CD0: f64 = 0.3;

/// Lift-curve slope of the default interceptor (per rad).
pub const INTERCEPTOR_CL_ALPHA: f64 = 4.0;

/// Pitching-moment slope of the default interceptor (per rad, negative = stable).
pub const INTERCEPTOR_CM_ALPHA: f64 = -2.0;

// --- Autopilot ---

/// Actuator natural frequency (rad/s).
pub const ACTUATOR_NATURAL_FREQUENCY: f64 = 20.0;

/// Actuator damping ratio.
pub const ACTUATOR_DAMPING_RATIO: f64 = 0.7;

/// Fin deflection command saturation (rad).
pub const FIN_DEFLECTION_LIMIT: f64 = 0.5;

/// Proportional gain on normalised acceleration error.
pub const AUTOPILOT_KP: f64 = 2.0;

/// Integral gain on normalised acceleration error.
pub const AUTOPILOT_KI: f64 = 2.0;

/// Proportional gain on body-rate error.
pub const AUTOPILOT_KQ: f64 = 1.0;

/// Maximum actuator sub-step (s). Keeps ωn·h well inside the stable region.
pub const ACTUATOR_MAX_SUBSTEP: f64 = 0.005;

// --- Estimation ---

/// Per-step decay of the acceleration states in the extended filter.
pub const EKF_ACCELERATION_DECAY: f64 = 0.99;

/// Diagonal process noise of the extended filter.
pub const EKF_PROCESS_NOISE: f64 = 0.1;

/// Initial covariance diagonal of the extended filter.
pub const EKF_INITIAL_VARIANCE: f64 = 100.0;

/// Initial covariance diagonal of the linear filter.
pub const KF_INITIAL_VARIANCE: f64 = 500.0;

/// Process noise diagonal of the linear filter.
pub const KF_PROCESS_NOISE: f64 = 0.1;

/// Below this range the polar measurement Jacobian is treated as zero (m).
pub const JACOBIAN_MIN_RANGE: f64 = 1e-3;

// --- Sensors ---

/// Radar position noise standard deviation (m).
pub const RADAR_POSITION_NOISE: f64 = 5.0;

/// Radar velocity noise standard deviation (m/s).
pub const RADAR_VELOCITY_NOISE: f64 = 2.0;

/// Seeker range noise standard deviation (m).
pub const SEEKER_RANGE_NOISE: f64 = 2.0;

/// Seeker angle noise standard deviation (rad).
pub const SEEKER_ANGLE_NOISE: f64 = 1e-3;

// --- Wind ---

/// Bound on each component of the base wind (m/s).
pub const WIND_BASE_LIMIT: f64 = 5.0;

/// Standard deviation of turbulence per component (m/s).
pub const WIND_TURBULENCE_STD: f64 = 0.5;

/// Surface roughness length of the log shear profile (m).
pub const WIND_ROUGHNESS_LENGTH: f64 = 0.1;

/// Reference height at which the base wind applies unscaled (m).
pub const WIND_REFERENCE_HEIGHT: f64 = 10.0;

/// Cap on the shear multiplier.
pub const WIND_MAX_SHEAR_FACTOR: f64 = 2.5;

// --- Threat airframes ---

/// Ballistic projectile mass (kg).
pub const BALLISTIC_MASS: f64 = 300.0;

/// Ballistic projectile subsonic drag coefficient.
pub const BALLISTIC_DRAG_COEFFICIENT: f64 = 0.2;

/// Ballistic projectile reference area (m²).
pub const BALLISTIC_REFERENCE_AREA: f64 = 0.1;

/// Evasive drone mass (kg).
pub const DRONE_MASS: f64 = 200.0;

/// Evasive drone drag coefficient.
pub const DRONE_DRAG_COEFFICIENT: f64 = 0.04;

/// Evasive drone reference area (m²).
pub const DRONE_REFERENCE_AREA: f64 = 0.4;

/// Range of the evasive weave amplitude (g).
pub const DRONE_G_LOAD_RANGE: (f64, f64) = (4.0, 9.0);

/// Range of the evasive weave angular frequency (rad/s).
pub const DRONE_WEAVE_FREQUENCY_RANGE: (f64, f64) = (0.3, 1.2);

/// Below this speed (m/s) point masses feel no drag.
pub const DRAG_MIN_SPEED: f64 = 0.1;
