//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Simulation logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Marks an entity as a threat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Threat;

/// Marks an entity as a friendly interceptor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interceptor;

/// Whether the entity still takes part in the battle.
///
/// `active` only ever goes from true to false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub active: bool,
    pub deactivation: Option<Deactivation>,
    /// Simulation time at which the entity was deactivated.
    pub deactivated_at: Option<f64>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            active: true,
            deactivation: None,
            deactivated_at: None,
        }
    }
}

/// Inertial positions, one per completed integration step, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    pub positions: Vec<DVec3>,
}

/// Rocket motor state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propulsion {
    /// Structure mass without propellant (kg).
    pub dry_mass: f64,
    /// Remaining propellant (kg). Never negative.
    pub fuel_mass: f64,
    /// Specific impulse (s).
    pub specific_impulse: f64,
    /// Nominal burn duration at full thrust (s).
    pub burn_time: f64,
    /// Thrust while propellant remains (N).
    pub max_thrust: f64,
    /// Seconds of burn completed so far.
    pub burn_elapsed: f64,
}

/// Aerodynamic coefficients of a slender airframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroCoefficients {
    /// Zero-lift drag coefficient.
    pub cd0: f64,
    /// Lift-curve slope (per rad).
    pub cl_alpha: f64,
    /// Pitching-moment slope (per rad).
    pub cm_alpha: f64,
}

/// Guidance law parameters of one interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Proportional navigation gain N.
    pub gain: f64,
    /// Commanded acceleration limit in g, if the augmented law is used.
    pub max_g: Option<f64>,
    pub source: GuidanceSource,
}

/// Guidance and actuator output of the last completed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    /// Inertial acceleration commanded by guidance (m/s²).
    pub commanded_acceleration: DVec3,
    /// Body-frame acceleration achieved through the actuator lag (m/s²).
    pub realized_acceleration: DVec3,
    /// Fin deflections per channel (rad).
    pub deflection: DVec3,
}
