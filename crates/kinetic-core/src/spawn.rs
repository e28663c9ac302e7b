//! Spawn requests passed to the battle manager.
//!
//! Requests are plain data; they are validated when the manager turns
//! them into entities.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::components::{AeroCoefficients, NavigationSettings};
use crate::constants::*;
use crate::enums::{GuidanceSource, ThreatArchetype};

/// Highest nose elevation accepted by [`InterceptorSpec::launched_toward`] (rad).
pub const MAX_LAUNCH_ELEVATION: f64 = 80.0 * std::f64::consts::PI / 180.0;

/// Initial conditions of a threat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatSpec {
    pub position: DVec3,
    pub velocity: DVec3,
    pub archetype: ThreatArchetype,
}

impl ThreatSpec {
    /// A constant-velocity threat.
    pub fn inertial(position: DVec3, velocity: DVec3) -> Self {
        Self {
            position,
            velocity,
            archetype: ThreatArchetype::Inertial,
        }
    }
}

/// Initial conditions and airframe of a 6-DOF interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterceptorSpec {
    pub position: DVec3,
    /// Inertial velocity; rotated into the body frame at spawn.
    pub velocity: DVec3,
    /// Roll, pitch, yaw (rad).
    pub euler: DVec3,
    /// Body rates p, q, r (rad/s).
    pub body_rates: DVec3,
    pub dry_mass: f64,
    pub fuel_mass: f64,
    pub specific_impulse: f64,
    pub burn_time: f64,
    /// Inertia tensor about the body axes (kg·m²).
    pub inertia: DMat3,
    pub reference_area: f64,
    pub aero: AeroCoefficients,
    pub navigation: NavigationSettings,
}

impl Default for InterceptorSpec {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            euler: DVec3::ZERO,
            body_rates: DVec3::ZERO,
            dry_mass: INTERCEPTOR_DRY_MASS,
            fuel_mass: INTERCEPTOR_FUEL_MASS,
            specific_impulse: INTERCEPTOR_SPECIFIC_IMPULSE,
            burn_time: INTERCEPTOR_BURN_TIME,
            inertia: DMat3::from_diagonal(DVec3::from_array(INTERCEPTOR_INERTIA)),
            reference_area: DEFAULT_REFERENCE_AREA,
            aero: AeroCoefficients {
                cd0: INTERCEPTOR_CD0,
                cl_alpha: INTERCEPTOR_CL_ALPHA,
                cm_alpha: INTERCEPTOR_CM_ALPHA,
            },
            navigation: NavigationSettings {
                gain: DEFAULT_NAVIGATION_GAIN,
                max_g: Some(DEFAULT_MAX_G),
                source: GuidanceSource::Truth,
            },
        }
    }
}

impl InterceptorSpec {
    /// Default airframe at `position` moving with `velocity`, nose pointed
    /// along the horizontal bearing to `aim_point`.
    ///
    /// Nose elevation follows the velocity vector but is held to
    /// [`MAX_LAUNCH_ELEVATION`], which keeps the attitude clear of the
    /// ±90° pitch singularity of the Euler representation.
    pub fn launched_toward(position: DVec3, velocity: DVec3, aim_point: DVec3) -> Self {
        let to_aim = aim_point - position;
        let heading = to_aim.y.atan2(to_aim.x);
        let horizontal = (velocity.x * velocity.x + velocity.y * velocity.y).sqrt();
        let elevation = velocity
            .z
            .atan2(horizontal)
            .clamp(-MAX_LAUNCH_ELEVATION, MAX_LAUNCH_ELEVATION);

        // With z up, a positive 3-2-1 pitch lowers the nose.
        Self {
            position,
            velocity,
            euler: DVec3::new(0.0, -elevation, heading),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: GuidanceSource) -> Self {
        self.navigation.source = source;
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.navigation.gain = gain;
        self
    }
}
