//! Archetype-specific force profiles.
//!
//! Consolidates per-archetype airframe parameters and draws the random
//! maneuver parameters of a new threat.

use std::f64::consts::TAU;

use kinetic_core::enums::ThreatArchetype;
use rand::Rng;

use crate::maneuver::{
    BallisticMotion, EvasiveManeuver, ForceModel, InertialMotion, PointMassBody,
};

/// Airframe of a threat archetype, `None` for force-free motion.
pub fn airframe(archetype: ThreatArchetype) -> Option<PointMassBody> {
    use kinetic_core::constants::*;

    match archetype {
        ThreatArchetype::Inertial => None,
        ThreatArchetype::Ballistic => Some(PointMassBody {
            mass: BALLISTIC_MASS,
            drag_coefficient: BALLISTIC_DRAG_COEFFICIENT,
            reference_area: BALLISTIC_REFERENCE_AREA,
        }),
        ThreatArchetype::EvasiveDrone => Some(PointMassBody {
            mass: DRONE_MASS,
            drag_coefficient: DRONE_DRAG_COEFFICIENT,
            reference_area: DRONE_REFERENCE_AREA,
        }),
    }
}

/// Build the force model for a new threat.
///
/// Only the evasive drone consumes randomness; other archetypes leave
/// `rng` untouched.
pub fn build_force_model<R: Rng + ?Sized>(
    archetype: ThreatArchetype,
    rng: &mut R,
) -> Box<dyn ForceModel> {
    use kinetic_core::constants::{DRONE_G_LOAD_RANGE, DRONE_WEAVE_FREQUENCY_RANGE};

    match (archetype, airframe(archetype)) {
        (ThreatArchetype::Ballistic, Some(body)) => Box::new(BallisticMotion { body }),
        (ThreatArchetype::EvasiveDrone, Some(body)) => {
            let (w_lo, w_hi) = DRONE_WEAVE_FREQUENCY_RANGE;
            let (g_lo, g_hi) = DRONE_G_LOAD_RANGE;
            let frequency = (rng.gen_range(w_lo..w_hi), rng.gen_range(w_lo..w_hi));
            let phase = (rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU));
            let g_load = rng.gen_range(g_lo..g_hi);
            Box::new(EvasiveManeuver {
                body,
                g_load,
                frequency,
                phase,
            })
        }
        _ => Box::new(InertialMotion),
    }
}
