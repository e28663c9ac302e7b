//! Entity spawn factories for the battle world.
//!
//! Turns validated spawn requests into threat and interceptor entities
//! with their component bundles. Every entity gets its `EntityId` at
//! spawn time, from one counter shared by both kinds.

use std::collections::BTreeMap;
use std::sync::Arc;

use hecs::{Entity, EntityBuilder, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kinetic_core::components::*;
use kinetic_core::constants::PhysicsConstants;
use kinetic_core::enums::EntityKind;
use kinetic_core::error::{require_positive, ConfigError};
use kinetic_core::spawn::{InterceptorSpec, ThreatSpec};
use kinetic_core::types::{EntityId, PointMassState, RigidBodyState};
use kinetic_threat_ai::maneuver::ForceModel;
use kinetic_threat_ai::profiles;

use crate::autopilot::{Autopilot, AutopilotConfig};
use crate::dynamics::{self, Airframe};
use crate::propulsion;
use crate::sensors::{RadarConfig, SeekerConfig};
use crate::tracking::TargetTracker;

const MANEUVER_SALT: u64 = 0x6d61_6e65_7576_7265;
const TRACKER_SALT: u64 = 0x7472_6163_6b65_7273;

/// Applied-force model driving a threat.
#[derive(Debug)]
pub struct ThreatDynamics {
    pub model: Box<dyn ForceModel>,
}

/// Everything an interceptor spawn needs besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub seed: u64,
    /// Step the autopilot and filters are discretized at (s).
    pub dt: f64,
    pub constants: &'a PhysicsConstants,
    pub radar: RadarConfig,
    pub seeker: SeekerConfig,
}

/// Id → entity lookup, one map per kind, ordered by id.
#[derive(Debug, Default)]
pub struct Roster {
    pub threats: BTreeMap<EntityId, Entity>,
    pub interceptors: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl Roster {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn lookup(&self, id: EntityId) -> Option<(Entity, EntityKind)> {
        self.threats
            .get(&id)
            .map(|e| (*e, EntityKind::Threat))
            .or_else(|| self.interceptors.get(&id).map(|e| (*e, EntityKind::Interceptor)))
    }
}

fn require_finite(values: &[glam::DVec3]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteState)
    }
}

/// Spawn a threat. Maneuver parameters are drawn from a generator seeded
/// by `seed` and the new entity's id.
pub fn spawn_threat(
    world: &mut World,
    roster: &mut Roster,
    seed: u64,
    spec: &ThreatSpec,
) -> Result<EntityId, ConfigError> {
    require_finite(&[spec.position, spec.velocity])?;

    let id = roster.allocate();
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ MANEUVER_SALT ^ u64::from(id.0));
    let model = profiles::build_force_model(spec.archetype, &mut rng);

    let entity = world.spawn((
        Threat,
        id,
        spec.archetype,
        PointMassState::new(spec.position, spec.velocity),
        ThreatDynamics { model },
        Lifecycle::default(),
        PositionHistory::default(),
    ));
    roster.threats.insert(id, entity);
    Ok(id)
}

/// Spawn a 6-DOF interceptor after validating its airframe, motor,
/// attitude and guidance settings.
pub fn spawn_interceptor(
    world: &mut World,
    roster: &mut Roster,
    ctx: &SpawnContext<'_>,
    spec: &InterceptorSpec,
) -> Result<EntityId, ConfigError> {
    require_finite(&[spec.position, spec.velocity, spec.body_rates])?;
    dynamics::validate_attitude(spec.euler)?;
    let airframe = Airframe::new(spec.inertia, spec.reference_area, Arc::new(spec.aero))?;
    let motor = propulsion::motor(
        spec.dry_mass,
        spec.fuel_mass,
        spec.specific_impulse,
        spec.burn_time,
        ctx.constants.gravity,
    )?;
    let nav = spec.navigation;
    require_positive("navigation gain", nav.gain)?;
    let max_g = match nav.max_g {
        Some(g) => require_positive("g-limit", g)?,
        None => kinetic_core::constants::DEFAULT_MAX_G,
    };
    let autopilot = Autopilot::new(
        AutopilotConfig {
            max_acceleration: max_g * ctx.constants.gravity,
            ..Default::default()
        },
        ctx.dt,
    )?;

    let id = roster.allocate();
    let tracker = TargetTracker::new(
        nav.source,
        ctx.dt,
        ctx.radar,
        ctx.seeker,
        ctx.seed ^ TRACKER_SALT ^ u64::from(id.0),
    )?;

    let state = RigidBodyState {
        position: spec.position,
        body_velocity: dynamics::direction_cosine_matrix(spec.euler) * spec.velocity,
        euler: spec.euler,
        body_rates: spec.body_rates,
    };

    let mut builder = EntityBuilder::new();
    builder.add_bundle((
        Interceptor,
        id,
        state,
        airframe,
        motor,
        autopilot,
        ControlState::default(),
        nav,
        Lifecycle::default(),
        PositionHistory::default(),
    ));
    if let Some(tracker) = tracker {
        builder.add(tracker);
    }
    let entity = world.spawn(builder.build());
    roster.interceptors.insert(id, entity);
    Ok(id)
}
