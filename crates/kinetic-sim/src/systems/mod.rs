//! ECS systems that operate on the battle world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` when read-only)
//! plus the manager-owned tables they need. They hold no state of their own.
//! Anything that consumes randomness visits entities in ascending id so a
//! run depends only on the seed and the spawn order.

pub mod assignment;
pub mod interceptor_flight;
pub mod snapshot;
pub mod termination;
pub mod threat_kinematics;

use glam::DVec3;
use hecs::{Entity, World};
use kinetic_core::components::Lifecycle;
use kinetic_core::enums::EntityKind;
use kinetic_core::types::{PointMassState, RigidBodyState};

/// Whether `entity` exists and is still active.
pub(crate) fn is_active(world: &World, entity: Entity) -> bool {
    world
        .get::<&Lifecycle>(entity)
        .map(|lifecycle| lifecycle.active)
        .unwrap_or(false)
}

/// Current inertial position of a threat or interceptor.
pub(crate) fn position_of(world: &World, entity: Entity, kind: EntityKind) -> Option<DVec3> {
    match kind {
        EntityKind::Threat => world.get::<&PointMassState>(entity).ok().map(|s| s.position),
        EntityKind::Interceptor => world.get::<&RigidBodyState>(entity).ok().map(|s| s.position),
    }
}
