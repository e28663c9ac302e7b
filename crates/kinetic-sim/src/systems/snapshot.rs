//! Snapshot system: builds a complete `BattleSnapshot` from the world.
//!
//! Read-only: never modifies the world.

use hecs::{Entity, World};

use kinetic_core::components::{Lifecycle, PositionHistory, Propulsion};
use kinetic_core::enums::{EngagementStatus, EntityKind};
use kinetic_core::state::{AssignmentView, BattleSnapshot, EntityView};
use kinetic_core::types::{EntityId, PointMassState, RigidBodyState, SimTime};

use crate::dynamics;
use crate::engagement::{AssignmentTable, EngagementTally};
use crate::guidance;
use crate::world_setup::Roster;

pub fn build_snapshot(
    world: &World,
    roster: &Roster,
    assignments: &AssignmentTable,
    tally: &EngagementTally,
    time: SimTime,
    status: EngagementStatus,
) -> BattleSnapshot {
    BattleSnapshot {
        time,
        status,
        threats: roster
            .threats
            .iter()
            .filter_map(|(id, e)| entity_view(world, *id, *e, EntityKind::Threat))
            .collect(),
        interceptors: roster
            .interceptors
            .iter()
            .filter_map(|(id, e)| entity_view(world, *id, *e, EntityKind::Interceptor))
            .collect(),
        assignments: build_assignments(world, roster, assignments),
        tally: tally.view(),
    }
}

/// View of one entity, `None` if it is missing from the world.
pub fn entity_view(
    world: &World,
    id: EntityId,
    entity: Entity,
    kind: EntityKind,
) -> Option<EntityView> {
    let lifecycle = *world.get::<&Lifecycle>(entity).ok()?;
    let history_len = world.get::<&PositionHistory>(entity).ok()?.positions.len();

    let (position, velocity, fuel_mass) = match kind {
        EntityKind::Threat => {
            let state = *world.get::<&PointMassState>(entity).ok()?;
            (state.position, state.velocity, None)
        }
        EntityKind::Interceptor => {
            let state = *world.get::<&RigidBodyState>(entity).ok()?;
            let fuel = world.get::<&Propulsion>(entity).ok().map(|p| p.fuel_mass);
            (state.position, dynamics::inertial_velocity(&state), fuel)
        }
    };

    Some(EntityView {
        id,
        kind,
        active: lifecycle.active,
        deactivation: lifecycle.deactivation,
        position,
        velocity,
        history_len,
        fuel_mass,
    })
}

fn build_assignments(
    world: &World,
    roster: &Roster,
    assignments: &AssignmentTable,
) -> Vec<AssignmentView> {
    assignments
        .iter()
        .filter_map(|(interceptor, assignment)| {
            let own_entity = *roster.interceptors.get(&interceptor)?;
            let threat_entity = *roster.threats.get(&assignment.threat)?;
            let own = entity_view(world, interceptor, own_entity, EntityKind::Interceptor)?;
            let target = entity_view(world, assignment.threat, threat_entity, EntityKind::Threat)?;
            let rel_pos = target.position - own.position;
            let rel_vel = target.velocity - own.velocity;
            Some(AssignmentView {
                interceptor,
                threat: assignment.threat,
                phase: assignment.phase,
                range: rel_pos.length(),
                time_to_go: guidance::estimate_time_to_go(rel_pos, rel_vel),
            })
        })
        .collect()
}
