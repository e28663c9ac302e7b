//! Termination system: kills, ground impacts and stale assignment pruning.
//!
//! Runs after every entity has been propagated for the tick. A kill is
//! scored when the closest approach of the interceptor and its threat
//! over the tick falls inside the kill radius. Both are treated as moving
//! in a straight line from their start-of-tick positions, so a fast
//! closure cannot step over the kill sphere between samples.

use std::collections::BTreeMap;

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, info};

use kinetic_core::components::Lifecycle;
use kinetic_core::constants::GROUND_LEVEL;
use kinetic_core::enums::{Deactivation, EntityKind, ReleaseReason};
use kinetic_core::events::EngagementEvent;
use kinetic_core::types::EntityId;

use crate::engagement::{AssignmentTable, EngagementTally};
use crate::world_setup::Roster;

use super::{is_active, position_of};

/// Positions of every active entity, taken before propagation.
pub fn record_positions(world: &World, roster: &Roster) -> BTreeMap<EntityId, DVec3> {
    let threats = roster.threats.iter().map(|(id, e)| (*id, *e, EntityKind::Threat));
    let interceptors = roster
        .interceptors
        .iter()
        .map(|(id, e)| (*id, *e, EntityKind::Interceptor));
    threats
        .chain(interceptors)
        .filter(|(_, entity, _)| is_active(world, *entity))
        .filter_map(|(id, entity, kind)| position_of(world, entity, kind).map(|p| (id, p)))
        .collect()
}

/// Minimum separation of two points moving uniformly from `p0`→`p1` and
/// `q0`→`q1` over the same interval.
pub fn closest_approach(p0: DVec3, p1: DVec3, q0: DVec3, q1: DVec3) -> f64 {
    let d0 = q0 - p0;
    let dd = (q1 - p1) - d0;
    let len_sq = dd.length_squared();
    let s = if len_sq > 0.0 {
        (-d0.dot(dd) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (d0 + dd * s).length()
}

fn deactivate(world: &World, entity: Entity, reason: Deactivation, time: f64) -> bool {
    match world.get::<&mut Lifecycle>(entity) {
        Ok(mut lifecycle) if lifecycle.active => {
            lifecycle.active = false;
            lifecycle.deactivation = Some(reason);
            lifecycle.deactivated_at = Some(time);
            true
        }
        _ => false,
    }
}

/// Evaluate the end of a tick that finished at `time`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    roster: &Roster,
    assignments: &mut AssignmentTable,
    tally: &mut EngagementTally,
    events: &mut Vec<EngagementEvent>,
    start: &BTreeMap<EntityId, DVec3>,
    kill_radius: f64,
    time: f64,
) {
    check_kills(world, roster, assignments, tally, events, start, kill_radius, time);
    check_ground_impacts(world, roster, tally, events, time);
    prune_stale(world, roster, assignments, events, time);
}

#[allow(clippy::too_many_arguments)]
fn check_kills(
    world: &World,
    roster: &Roster,
    assignments: &mut AssignmentTable,
    tally: &mut EngagementTally,
    events: &mut Vec<EngagementEvent>,
    start: &BTreeMap<EntityId, DVec3>,
    kill_radius: f64,
    time: f64,
) {
    let pairs: Vec<(EntityId, EntityId)> =
        assignments.iter().map(|(i, a)| (i, a.threat)).collect();

    for (interceptor, threat) in pairs {
        let (Some(&i_entity), Some(&t_entity)) =
            (roster.interceptors.get(&interceptor), roster.threats.get(&threat))
        else {
            continue;
        };
        if !is_active(world, i_entity) || !is_active(world, t_entity) {
            continue;
        }
        let (Some(p1), Some(q1)) = (
            position_of(world, i_entity, EntityKind::Interceptor),
            position_of(world, t_entity, EntityKind::Threat),
        ) else {
            continue;
        };
        let p0 = start.get(&interceptor).copied().unwrap_or(p1);
        let q0 = start.get(&threat).copied().unwrap_or(q1);

        let miss_distance = closest_approach(p0, p1, q0, q1);
        if miss_distance >= kill_radius {
            continue;
        }

        deactivate(world, t_entity, Deactivation::Intercepted, time);
        assignments.release(interceptor);
        tally.threats_intercepted += 1;
        info!(%interceptor, %threat, miss_distance, time, "threat intercepted");
        events.push(EngagementEvent::Intercept {
            interceptor,
            threat,
            time,
            miss_distance,
            position: q1,
        });
        events.push(EngagementEvent::AssignmentReleased {
            interceptor,
            threat,
            reason: ReleaseReason::Kill,
            time,
        });
    }
}

fn check_ground_impacts(
    world: &World,
    roster: &Roster,
    tally: &mut EngagementTally,
    events: &mut Vec<EngagementEvent>,
    time: f64,
) {
    let mut entities: Vec<(EntityId, Entity, EntityKind)> = roster
        .threats
        .iter()
        .map(|(id, e)| (*id, *e, EntityKind::Threat))
        .chain(
            roster
                .interceptors
                .iter()
                .map(|(id, e)| (*id, *e, EntityKind::Interceptor)),
        )
        .collect();
    entities.sort_by_key(|(id, _, _)| *id);

    for (id, entity, kind) in entities {
        if !is_active(world, entity) {
            continue;
        }
        let Some(position) = position_of(world, entity, kind) else {
            continue;
        };
        if position.z >= GROUND_LEVEL {
            continue;
        }
        if deactivate(world, entity, Deactivation::GroundImpact, time) {
            match kind {
                EntityKind::Threat => tally.threats_impacted += 1,
                EntityKind::Interceptor => tally.interceptors_impacted += 1,
            }
            info!(entity = %id, ?kind, time, "ground impact");
            events.push(EngagementEvent::GroundImpact {
                entity: id,
                kind,
                time,
                position,
            });
        }
    }
}

fn prune_stale(
    world: &World,
    roster: &Roster,
    assignments: &mut AssignmentTable,
    events: &mut Vec<EngagementEvent>,
    time: f64,
) {
    let pairs: Vec<(EntityId, EntityId)> =
        assignments.iter().map(|(i, a)| (i, a.threat)).collect();

    for (interceptor, threat) in pairs {
        let interceptor_active = roster
            .interceptors
            .get(&interceptor)
            .is_some_and(|e| is_active(world, *e));
        let threat_state = roster
            .threats
            .get(&threat)
            .and_then(|e| world.get::<&Lifecycle>(*e).ok().map(|l| *l));

        let reason = match threat_state {
            _ if !interceptor_active => ReleaseReason::InterceptorImpacted,
            Some(lifecycle) if lifecycle.active => continue,
            Some(Lifecycle {
                deactivation: Some(Deactivation::GroundImpact),
                ..
            }) => ReleaseReason::ThreatImpacted,
            _ => ReleaseReason::ThreatInactive,
        };

        assignments.release(interceptor);
        debug!(%interceptor, %threat, ?reason, "assignment released");
        events.push(EngagementEvent::AssignmentReleased {
            interceptor,
            threat,
            reason,
            time,
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_closest_approach_inside_tick() {
        // Head-on, passing 3 m apart halfway through the tick.
        let p0 = DVec3::new(-20.0, 0.0, 0.0);
        let p1 = DVec3::new(0.0, 0.0, 0.0);
        let q0 = DVec3::new(20.0, 3.0, 0.0);
        let q1 = DVec3::new(0.0, 3.0, 0.0);
        assert_relative_eq!(closest_approach(p0, p1, q0, q1), 3.0, epsilon = 1e-12);

        // Sample points alone would both read 40 m or more apart.
        let p1 = DVec3::new(20.0, 0.0, 0.0);
        let q1 = DVec3::new(-20.0, 3.0, 0.0);
        assert!(p1.distance(q1) > 40.0);
        assert_relative_eq!(closest_approach(p0, p1, q0, q1), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closest_approach_clamps_to_tick() {
        // Still closing at the end of the tick: closest point is the end.
        let p0 = DVec3::ZERO;
        let p1 = DVec3::new(1.0, 0.0, 0.0);
        let q0 = DVec3::new(100.0, 0.0, 0.0);
        let q1 = DVec3::new(90.0, 0.0, 0.0);
        assert_relative_eq!(closest_approach(p0, p1, q0, q1), 89.0, epsilon = 1e-12);

        // No relative motion.
        let d = closest_approach(p0, p0, q0, q0);
        assert_relative_eq!(d, 100.0);
    }
}
