//! Assignment system: pairs free interceptors with the nearest free threat.
//!
//! Greedy and sticky. Only interceptors without an assignment are
//! considered, in ascending id, and each threat takes at most one
//! interceptor. A pairing is never revisited while it lives, even if
//! another threat later becomes nearer.

use glam::DVec3;
use hecs::World;
use tracing::info;

use kinetic_core::events::EngagementEvent;
use kinetic_core::types::{EntityId, PointMassState, RigidBodyState};

use crate::engagement::{AssignmentTable, EngagementTally};
use crate::tracking::TargetTracker;
use crate::world_setup::Roster;

use super::is_active;

pub fn run(
    world: &mut World,
    roster: &Roster,
    assignments: &mut AssignmentTable,
    tally: &mut EngagementTally,
    events: &mut Vec<EngagementEvent>,
    time: f64,
) {
    let mut free_threats: Vec<(EntityId, DVec3)> = roster
        .threats
        .iter()
        .filter(|(id, entity)| is_active(world, **entity) && !assignments.is_engaged(**id))
        .filter_map(|(id, entity)| {
            world
                .get::<&PointMassState>(*entity)
                .ok()
                .map(|state| (*id, state.position))
        })
        .collect();

    for (&interceptor, &entity) in &roster.interceptors {
        if free_threats.is_empty() {
            break;
        }
        if assignments.is_assigned(interceptor) || !is_active(world, entity) {
            continue;
        }
        let Ok(position) = world.get::<&RigidBodyState>(entity).map(|s| s.position) else {
            continue;
        };

        // Strict comparison: on a tie the lower threat id wins.
        let mut best: Option<(usize, f64)> = None;
        for (index, (_, threat_pos)) in free_threats.iter().enumerate() {
            let range = position.distance(*threat_pos);
            if best.map_or(true, |(_, best_range)| range < best_range) {
                best = Some((index, range));
            }
        }
        let Some((index, range)) = best else {
            continue;
        };
        let (threat, _) = free_threats.remove(index);

        assignments.assign(interceptor, threat, time);
        if let Ok(mut tracker) = world.get::<&mut TargetTracker>(entity) {
            tracker.retarget();
        }
        tally.assignments_made += 1;
        info!(%interceptor, %threat, range, time, "interceptor assigned");
        events.push(EngagementEvent::Assigned {
            interceptor,
            threat,
            time,
            range,
        });
    }
}
