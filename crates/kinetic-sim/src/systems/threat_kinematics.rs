//! Threat propagation system.
//!
//! Steps every active threat's point-mass state through its force model
//! and appends the new position to its history. Inactive threats are
//! left untouched. Threats do not interact, so visiting order is free.

use hecs::World;

use kinetic_core::components::{Lifecycle, PositionHistory, Threat};
use kinetic_core::constants::PhysicsConstants;
use kinetic_core::types::PointMassState;

use crate::kinematics;
use crate::world_setup::ThreatDynamics;

pub fn run(world: &mut World, constants: &PhysicsConstants, t: f64, dt: f64) {
    for (_entity, (_threat, state, dynamics, lifecycle, history)) in world.query_mut::<(
        &Threat,
        &mut PointMassState,
        &ThreatDynamics,
        &Lifecycle,
        &mut PositionHistory,
    )>() {
        if !lifecycle.active {
            continue;
        }
        *state = kinematics::step_point_mass(state, t, dt, dynamics.model.as_ref(), constants);
        history.positions.push(state.position);
    }
}
