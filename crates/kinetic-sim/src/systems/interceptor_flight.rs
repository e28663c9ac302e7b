//! Interceptor flight system: guidance → autopilot → propulsion → dynamics.
//!
//! Visits interceptors in ascending id because the wind model draws
//! turbulence on every sample. An interceptor without a live target
//! (unassigned, or paired with a threat that is no longer active) flies
//! on with a zero guidance command.

use glam::DVec3;
use hecs::World;

use kinetic_core::components::{
    ControlState, NavigationSettings, PositionHistory, Propulsion,
};
use kinetic_core::constants::PhysicsConstants;
use kinetic_core::types::{EntityId, PointMassState, RigidBodyState};

use crate::atmosphere::WindModel;
use crate::autopilot::Autopilot;
use crate::dynamics::{self, Airframe, ForceInputs};
use crate::engagement::AssignmentTable;
use crate::guidance;
use crate::propulsion;
use crate::tracking::TargetTracker;
use crate::world_setup::Roster;

use super::is_active;

/// Inertial acceleration command for one interceptor.
pub fn guidance_command(nav: &NavigationSettings, rel_pos: DVec3, rel_vel: DVec3, g0: f64) -> DVec3 {
    match nav.max_g {
        Some(max_g) => {
            guidance::augmented_proportional_navigation(rel_pos, rel_vel, nav.gain, max_g, g0)
        }
        None => guidance::proportional_navigation(rel_pos, rel_vel, nav.gain),
    }
}

/// True state of the threat `interceptor` is paired with, if that threat
/// is still active.
fn live_target(
    world: &World,
    roster: &Roster,
    assignments: &AssignmentTable,
    interceptor: EntityId,
) -> Option<PointMassState> {
    let assignment = assignments.get(interceptor)?;
    let entity = *roster.threats.get(&assignment.threat)?;
    if !is_active(world, entity) {
        return None;
    }
    world.get::<&PointMassState>(entity).ok().map(|state| *state)
}

pub fn run(
    world: &mut World,
    roster: &Roster,
    assignments: &mut AssignmentTable,
    wind: &mut WindModel,
    constants: &PhysicsConstants,
    t: f64,
    dt: f64,
) {
    for (&id, &entity) in &roster.interceptors {
        if !is_active(world, entity) {
            continue;
        }
        let target = live_target(world, roster, assignments, id);
        if target.is_some() {
            assignments.engage(id);
        }

        let Ok((state, airframe, motor, autopilot, control, nav, history, tracker)) = world
            .query_one_mut::<(
                &mut RigidBodyState,
                &Airframe,
                &mut Propulsion,
                &mut Autopilot,
                &mut ControlState,
                &NavigationSettings,
                &mut PositionHistory,
                Option<&mut TargetTracker>,
            )>(entity)
        else {
            continue;
        };

        let own_velocity = dynamics::inertial_velocity(state);
        let relative = target.map(|threat| match tracker {
            Some(tracker) => tracker.observe(state.position, own_velocity, &threat),
            None => (threat.position - state.position, threat.velocity - own_velocity),
        });
        let command = relative
            .map(|(rel_pos, rel_vel)| guidance_command(nav, rel_pos, rel_vel, constants.gravity))
            .filter(|a| a.is_finite())
            .unwrap_or(DVec3::ZERO);

        // Fins act on the lateral and normal axes only.
        let mut command_body = dynamics::direction_cosine_matrix(state.euler) * command;
        command_body.x = 0.0;
        let current = autopilot.realized_acceleration();
        let deflection = autopilot.update(command_body, current, state.body_rates);
        let realized = autopilot.realized_acceleration();

        let mass = propulsion::mass(motor);
        let thrust = propulsion::burn(motor, dt, constants.gravity);
        let inputs = ForceInputs {
            thrust,
            control_force: DVec3::new(0.0, realized.y, realized.z) * mass,
            wind: wind.wind(state.position.z),
        };
        *state = dynamics::step(state, t, dt, airframe, mass, &inputs, constants);
        history.positions.push(state.position);

        *control = ControlState {
            commanded_acceleration: command,
            realized_acceleration: realized,
            deflection,
        };
    }
}
