//! Point-mass threat kinematics driven by a pluggable force model.

use kinetic_core::constants::PhysicsConstants;
use kinetic_core::types::PointMassState;
use kinetic_threat_ai::maneuver::{ForceContext, ForceModel};

use crate::atmosphere;
use crate::integrator::rk4_step;

/// `[velocity, force / mass]` for the point mass at time `t`.
pub fn point_mass_derivative(
    state: &PointMassState,
    t: f64,
    model: &dyn ForceModel,
    constants: &PhysicsConstants,
) -> PointMassState {
    let ctx = ForceContext {
        time: t,
        position: state.position,
        velocity: state.velocity,
        air: atmosphere::properties(constants, state.position.z).air_data(),
        gravity: constants.gravity,
    };
    PointMassState {
        position: state.velocity,
        velocity: model.applied_force(&ctx) / model.mass(),
    }
}

/// Advance a point mass by one RK4 step.
pub fn step_point_mass(
    state: &PointMassState,
    t: f64,
    dt: f64,
    model: &dyn ForceModel,
    constants: &PhysicsConstants,
) -> PointMassState {
    let next = rk4_step(&state.to_array(), t, dt, |time, x| {
        point_mass_derivative(&PointMassState::from_array(x), time, model, constants).to_array()
    });
    PointMassState::from_array(&next)
}
