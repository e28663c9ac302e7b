//! Simulation engine for kinetic engagements.
//!
//! Owns the hecs ECS world, integrates threats and 6-DOF interceptors
//! at a fixed step, and closes the sensor, estimator, guidance and
//! autopilot loop for every assigned interceptor.

pub mod atmosphere;
pub mod autopilot;
pub mod battle;
pub mod dynamics;
pub mod engagement;
pub mod estimation;
pub mod guidance;
pub mod integrator;
pub mod kinematics;
pub mod propulsion;
pub mod scenario;
pub mod sensors;
pub mod systems;
pub mod tracking;
pub mod world_setup;

pub use battle::{BattleConfig, BattleManager, EngagementOutcome};
pub use kinetic_core as core;
