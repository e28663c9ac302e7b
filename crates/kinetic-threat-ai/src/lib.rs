//! Threat behaviour for the kinetic engagement simulation.
//!
//! Implements the applied-force models that drive point-mass threats
//! and the archetype profiles that parameterize them.

pub mod maneuver;
pub mod profiles;

pub use kinetic_core as core;
