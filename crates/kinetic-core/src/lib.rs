//! Core types and definitions for the kinetic engagement simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! state vectors, components, spawn requests, snapshots, events,
//! physical constants, and configuration errors.
//! It has no dependency on the ECS or any runtime framework.

pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod spawn;
pub mod state;
pub mod types;

pub use glam::{DMat3, DVec3};

#[cfg(test)]
mod tests;
