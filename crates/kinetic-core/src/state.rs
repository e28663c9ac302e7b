//! Battle snapshot: the complete observable state after a tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, SimTime};

/// Read-only view of the whole battle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub status: EngagementStatus,
    pub threats: Vec<EntityView>,
    pub interceptors: Vec<EntityView>,
    pub assignments: Vec<AssignmentView>,
    pub tally: TallyView,
}

/// One entity as seen from outside the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub active: bool,
    pub deactivation: Option<Deactivation>,
    pub position: DVec3,
    /// Inertial velocity (m/s).
    pub velocity: DVec3,
    /// Number of completed integration steps recorded.
    pub history_len: usize,
    /// Remaining propellant for interceptors (kg).
    pub fuel_mass: Option<f64>,
}

/// A live interceptor-threat pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub interceptor: EntityId,
    pub threat: EntityId,
    pub phase: AssignmentPhase,
    /// Current separation (m).
    pub range: f64,
    /// Estimated time to closest approach (s), if still ahead.
    pub time_to_go: Option<f64>,
}

/// Running totals since the manager was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TallyView {
    pub threats_total: u32,
    pub threats_intercepted: u32,
    pub threats_impacted: u32,
    pub interceptors_total: u32,
    pub interceptors_impacted: u32,
    pub assignments_made: u32,
}
