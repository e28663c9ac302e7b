//! Events emitted by the battle manager.
//!
//! The `active` flag on each entity is the authoritative record of kills
//! and impacts; events are a convenience log a caller may drain.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngagementEvent {
    /// An unassigned interceptor was paired with the nearest free threat.
    Assigned {
        interceptor: EntityId,
        threat: EntityId,
        time: f64,
        range: f64,
    },
    /// A threat was destroyed inside the kill radius.
    Intercept {
        interceptor: EntityId,
        threat: EntityId,
        time: f64,
        miss_distance: f64,
        position: DVec3,
    },
    /// An entity descended below ground level.
    GroundImpact {
        entity: EntityId,
        kind: EntityKind,
        time: f64,
        position: DVec3,
    },
    /// An assignment was removed without a kill by this interceptor.
    AssignmentReleased {
        interceptor: EntityId,
        threat: EntityId,
        reason: ReleaseReason,
        time: f64,
    },
}
