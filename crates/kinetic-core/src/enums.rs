//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side of the engagement an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Threat,
    Interceptor,
}

/// Why an entity stopped being active. Deactivation is permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deactivation {
    /// Threat destroyed by an interceptor inside the kill radius.
    Intercepted,
    /// Entity descended below ground level.
    GroundImpact,
}

/// Threat motion archetype, selecting the applied-force model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatArchetype {
    /// No applied force: straight-line constant velocity.
    #[default]
    Inertial,
    /// Unpowered projectile under gravity and Mach-dependent drag.
    Ballistic,
    /// Powered drone weaving with a randomized g-load.
    EvasiveDrone,
}

/// Where an interceptor's guidance gets target kinematics from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuidanceSource {
    /// True relative kinematics.
    #[default]
    Truth,
    /// Linear filter over noisy position/velocity radar measurements.
    Radar,
    /// Extended filter over noisy range/azimuth/elevation seeker measurements.
    Seeker,
}

/// Lifecycle of an interceptor-threat pairing in the assignment table.
///
/// An interceptor without an entry is unassigned. Entries are released
/// (removed) on kill, ground impact, or when the threat is found inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentPhase {
    /// Paired this tick; guidance has not yet run against the threat.
    #[default]
    Assigned,
    /// Guidance is steering the interceptor toward the threat.
    Engaged,
}

/// Why an assignment was removed from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseReason {
    /// The assigned interceptor killed the threat.
    Kill,
    /// The threat impacted the ground.
    ThreatImpacted,
    /// The interceptor impacted the ground.
    InterceptorImpacted,
    /// The threat was already inactive when the entry was inspected.
    ThreatInactive,
}

/// Overall state of a battle run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementStatus {
    #[default]
    Running,
    /// Every threat is inactive.
    ThreatsNeutralized,
    /// Maximum simulation time reached with at least one threat active.
    TimeExpired,
}

/// Scenario families for generated engagements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Fixed crossing raid: vertical launch against a level threat.
    Baseline,
    /// Evasive drone inbound at medium altitude.
    Dogfight,
    /// Lofted ballistic projectile.
    Ballistic,
}
