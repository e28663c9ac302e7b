//! Assignment table and running tally.
//!
//! Owned by `BattleManager`, NOT stored as ECS components. Keyed by
//! interceptor id so iteration is in spawn order.

use std::collections::BTreeMap;

use kinetic_core::enums::AssignmentPhase;
use kinetic_core::state::TallyView;
use kinetic_core::types::EntityId;

/// One interceptor's pairing with a threat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub threat: EntityId,
    pub phase: AssignmentPhase,
    /// Simulation time at which the pairing was made (s).
    pub assigned_at: f64,
}

/// Interceptor → threat pairings. At most one interceptor per threat.
#[derive(Debug, Clone, Default)]
pub struct AssignmentTable {
    by_interceptor: BTreeMap<EntityId, Assignment>,
}

impl AssignmentTable {
    pub fn get(&self, interceptor: EntityId) -> Option<&Assignment> {
        self.by_interceptor.get(&interceptor)
    }

    pub fn is_assigned(&self, interceptor: EntityId) -> bool {
        self.by_interceptor.contains_key(&interceptor)
    }

    /// Whether some interceptor is already paired with `threat`.
    pub fn is_engaged(&self, threat: EntityId) -> bool {
        self.by_interceptor.values().any(|a| a.threat == threat)
    }

    pub fn assign(&mut self, interceptor: EntityId, threat: EntityId, time: f64) {
        self.by_interceptor.insert(
            interceptor,
            Assignment {
                threat,
                phase: AssignmentPhase::Assigned,
                assigned_at: time,
            },
        );
    }

    /// Mark the pairing as actively guided.
    pub fn engage(&mut self, interceptor: EntityId) {
        if let Some(assignment) = self.by_interceptor.get_mut(&interceptor) {
            assignment.phase = AssignmentPhase::Engaged;
        }
    }

    pub fn release(&mut self, interceptor: EntityId) -> Option<Assignment> {
        self.by_interceptor.remove(&interceptor)
    }

    /// Pairings in ascending interceptor id.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Assignment)> + '_ {
        self.by_interceptor.iter().map(|(id, a)| (*id, a))
    }

    pub fn len(&self) -> usize {
        self.by_interceptor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_interceptor.is_empty()
    }
}

/// Running totals tracked by the manager.
#[derive(Debug, Clone, Default)]
pub struct EngagementTally {
    pub threats_total: u32,
    pub threats_intercepted: u32,
    pub threats_impacted: u32,
    pub interceptors_total: u32,
    pub interceptors_impacted: u32,
    pub assignments_made: u32,
}

impl EngagementTally {
    pub fn view(&self) -> TallyView {
        TallyView {
            threats_total: self.threats_total,
            threats_intercepted: self.threats_intercepted,
            threats_impacted: self.threats_impacted,
            interceptors_total: self.interceptors_total,
            interceptors_impacted: self.interceptors_impacted,
            assignments_made: self.assignments_made,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_lifecycle() {
        let mut table = AssignmentTable::default();
        let (interceptor, threat) = (EntityId(1), EntityId(0));
        table.assign(interceptor, threat, 0.5);

        assert!(table.is_assigned(interceptor));
        assert!(table.is_engaged(threat));
        assert!(!table.is_engaged(EntityId(7)));
        assert_eq!(table.get(interceptor).unwrap().phase, AssignmentPhase::Assigned);

        table.engage(interceptor);
        assert_eq!(table.get(interceptor).unwrap().phase, AssignmentPhase::Engaged);

        let released = table.release(interceptor).unwrap();
        assert_eq!(released.threat, threat);
        assert_eq!(released.assigned_at, 0.5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_iteration_follows_interceptor_id() {
        let mut table = AssignmentTable::default();
        table.assign(EntityId(9), EntityId(1), 0.0);
        table.assign(EntityId(3), EntityId(2), 0.0);
        table.assign(EntityId(5), EntityId(0), 0.0);
        let order: Vec<u32> = table.iter().map(|(id, _)| id.0).collect();
        assert_eq!(order, vec![3, 5, 9]);
    }
}
