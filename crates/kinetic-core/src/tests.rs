use approx::assert_relative_eq;
use glam::DVec3;

use crate::components::Lifecycle;
use crate::constants::PhysicsConstants;
use crate::enums::*;
use crate::error::{require_positive, require_time_step, ConfigError};
use crate::events::EngagementEvent;
use crate::spawn::{InterceptorSpec, MAX_LAUNCH_ELEVATION};
use crate::state::BattleSnapshot;
use crate::types::{EntityId, PointMassState, RigidBodyState, SimTime};

#[test]
fn test_standard_tropopause_values() {
    let c = PhysicsConstants::STANDARD;
    assert_relative_eq!(c.tropopause_temperature(), 216.65, epsilon = 1e-9);
    // Tabulated ISA value at 11 km.
    assert_relative_eq!(c.tropopause_pressure(), 22_632.1, max_relative = 1e-4);
}

#[test]
fn test_rigid_body_state_layout() {
    let state = RigidBodyState {
        position: DVec3::new(1.0, 2.0, 3.0),
        body_velocity: DVec3::new(4.0, 5.0, 6.0),
        euler: DVec3::new(7.0, 8.0, 9.0),
        body_rates: DVec3::new(10.0, 11.0, 12.0),
    };
    let array = state.to_array();
    assert_eq!(
        array,
        [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]
    );
    assert_eq!(RigidBodyState::from_array(&array), state);
}

#[test]
fn test_point_mass_state_layout() {
    let state = PointMassState::new(DVec3::new(1.0, 2.0, 3.0), DVec3::new(-4.0, 0.0, 9.0));
    assert_eq!(state.to_array(), [1.0, 2.0, 3.0, -4.0, 0.0, 9.0]);
}

#[test]
fn test_sim_time_advance() {
    let mut time = SimTime::default();
    time.advance_to(0.05);
    time.advance_to(0.10);
    assert_eq!(time.tick, 2);
    assert_relative_eq!(time.elapsed_secs, 0.10);
}

#[test]
fn test_lifecycle_starts_active() {
    let life = Lifecycle::default();
    assert!(life.active);
    assert!(life.deactivation.is_none());
}

#[test]
fn test_entity_ids_order_by_spawn_number() {
    let mut ids = vec![EntityId(7), EntityId(2), EntityId(100)];
    ids.sort();
    assert_eq!(ids, vec![EntityId(2), EntityId(7), EntityId(100)]);
    assert_eq!(EntityId(3).to_string(), "#3");
}

#[test]
fn test_config_validation_helpers() {
    assert_eq!(require_time_step(0.05), Ok(0.05));
    assert_eq!(require_time_step(0.0), Err(ConfigError::InvalidTimeStep(0.0)));
    assert!(require_time_step(f64::NAN).is_err());
    assert!(matches!(
        require_positive("mass", -1.0),
        Err(ConfigError::NonPositive { what: "mass", .. })
    ));
}

#[test]
fn test_launch_attitude_clamped_below_vertical() {
    let spec = InterceptorSpec::launched_toward(
        DVec3::ZERO,
        DVec3::new(0.0, 0.0, 100.0),
        DVec3::new(10_000.0, 0.0, 5_000.0),
    );
    // Vertical launch: nose held at the elevation limit, pointed east.
    assert_relative_eq!(spec.euler.y, -MAX_LAUNCH_ELEVATION);
    assert_relative_eq!(spec.euler.z, 0.0);
}

#[test]
fn test_launch_attitude_follows_shallow_velocity() {
    let spec = InterceptorSpec::launched_toward(
        DVec3::ZERO,
        DVec3::new(0.0, 100.0, 100.0),
        DVec3::new(0.0, 5_000.0, 0.0),
    );
    assert_relative_eq!(spec.euler.y, -std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    assert_relative_eq!(spec.euler.z, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
}

#[test]
fn test_event_json_is_tagged() {
    let event = EngagementEvent::GroundImpact {
        entity: EntityId(4),
        kind: EntityKind::Threat,
        time: 12.5,
        position: DVec3::new(1.0, 2.0, -0.5),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"GroundImpact\""));
    let back: EngagementEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_default_snapshot_is_running() {
    let snapshot = BattleSnapshot::default();
    assert_eq!(snapshot.status, EngagementStatus::Running);
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"Running\""));
}
