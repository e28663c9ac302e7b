//! Solid rocket motor: constant thrust until the propellant is gone.

use kinetic_core::components::Propulsion;
use kinetic_core::error::{require_non_negative, require_positive, ConfigError};

/// Build a validated motor. Thrust is sized so the full load burns in
/// `burn_time` at the given specific impulse.
pub fn motor(
    dry_mass: f64,
    fuel_mass: f64,
    specific_impulse: f64,
    burn_time: f64,
    g0: f64,
) -> Result<Propulsion, ConfigError> {
    require_positive("dry mass", dry_mass)?;
    require_non_negative("fuel mass", fuel_mass)?;
    require_positive("specific impulse", specific_impulse)?;
    require_positive("burn time", burn_time)?;

    Ok(Propulsion {
        dry_mass,
        fuel_mass,
        specific_impulse,
        burn_time,
        max_thrust: fuel_mass / burn_time * specific_impulse * g0,
        burn_elapsed: 0.0,
    })
}

/// Current total mass (kg).
pub fn mass(motor: &Propulsion) -> f64 {
    motor.dry_mass + motor.fuel_mass
}

/// Propellant consumption at full thrust (kg/s).
pub fn mass_flow(motor: &Propulsion, g0: f64) -> f64 {
    motor.max_thrust / (motor.specific_impulse * g0)
}

/// Burn propellant for one step and return the mean thrust over it (N).
///
/// Fuel never drops below zero. A step that exhausts the tank delivers
/// thrust in proportion to the propellant actually burned.
pub fn burn(motor: &mut Propulsion, dt: f64, g0: f64) -> f64 {
    if motor.fuel_mass <= 0.0 || motor.max_thrust <= 0.0 {
        return 0.0;
    }
    let mdot = mass_flow(motor, g0);
    let requested = mdot * dt;
    let burned = requested.min(motor.fuel_mass);

    motor.fuel_mass = (motor.fuel_mass - burned).max(0.0);
    motor.burn_elapsed += burned / mdot;
    motor.max_thrust * burned / requested
}
