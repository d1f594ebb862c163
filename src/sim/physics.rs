//! Impact physics model
//!
//! Closed-form scaling laws turning the four scalar inputs into quantitative
//! impact effects. All functions are pure and deterministic; the whole result
//! is recomputed as one atomic structure, never partially mutated.
//!
//! Coefficients are illustrative order-of-magnitude approximations, not a
//! validated scientific model.

use serde::{Deserialize, Serialize};

use crate::consts::MEGATON_JOULES;
use super::params::ImpactParameters;

/// Crater diameter coefficient: D = C · E_eff^0.25
const CRATER_COEFF: f64 = 0.02;
/// Crater depth as a fraction of diameter
const CRATER_DEPTH_RATIO: f64 = 1.0 / 5.0;

/// Fireball radius (km) = C · MT^0.33
const FIREBALL_COEFF: f64 = 1.5;
const FIREBALL_EXP: f64 = 0.33;
/// Fireball temperature (°C) = base + slope · MT
const FIREBALL_TEMP_BASE_C: f64 = 2500.0;
const FIREBALL_TEMP_SLOPE: f64 = 1.2;

/// Air blast: overpressure and shockwave radii carry distinct power laws
const OVERPRESSURE_COEFF: f64 = 2.2;
const OVERPRESSURE_EXP: f64 = 0.33;
const SHOCKWAVE_COEFF: f64 = 4.6;
const SHOCKWAVE_EXP: f64 = 0.40;

/// Seismic effective radius (km) = C · MT^0.25
const SEISMIC_RADIUS_COEFF: f64 = 40.0;
const SEISMIC_RADIUS_EXP: f64 = 0.25;

/// Thermal radiation radius (km) = C · MT^0.41
const THERMAL_COEFF: f64 = 3.2;
const THERMAL_EXP: f64 = 0.41;

/// Fraction of the affected population counted as casualties. Fixed,
/// simplified ratio; not spatially resolved by zone.
const CASUALTY_RATIO: f64 = 0.7;

/// Every quantitative effect of one impact. Derived wholesale from
/// `ImpactParameters` plus an assumed population density; always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub energy_joules: f64,
    pub energy_megatons: f64,
    pub crater_diameter_m: f64,
    pub crater_depth_m: f64,
    pub fireball_radius_km: f64,
    pub fireball_temp_c: f64,
    pub overpressure_radius_km: f64,
    pub shockwave_radius_km: f64,
    /// Richter magnitude, clamped to [0, 10]
    pub seismic_magnitude: f64,
    pub seismic_radius_km: f64,
    pub thermal_radius_km: f64,
    pub affected_population: f64,
    pub casualties_estimated: f64,
}

impl ImpactResult {
    /// Compute every effect from the parameters and a population density
    /// (people/km²). Degenerate inputs (zero diameter or velocity) propagate
    /// zero through every formula without dividing by zero or producing NaN.
    pub fn compute(params: &ImpactParameters, population_density: f64) -> Self {
        let energy_joules = kinetic_energy_joules(params);
        let energy_megatons = energy_joules / MEGATON_JOULES;

        // Oblique-impact correction: grazing impacts couple almost no energy
        // into the ground, so angle = 0 yields a degenerate (zero) crater.
        let effective_energy = energy_joules * params.angle_deg.to_radians().sin();
        let crater_diameter_m = CRATER_COEFF * effective_energy.max(0.0).powf(0.25);
        let crater_depth_m = crater_diameter_m * CRATER_DEPTH_RATIO;

        let fireball_radius_km = FIREBALL_COEFF * energy_megatons.powf(FIREBALL_EXP);
        let fireball_temp_c = if energy_megatons > 0.0 {
            FIREBALL_TEMP_BASE_C + FIREBALL_TEMP_SLOPE * energy_megatons
        } else {
            0.0
        };

        let overpressure_radius_km = OVERPRESSURE_COEFF * energy_megatons.powf(OVERPRESSURE_EXP);
        let shockwave_radius_km = SHOCKWAVE_COEFF * energy_megatons.powf(SHOCKWAVE_EXP);

        let seismic_magnitude = seismic_magnitude(energy_joules);
        let seismic_radius_km = SEISMIC_RADIUS_COEFF * energy_megatons.powf(SEISMIC_RADIUS_EXP);

        let thermal_radius_km = THERMAL_COEFF * energy_megatons.powf(THERMAL_EXP);

        // Casualties use the single largest lethal radius
        let max_radius_km = fireball_radius_km
            .max(overpressure_radius_km)
            .max(thermal_radius_km);
        let affected_area_km2 = std::f64::consts::PI * max_radius_km * max_radius_km;
        let affected_population = affected_area_km2 * population_density.max(0.0);
        let casualties_estimated = affected_population * CASUALTY_RATIO;

        Self {
            energy_joules,
            energy_megatons,
            crater_diameter_m,
            crater_depth_m,
            fireball_radius_km,
            fireball_temp_c,
            overpressure_radius_km,
            shockwave_radius_km,
            seismic_magnitude,
            seismic_radius_km,
            thermal_radius_km,
            affected_population,
            casualties_estimated,
        }
    }
}

/// KE = ½·m·v² with a spherical mass from diameter and bulk density
fn kinetic_energy_joules(params: &ImpactParameters) -> f64 {
    let radius_m = params.diameter_m / 2.0;
    let volume_m3 = (4.0 / 3.0) * std::f64::consts::PI * radius_m.powi(3);
    let mass_kg = volume_m3 * params.density_kgm3;
    let velocity_ms = params.velocity_kms * 1000.0;
    0.5 * mass_kg * velocity_ms * velocity_ms
}

/// Richter magnitude (2/3)·log10(E/1e10) - 3.2, clamped to [0, 10].
///
/// log10 is undefined at zero energy; the clamp floor doubles as the guard, so
/// degenerate impacts report magnitude 0 instead of NaN.
fn seismic_magnitude(energy_joules: f64) -> f64 {
    if energy_joules <= 0.0 {
        return 0.0;
    }
    ((2.0 / 3.0) * (energy_joules / 1e10).log10() - 3.2).clamp(0.0, 10.0)
}
