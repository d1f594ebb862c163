//! Impactor parameters and validation
//!
//! The physics model performs no bounds-checking of its own, so callers must
//! validate parameters before computing results or launching a simulation. A
//! failed validation yields no `ImpactResult` and no simulation start.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Impactor material class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    #[default]
    Rocky,
    Iron,
    Icy,
}

impl Composition {
    /// Reference bulk density for this class (kg/m³)
    pub fn reference_density(&self) -> f64 {
        match self {
            Composition::Rocky => 3000.0,
            Composition::Iron => 7800.0,
            Composition::Icy => 1000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Composition::Rocky => "rocky",
            Composition::Iron => "iron",
            Composition::Icy => "icy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rocky" | "rock" | "stone" => Some(Composition::Rocky),
            "iron" | "metallic" | "metal" => Some(Composition::Iron),
            "icy" | "ice" | "comet" => Some(Composition::Icy),
            _ => None,
        }
    }

    /// Aerodynamic strength threshold: bodies below this diameter (m) tend to
    /// fragment during atmospheric transit.
    pub fn breakup_diameter_m(&self) -> f64 {
        match self {
            Composition::Rocky => 150.0,
            Composition::Iron => 40.0,
            Composition::Icy => 300.0,
        }
    }
}

/// Rejected before any result is computed (taxonomy: invalid-input)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("diameter must be positive and finite (got {0} m)")]
    InvalidDiameter(f64),
    #[error("velocity must be positive and finite (got {0} km/s)")]
    InvalidVelocity(f64),
    #[error("impact angle must be within [0, 90] degrees (got {0})")]
    InvalidAngle(f64),
    #[error("density must be positive and finite (got {0} kg/m³)")]
    InvalidDensity(f64),
}

/// Scalar inputs to the whole model. Immutable once handed to the physics
/// model for a given calculation; any change produces a wholesale recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactParameters {
    /// Impactor diameter (m)
    pub diameter_m: f64,
    /// Entry velocity (km/s)
    pub velocity_kms: f64,
    /// Impact angle in degrees from horizontal (90 = vertical, 0 = grazing)
    pub angle_deg: f64,
    /// Bulk density (kg/m³); normally the composition's reference density but
    /// may be overridden explicitly
    pub density_kgm3: f64,
    pub composition: Composition,
}

impl ImpactParameters {
    /// Parameters with the composition's reference density
    pub fn new(diameter_m: f64, velocity_kms: f64, angle_deg: f64, composition: Composition) -> Self {
        Self {
            diameter_m,
            velocity_kms,
            angle_deg,
            density_kgm3: composition.reference_density(),
            composition,
        }
    }

    /// Explicit density override
    pub fn with_density(mut self, density_kgm3: f64) -> Self {
        self.density_kgm3 = density_kgm3;
        self
    }

    /// Reject invalid inputs before they reach the physics model.
    ///
    /// Comparisons are written so that NaN fails every check.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.diameter_m > 0.0) || !self.diameter_m.is_finite() {
            return Err(ParameterError::InvalidDiameter(self.diameter_m));
        }
        if !(self.velocity_kms > 0.0) || !self.velocity_kms.is_finite() {
            return Err(ParameterError::InvalidVelocity(self.velocity_kms));
        }
        if !(0.0..=90.0).contains(&self.angle_deg) {
            return Err(ParameterError::InvalidAngle(self.angle_deg));
        }
        if !(self.density_kgm3 > 0.0) || !self.density_kgm3.is_finite() {
            return Err(ParameterError::InvalidDensity(self.density_kgm3));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_densities() {
        assert_eq!(Composition::Rocky.reference_density(), 3000.0);
        assert_eq!(Composition::Iron.reference_density(), 7800.0);
        assert_eq!(Composition::Icy.reference_density(), 1000.0);
    }

    #[test]
    fn test_new_uses_reference_density() {
        let p = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Iron);
        assert_eq!(p.density_kgm3, 7800.0);
        let p = p.with_density(5000.0);
        assert_eq!(p.density_kgm3, 5000.0);
    }

    #[test]
    fn test_validate_accepts_valid() {
        let p = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Rocky);
        assert!(p.validate().is_ok());
        // Grazing angle is a degenerate but legal boundary case
        let p = ImpactParameters::new(100.0, 20.0, 0.0, Composition::Rocky);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid() {
        let base = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Rocky);

        let mut p = base;
        p.diameter_m = 0.0;
        assert!(matches!(p.validate(), Err(ParameterError::InvalidDiameter(_))));

        let mut p = base;
        p.velocity_kms = -5.0;
        assert!(matches!(p.validate(), Err(ParameterError::InvalidVelocity(_))));

        let mut p = base;
        p.angle_deg = 91.0;
        assert!(matches!(p.validate(), Err(ParameterError::InvalidAngle(_))));

        let mut p = base;
        p.angle_deg = f64::NAN;
        assert!(matches!(p.validate(), Err(ParameterError::InvalidAngle(_))));

        let mut p = base;
        p.density_kgm3 = f64::INFINITY;
        assert!(matches!(p.validate(), Err(ParameterError::InvalidDensity(_))));
    }

    #[test]
    fn test_composition_from_str() {
        assert_eq!(Composition::from_str("Rocky"), Some(Composition::Rocky));
        assert_eq!(Composition::from_str("metal"), Some(Composition::Iron));
        assert_eq!(Composition::from_str("comet"), Some(Composition::Icy));
        assert_eq!(Composition::from_str("plasma"), None);
    }
}
