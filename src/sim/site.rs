//! Impact site bookkeeping
//!
//! Host-facing aggregate tying one set of parameters to its computed result
//! and a map location, so collaborators can correlate a launched simulation
//! with its visual state. Sites are created on launch and removed only on
//! explicit clearing. This is the one module allowed to read the wall clock;
//! the deterministic `sim` tick path never does.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::DEFAULT_POPULATION_DENSITY;
use super::params::{ImpactParameters, ParameterError};
use super::physics::ImpactResult;

/// One launched impact: parameters, result, location, creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSite {
    pub id: u32,
    pub params: ImpactParameters,
    pub result: ImpactResult,
    pub lat: f64,
    pub lon: f64,
    /// Milliseconds since the Unix epoch at launch
    pub created_at_ms: u64,
}

/// Live collection of launched sites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRegistry {
    sites: Vec<ImpactSite>,
    next_id: u32,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self {
            sites: Vec::new(),
            next_id: 1,
        }
    }

    /// Validate, compute the full result, and register the site.
    ///
    /// A failed validation yields no result and no site; the caller handles
    /// the error explicitly.
    pub fn launch(
        &mut self,
        params: ImpactParameters,
        population_density: Option<f64>,
        lat: f64,
        lon: f64,
    ) -> Result<&ImpactSite, ParameterError> {
        params.validate()?;
        let density = population_density.unwrap_or(DEFAULT_POPULATION_DENSITY);
        let result = ImpactResult::compute(&params, density);
        let id = self.next_id;
        self.next_id += 1;
        self.sites.push(ImpactSite {
            id,
            params,
            result,
            lat,
            lon,
            created_at_ms: now_ms(),
        });
        // Just pushed, so the collection is non-empty
        Ok(self.sites.last().expect("site just pushed"))
    }

    pub fn get(&self, id: u32) -> Option<&ImpactSite> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn sites(&self) -> &[ImpactSite] {
        &self.sites
    }

    /// Remove one site; returns whether it existed
    pub fn clear(&mut self, id: u32) -> bool {
        let before = self.sites.len();
        self.sites.retain(|s| s.id != id);
        self.sites.len() != before
    }

    pub fn clear_all(&mut self) {
        self.sites.clear();
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::params::Composition;

    #[test]
    fn test_launch_registers_site() {
        let mut reg = SiteRegistry::new();
        let params = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Rocky);
        let id = reg.launch(params, None, 40.7, -74.0).map(|s| s.id).unwrap();
        assert_eq!(id, 1);
        assert_eq!(reg.len(), 1);
        let site = reg.get(id).unwrap();
        assert!(site.result.energy_joules > 0.0);
        assert_eq!(site.params, params);
    }

    #[test]
    fn test_launch_rejects_invalid_parameters() {
        let mut reg = SiteRegistry::new();
        let params = ImpactParameters::new(-5.0, 20.0, 45.0, Composition::Rocky);
        assert!(reg.launch(params, None, 0.0, 0.0).is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_clear_lifecycle() {
        let mut reg = SiteRegistry::new();
        let params = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Rocky);
        let a = reg.launch(params, None, 0.0, 0.0).map(|s| s.id).unwrap();
        let b = reg.launch(params, Some(250.0), 10.0, 10.0).map(|s| s.id).unwrap();
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);

        assert!(reg.clear(a));
        assert!(!reg.clear(a));
        assert_eq!(reg.len(), 1);

        reg.clear_all();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_population_density_override() {
        let mut reg = SiteRegistry::new();
        let params = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Rocky);
        let low = reg.launch(params, Some(10.0), 0.0, 0.0).unwrap().result;
        let high = reg.launch(params, Some(1000.0), 0.0, 0.0).unwrap().result;
        assert!(high.casualties_estimated > low.casualties_estimated);
    }
}
