//! Simulation settings and quality presets
//!
//! Host-side preferences gating how much visual work the particle engine is
//! allowed to do. Serialized as JSON so embedding front-ends can persist them
//! wherever they like.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Global live-particle budget for this preset, layered on top of the
    /// engine's per-kind caps
    pub fn particle_budget(&self) -> usize {
        match self {
            QualityPreset::Low => 400,
            QualityPreset::Medium => 1200,
            QualityPreset::High => 2400,
        }
    }
}

/// Simulation preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSettings {
    /// Visual quality preset
    pub quality: QualityPreset,
    /// Particle effects master switch
    pub particles: bool,
    /// Minimize flashes and bursts
    pub reduced_motion: bool,
    /// Show phase/elapsed overlay. Host-side hint only; the library carries
    /// it but does not interpret it.
    pub show_overlay: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            reduced_motion: false,
            show_overlay: true,
        }
    }
}

impl SimSettings {
    /// Effective particle budget (zero when particles are switched off)
    pub fn particle_budget(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.particle_budget()
        }
    }

    /// Explosion-burst scale: reduced motion shrinks the burst instead of
    /// switching particles off outright
    pub fn burst_scale(&self) -> f32 {
        if self.reduced_motion { 0.25 } else { 1.0 }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse persisted settings, falling back to defaults on corrupt input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Discarding corrupt settings: {err}");
                Self::default()
            }
        }
    }
}
