//! Impact Sim - a deterministic asteroid impact modeling core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (impact physics, phase timeline, procedural
//!   body generation, particle engine)
//! - `settings`: Quality presets and particle budgets
//!
//! The crate turns four scalar inputs (diameter, velocity, impact angle,
//! density/composition) into quantitative impact effects, a reproducible
//! irregular body/crater shape, and a time-phased particle simulation. Rendering,
//! catalog ingestion and report generation are external collaborators that
//! consume the structured outputs.

pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, SimSettings};
pub use sim::body::{BodyClass, ColorPalette, Hsl, ProceduralBody};
pub use sim::params::{Composition, ImpactParameters, ParameterError};
pub use sim::particles::{Particle, ParticleEngine, ParticleKind};
pub use sim::phases::{Phase, PhaseFlags, PhaseSpan, PhaseTimeline};
pub use sim::physics::ImpactResult;
pub use sim::rng::SeededRng;
pub use sim::site::{ImpactSite, SiteRegistry};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravitational acceleration at the surface (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Render units per meter for particle kinematics
    pub const UNIT_SCALE: f32 = 0.05;

    /// Joules per megaton of TNT
    pub const MEGATON_JOULES: f64 = 4.184e15;
    /// Assumed population density when the caller supplies none (people/km²)
    pub const DEFAULT_POPULATION_DENSITY: f64 = 100.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
