//! Deterministic simulation module
//!
//! All impact modeling lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (Park-Miller LCG, reproducible across runtimes)
//! - No wall-clock reads in the tick path
//! - No rendering or platform dependencies
//!
//! Data flow: `ImpactParameters` → `ImpactResult` → `PhaseTimeline` →
//! `ParticleEngine::step`; parameters alone also drive `ProceduralBody`, which
//! is re-derivable at any moment from the same inputs.

pub mod body;
pub(crate) mod noise;
pub mod params;
pub mod particles;
pub mod phases;
pub mod physics;
pub mod rng;
pub mod site;

pub use body::{BodyClass, BodyVertex, ColorPalette, CraterSpot, Hsl, ProceduralBody};
pub use params::{Composition, ImpactParameters, ParameterError};
pub use particles::{Particle, ParticleEngine, ParticleKind};
pub use phases::{Phase, PhaseFlags, PhaseSpan, PhaseTimeline};
pub use physics::ImpactResult;
pub use rng::SeededRng;
pub use site::{ImpactSite, SiteRegistry};
