//! Procedural impactor body and crater layout
//!
//! Deterministic irregular polygon, composition-driven palette and crater/scar
//! layout, all derived from a seed folded out of (diameter, velocity, angle).
//! Two bodies built from identical parameters are bit-for-bit identical, so
//! the rendering layer can regenerate a body at any moment instead of
//! persisting it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;
use super::params::ImpactParameters;
use super::rng::SeededRng;
use crate::polar_to_cartesian;

/// Octaves summed along the unit circle for the vertex ring
const NOISE_OCTAVES: u32 = 4;
/// Chance per vertex of an extra random bump
const BUMP_CHANCE: f64 = 0.3;
/// Floor for the per-vertex radius multiplier
const MIN_RADIUS_MULTIPLIER: f64 = 0.5;

/// Visual material class drawn from the shape seed.
///
/// Deliberately independent of `ImpactParameters::composition`: the source
/// behavior rolls its own class from the seed and the two can disagree. Kept
/// as-is pending product clarification; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyClass {
    Rocky,
    Metallic,
    Icy,
}

impl BodyClass {
    /// Cumulative seeded draw: rocky 75%, metallic 15%, icy 10%
    fn draw(rng: &mut SeededRng) -> Self {
        let roll = rng.next();
        if roll < 0.75 {
            BodyClass::Rocky
        } else if roll < 0.90 {
            BodyClass::Metallic
        } else {
            BodyClass::Icy
        }
    }

    /// Surface roughness factor scaling the noise deformation
    fn roughness(&self) -> f64 {
        match self {
            BodyClass::Rocky => 0.35,
            BodyClass::Metallic => 0.18,
            BodyClass::Icy => 0.25,
        }
    }

    /// Base hue range (degrees) for the palette draw
    fn hue_range(&self) -> (f64, f64) {
        match self {
            BodyClass::Rocky => (10.0, 35.0),    // browns and reds
            BodyClass::Metallic => (200.0, 225.0), // blue-grey
            BodyClass::Icy => (175.0, 205.0),    // cyan/blue
        }
    }

    fn saturation_range(&self) -> (f64, f64) {
        match self {
            BodyClass::Rocky => (0.40, 0.60),
            BodyClass::Metallic => (0.15, 0.35),
            BodyClass::Icy => (0.50, 0.80),
        }
    }

    fn lightness_range(&self) -> (f64, f64) {
        match self {
            BodyClass::Rocky => (0.30, 0.45),
            BodyClass::Metallic => (0.45, 0.60),
            BodyClass::Icy => (0.55, 0.70),
        }
    }
}

/// HSL color (h in degrees [0, 360), s and l in [0, 1])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }

    /// Same hue, scaled lightness
    fn with_lightness_scaled(self, factor: f32) -> Self {
        Self::new(self.h, self.s, self.l * factor)
    }
}

/// Base/dark/bright/accent variants for one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub base: Hsl,
    pub dark: Hsl,
    pub bright: Hsl,
    pub accent: Hsl,
}

impl ColorPalette {
    /// Derive the four variants from a seeded base draw within the class's
    /// HSL ranges
    fn generate(class: BodyClass, rng: &mut SeededRng) -> Self {
        let (h_lo, h_hi) = class.hue_range();
        let (s_lo, s_hi) = class.saturation_range();
        let (l_lo, l_hi) = class.lightness_range();
        let base = Hsl::new(
            rng.range(h_lo, h_hi) as f32,
            rng.range(s_lo, s_hi) as f32,
            rng.range(l_lo, l_hi) as f32,
        );
        Self {
            base,
            dark: base.with_lightness_scaled(0.55),
            bright: base.with_lightness_scaled(1.35),
            accent: Hsl::new(base.h + 15.0, base.s + 0.2, base.l + 0.1),
        }
    }
}

/// One point of the deformed vertex ring, in polar form relative to the
/// body's base radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyVertex {
    /// Angle around the ring (radians)
    pub angle: f32,
    /// Radius multiplier (1.0 = undeformed base radius, floored at 0.5)
    pub radius: f32,
}

/// One crater/scar placed on the body surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraterSpot {
    /// Angle from body center (radians)
    pub angle: f32,
    /// Distance from center as a fraction of body radius, in [0.2, 0.9]
    pub distance_frac: f32,
    /// Crater size as a fraction of body radius, in [0.05, 0.15]
    pub size_frac: f32,
}

/// Deterministic irregular body: vertex ring, palette and crater layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralBody {
    pub seed: u32,
    pub class: BodyClass,
    pub vertices: Vec<BodyVertex>,
    pub palette: ColorPalette,
    pub craters: Vec<CraterSpot>,
}

impl ProceduralBody {
    /// Fold (diameter, velocity, angle) into the shape seed
    pub fn derive_seed(params: &ImpactParameters) -> u32 {
        let folded = (params.diameter_m * 1000.0
            + params.velocity_kms * 100.0
            + params.angle_deg * 10.0)
            .floor() as i64;
        folded.rem_euclid(9999) as u32
    }

    /// Generate the body for these parameters. Identical (diameter, velocity,
    /// angle) triples yield bit-identical output, regardless of when or how
    /// many times this is called.
    pub fn generate(params: &ImpactParameters) -> Self {
        let seed = Self::derive_seed(params);
        let mut rng = SeededRng::new(i64::from(seed));
        let noise = NoiseField::new(i64::from(seed));

        let class = BodyClass::draw(&mut rng);

        // Larger bodies get busier silhouettes and more scarring
        let complexity = ((params.diameter_m + 1.0).log10() / 3.0).clamp(0.0, 1.0);
        let vertex_count = (20.0 + complexity * 30.0).round() as usize;
        let crater_count = (5.0 + complexity * 15.0) as usize + rng.int(0, 10) as usize;

        let roughness = class.roughness();
        let mut vertices = Vec::with_capacity(vertex_count);
        for i in 0..vertex_count {
            let angle = std::f64::consts::TAU * i as f64 / vertex_count as f64;

            // Sample octaves along the unit circle so the ring closes smoothly
            let mut deform = 0.0;
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            for _ in 0..NOISE_OCTAVES {
                deform += noise.noise2d(angle.cos() * frequency, angle.sin() * frequency)
                    * amplitude;
                amplitude *= 0.5;
                frequency *= 2.0;
            }
            let mut multiplier = 1.0 + deform * roughness;
            if rng.next() < BUMP_CHANCE {
                multiplier += rng.range(-0.08, 0.12);
            }
            vertices.push(BodyVertex {
                angle: angle as f32,
                radius: multiplier.max(MIN_RADIUS_MULTIPLIER) as f32,
            });
        }

        let mut craters = Vec::with_capacity(crater_count);
        for _ in 0..crater_count {
            craters.push(CraterSpot {
                angle: rng.range(0.0, std::f64::consts::TAU) as f32,
                distance_frac: rng.range(0.2, 0.9) as f32,
                size_frac: rng.range(0.05, 0.15) as f32,
            });
        }

        let palette = ColorPalette::generate(class, &mut rng);

        Self {
            seed,
            class,
            vertices,
            palette,
            craters,
        }
    }

    /// Resolve the vertex ring to cartesian positions at a concrete base
    /// radius (render units), for drawing
    pub fn vertex_positions(&self, base_radius: f32) -> Vec<Vec2> {
        self.vertices
            .iter()
            .map(|v| polar_to_cartesian(base_radius * v.radius, v.angle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::params::Composition;

    fn params(diameter_m: f64) -> ImpactParameters {
        ImpactParameters::new(diameter_m, 20.0, 45.0, Composition::Rocky)
    }

    #[test]
    fn test_seed_derivation() {
        // floor(100*1000 + 20*100 + 45*10) mod 9999
        let seed = ProceduralBody::derive_seed(&params(100.0));
        assert_eq!(seed, (100_000_i64 + 2000 + 450).rem_euclid(9999) as u32);
        assert!(seed < 9999);
    }

    #[test]
    fn test_bit_identical_regeneration() {
        let a = ProceduralBody::generate(&params(350.0));
        let b = ProceduralBody::generate(&params(350.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_density_and_composition_do_not_affect_shape() {
        // The shape seed folds only (diameter, velocity, angle)
        let a = ProceduralBody::generate(&params(120.0));
        let b = ProceduralBody::generate(
            &ImpactParameters::new(120.0, 20.0, 45.0, Composition::Iron).with_density(9999.0),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_drawn_class_is_independent_of_caller_composition() {
        // The class comes from the seed draw, not from the composition field.
        // Pinned divergence; see DESIGN.md.
        let icy_caller = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Icy);
        let rocky_caller = ImpactParameters::new(100.0, 20.0, 45.0, Composition::Rocky);
        let a = ProceduralBody::generate(&icy_caller);
        let b = ProceduralBody::generate(&rocky_caller);
        assert_eq!(a.class, b.class);
    }

    #[test]
    fn test_complexity_scales_counts() {
        let small = ProceduralBody::generate(&params(1.0));
        let large = ProceduralBody::generate(&params(50_000.0));
        assert!(small.vertices.len() >= 20);
        assert!(large.vertices.len() > small.vertices.len());
        assert_eq!(large.vertices.len(), 50);
        // 5 + 15·complexity plus jitter up to +10
        assert!((5..=30).contains(&large.craters.len()));
    }

    #[test]
    fn test_vertex_ring_invariants() {
        let body = ProceduralBody::generate(&params(500.0));
        for v in &body.vertices {
            assert!(v.radius >= 0.5);
            assert!(v.radius.is_finite());
            assert!((0.0..std::f32::consts::TAU + 1e-4).contains(&v.angle));
        }
        // Angles strictly increase around the ring
        for pair in body.vertices.windows(2) {
            assert!(pair[1].angle > pair[0].angle);
        }
    }

    #[test]
    fn test_crater_layout_bounds() {
        let body = ProceduralBody::generate(&params(2000.0));
        for c in &body.craters {
            assert!((0.2..=0.9).contains(&c.distance_frac));
            assert!((0.05..=0.15).contains(&c.size_frac));
        }
    }

    #[test]
    fn test_palette_within_class_ranges() {
        let body = ProceduralBody::generate(&params(100.0));
        let (h_lo, h_hi) = body.class.hue_range();
        assert!((h_lo as f32..=h_hi as f32).contains(&body.palette.base.h));
        assert!(body.palette.dark.l < body.palette.base.l);
        assert!(body.palette.bright.l > body.palette.base.l);
        assert!((0.0..=1.0).contains(&body.palette.accent.s));
    }

    #[test]
    fn test_vertex_positions_scale() {
        let body = ProceduralBody::generate(&params(100.0));
        let ring = body.vertex_positions(10.0);
        assert_eq!(ring.len(), body.vertices.len());
        for p in &ring {
            assert!(p.length() >= 5.0); // multiplier floor of 0.5
        }
    }
}
