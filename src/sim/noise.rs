//! Seeded 2D gradient noise for shape deformation
//!
//! Classic permutation-table gradient noise: a 256-entry table shuffled with
//! the seeded generator, duplicated for wraparound, quintic fade curve, and
//! bilinear blending of four corner gradients. Deterministic per seed.
//!
//! Internal to the procedural generator; not a general-purpose noise API.

use super::rng::SeededRng;

const TABLE_SIZE: usize = 256;

pub(crate) struct NoiseField {
    // TABLE_SIZE entries duplicated so corner lookups never wrap mid-index
    perm: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    pub(crate) fn new(seed: i64) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut table: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        // Fisher-Yates with the seeded generator keeps the table bijective
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.int(0, i as i32) as usize;
            table.swap(i, j);
        }
        let mut perm = [0u8; TABLE_SIZE * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i % TABLE_SIZE];
        }
        Self { perm }
    }

    /// Quintic smoothstep: 6t^5 - 15t^4 + 10t^3
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    /// Hash a lattice corner to one of four diagonal gradients
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        match hash & 3 {
            0 => x + y,
            1 => -x + y,
            2 => x - y,
            _ => -x - y,
        }
    }

    /// Gradient noise at (x, y), in approximately [-1, 1]
    pub(crate) fn noise2d(&self, x: f64, y: f64) -> f64 {
        let xi = (x.floor() as i64).rem_euclid(TABLE_SIZE as i64) as usize;
        let yi = (y.floor() as i64).rem_euclid(TABLE_SIZE as i64) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let aa = self.perm[usize::from(self.perm[xi]) + yi];
        let ab = self.perm[usize::from(self.perm[xi]) + yi + 1];
        let ba = self.perm[usize::from(self.perm[xi + 1]) + yi];
        let bb = self.perm[usize::from(self.perm[xi + 1]) + yi + 1];

        let x1 = lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );

        // Diagonal gradients span ±√2; rescale toward [-1, 1]
        lerp(x1, x2, v) * std::f64::consts::FRAC_1_SQRT_2
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_per_seed() {
        let a = NoiseField::new(555);
        let b = NoiseField::new(555);
        for i in 0..64 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.71;
            assert_eq!(a.noise2d(x, y), b.noise2d(x, y));
        }
    }

    #[test]
    fn test_seeds_produce_different_fields() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..32).any(|i| {
            let x = i as f64 * 0.5 + 0.25;
            a.noise2d(x, x * 1.3) != b.noise2d(x, x * 1.3)
        });
        assert!(differs);
    }

    #[test]
    fn test_output_bounded() {
        let field = NoiseField::new(9001);
        for i in 0..500 {
            let x = (i as f64 * 0.193).sin() * 40.0;
            let y = (i as f64 * 0.311).cos() * 40.0;
            let n = field.noise2d(x, y);
            assert!(n.is_finite());
            assert!((-1.001..=1.001).contains(&n), "noise out of range: {n}");
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        // Gradient noise is exactly zero on integer lattice points
        let field = NoiseField::new(3);
        assert_eq!(field.noise2d(0.0, 0.0), 0.0);
        assert_eq!(field.noise2d(5.0, -3.0), 0.0);
    }

    #[test]
    fn test_continuity() {
        // Adjacent samples should not jump discontinuously
        let field = NoiseField::new(77);
        let mut prev = field.noise2d(0.0, 0.5);
        for i in 1..200 {
            let cur = field.noise2d(i as f64 * 0.01, 0.5);
            assert!((cur - prev).abs() < 0.1);
            prev = cur;
        }
    }
}
