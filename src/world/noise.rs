//! Periodic gradient noise for terrain generation
//!
//! Every octave uses a whole number of lattice cells across each axis, so the
//! field tiles exactly and rock blobs continue across the wrapped edges.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::TerrainConfig;
use crate::core::types::GridSize;

/// 2D gradient noise with a seeded permutation table
pub struct PeriodicNoise {
    perm: [u8; 512],
}

impl PeriodicNoise {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, xi: i64, yi: i64) -> u8 {
        let a = self.perm[(xi & 255) as usize] as usize;
        self.perm[a + (yi & 255) as usize]
    }

    /// One octave at lattice coordinates, repeating every `period` lattice cells
    pub fn sample(&self, x: f64, y: f64, period_x: i64, period_y: i64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let xi = (x0 as i64).rem_euclid(period_x);
        let yi = (y0 as i64).rem_euclid(period_y);
        let xi1 = (xi + 1) % period_x;
        let yi1 = (yi + 1) % period_y;

        let n00 = gradient(self.hash(xi, yi), fx, fy);
        let n10 = gradient(self.hash(xi1, yi), fx - 1.0, fy);
        let n01 = gradient(self.hash(xi, yi1), fx, fy - 1.0);
        let n11 = gradient(self.hash(xi1, yi1), fx - 1.0, fy - 1.0);

        let u = fade(fx);
        let v = fade(fy);
        lerp(v, lerp(u, n00, n10), lerp(u, n01, n11))
    }

    /// Fractal sum at the centre of cell (x, y), normalised to [-1, 1]
    pub fn fbm(&self, x: u32, y: u32, size: GridSize, config: &TerrainConfig) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;
        let mut frequency = 1.0 / config.rock_scale;

        for _ in 0..config.octaves {
            let period_x = ((size.width as f64 * frequency).round() as i64).max(1);
            let period_y = ((size.height as f64 * frequency).round() as i64).max(1);

            // Stretch the grid over exactly `period` lattice cells
            let nx = (x as f64 + 0.5) * period_x as f64 / size.width as f64;
            let ny = (y as f64 + 0.5) * period_y as f64 / size.height as f64;

            total += self.sample(nx, ny, period_x, period_y) * amplitude;
            max_amplitude += amplitude;
            amplitude *= config.persistence;
            frequency *= config.lacunarity;
        }

        if max_amplitude > 0.0 {
            (total / max_amplitude).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn gradient(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn noise(seed: u64) -> PeriodicNoise {
        PeriodicNoise::new(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_sample_is_periodic() {
        let n = noise(3);
        for &(x, y) in &[(0.3, 0.7), (2.25, 1.5), (4.9, 3.1)] {
            let a = n.sample(x, y, 5, 4);
            let b = n.sample(x + 5.0, y + 4.0, 5, 4);
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_sample_is_zero_on_lattice_points() {
        let n = noise(11);
        assert_eq!(n.sample(2.0, 3.0, 8, 8), 0.0);
    }

    #[test]
    fn test_fbm_stays_in_range() {
        let n = noise(42);
        let size = GridSize::new(40, 30);
        let config = TerrainConfig {
            rock_threshold: 0.15,
            rock_scale: 6.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        };
        for pos in size.positions() {
            let v = n.fbm(pos.x, pos.y, size, &config);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let size = GridSize::new(16, 16);
        let config = TerrainConfig {
            rock_threshold: 0.0,
            rock_scale: 4.0,
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
        };
        let (a, b) = (noise(9), noise(9));
        for pos in size.positions() {
            assert_eq!(
                a.fbm(pos.x, pos.y, size, &config),
                b.fbm(pos.x, pos.y, size, &config)
            );
        }
    }
}
