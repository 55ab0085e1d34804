//! Small numeric helpers shared across the simulation.

use rand::Rng;

/// Bounded activation on the positive half-line: maps `[0, inf)` into `[0, 1)`.
#[inline]
pub fn arctan_pstv(x: f32, steepness: f32) -> f32 {
    (2.0 / std::f32::consts::PI) * (steepness * x).atan()
}

/// Bounded activation on the whole line: maps `(-inf, inf)` into `(0, 1)`.
#[inline]
pub fn arctan_real(x: f32, steepness: f32) -> f32 {
    (steepness * x).atan() / std::f32::consts::PI + 0.5
}

/// Draw one standard-normal sample scaled to `(mean, std)`.
///
/// Box-Muller transform over the caller's RNG stream (avoids a rand_distr
/// dependency).
pub fn gaussian<R: Rng>(rng: &mut R, mean: f32, std: f32) -> f32 {
    let u1: f32 = rng.gen::<f32>().max(f32::EPSILON);
    let u2: f32 = rng.gen::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    mean + z * std
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_arctan_pstv_bounds() {
        assert_eq!(arctan_pstv(0.0, 4.0), 0.0);
        for i in 1..100 {
            let x = i as f32 * 0.1;
            let y = arctan_pstv(x, 4.0);
            assert!(y > 0.0 && y < 1.0);
            // monotone increasing
            assert!(y > arctan_pstv(x - 0.1, 4.0));
        }
    }

    #[test]
    fn test_arctan_real_bounds() {
        assert!((arctan_real(0.0, 1.0) - 0.5).abs() < 1e-6);
        assert!(arctan_real(100.0, 1.0) > 0.9);
        assert!(arctan_real(-100.0, 1.0) < 0.1);
        for i in -50..50 {
            let x = i as f32 * 0.2;
            let y = arctan_real(x, 1.0);
            assert!(y > 0.0 && y < 1.0);
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 20_000;
        let samples: Vec<f32> = (0..n).map(|_| gaussian(&mut rng, 5.0, 2.0)).collect();
        let mean = samples.iter().sum::<f32>() / n as f32;
        let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / n as f32;
        assert!((mean - 5.0).abs() < 0.1, "mean {mean}");
        assert!((var - 4.0).abs() < 0.3, "var {var}");
    }
}
