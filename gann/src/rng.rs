//! Uniform sampling helpers shared by weight
//! initialization, selection, crossover and mutation.
//!
//! None of these hold any state of their own: the
//! generator is always supplied by the caller, so
//! seeding a single `Rng` makes a whole run reproducible.
use rand::Rng;

/// Returns a uniformly distributed value in `[0, 1)`.
///
/// # Examples
/// ```
/// use gann::rng::rand_unit;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let x = rand_unit(&mut rng);
/// assert!((0.0..1.0).contains(&x));
/// ```
pub fn rand_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Returns a uniformly distributed value in `[-1, 1)`.
///
/// # Examples
/// ```
/// use gann::rng::rand_clamped;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let x = rand_clamped(&mut rng);
/// assert!((-1.0..1.0).contains(&x));
/// ```
pub fn rand_clamped<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rand_unit(rng) * 2.0 - 1.0
}

/// Returns a uniformly distributed integer in `[min, max)`.
///
/// # Panics
/// Panics if `min >= max`.
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    rng.gen_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ranges() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10_000 {
            assert!((0.0..1.0).contains(&rand_unit(&mut rng)));
            assert!((-1.0..1.0).contains(&rand_clamped(&mut rng)));
            assert!((3..9).contains(&rand_int(&mut rng, 3, 9)));
        }
    }

    #[test]
    fn clamped_covers_both_signs() {
        let mut rng = StdRng::seed_from_u64(1);
        let draws: Vec<f64> = (0..1000).map(|_| rand_clamped(&mut rng)).collect();
        assert!(draws.iter().any(|x| *x < -0.5));
        assert!(draws.iter().any(|x| *x > 0.5));
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(rand_unit(&mut a), rand_unit(&mut b));
        }
    }
}
