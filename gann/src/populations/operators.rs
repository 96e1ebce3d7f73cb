//! The genetic operators used during an epoch.
//!
//! They are exposed individually so that drivers can
//! build their own breeding schemes, but a [`Population`]
//! is all that is needed for ordinary use.
//!
//! [`Population`]: crate::Population
use crate::rng::{rand_clamped, rand_int, rand_unit};
use crate::{DimensionError, Genome};

use rand::Rng;

/// Selects a genome with probability proportional to its
/// fitness, returning its index.
///
/// A slice of `[0, total_fitness)` is drawn and genome
/// fitnesses are accumulated in order; the first genome
/// whose running sum exceeds the slice is selected. If
/// rounding keeps the sum from ever exceeding the slice,
/// the last genome is selected.
///
/// # Panics
/// Panics if `genomes` is empty.
pub fn roulette_wheel<R: Rng + ?Sized>(genomes: &[Genome], total_fitness: f64, rng: &mut R) -> usize {
    assert!(!genomes.is_empty(), "roulette wheel selection over no genomes");
    let slice = rand_unit(rng) * total_fitness;
    let mut total = 0.0;
    for (i, genome) in genomes.iter().enumerate() {
        total += genome.fitness();
        if total > slice {
            return i;
        }
    }
    genomes.len() - 1
}

/// Returns the indices of up to `count` of the fittest
/// genomes, best first.
///
/// No two selected genomes share a fitness value: a genome
/// scoring exactly the same as one already chosen is skipped,
/// so fewer than `count` indices are returned when there are
/// not enough distinct fitness values. Among equally fit
/// genomes the one with the lowest index is preferred.
pub fn select_elite(genomes: &[Genome], count: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..genomes.len()).collect();
    // Stable sort, so ties stay in index order.
    ranked.sort_by(|&a, &b| {
        genomes[b]
            .fitness()
            .partial_cmp(&genomes[a].fitness())
            .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"))
    });

    let mut elite: Vec<usize> = Vec::with_capacity(count);
    for i in ranked {
        if elite.len() == count {
            break;
        }
        if elite
            .iter()
            .any(|&e| genomes[e].fitness() == genomes[i].fitness())
        {
            continue;
        }
        elite.push(i);
    }
    elite
}

/// Recombines two parent chromosomes at a single point.
///
/// With probability `1 - crossover_rate`, or whenever the
/// parents are identical, the children are exact copies of
/// `mom` and `dad`. Otherwise a cut point `p` is drawn from
/// `[0, len)` and the children are `mom[..p] ++ dad[p..]`
/// and `dad[..p] ++ mom[p..]`.
///
/// # Errors
/// Returns an error if the parents differ in length.
///
/// # Examples
/// ```
/// use gann::operators::crossover;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let mom = [1.0, 2.0, 3.0];
///
/// let (child1, child2) = crossover(&mom, &mom, 1.0, &mut rng).unwrap();
/// assert_eq!(child1, mom);
/// assert_eq!(child2, mom);
/// ```
pub fn crossover<R: Rng + ?Sized>(
    mom: &[f64],
    dad: &[f64],
    crossover_rate: f64,
    rng: &mut R,
) -> Result<(Vec<f64>, Vec<f64>), DimensionError> {
    if mom.len() != dad.len() {
        return Err(DimensionError::Chromosome {
            expected: mom.len(),
            found: dad.len(),
        });
    }
    if crossover_rate <= 0.0 || mom.is_empty() || mom == dad || rand_unit(rng) >= crossover_rate {
        return Ok((mom.to_vec(), dad.to_vec()));
    }

    let point = rand_int(rng, 0, mom.len());
    let child1 = mom[..point].iter().chain(&dad[point..]).copied().collect();
    let child2 = dad[..point].iter().chain(&mom[point..]).copied().collect();
    Ok((child1, child2))
}

/// Perturbs each gene with probability `mutation_rate`
/// by a uniform amount in `[-max_perturbation, max_perturbation)`.
pub fn mutate<R: Rng + ?Sized>(
    chromosome: &mut [f64],
    mutation_rate: f64,
    max_perturbation: f64,
    rng: &mut R,
) {
    for gene in chromosome {
        if rand_unit(rng) < mutation_rate {
            *gene += rand_clamped(rng) * max_perturbation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn genomes_with_fitness(fitnesses: &[f64]) -> Vec<Genome> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let mut g = Genome::new(vec![i as f64]);
                g.assign_fitness(*f);
                g
            })
            .collect()
    }

    #[test]
    fn roulette_favours_the_fit() {
        let genomes = genomes_with_fitness(&[0.0, 0.0, 100.0]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut counts = [0; 3];
        for _ in 0..10_000 {
            counts[roulette_wheel(&genomes, 100.0, &mut rng)] += 1;
        }
        assert_eq!(counts, [0, 0, 10_000]);
    }

    #[test]
    fn roulette_is_roughly_proportional() {
        let genomes = genomes_with_fitness(&[1.0, 3.0]);
        let mut rng = StdRng::seed_from_u64(6);
        let draws = 20_000;
        let second = (0..draws)
            .filter(|_| roulette_wheel(&genomes, 4.0, &mut rng) == 1)
            .count();
        let share = second as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.02, "share was {}", share);
    }

    #[test]
    fn roulette_falls_back_to_last() {
        // Overstated total keeps the running sum below the slice.
        let genomes = genomes_with_fitness(&[1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(7);
        let picks: Vec<usize> = (0..1000)
            .map(|_| roulette_wheel(&genomes, 1000.0, &mut rng))
            .collect();
        assert!(picks.iter().filter(|&&i| i == 1).count() > 900);
    }

    #[test]
    fn elite_is_best_first() {
        let genomes = genomes_with_fitness(&[1.0, 4.0, 3.0, 2.0]);
        assert_eq!(select_elite(&genomes, 2), vec![1, 2]);
        assert_eq!(select_elite(&genomes, 0), Vec::<usize>::new());
        assert_eq!(select_elite(&genomes, 10), vec![1, 2, 3, 0]);
    }

    #[test]
    fn elite_skips_duplicate_fitness() {
        let genomes = genomes_with_fitness(&[5.0, 5.0, 2.0, 5.0, 1.0]);
        assert_eq!(select_elite(&genomes, 2), vec![0, 2]);
        assert_eq!(select_elite(&genomes, 3), vec![0, 2, 4]);
        // Only three distinct values exist.
        assert_eq!(select_elite(&genomes, 5), vec![0, 2, 4]);
    }

    #[test]
    fn crossover_identical_parents() {
        let mut rng = StdRng::seed_from_u64(8);
        let mom = vec![0.1, 0.2, 0.3, 0.4];
        for rate in [0.0, 0.5, 1.0] {
            for _ in 0..100 {
                let (c1, c2) = crossover(&mom, &mom, rate, &mut rng).unwrap();
                assert_eq!(c1, mom);
                assert_eq!(c2, mom);
            }
        }
    }

    #[test]
    fn crossover_zero_rate_clones() {
        let mut rng = StdRng::seed_from_u64(9);
        let mom = vec![1.0; 5];
        let dad = vec![2.0; 5];
        for _ in 0..100 {
            let (c1, c2) = crossover(&mom, &dad, 0.0, &mut rng).unwrap();
            assert_eq!(c1, mom);
            assert_eq!(c2, dad);
        }
    }

    #[test]
    fn crossover_swaps_tails() {
        let mut rng = StdRng::seed_from_u64(10);
        let mom = vec![1.0; 6];
        let dad = vec![2.0; 6];
        for _ in 0..200 {
            let (c1, c2) = crossover(&mom, &dad, 1.0, &mut rng).unwrap();
            assert_eq!(c1.len(), 6);
            assert_eq!(c2.len(), 6);
            let point = c1.iter().position(|g| *g == 2.0).unwrap();
            assert!(c1[..point].iter().all(|g| *g == 1.0));
            assert!(c1[point..].iter().all(|g| *g == 2.0));
            assert!(c2[..point].iter().all(|g| *g == 2.0));
            assert!(c2[point..].iter().all(|g| *g == 1.0));
        }
    }

    #[test]
    fn crossover_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(
            crossover(&[1.0, 2.0], &[1.0], 1.0, &mut rng),
            Err(DimensionError::Chromosome {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn mutation_bounds() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut chromosome = vec![0.0; 1000];
        mutate(&mut chromosome, 1.0, 0.5, &mut rng);
        assert!(chromosome.iter().all(|g| (-0.5..0.5).contains(g)));
        assert!(chromosome.iter().filter(|g| **g != 0.0).count() > 990);

        let mut untouched = vec![0.25; 100];
        mutate(&mut untouched, 0.0, 0.5, &mut rng);
        assert!(untouched.iter().all(|g| *g == 0.25));
    }
}
