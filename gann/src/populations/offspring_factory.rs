use super::operators::{crossover, mutate, roulette_wheel, select_elite};
use super::PopulationConfig;
use crate::{DimensionError, Genome};

use rand::Rng;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of building the next
/// generation from an evaluated one according
/// to the population configuration.
pub(super) struct OffspringFactory<'a, R: ?Sized> {
    parents: &'a [Genome],
    total_fitness: f64,
    config: &'a PopulationConfig,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> OffspringFactory<'a, R> {
    pub(super) fn new(
        parents: &'a [Genome],
        total_fitness: f64,
        config: &'a PopulationConfig,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, R> {
        OffspringFactory {
            parents,
            total_fitness,
            config,
            rng,
        }
    }

    /// Generates exactly `config.size` unevaluated genomes:
    /// the elite first, then mated and mutated children.
    pub(super) fn generate_offspring(&mut self) -> Result<Vec<Genome>, DimensionError> {
        let size = self.config.size.get();
        let mut offspring = Vec::with_capacity(size);

        self.add_elite(&mut offspring, self.config.elite_count().min(size));
        while offspring.len() < size {
            self.add_mated_pair(&mut offspring, size)?;
        }

        Ok(offspring)
    }

    /// Copies the fittest parents' chromosomes unmodified.
    fn add_elite(&self, offspring: &mut Vec<Genome>, elite: usize) {
        offspring.extend(
            select_elite(self.parents, elite)
                .into_iter()
                .map(|i| self.parents[i].offspring()),
        );
    }

    /// Selects two parents, mates and mutates them,
    /// and adds both children. When only one slot is
    /// left, the second child is dropped.
    fn add_mated_pair(
        &mut self,
        offspring: &mut Vec<Genome>,
        size: usize,
    ) -> Result<(), DimensionError> {
        let parents = self.parents;
        let mom = &parents[roulette_wheel(parents, self.total_fitness, self.rng)];
        let dad = &parents[roulette_wheel(parents, self.total_fitness, self.rng)];

        let (mut child1, mut child2) = crossover(
            mom.chromosome(),
            dad.chromosome(),
            self.config.crossover_rate,
            self.rng,
        )?;
        for child in [&mut child1, &mut child2] {
            mutate(
                child,
                self.config.mutation_rate,
                self.config.max_perturbation,
                self.rng,
            );
        }

        offspring.push(Genome::new(child1));
        if offspring.len() < size {
            offspring.push(Genome::new(child2));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Elitism;
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    fn parents(fitnesses: &[f64]) -> Vec<Genome> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let mut g = Genome::new(vec![i as f64; 4]);
                g.assign_fitness(*f);
                g
            })
            .collect()
    }

    #[test]
    fn exact_size_for_odd_remainders() {
        let parents = parents(&[1.0, 2.0, 3.0]);
        let mut rng = StdRng::seed_from_u64(1);
        for size in 1..12 {
            for elitism in 0..size.min(3) {
                let config = PopulationConfig {
                    size: NonZeroUsize::new(size).unwrap(),
                    crossover_rate: 0.7,
                    mutation_rate: 0.1,
                    max_perturbation: 0.3,
                    elitism: Elitism::Count(elitism),
                };
                let offspring = OffspringFactory::new(&parents, 6.0, &config, &mut rng)
                    .generate_offspring()
                    .unwrap();
                assert_eq!(offspring.len(), size);
                assert!(offspring.iter().all(|g| !g.is_evaluated() && g.len() == 4));
            }
        }
    }

    #[test]
    fn elite_come_first_unmodified() {
        let parents = parents(&[1.0, 9.0, 3.0, 7.0]);
        let config = PopulationConfig {
            size: NonZeroUsize::new(6).unwrap(),
            crossover_rate: 1.0,
            mutation_rate: 1.0,
            max_perturbation: 1.0,
            elitism: Elitism::Count(2),
        };
        let mut rng = StdRng::seed_from_u64(2);
        let offspring = OffspringFactory::new(&parents, 20.0, &config, &mut rng)
            .generate_offspring()
            .unwrap();
        assert_eq!(offspring[0].chromosome(), parents[1].chromosome());
        assert_eq!(offspring[1].chromosome(), parents[3].chromosome());
    }

    #[test]
    fn no_variation_without_crossover_or_mutation() {
        let parents = parents(&[1.0, 1.0]);
        let config = PopulationConfig {
            size: NonZeroUsize::new(10).unwrap(),
            ..PopulationConfig::zero()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let offspring = OffspringFactory::new(&parents, 2.0, &config, &mut rng)
            .generate_offspring()
            .unwrap();
        for child in offspring {
            assert!(parents.iter().any(|p| p.chromosome() == child.chromosome()));
        }
    }
}
