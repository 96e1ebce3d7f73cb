//! A Population is a fixed-capacity collection of
//! genomes, evolved generation by generation using
//! their fitness as the source of selective pressure.
mod config;
mod errors;
mod fitness;
pub mod logging;
mod offspring_factory;
pub mod operators;

use crate::{DimensionError, Genome, GenomeId};
pub use config::{Elitism, PopulationConfig};
pub use errors::{ConfigurationError, PopulationError};
use fitness::EvaluatorFn;
pub use fitness::{FitnessProvider, ReportedFitness};
use offspring_factory::OffspringFactory;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Lifecycle stage of a population's current generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopulationState {
    /// No genomes yet; they are to be added one by one.
    Empty,
    /// Genomes exist, but none has been evaluated.
    Initialized,
    /// Some genomes have been evaluated.
    Evaluating,
    /// Every genome has a fitness; ready for [`Population::epoch`].
    Evaluated,
}

/// A population of genomes.
///
/// Deserialization runs the same checks as
/// [`from_genomes`](Population::from_genomes), so a
/// restored population is as valid as a built one.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PopulationData")]
pub struct Population {
    genomes: Vec<Genome>,
    chromosome_length: Option<usize>,
    generation: usize,
    fittest: Option<GenomeId>,
    best_fitness: f64,
    total_fitness: f64,
    record_fitness: f64,
    config: PopulationConfig,
}

/// Unchecked serialized form of a [`Population`].
#[derive(Deserialize)]
struct PopulationData {
    genomes: Vec<Genome>,
    chromosome_length: Option<usize>,
    generation: usize,
    fittest: Option<GenomeId>,
    best_fitness: f64,
    total_fitness: f64,
    record_fitness: f64,
    config: PopulationConfig,
}

impl TryFrom<PopulationData> for Population {
    type Error = PopulationError;

    fn try_from(data: PopulationData) -> Result<Population, PopulationError> {
        let mut population = Population::from_genomes(data.config, data.genomes)?;
        match (data.chromosome_length, population.chromosome_length) {
            (Some(0), _) => return Err(ConfigurationError::EmptyChromosome.into()),
            (Some(expected), Some(found)) if expected != found => {
                return Err(DimensionError::Chromosome { expected, found }.into())
            }
            (Some(length), None) => population.chromosome_length = Some(length),
            _ => {}
        }
        if let Some(id) = data.fittest {
            if id.0 >= population.config.size.get() {
                return Err(PopulationError::UnknownGenome(id));
            }
            check_fitness(id, data.best_fitness)?;
        }
        population.generation = data.generation;
        population.fittest = data.fittest;
        population.best_fitness = data.best_fitness;
        population.total_fitness = data.total_fitness;
        population.record_fitness = data.record_fitness;
        Ok(population)
    }
}

impl Population {
    /// Creates a population of `config.size` random genomes
    /// with `chromosome_length` genes each, drawn from the
    /// same `[0, 1)` distribution used to initialize network
    /// weights.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    /// or `chromosome_length` is zero.
    ///
    /// # Examples
    /// ```
    /// use gann::{Population, PopulationConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let population = Population::new(PopulationConfig::default(), 9, &mut rng).unwrap();
    ///
    /// assert_eq!(population.len(), 50);
    /// assert_eq!(population.chromosome_length(), Some(9));
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn new<R: Rng + ?Sized>(
        config: PopulationConfig,
        chromosome_length: usize,
        rng: &mut R,
    ) -> Result<Population, ConfigurationError> {
        if chromosome_length == 0 {
            return Err(ConfigurationError::EmptyChromosome);
        }
        let mut population = Population::empty(config)?;
        population.chromosome_length = Some(chromosome_length);
        population.randomize(rng);
        Ok(population)
    }

    /// Creates a population with no genomes, to be filled
    /// through [`add_genome`] with snapshots of externally
    /// created agents.
    ///
    /// [`add_genome`]: Population::add_genome
    ///
    /// # Examples
    /// ```
    /// use gann::{Genome, Population, PopulationConfig, PopulationState};
    ///
    /// let mut population = Population::empty(PopulationConfig::default()).unwrap();
    /// assert_eq!(population.state(), PopulationState::Empty);
    ///
    /// let id = population.add_genome(Genome::new(vec![0.1, 0.2])).unwrap();
    /// assert_eq!(id.0, 0);
    /// assert_eq!(population.state(), PopulationState::Initialized);
    /// ```
    pub fn empty(config: PopulationConfig) -> Result<Population, ConfigurationError> {
        config.validate()?;
        Ok(Population {
            genomes: Vec::with_capacity(config.size.get()),
            chromosome_length: None,
            generation: 0,
            fittest: None,
            best_fitness: 0.0,
            total_fitness: 0.0,
            record_fitness: 0.0,
            config,
        })
    }

    /// Creates a population seeded with the given genomes,
    /// keeping any fitness they already carry.
    ///
    /// Fewer genomes than the configured size may be passed;
    /// the first epoch breeds the population up to size.
    ///
    /// # Errors
    /// Returns an error if there are more genomes than the
    /// configured size, if their chromosome lengths differ
    /// or are zero, or if any carries an invalid fitness.
    pub fn from_genomes(
        config: PopulationConfig,
        genomes: Vec<Genome>,
    ) -> Result<Population, PopulationError> {
        let mut population = Population::empty(config)?;
        if genomes.len() > population.config.size.get() {
            return Err(PopulationError::PopulationFull(population.config.size.get()));
        }
        for (i, genome) in genomes.iter().enumerate() {
            population.check_chromosome(genome)?;
            if genome.is_evaluated() {
                check_fitness(GenomeId(i), genome.fitness())?;
            }
            population.chromosome_length = Some(genome.len());
        }
        population.genomes = genomes;
        Ok(population)
    }

    /// Adds a genome to the current generation, returning
    /// its identifier. The first genome added fixes the
    /// chromosome length of the population.
    ///
    /// # Errors
    /// Returns an error if the population is already full,
    /// or the genome's length doesn't match the others'.
    pub fn add_genome(&mut self, genome: Genome) -> Result<GenomeId, PopulationError> {
        if self.genomes.len() >= self.config.size.get() {
            return Err(PopulationError::PopulationFull(self.config.size.get()));
        }
        self.check_chromosome(&genome)?;
        self.chromosome_length = Some(genome.len());
        self.genomes.push(genome);
        Ok(GenomeId(self.genomes.len() - 1))
    }

    /// Sets the fitness a genome achieved during its
    /// evaluation episode.
    ///
    /// # Errors
    /// Returns an error if no genome has the given ID or
    /// the fitness is negative or not finite. The genome
    /// is left untouched in that case.
    ///
    /// # Examples
    /// ```
    /// use gann::{GenomeId, Population, PopulationConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let mut population = Population::new(PopulationConfig::default(), 4, &mut rng).unwrap();
    ///
    /// population.update_fitness(GenomeId(3), 12.0).unwrap();
    /// assert_eq!(population.record_fitness(), 12.0);
    ///
    /// assert!(population.update_fitness(GenomeId(3), -1.0).is_err());
    /// assert!(population.update_fitness(GenomeId(50), 1.0).is_err());
    /// ```
    pub fn update_fitness(&mut self, id: GenomeId, fitness: f64) -> Result<(), PopulationError> {
        check_fitness(id, fitness)?;
        let genome = self
            .genomes
            .get_mut(id.0)
            .ok_or(PopulationError::UnknownGenome(id))?;
        genome.assign_fitness(fitness);
        if fitness > self.record_fitness {
            self.record_fitness = fitness;
            debug!(genome = id.0, fitness, "fitness record");
        }
        Ok(())
    }

    /// Evaluates the fitness of each genome in the
    /// population using the passed evaluator.
    ///
    /// # Errors
    /// Returns an error if the evaluator produces a negative
    /// or non-finite value, in which case no fitness is
    /// assigned at all.
    ///
    /// # Examples
    /// ```
    /// use gann::{Population, PopulationConfig, PopulationState};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(2);
    /// let mut population = Population::new(PopulationConfig::default(), 4, &mut rng).unwrap();
    ///
    /// // Genomes whose genes add up closer to 2 are fitter.
    /// population
    ///     .evaluate_fitness(|g| 1.0 / (1.0 + (g.chromosome().iter().sum::<f64>() - 2.0).abs()))
    ///     .unwrap();
    /// assert_eq!(population.state(), PopulationState::Evaluated);
    /// ```
    pub fn evaluate_fitness<E>(&mut self, evaluator: E) -> Result<(), PopulationError>
    where
        E: FnMut(&Genome) -> f64,
    {
        self.evaluate_with(&mut EvaluatorFn(evaluator))
    }

    /// Assigns fitness to every genome the provider has a
    /// value for. Genomes it has no value for keep their
    /// current fitness and evaluation status.
    ///
    /// # Errors
    /// Returns an error if any provided value is negative or
    /// not finite, in which case no fitness is assigned at all.
    pub fn evaluate_with<P>(&mut self, provider: &mut P) -> Result<(), PopulationError>
    where
        P: FitnessProvider + ?Sized,
    {
        let mut fitnesses = Vec::with_capacity(self.genomes.len());
        for (i, genome) in self.genomes.iter().enumerate() {
            let id = GenomeId(i);
            if let Some(fitness) = provider.fitness(id, genome) {
                check_fitness(id, fitness)?;
                fitnesses.push((id, fitness));
            }
        }
        for (id, fitness) in fitnesses {
            self.update_fitness(id, fitness)?;
        }
        Ok(())
    }

    /// Replaces the current generation with the next one.
    ///
    /// Fitness totals are recomputed, the [elite] are copied
    /// over unmodified, and the remaining slots are filled
    /// with children of roulette-wheel selected parents, after
    /// [crossover] and [mutation]. Every genome of the new
    /// generation starts unevaluated.
    ///
    /// A generation where every genome scored 0 still breeds;
    /// roulette selection then always picks the last genome.
    ///
    /// # Errors
    /// Returns an error, leaving the population untouched, if
    /// it is empty or if any genome has not been evaluated.
    ///
    /// [elite]: PopulationConfig::elitism
    /// [crossover]: PopulationConfig::crossover_rate
    /// [mutation]: PopulationConfig::mutation_rate
    ///
    /// # Examples
    /// ```
    /// use gann::{Population, PopulationConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let mut population = Population::new(PopulationConfig::default(), 4, &mut rng).unwrap();
    ///
    /// for _ in 0..10 {
    ///     population.evaluate_fitness(|g| g.chromosome()[0].abs()).unwrap();
    ///     if let Err(e) = population.epoch(&mut rng) {
    ///         eprintln!("{}", e);
    ///         break;
    ///     }
    /// }
    /// assert_eq!(population.generation(), 10);
    /// ```
    pub fn epoch<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), PopulationError> {
        let (fittest, best_fitness, total_fitness) = self.tally_fitness()?;
        let offspring = OffspringFactory::new(&self.genomes, total_fitness, &self.config, rng)
            .generate_offspring()?;

        self.genomes = offspring;
        self.generation += 1;
        self.fittest = Some(fittest);
        self.best_fitness = best_fitness;
        self.total_fitness = total_fitness;
        self.record_fitness = self.record_fitness.max(best_fitness);

        info!(
            generation = self.generation,
            best_fitness = self.best_fitness,
            total_fitness = self.total_fitness,
            "new generation"
        );
        Ok(())
    }

    /// Returns the fittest genome, its fitness and the
    /// total fitness of the current generation.
    fn tally_fitness(&self) -> Result<(GenomeId, f64, f64), PopulationError> {
        if self.genomes.is_empty() {
            return Err(PopulationError::Empty);
        }
        if let Some(i) = self.genomes.iter().position(|g| !g.is_evaluated()) {
            return Err(PopulationError::MissingFitness(GenomeId(i)));
        }

        let mut total = 0.0;
        let mut best = (0, f64::MIN);
        for (i, genome) in self.genomes.iter().enumerate() {
            total += genome.fitness();
            if genome.fitness() > best.1 {
                best = (i, genome.fitness());
            }
        }
        Ok((GenomeId(best.0), best.1, total))
    }

    /// Replaces every genome with an unevaluated copy of
    /// the genome `id`, filling the population up to its
    /// configured size. Useful to restart a run from a
    /// known-good individual.
    ///
    /// # Errors
    /// Returns an error if no genome has the given ID.
    ///
    /// # Examples
    /// ```
    /// use gann::{GenomeId, Population, PopulationConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(4);
    /// let mut population = Population::new(PopulationConfig::default(), 4, &mut rng).unwrap();
    /// let best = population.genome(GenomeId(7)).unwrap().clone();
    ///
    /// population.fill_with(GenomeId(7)).unwrap();
    /// assert!(population.genomes().all(|g| g.chromosome() == best.chromosome()));
    /// ```
    pub fn fill_with(&mut self, id: GenomeId) -> Result<(), PopulationError> {
        let genome = self
            .genomes
            .get(id.0)
            .ok_or(PopulationError::UnknownGenome(id))?
            .offspring();
        self.genomes = vec![genome; self.config.size.get()];
        Ok(())
    }

    /// Resets the population to a randomized generation 0,
    /// keeping its configuration and chromosome length.
    /// Useful to restart a run that has stopped improving.
    ///
    /// A population whose chromosome length has not been
    /// fixed yet is reset to empty.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.generation = 0;
        self.fittest = None;
        self.best_fitness = 0.0;
        self.total_fitness = 0.0;
        self.record_fitness = 0.0;
        self.randomize(rng);
    }

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.genomes = match self.chromosome_length {
            Some(length) => (0..self.config.size.get())
                .map(|_| Genome::random(length, rng))
                .collect(),
            None => Vec::with_capacity(self.config.size.get()),
        };
    }

    fn check_chromosome(&self, genome: &Genome) -> Result<(), PopulationError> {
        match self.chromosome_length {
            Some(expected) if genome.len() != expected => {
                Err(DimensionError::Chromosome {
                    expected,
                    found: genome.len(),
                }
                .into())
            }
            _ if genome.is_empty() => Err(ConfigurationError::EmptyChromosome.into()),
            _ => Ok(()),
        }
    }

    /// Returns the best evaluated genome of the current
    /// generation, if any has been evaluated.
    pub fn champion(&self) -> Option<&Genome> {
        self.genomes
            .iter()
            .filter(|g| g.is_evaluated())
            .max_by(|g1, g2| {
                g1.fitness()
                    .partial_cmp(&g2.fitness())
                    .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"))
            })
    }

    /// Returns the lifecycle stage of the current generation.
    pub fn state(&self) -> PopulationState {
        let evaluated = self.genomes.iter().filter(|g| g.is_evaluated()).count();
        if self.genomes.is_empty() {
            PopulationState::Empty
        } else if evaluated == 0 {
            PopulationState::Initialized
        } else if evaluated < self.genomes.len() {
            PopulationState::Evaluating
        } else {
            PopulationState::Evaluated
        }
    }

    /// Returns the genome with the given ID.
    pub fn genome(&self, id: GenomeId) -> Option<&Genome> {
        self.genomes.get(id.0)
    }

    /// Returns an iterator over all current genomes,
    /// in ID order.
    pub fn genomes(&self) -> impl Iterator<Item = &Genome> {
        self.genomes.iter()
    }

    /// Returns the number of genomes in the current generation.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Returns `true` if the population holds no genomes.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Returns the number of completed epochs.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the length shared by all chromosomes,
    /// once the first genome exists.
    pub fn chromosome_length(&self) -> Option<usize> {
        self.chromosome_length
    }

    /// Returns the ID the fittest genome held in the
    /// generation last replaced by [`epoch`](Population::epoch).
    ///
    /// The ID indexes that previous generation, not the
    /// current one: after the epoch the same slot holds an
    /// unrelated genome. Use [`champion`](Population::champion)
    /// for the best genome of the current generation.
    pub fn fittest(&self) -> Option<GenomeId> {
        self.fittest
    }

    /// Returns the best fitness of the last generation
    /// tallied by [`epoch`](Population::epoch).
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Returns the summed fitness of the last generation
    /// tallied by [`epoch`](Population::epoch).
    pub fn total_fitness(&self) -> f64 {
        self.total_fitness
    }

    /// Returns the highest fitness ever assigned to any
    /// genome since the population was created or reset.
    pub fn record_fitness(&self) -> f64 {
        self.record_fitness
    }

    /// Returns the population's configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }
}

fn check_fitness(id: GenomeId, value: f64) -> Result<(), PopulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PopulationError::InvalidFitness { id, value })
    }
}
