use crate::rng::rand_unit;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Identifies a genome by its slot in the
/// current generation of a [`Population`].
///
/// Identifiers are only meaningful until the
/// next epoch, which replaces every slot.
///
/// [`Population`]: crate::Population
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenomeId(pub usize);

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A candidate solution: a flat vector of connection
/// weights (the _chromosome_) paired with the fitness
/// it scored during its last evaluation episode.
///
/// Genomes are plain data. They never reference the
/// network whose weights they describe; moving weights
/// in and out of a network is done explicitly by
/// whoever owns that network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    chromosome: Vec<f64>,
    fitness: f64,
    evaluated: bool,
}

impl Genome {
    /// Creates an unevaluated genome with fitness 0
    /// from the given chromosome.
    ///
    /// # Examples
    /// ```
    /// use gann::Genome;
    ///
    /// let genome = Genome::new(vec![0.5, -0.25, 1.0]);
    /// assert_eq!(genome.chromosome(), &[0.5, -0.25, 1.0]);
    /// assert_eq!(genome.fitness(), 0.0);
    /// assert!(!genome.is_evaluated());
    /// ```
    pub fn new(chromosome: Vec<f64>) -> Genome {
        Genome {
            chromosome,
            fitness: 0.0,
            evaluated: false,
        }
    }

    /// Creates an unevaluated genome whose genes are
    /// independently drawn from `[0, 1)`, which is the
    /// same distribution freshly built networks use
    /// for their connection weights.
    pub fn random<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Genome {
        Genome::new((0..length).map(|_| rand_unit(rng)).collect())
    }

    /// Returns the genome's weights.
    pub fn chromosome(&self) -> &[f64] {
        &self.chromosome
    }

    /// Returns the number of genes in the chromosome.
    pub fn len(&self) -> usize {
        self.chromosome.len()
    }

    /// Returns `true` if the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.chromosome.is_empty()
    }

    /// Consumes the genome, returning its weights.
    pub fn into_chromosome(self) -> Vec<f64> {
        self.chromosome
    }

    /// Returns the genome's fitness, or 0 if it
    /// has not been evaluated yet.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Returns whether a fitness value has been assigned
    /// since the genome was created.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Assigns the genome's fitness.
    ///
    /// Validation happens in the population, which
    /// is the only place allowed to call this.
    pub(crate) fn assign_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
        self.evaluated = true;
    }

    pub(crate) fn chromosome_mut(&mut self) -> &mut [f64] {
        &mut self.chromosome
    }

    /// Returns a copy of the chromosome as a fresh,
    /// unevaluated genome.
    pub(crate) fn offspring(&self) -> Genome {
        Genome::new(self.chromosome.clone())
    }
}

impl From<Vec<f64>> for Genome {
    fn from(chromosome: Vec<f64>) -> Genome {
        Genome::new(chromosome)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome {{ fitness: {}, chromosome: [", self.fitness)?;
        for (i, gene) in self.chromosome.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.6}", gene)?;
        }
        write!(f, "] }}")
    }
}
