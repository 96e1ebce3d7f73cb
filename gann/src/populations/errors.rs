use crate::{DimensionError, GenomeId};

use std::error::Error;
use std::fmt;

/// An error type indicating invalid genetic
/// algorithm parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// A probability was outside `[0, 1]`.
    RateOutOfRange { name: &'static str, value: f64 },
    /// The perturbation bound was negative or not finite.
    InvalidPerturbation(f64),
    /// More elite genomes than fit in the population.
    ElitismExceedsPopulation { elitism: usize, size: usize },
    /// Genomes would have no genes to evolve.
    EmptyChromosome,
}

/// An error type indicating that a population
/// operation could not be carried out.
#[derive(Clone, Debug, PartialEq)]
pub enum PopulationError {
    /// The population holds no genomes.
    Empty,
    /// The genome has not been assigned a fitness this generation.
    MissingFitness(GenomeId),
    /// The fitness value was negative or not finite.
    InvalidFitness { id: GenomeId, value: f64 },
    /// No genome exists with the given ID.
    UnknownGenome(GenomeId),
    /// The population already holds its configured number of genomes.
    PopulationFull(usize),
    Dimension(DimensionError),
    Configuration(ConfigurationError),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateOutOfRange { name, value } => {
                write!(f, "{} must be in [0, 1], found {}", name, value)
            }
            Self::InvalidPerturbation(value) => write!(
                f,
                "max_perturbation must be finite and non-negative, found {}",
                value
            ),
            Self::ElitismExceedsPopulation { elitism, size } => write!(
                f,
                "elitism of {} genomes exceeds population size {}",
                elitism, size
            ),
            Self::EmptyChromosome => write!(f, "chromosome length must be non-zero"),
        }
    }
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "attempted evolution on empty population"),
            Self::MissingFitness(id) => write!(f, "genome {} has no fitness assigned", id),
            Self::InvalidFitness { id, value } => {
                write!(f, "invalid fitness {} reported for genome {}", value, id)
            }
            Self::UnknownGenome(id) => write!(f, "no genome with id {}", id),
            Self::PopulationFull(size) => {
                write!(f, "population already holds {} genomes", size)
            }
            Self::Dimension(e) => write!(f, "{}", e),
            Self::Configuration(e) => write!(f, "{}", e),
        }
    }
}

impl Error for ConfigurationError {}

impl Error for PopulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Dimension(e) => Some(e),
            Self::Configuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DimensionError> for PopulationError {
    fn from(e: DimensionError) -> PopulationError {
        PopulationError::Dimension(e)
    }
}

impl From<ConfigurationError> for PopulationError {
    fn from(e: ConfigurationError) -> PopulationError {
        PopulationError::Configuration(e)
    }
}
