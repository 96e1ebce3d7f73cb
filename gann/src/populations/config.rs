use super::errors::ConfigurationError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// How many of the best genomes of a generation are
/// copied unmodified into the next one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Elitism {
    /// A fixed number of genomes.
    Count(usize),
    /// A fraction of the population size, rounded down.
    Rate(f64),
}

impl Elitism {
    /// Returns the number of elite genomes for a
    /// population of the given size.
    ///
    /// # Examples
    /// ```
    /// use gann::Elitism;
    ///
    /// assert_eq!(Elitism::Count(2).count(50), 2);
    /// assert_eq!(Elitism::Rate(0.25).count(10), 2);
    /// ```
    pub fn count(&self, population_size: usize) -> usize {
        match *self {
            Elitism::Count(n) => n,
            Elitism::Rate(rate) => (population_size as f64 * rate).floor() as usize,
        }
    }
}

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked by [`validate`], which every population
/// constructor and deserialization call.
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigData")]
pub struct PopulationConfig {
    /// Number of genomes in every generation.
    pub size: NonZeroUsize,
    /// Chance that two selected parents swap
    /// chromosome segments instead of being cloned.
    pub crossover_rate: f64,
    /// Per-gene chance of being perturbed in a child.
    pub mutation_rate: f64,
    /// Bound on the magnitude of a single gene perturbation.
    pub max_perturbation: f64,
    /// Best genomes copied as-is to the next generation.
    pub elitism: Elitism,
}

/// Unchecked serialized form of a [`PopulationConfig`].
#[derive(Deserialize)]
struct ConfigData {
    size: NonZeroUsize,
    crossover_rate: f64,
    mutation_rate: f64,
    max_perturbation: f64,
    elitism: Elitism,
}

impl TryFrom<ConfigData> for PopulationConfig {
    type Error = ConfigurationError;

    fn try_from(data: ConfigData) -> Result<PopulationConfig, ConfigurationError> {
        let config = PopulationConfig {
            size: data.size,
            crossover_rate: data.crossover_rate,
            mutation_rate: data.mutation_rate,
            max_perturbation: data.max_perturbation,
            elitism: data.elitism,
        };
        config.validate()?;
        Ok(config)
    }
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use gann::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     mutation_rate: 0.1,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 1 is a valid NonZeroUsize.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            crossover_rate: 0.0,
            mutation_rate: 0.0,
            max_perturbation: 0.0,
            elitism: Elitism::Count(0),
        }
    }

    /// Returns the number of elite genomes per generation.
    pub fn elite_count(&self) -> usize {
        self.elitism.count(self.size.get())
    }

    /// Checks that every rate is a probability, the
    /// perturbation bound is a finite non-negative number,
    /// and elitism fits in the population.
    ///
    /// A `crossover_rate` of 0 is valid, and makes every
    /// child a (possibly mutated) clone of a parent.
    ///
    /// # Examples
    /// ```
    /// use gann::{ConfigurationError, PopulationConfig};
    ///
    /// assert!(PopulationConfig::default().validate().is_ok());
    ///
    /// let config = PopulationConfig {
    ///     mutation_rate: 1.5,
    ///     ..PopulationConfig::default()
    /// };
    /// assert!(matches!(
    ///     config.validate(),
    ///     Err(ConfigurationError::RateOutOfRange { name: "mutation_rate", .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        if !self.max_perturbation.is_finite() || self.max_perturbation < 0.0 {
            return Err(ConfigurationError::InvalidPerturbation(
                self.max_perturbation,
            ));
        }
        if let Elitism::Rate(rate) = self.elitism {
            check_rate("elitism", rate)?;
        }
        let elitism = self.elite_count();
        if elitism > self.size.get() {
            return Err(ConfigurationError::ElitismExceedsPopulation {
                elitism,
                size: self.size.get(),
            });
        }
        Ok(())
    }
}

impl Default for PopulationConfig {
    fn default() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 50 is a valid NonZeroUsize.
            size: unsafe { NonZeroUsize::new_unchecked(50) },
            crossover_rate: 0.5,
            mutation_rate: 0.7,
            max_perturbation: 0.5,
            elitism: Elitism::Count(2),
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::RateOutOfRange { name, value })
    }
}
