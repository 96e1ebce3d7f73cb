use crate::{Genome, GenomeId};

use ahash::RandomState;

use std::collections::HashMap;

/// A source of fitness values for the genomes
/// of a population.
///
/// Implementors either compute fitness on demand
/// (e.g. by loading the genome into a private network
/// and scoring it), or hand back values reported by
/// agents that were driven by the genome elsewhere.
pub trait FitnessProvider {
    /// Returns the fitness of `genome`, or `None` if no
    /// value is available for it yet.
    ///
    /// Returned values should be finite and non-negative,
    /// with higher meaning better.
    fn fitness(&mut self, id: GenomeId, genome: &Genome) -> Option<f64>;
}

/// Adapts a plain evaluation function into a
/// [`FitnessProvider`].
pub(super) struct EvaluatorFn<E>(pub(super) E);

impl<E> FitnessProvider for EvaluatorFn<E>
where
    E: FnMut(&Genome) -> f64,
{
    fn fitness(&mut self, _id: GenomeId, genome: &Genome) -> Option<f64> {
        Some((self.0)(genome))
    }
}

/// Collects fitness values reported by externally
/// driven agents during an evaluation episode.
///
/// Reports are consumed when the population
/// reads them.
///
/// # Examples
/// ```
/// use gann::{GenomeId, Population, PopulationConfig, ReportedFitness};
/// use rand::{rngs::StdRng, SeedableRng};
/// use std::num::NonZeroUsize;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let config = PopulationConfig {
///     size: NonZeroUsize::new(2).unwrap(),
///     ..PopulationConfig::default()
/// };
/// let mut population = Population::new(config, 3, &mut rng).unwrap();
///
/// let mut reports = ReportedFitness::new();
/// reports.report(GenomeId(0), 1.5);
/// reports.report(GenomeId(1), 0.5);
/// population.evaluate_with(&mut reports).unwrap();
///
/// assert_eq!(population.genome(GenomeId(0)).unwrap().fitness(), 1.5);
/// assert!(reports.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReportedFitness {
    reports: HashMap<GenomeId, f64, RandomState>,
}

impl ReportedFitness {
    /// Returns an empty report collection.
    pub fn new() -> ReportedFitness {
        ReportedFitness::default()
    }

    /// Records the fitness an agent achieved with the
    /// genome `id`, replacing any earlier report for it.
    pub fn report(&mut self, id: GenomeId, fitness: f64) {
        self.reports.insert(id, fitness);
    }

    /// Returns the number of pending reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns `true` if there are no pending reports.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Discards all pending reports.
    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

impl FitnessProvider for ReportedFitness {
    fn fitness(&mut self, id: GenomeId, _genome: &Genome) -> Option<f64> {
        self.reports.remove(&id)
    }
}
