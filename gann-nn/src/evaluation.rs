//! Network-based fitness sourcing for `gann` populations.
use crate::{Network, Sample, Topology};

use gann::{
    DimensionError, FitnessProvider, Genome, GenomeId, Population, PopulationConfig,
    PopulationError,
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fixed table of input cases and the outputs
/// expected of a network for each of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TruthTable {
    cases: Vec<Sample>,
}

impl TruthTable {
    pub fn new(cases: Vec<Sample>) -> TruthTable {
        TruthTable { cases }
    }

    /// Builds a table over every combination of `input_count`
    /// binary inputs (as 0.0 and 1.0), most significant input
    /// first, with targets given by `f`.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::TruthTable;
    ///
    /// let and = TruthTable::from_fn(2, |x| vec![x[0] * x[1]]);
    /// let inputs: Vec<_> = and.cases().iter().map(|c| c.inputs.clone()).collect();
    ///
    /// assert_eq!(inputs, vec![
    ///     vec![0.0, 0.0],
    ///     vec![0.0, 1.0],
    ///     vec![1.0, 0.0],
    ///     vec![1.0, 1.0],
    /// ]);
    /// assert_eq!(and.cases()[3].targets, vec![1.0]);
    /// ```
    pub fn from_fn<F>(input_count: usize, mut f: F) -> TruthTable
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        let cases = (0..1usize << input_count)
            .map(|bits| {
                let inputs: Vec<f64> = (0..input_count)
                    .rev()
                    .map(|i| ((bits >> i) & 1) as f64)
                    .collect();
                let targets = f(&inputs);
                Sample { inputs, targets }
            })
            .collect();
        TruthTable { cases }
    }

    /// The exclusive-or of two binary inputs.
    pub fn xor() -> TruthTable {
        TruthTable::from_fn(2, |x| vec![if x[0] == x[1] { 0.0 } else { 1.0 }])
    }

    pub fn cases(&self) -> &[Sample] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Scores a network against a truth table, as the mean of
/// `1 - |target - output|` over every output of every case.
/// An empty table scores 0.
///
/// Scores can be negative for outputs on the wrong side of
/// the target, since outputs range over `(-1, 1)`.
///
/// If `debug` is set, each case's inputs, targets and outputs
/// are emitted as `debug` level tracing events.
///
/// # Errors
/// Returns an error, before evaluating any case, if a
/// case doesn't fit the network.
///
/// # Examples
/// ```
/// use gann_nn::{network_performance, Network, Topology, TruthTable};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let topology = Topology::new(vec![2, 1]).unwrap();
/// let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
/// network.set_connection_weights(&[0.0, 0.0, 0.0]).unwrap();
///
/// // A silent network is off by 1 on two of the four cases.
/// assert_eq!(network_performance(&mut network, &TruthTable::xor(), false), Ok(0.5));
/// ```
pub fn network_performance(
    network: &mut Network,
    table: &TruthTable,
    debug: bool,
) -> Result<f64, DimensionError> {
    for case in table.cases() {
        case.check(network)?;
    }
    if table.is_empty() {
        return Ok(0.0);
    }

    let mut fitness = 0.0;
    let mut count = 0;
    for case in table.cases() {
        network.feed_forward(&case.inputs)?;
        let outputs = network.results();
        for (target, output) in case.targets.iter().zip(&outputs) {
            fitness += 1.0 - (target - output).abs();
            count += 1;
        }
        if debug {
            debug!(
                inputs = ?case.inputs,
                targets = ?case.targets,
                outputs = ?outputs,
                "truth table case"
            );
        }
    }
    Ok(fitness / count as f64)
}

/// A [`FitnessProvider`] that loads each genome into a
/// private network and scores it with a user function.
///
/// Scores are clamped at 0, and genomes whose length doesn't
/// fit the network are left without a fitness.
///
/// # Examples
/// ```
/// use gann_nn::{
///     network_performance, seed_population, Network, NetworkEvaluator, Topology, TruthTable,
/// };
/// use gann::PopulationConfig;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(5);
/// let topology = Topology::new(vec![2, 2, 1]).unwrap();
/// let mut population = seed_population(PopulationConfig::default(), &topology, &mut rng).unwrap();
///
/// let xor = TruthTable::xor();
/// let mut evaluator = NetworkEvaluator::new(Network::new(&topology, &mut rng), |network| {
///     network_performance(network, &xor, false).unwrap_or(0.0)
/// });
///
/// population.evaluate_with(&mut evaluator).unwrap();
/// population.epoch(&mut rng).unwrap();
/// assert_eq!(population.generation(), 1);
/// ```
pub struct NetworkEvaluator<F> {
    network: Network,
    evaluate: F,
}

impl<F> NetworkEvaluator<F>
where
    F: FnMut(&mut Network) -> f64,
{
    pub fn new(network: Network, evaluate: F) -> NetworkEvaluator<F> {
        NetworkEvaluator { network, evaluate }
    }

    /// Returns the network, holding the weights of
    /// the last genome evaluated.
    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }
}

impl<F> FitnessProvider for NetworkEvaluator<F>
where
    F: FnMut(&mut Network) -> f64,
{
    fn fitness(&mut self, _id: GenomeId, genome: &Genome) -> Option<f64> {
        self.network.load(genome).ok()?;
        Some((self.evaluate)(&mut self.network).max(0.0))
    }
}

/// Creates a population whose genomes are snapshots of
/// freshly built networks of the given topology.
///
/// # Errors
/// Returns an error if the configuration is invalid.
pub fn seed_population<R: Rng + ?Sized>(
    config: PopulationConfig,
    topology: &Topology,
    rng: &mut R,
) -> Result<Population, PopulationError> {
    config.validate()?;
    let genomes = (0..config.size.get())
        .map(|_| Network::new(topology, rng).snapshot())
        .collect();
    Population::from_genomes(config, genomes)
}
