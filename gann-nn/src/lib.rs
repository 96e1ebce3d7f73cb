//! # GANN-NN
//! Layered feed-forward neural networks for the [`gann`] crate's
//! genetic algorithm.
//!
//! A [`Network`] is built from a [`Topology`] and can be trained
//! directly through backpropagation ([`train`]), or evolved by
//! moving its weights in and out of [`gann::Genome`]s with
//! [`Network::load`] and [`Network::snapshot`].
//!
//! Two ways of supplying fitness to a [`gann::Population`] are
//! supported:
//! - self-evaluation, where a [`NetworkEvaluator`] loads each genome
//!   into a private network and scores it, for instance against a
//!   [`TruthTable`] with [`network_performance`];
//! - external reporting, where agents driven by their own networks
//!   report a score for their genome with
//!   [`gann::Population::update_fitness`] or through a
//!   [`gann::ReportedFitness`].
//!
//! # Example usage: Externally driven agents
//! ```
//! use gann::{GenomeId, Population, PopulationConfig};
//! use gann_nn::{Network, Topology};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! let mut rng = StdRng::seed_from_u64(9);
//! let topology = Topology::new(vec![4, 4, 3]).unwrap();
//! let config = PopulationConfig {
//!     size: NonZeroUsize::new(8).unwrap(),
//!     ..PopulationConfig::default()
//! };
//!
//! // Each agent owns its network; the population only sees snapshots.
//! let mut agents: Vec<Network> = (0..8).map(|_| Network::new(&topology, &mut rng)).collect();
//! let mut population = Population::empty(config).unwrap();
//! let ids: Vec<GenomeId> = agents
//!     .iter()
//!     .map(|agent| population.add_genome(agent.snapshot()).unwrap())
//!     .collect();
//!
//! for generation in 0..3 {
//!     for (agent, id) in agents.iter_mut().zip(&ids) {
//!         agent.load(population.genome(*id).unwrap()).unwrap();
//!         agent.feed_forward(&[1.0, 0.0, 0.5, 0.25]).unwrap();
//!         // Reward agents wanting to take the first action.
//!         let score = agent.results()[0].max(0.0) + 0.01;
//!         population.update_fitness(*id, score).unwrap();
//!     }
//!     population.epoch(&mut rng).unwrap();
//!     assert_eq!(population.generation(), generation + 1);
//! }
//! ```
mod evaluation;
pub mod networks;
mod training;

pub use evaluation::{network_performance, seed_population, NetworkEvaluator, TruthTable};
pub use networks::{Network, Topology, TopologyError, BIAS_OUTPUT};
pub use training::{train, Sample};
