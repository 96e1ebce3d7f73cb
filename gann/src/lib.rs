//! A generational genetic algorithm for evolving the weights
//! of fixed-topology neural networks ("neuroevolution").
//!
//! Genomes are flat weight vectors paired with a fitness score.
//! A [`Population`] holds one generation of them and, once every
//! genome has been evaluated, breeds the next one through elitism,
//! fitness-proportional (roulette-wheel) selection, single-point
//! crossover and per-gene mutation.
//!
//! Fitness can be computed on demand by a [`FitnessProvider`], or
//! reported genome by genome by whatever drives the agents using
//! them. Both deployment shapes share the same [`Population::epoch`].
//! A layered neural network whose weights can be loaded from and
//! snapshotted into a [`Genome`] is supplied by the `gann-nn` crate.
//!
//! # Example usage: Evolution of XOR function approximator, using `gann-nn`
//! ```
//! use gann::{Population, PopulationConfig};
//! use gann_nn::{network_performance, Network, Topology, TruthTable};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(2017);
//! let topology = Topology::new(vec![2, 2, 1]).unwrap();
//! let mut network = Network::new(&topology, &mut rng);
//! let xor = TruthTable::xor();
//!
//! let mut population =
//!     Population::new(PopulationConfig::default(), topology.connection_count(), &mut rng).unwrap();
//!
//! for _ in 0..50 {
//!     population
//!         .evaluate_fitness(|genome| {
//!             network.load(genome).unwrap();
//!             network_performance(&mut network, &xor, false).unwrap().max(0.0)
//!         })
//!         .unwrap();
//!     if let Err(e) = population.epoch(&mut rng) {
//!         eprintln!("{}", e);
//!         break;
//!     }
//! }
//! println!("best fitness: {}", population.best_fitness());
//! ```
mod errors;
mod genome;
mod populations;
pub mod rng;

pub use errors::DimensionError;
pub use genome::*;
pub use populations::*;
