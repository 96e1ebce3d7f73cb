//! A fixed-topology, fully connected feed-forward network
//! with one bias neuron per layer.
//!
//! Layers are stored as plain vectors of [`Neuron`]s, each
//! knowing its own index within its layer; connections are
//! found by that index rather than by reference, so the network
//! owns its whole neuron graph outright.
//!
//! A network's weights can be exported to and imported from a
//! flat vector, in the canonical chromosome order used by
//! [`gann::Genome`]: layer-major, then neuron-major, then
//! connection-major, skipping the output layer.
mod connection;
mod errors;
mod neuron;
mod topology;

pub use connection::Connection;
pub use errors::TopologyError;
pub use neuron::{Neuron, LEARNING_RATE, MOMENTUM};
pub use topology::Topology;

use gann::{DimensionError, Genome};

use rand::Rng;

/// Fixed output of every bias neuron.
pub const BIAS_OUTPUT: f64 = 1.0;

/// A layered neural network trainable by backpropagation,
/// or evolvable through its weight vector.
#[derive(Clone, Debug)]
pub struct Network {
    layers: Vec<Vec<Neuron>>,
    topology: Topology,
    training_error: f64,
    recent_average_error: f64,
    smoothing_factor: f64,
}

impl Network {
    /// Creates a network with the given topology. Each layer
    /// gets one extra bias neuron, and every connection weight
    /// is drawn independently from `[0, 1)`.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::{Network, Topology, BIAS_OUTPUT};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology::new(vec![2, 2, 1]).unwrap();
    /// let network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
    ///
    /// assert_eq!(network.layer(0).unwrap().len(), 3);
    /// assert_eq!(network.layer(2).unwrap().last().unwrap().output(), BIAS_OUTPUT);
    /// assert_eq!(network.connection_weights().len(), 9);
    /// ```
    pub fn new<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Network {
        let sizes = topology.layers();
        let layers = sizes
            .iter()
            .enumerate()
            .map(|(l, &size)| {
                let outgoing = sizes.get(l + 1).copied().unwrap_or(0);
                let mut layer: Vec<Neuron> =
                    (0..=size).map(|i| Neuron::new(outgoing, i, rng)).collect();
                if let Some(bias) = layer.last_mut() {
                    bias.set_output(BIAS_OUTPUT);
                }
                layer
            })
            .collect();

        Network {
            layers,
            topology: topology.clone(),
            training_error: 0.0,
            recent_average_error: 1.0,
            smoothing_factor: 1.0,
        }
    }

    /// Sets the weight given to the previous running average
    /// when folding a new training error into
    /// [`recent_average_error`](Network::recent_average_error).
    /// Defaults to 1.0.
    pub fn with_smoothing_factor(mut self, smoothing_factor: f64) -> Network {
        self.smoothing_factor = smoothing_factor;
        self
    }

    /// Propagates `inputs` through the network.
    ///
    /// The input layer passes its values through unchanged;
    /// every other non-bias neuron outputs the hyperbolic
    /// tangent of its weighted input sum.
    ///
    /// # Errors
    /// Returns an error, leaving the network untouched, if
    /// `inputs` doesn't match the input layer size.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology::new(vec![2, 1]).unwrap();
    /// let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
    /// network.set_connection_weights(&[0.5, 0.25, 3.0]).unwrap();
    ///
    /// network.feed_forward(&[1.0, 2.0]).unwrap();
    /// assert_eq!(network.results(), vec![(1.0f64 * 0.5 + 2.0 * 0.25 + 1.0 * 3.0).tanh()]);
    ///
    /// assert!(network.feed_forward(&[1.0]).is_err());
    /// ```
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<(), DimensionError> {
        let expected = self.topology.input_count();
        if inputs.len() != expected {
            return Err(DimensionError::Inputs {
                expected,
                found: inputs.len(),
            });
        }

        for (neuron, &input) in self.layers[0].iter_mut().zip(inputs) {
            neuron.set_output(input);
        }
        for l in 1..self.layers.len() {
            let (previous, current) = self.layers.split_at_mut(l);
            let previous = &previous[l - 1];
            let current = &mut current[0];
            let non_bias = current.len() - 1;
            for neuron in &mut current[..non_bias] {
                neuron.feed_forward(previous);
            }
        }
        Ok(())
    }

    /// Adjusts the network's weights towards producing
    /// `targets` for the inputs of the last
    /// [`feed_forward`](Network::feed_forward) call, and
    /// updates the training error counters.
    ///
    /// # Errors
    /// Returns an error, leaving the network untouched, if
    /// `targets` doesn't match the output layer size.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology::new(vec![2, 2, 1]).unwrap();
    /// let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(7));
    ///
    /// network.feed_forward(&[0.0, 1.0]).unwrap();
    /// network.back_propagate(&[1.0]).unwrap();
    /// let first = network.training_error();
    ///
    /// network.feed_forward(&[0.0, 1.0]).unwrap();
    /// network.back_propagate(&[1.0]).unwrap();
    /// assert!(network.training_error() < first);
    /// ```
    pub fn back_propagate(&mut self, targets: &[f64]) -> Result<(), DimensionError> {
        let expected = self.topology.output_count();
        if targets.len() != expected {
            return Err(DimensionError::Targets {
                expected,
                found: targets.len(),
            });
        }
        let last = self.layers.len() - 1;

        let squared_error: f64 = self.layers[last]
            .iter()
            .zip(targets)
            .map(|(neuron, target)| {
                let delta = target - neuron.output();
                delta * delta
            })
            .sum();
        self.training_error = (squared_error / expected as f64).sqrt();
        self.recent_average_error = (self.recent_average_error * self.smoothing_factor
            + self.training_error)
            / (self.smoothing_factor + 1.0);

        for (neuron, &target) in self.layers[last].iter_mut().zip(targets) {
            neuron.compute_output_gradient(target);
        }

        for l in (1..last).rev() {
            let (current, next) = self.layers.split_at_mut(l + 1);
            let next = &next[0];
            let next_non_bias = &next[..next.len() - 1];
            for neuron in current[l].iter_mut() {
                neuron.compute_hidden_gradient(next_non_bias);
            }
        }

        for l in (1..=last).rev() {
            let (previous, current) = self.layers.split_at_mut(l);
            let previous = &mut previous[l - 1];
            let current = &current[0];
            for neuron in &current[..current.len() - 1] {
                neuron.update_input_weights(previous);
            }
        }
        Ok(())
    }

    /// Returns the output layer's values, bias excluded.
    pub fn results(&self) -> Vec<f64> {
        let outputs = &self.layers[self.layers.len() - 1];
        outputs[..outputs.len() - 1]
            .iter()
            .map(Neuron::output)
            .collect()
    }

    /// Returns every layer's output values, bias excluded,
    /// input layer first.
    pub fn layer_outputs(&self) -> Vec<Vec<f64>> {
        self.layers
            .iter()
            .map(|layer| layer[..layer.len() - 1].iter().map(Neuron::output).collect())
            .collect()
    }

    /// Root-mean-square error of the last
    /// [`back_propagate`](Network::back_propagate) call.
    pub fn training_error(&self) -> f64 {
        self.training_error
    }

    /// Running average of the training error, starting at 1.0.
    pub fn recent_average_error(&self) -> f64 {
        self.recent_average_error
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the neurons of layer `index`, bias
    /// neuron last, if the layer exists.
    pub fn layer(&self, index: usize) -> Option<&[Neuron]> {
        self.layers.get(index).map(Vec::as_slice)
    }

    /// Returns all connection weights in chromosome order.
    pub fn connection_weights(&self) -> Vec<f64> {
        let last = self.layers.len() - 1;
        self.layers[..last]
            .iter()
            .flatten()
            .flat_map(|neuron| neuron.connections().iter().map(|c| c.weight))
            .collect()
    }

    /// Overwrites all connection weights, in chromosome order,
    /// and forgets previous weight changes.
    ///
    /// # Errors
    /// Returns an error, leaving the network untouched, if the
    /// number of weights doesn't match the connection count.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology::new(vec![2, 2, 1]).unwrap();
    /// let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
    ///
    /// let weights: Vec<f64> = (0..9).map(|i| i as f64 / 10.0).collect();
    /// network.set_connection_weights(&weights).unwrap();
    /// assert_eq!(network.connection_weights(), weights);
    ///
    /// assert!(network.set_connection_weights(&weights[1..]).is_err());
    /// ```
    pub fn set_connection_weights(&mut self, weights: &[f64]) -> Result<(), DimensionError> {
        let expected = self.topology.connection_count();
        if weights.len() != expected {
            return Err(DimensionError::Weights {
                expected,
                found: weights.len(),
            });
        }

        let last = self.layers.len() - 1;
        let mut weights = weights.iter().copied();
        for neuron in self.layers[..last].iter_mut().flatten() {
            for (connection, weight) in neuron.connections_mut().iter_mut().zip(&mut weights) {
                *connection = Connection::new(weight);
            }
        }
        Ok(())
    }

    /// Captures the network's weights as a fresh,
    /// unevaluated genome.
    pub fn snapshot(&self) -> Genome {
        Genome::new(self.connection_weights())
    }

    /// Loads a genome's chromosome as the network's weights.
    ///
    /// # Errors
    /// Returns an error, leaving the network untouched, if the
    /// chromosome length doesn't match the connection count.
    pub fn load(&mut self, genome: &Genome) -> Result<(), DimensionError> {
        self.set_connection_weights(genome.chromosome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gann::rng::rand_clamped;
    use rand::{rngs::StdRng, SeedableRng};

    fn network(layers: Vec<usize>, seed: u64) -> Network {
        Network::new(
            &Topology::new(layers).unwrap(),
            &mut StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn construction() {
        let network = network(vec![4, 4, 3], 0);
        assert_eq!(network.layer(0).unwrap().len(), 5);
        assert_eq!(network.layer(1).unwrap().len(), 5);
        assert_eq!(network.layer(2).unwrap().len(), 4);
        assert!(network.layer(3).is_none());

        for l in 0..3 {
            let layer = network.layer(l).unwrap();
            assert_eq!(layer.last().unwrap().output(), BIAS_OUTPUT);
            for (i, neuron) in layer.iter().enumerate() {
                assert_eq!(neuron.index(), i);
                let expected = [4, 3, 0][l];
                assert_eq!(neuron.connections().len(), expected);
            }
        }
        assert_eq!(network.connection_weights().len(), 35);
        assert!(network
            .connection_weights()
            .iter()
            .all(|w| (0.0..1.0).contains(w)));
        assert_eq!(network.recent_average_error(), 1.0);
        assert_eq!(network.smoothing_factor(), 1.0);
    }

    #[test]
    fn xor_chromosome_length() {
        let network = network(vec![2, 2, 1], 1);
        assert_eq!(network.connection_weights().len(), 9);
        assert_eq!(network.snapshot().len(), 9);
        assert!(!network.snapshot().is_evaluated());
    }

    #[test]
    fn weight_round_trip() {
        let mut network = network(vec![3, 5, 2], 2);
        for _ in 0..3 {
            network.feed_forward(&[0.1, 0.2, 0.3]).unwrap();
            network.back_propagate(&[1.0, -1.0]).unwrap();
        }
        let weights = network.connection_weights();
        network.set_connection_weights(&weights).unwrap();
        assert_eq!(network.connection_weights(), weights);

        let last = network.layer(0).unwrap()[0].connections()[0];
        assert_eq!(last.delta_weight, 0.0);
    }

    #[test]
    fn load_and_snapshot() {
        let mut source = network(vec![2, 2, 1], 3);
        let mut target = network(vec![2, 2, 1], 4);
        assert_ne!(source.connection_weights(), target.connection_weights());

        target.load(&source.snapshot()).unwrap();
        assert_eq!(source.connection_weights(), target.connection_weights());

        source.feed_forward(&[1.0, 0.0]).unwrap();
        target.feed_forward(&[1.0, 0.0]).unwrap();
        assert_eq!(source.results(), target.results());

        let wrong = Genome::new(vec![0.0; 8]);
        assert_eq!(
            target.load(&wrong),
            Err(DimensionError::Weights {
                expected: 9,
                found: 8
            })
        );
    }

    #[test]
    fn feed_forward_deterministic() {
        let mut network = network(vec![2, 3, 2], 5);
        network.feed_forward(&[0.3, -0.7]).unwrap();
        let first = network.layer_outputs();
        for _ in 0..10 {
            network.feed_forward(&[0.9, 0.9]).unwrap();
            network.feed_forward(&[0.3, -0.7]).unwrap();
            assert_eq!(network.layer_outputs(), first);
        }
    }

    #[test]
    fn output_range() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut network = Network::new(&Topology::new(vec![3, 4, 4, 2]).unwrap(), &mut rng);
        for _ in 0..100 {
            let inputs: Vec<f64> = (0..3).map(|_| rand_clamped(&mut rng) * 3.0).collect();
            network.feed_forward(&inputs).unwrap();
            let outputs = network.layer_outputs();
            assert_eq!(outputs[0], inputs);
            for layer in &outputs[1..] {
                assert!(layer.iter().all(|o| -1.0 < *o && *o < 1.0));
            }
            for l in 0..4 {
                assert_eq!(network.layer(l).unwrap().last().unwrap().output(), BIAS_OUTPUT);
            }
        }
    }

    #[test]
    fn training_error_decreases() {
        let mut network = network(vec![2, 2, 1], 8);
        let mut previous = f64::INFINITY;
        for _ in 0..8 {
            network.feed_forward(&[0.0, 1.0]).unwrap();
            network.back_propagate(&[1.0]).unwrap();
            assert!(network.training_error() < previous);
            previous = network.training_error();
        }
    }

    #[test]
    fn recent_average_error_smoothing() {
        let mut network = network(vec![1, 1], 9).with_smoothing_factor(3.0);
        network.set_connection_weights(&[0.0, 0.0]).unwrap();
        network.feed_forward(&[1.0]).unwrap();
        network.back_propagate(&[0.5]).unwrap();

        assert_eq!(network.training_error(), 0.5);
        assert_eq!(network.recent_average_error(), (1.0 * 3.0 + 0.5) / 4.0);
    }

    #[test]
    fn dimension_errors_leave_network_untouched() {
        let mut network = network(vec![2, 2, 1], 10);
        network.feed_forward(&[0.5, 0.5]).unwrap();
        let outputs = network.layer_outputs();
        let weights = network.connection_weights();

        assert_eq!(
            network.feed_forward(&[0.5, 0.5, 0.5]),
            Err(DimensionError::Inputs {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            network.back_propagate(&[]),
            Err(DimensionError::Targets {
                expected: 1,
                found: 0
            })
        );
        assert!(network.set_connection_weights(&[1.0; 10]).is_err());

        assert_eq!(network.layer_outputs(), outputs);
        assert_eq!(network.connection_weights(), weights);
        assert_eq!(network.training_error(), 0.0);
        assert_eq!(network.recent_average_error(), 1.0);
    }
}
