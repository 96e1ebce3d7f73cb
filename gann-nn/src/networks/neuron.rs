use super::connection::Connection;

use gann::rng::rand_unit;
use rand::Rng;

/// Overall learning rate, [0.0..1.0].
pub const LEARNING_RATE: f64 = 0.15;
/// Fraction of the last weight change carried into the next, [0.0..n].
pub const MOMENTUM: f64 = 0.5;

/// A single unit of a layer.
///
/// Neurons own their _outgoing_ connections, one per
/// non-bias neuron of the next layer, addressed by that
/// neuron's index. Incoming weights are therefore found
/// in the previous layer, at this neuron's own index.
#[derive(Clone, Debug)]
pub struct Neuron {
    index: usize,
    output: f64,
    gradient: f64,
    connections: Vec<Connection>,
}

impl Neuron {
    /// Creates a neuron at position `index` of its layer,
    /// with `connection_count` outgoing connections whose
    /// weights are drawn from `[0, 1)`.
    pub(super) fn new<R: Rng + ?Sized>(connection_count: usize, index: usize, rng: &mut R) -> Neuron {
        Neuron {
            index,
            output: 0.0,
            gradient: 0.0,
            connections: (0..connection_count)
                .map(|_| Connection::new(rand_unit(rng)))
                .collect(),
        }
    }

    /// Returns the neuron's position within its layer.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the neuron's last output value.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Returns the neuron's last computed error gradient.
    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    /// Returns the neuron's outgoing connections.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub(super) fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    pub(super) fn set_output(&mut self, output: f64) {
        self.output = output;
    }

    /// Sums the previous layer's weighted outputs,
    /// bias included, and applies the transfer function.
    pub(super) fn feed_forward(&mut self, previous: &[Neuron]) {
        let sum: f64 = previous
            .iter()
            .map(|n| n.output * n.connections[self.index].weight)
            .sum();
        self.output = transfer(sum);
    }

    pub(super) fn compute_output_gradient(&mut self, target: f64) {
        let delta = target - self.output;
        self.gradient = delta * transfer_derivative(self.output);
    }

    /// `next` must hold only the next layer's non-bias neurons.
    pub(super) fn compute_hidden_gradient(&mut self, next: &[Neuron]) {
        let dow: f64 = next
            .iter()
            .map(|n| self.connections[n.index].weight * n.gradient)
            .sum();
        self.gradient = dow * transfer_derivative(self.output);
    }

    /// Updates the weights of the connections the previous
    /// layer holds towards this neuron.
    pub(super) fn update_input_weights(&self, previous: &mut [Neuron]) {
        for neuron in previous {
            let connection = &mut neuron.connections[self.index];
            let delta_weight =
                LEARNING_RATE * neuron.output * self.gradient + MOMENTUM * connection.delta_weight;
            connection.delta_weight = delta_weight;
            connection.weight += delta_weight;
        }
    }
}

/// Hyperbolic tangent, output range (-1.0..1.0).
fn transfer(x: f64) -> f64 {
    x.tanh()
}

/// Derivative of tanh, expressed in terms of its output.
fn transfer_derivative(output: f64) -> f64 {
    1.0 - output * output
}
