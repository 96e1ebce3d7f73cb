use std::fmt;

/// A weighted link from a neuron to one neuron
/// of the next layer.
#[derive(Clone, Copy, PartialEq)]
pub struct Connection {
    pub weight: f64,
    /// Last change applied to `weight`, kept for momentum.
    pub delta_weight: f64,
}

impl Connection {
    /// Creates a new Connection with the specified
    /// weight and no previous change.
    pub fn new(weight: f64) -> Connection {
        Connection {
            weight,
            delta_weight: 0.0,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9} ({:+.9})", self.weight, self.delta_weight)
    }
}
