use std::error::Error;
use std::fmt;

/// An error type indicating a malformed
/// network topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// Fewer than an input and an output layer.
    TooFewLayers(usize),
    /// The layer at the given index has no neurons.
    EmptyLayer(usize),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLayers(n) => write!(
                f,
                "topology needs at least an input and an output layer, found {} layer(s)",
                n
            ),
            Self::EmptyLayer(i) => write!(f, "topology layer {} has no neurons", i),
        }
    }
}

impl Error for TopologyError {}
