use super::errors::TopologyError;

use serde::{Deserialize, Serialize};

use std::convert::TryFrom;

/// The layer sizes of a network, input layer first,
/// not counting bias neurons.
///
/// A topology has at least an input and an output
/// layer, and no empty layers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(Vec<usize>);

impl Topology {
    /// Validates and wraps the given layer sizes.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::{Topology, TopologyError};
    ///
    /// let topology = Topology::new(vec![2, 2, 1]).unwrap();
    /// assert_eq!(topology.input_count(), 2);
    /// assert_eq!(topology.output_count(), 1);
    ///
    /// assert_eq!(Topology::new(vec![3]), Err(TopologyError::TooFewLayers(1)));
    /// assert_eq!(Topology::new(vec![3, 0, 1]), Err(TopologyError::EmptyLayer(1)));
    /// ```
    pub fn new(layers: Vec<usize>) -> Result<Topology, TopologyError> {
        if layers.len() < 2 {
            return Err(TopologyError::TooFewLayers(layers.len()));
        }
        if let Some(i) = layers.iter().position(|n| *n == 0) {
            return Err(TopologyError::EmptyLayer(i));
        }
        Ok(Topology(layers))
    }

    /// Returns the size of each layer.
    pub fn layers(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of layers.
    pub fn layer_count(&self) -> usize {
        self.0.len()
    }

    /// Returns the size of the input layer.
    pub fn input_count(&self) -> usize {
        self.0[0]
    }

    /// Returns the size of the output layer.
    pub fn output_count(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Returns the total number of connections of a
    /// network with this topology, which is also the
    /// length of its weight vector. Every neuron of a
    /// layer, bias included, connects to every non-bias
    /// neuron of the next one.
    ///
    /// # Examples
    /// ```
    /// use gann_nn::Topology;
    ///
    /// let topology = Topology::new(vec![2, 2, 1]).unwrap();
    /// assert_eq!(topology.connection_count(), (2 + 1) * 2 + (2 + 1) * 1);
    /// ```
    pub fn connection_count(&self) -> usize {
        self.0.windows(2).map(|w| (w[0] + 1) * w[1]).sum()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = TopologyError;

    fn try_from(layers: Vec<usize>) -> Result<Topology, TopologyError> {
        Topology::new(layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_counts() {
        assert_eq!(Topology::new(vec![2, 2, 1]).unwrap().connection_count(), 9);
        assert_eq!(Topology::new(vec![4, 4, 3]).unwrap().connection_count(), 35);
        assert_eq!(Topology::new(vec![1, 1]).unwrap().connection_count(), 2);
    }

    #[test]
    fn serde_validates() {
        let topology: Topology = serde_json::from_str("[4, 4, 3]").unwrap();
        assert_eq!(topology.layers(), &[4, 4, 3]);
        assert_eq!(serde_json::to_string(&topology).unwrap(), "[4,4,3]");
        assert!(serde_json::from_str::<Topology>("[4, 0, 3]").is_err());
        assert!(serde_json::from_str::<Topology>("[]").is_err());
    }
}
