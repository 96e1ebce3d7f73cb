//! Supervised training of a [`Network`] through
//! backpropagation over labelled samples.
use crate::Network;

use gann::DimensionError;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// An input vector paired with the outputs
/// expected for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl Sample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Sample {
        Sample { inputs, targets }
    }

    /// Checks that the sample fits the network's
    /// input and output layers.
    pub fn check(&self, network: &Network) -> Result<(), DimensionError> {
        let topology = network.topology();
        if self.inputs.len() != topology.input_count() {
            return Err(DimensionError::Inputs {
                expected: topology.input_count(),
                found: self.inputs.len(),
            });
        }
        if self.targets.len() != topology.output_count() {
            return Err(DimensionError::Targets {
                expected: topology.output_count(),
                found: self.targets.len(),
            });
        }
        Ok(())
    }
}

/// Runs one feed-forward and back-propagation step per
/// sample, in order, returning the network's recent
/// average error afterwards.
///
/// # Errors
/// Returns an error, without training on any sample,
/// if any of them doesn't fit the network.
///
/// # Examples
/// ```
/// use gann_nn::{train, Network, Sample, Topology};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let topology = Topology::new(vec![2, 4, 1]).unwrap();
/// let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(11));
/// let samples = [
///     Sample::new(vec![0.0, 0.0], vec![0.0]),
///     Sample::new(vec![0.0, 1.0], vec![1.0]),
///     Sample::new(vec![1.0, 0.0], vec![1.0]),
///     Sample::new(vec![1.0, 1.0], vec![0.0]),
/// ];
///
/// let mut error = 1.0;
/// for _ in 0..2000 {
///     error = train(&mut network, &samples).unwrap();
/// }
/// println!("recent average error: {}", error);
/// ```
pub fn train(network: &mut Network, samples: &[Sample]) -> Result<f64, DimensionError> {
    for sample in samples {
        sample.check(network)?;
    }
    for sample in samples {
        network.feed_forward(&sample.inputs)?;
        network.back_propagate(&sample.targets)?;
        trace!(
            inputs = ?sample.inputs,
            targets = ?sample.targets,
            outputs = ?network.results(),
            error = network.training_error(),
            "trained on sample"
        );
    }
    Ok(network.recent_average_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topology;
    use rand::{rngs::StdRng, SeedableRng};

    fn xor_samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0, 0.0], vec![0.0]),
            Sample::new(vec![0.0, 1.0], vec![1.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0]),
            Sample::new(vec![1.0, 1.0], vec![0.0]),
        ]
    }

    #[test]
    fn rejects_before_training() {
        let topology = Topology::new(vec![2, 2, 1]).unwrap();
        let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
        let weights = network.connection_weights();

        let mut samples = xor_samples();
        samples.push(Sample::new(vec![1.0, 1.0], vec![0.0, 1.0]));
        assert_eq!(
            train(&mut network, &samples),
            Err(DimensionError::Targets {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(network.connection_weights(), weights);

        samples[4] = Sample::new(vec![1.0], vec![0.0]);
        assert_eq!(
            train(&mut network, &samples),
            Err(DimensionError::Inputs {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(network.connection_weights(), weights);
    }

    #[test]
    fn empty_training_set() {
        let topology = Topology::new(vec![2, 2, 1]).unwrap();
        let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(0));
        assert_eq!(train(&mut network, &[]), Ok(1.0));
    }

    #[test]
    fn training_adjusts_weights() {
        let topology = Topology::new(vec![2, 3, 1]).unwrap();
        let mut network = Network::new(&topology, &mut StdRng::seed_from_u64(1));
        let weights = network.connection_weights();
        let error = train(&mut network, &xor_samples()).unwrap();

        assert_ne!(network.connection_weights(), weights);
        assert!(error.is_finite());
        assert!(error < 1.0);
    }

    #[test]
    fn samples_deserialize() {
        let sample: Sample =
            serde_json::from_str(r#"{"inputs": [0.5, 1.0], "targets": [-1.0]}"#).unwrap();
        assert_eq!(sample, Sample::new(vec![0.5, 1.0], vec![-1.0]));
    }
}
