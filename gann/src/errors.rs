use std::error::Error;
use std::fmt;

/// An error type indicating that a vector's length
/// does not match the size expected by a network
/// or population.
///
/// Calls that return this error leave their
/// receiver untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimensionError {
    /// Input vector length differs from the input layer size.
    Inputs { expected: usize, found: usize },
    /// Target vector length differs from the output layer size.
    Targets { expected: usize, found: usize },
    /// Weight vector length differs from the network's connection count.
    Weights { expected: usize, found: usize },
    /// Genome chromosome length differs from the population's.
    Chromosome { expected: usize, found: usize },
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inputs { expected, found } => write!(
                f,
                "expected {} input values, found {}",
                expected, found
            ),
            Self::Targets { expected, found } => write!(
                f,
                "expected {} target values, found {}",
                expected, found
            ),
            Self::Weights { expected, found } => write!(
                f,
                "expected {} connection weights, found {}",
                expected, found
            ),
            Self::Chromosome { expected, found } => write!(
                f,
                "expected chromosome of length {}, found length {}",
                expected, found
            ),
        }
    }
}

impl Error for DimensionError {}
