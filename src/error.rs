use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::initialization::RandErr;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, NetErr>;

/// A network could not be built because its description is inconsistent.
#[derive(Debug)]
pub enum ConfigErr {
    LayerCountMismatch { got: usize, expected: usize },
    EmptyLayer { layer: usize },
    NegativeCount { what: &'static str, value: i128 },
    TopologyTooLarge,
    WeightCountMismatch { got: usize, expected: usize },
    UnknownActivation(String),
    InvalidRange(RandErr),
    ParamGenExhausted { got: usize, expected: usize },
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::LayerCountMismatch { got, expected } => write!(
                f,
                "Illegal number of layer sizes, got {got} and expected {expected} (hidden layers + 2)"
            ),
            ConfigErr::EmptyLayer { layer } => {
                write!(f, "Layer {layer} has no units, every layer needs at least one")
            }
            ConfigErr::NegativeCount { what, value } => {
                write!(f, "Illegal {what} {value}, it can't be negative")
            }
            ConfigErr::TopologyTooLarge => {
                f.write_str("The topology requires more parameters than can be addressed")
            }
            ConfigErr::WeightCountMismatch { got, expected } => write!(
                f,
                "Illegal number of weights, got {got} and the topology requires {expected}"
            ),
            ConfigErr::UnknownActivation(tag) => {
                write!(f, "Illegal activation function {tag:?}, expected LINEAR or LOGISTIC")
            }
            ConfigErr::InvalidRange(e) => write!(f, "Invalid initialization range: {e}"),
            ConfigErr::ParamGenExhausted { got, expected } => write!(
                f,
                "The parameter generator ran out after {got} of the {expected} required parameters"
            ),
        }
    }
}

impl Error for ConfigErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigErr::InvalidRange(e) => Some(e),
            _ => None,
        }
    }
}

/// The crate's error type.
#[derive(Debug)]
pub enum NetErr {
    /// The network description is malformed or inconsistent.
    Config(ConfigErr),
    /// The evaluator was called with an input of the wrong width.
    DimensionMismatch { got: usize, expected: usize },
    /// Reading or writing a network file failed.
    Io(io::Error),
    /// The network file is not valid JSON or misses a field.
    Json(serde_json::Error),
}

impl NetErr {
    /// Whether this error was caused by a malformed network description.
    pub fn is_config(&self) -> bool {
        matches!(self, NetErr::Config(_))
    }

    /// Whether this error was caused by an input of the wrong width.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, NetErr::DimensionMismatch { .. })
    }
}

impl Display for NetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetErr::Config(e) => write!(f, "configuration error: {e}"),
            NetErr::DimensionMismatch { got, expected } => write!(
                f,
                "Invalid number of inputs, got {got} and the input layer has {expected} units"
            ),
            NetErr::Io(e) => write!(f, "io error: {e}"),
            NetErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for NetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetErr::Config(e) => Some(e),
            NetErr::Io(e) => Some(e),
            NetErr::Json(e) => Some(e),
            NetErr::DimensionMismatch { .. } => None,
        }
    }
}

impl From<ConfigErr> for NetErr {
    fn from(e: ConfigErr) -> Self {
        Self::Config(e)
    }
}

impl From<RandErr> for NetErr {
    fn from(e: RandErr) -> Self {
        Self::Config(ConfigErr::InvalidRange(e))
    }
}

impl From<io::Error> for NetErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NetErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
