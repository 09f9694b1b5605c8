use crate::error::{ConfigErr, Result};

/// The shape of a fully connected network: an input layer, `hidden_layers` hidden layers and an
/// output layer.
///
/// A `Topology` can only be built through [`Topology::new`], so every instance satisfies
/// `sizes.len() == hidden_layers + 2` and has no empty layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    hidden_layers: usize,
    sizes: Vec<usize>,
    max_size: usize,
}

impl Topology {
    /// Creates a new `Topology`.
    ///
    /// # Arguments
    /// * `hidden_layers` - The amount of layers between input and output.
    /// * `sizes` - The amount of units of each layer, input first and output last.
    ///
    /// # Returns
    /// The topology, or a configuration error if the amount of sizes doesn't match
    /// `hidden_layers + 2`, a layer has no units or the parameter vector would be too long to
    /// address.
    pub fn new(hidden_layers: usize, sizes: Vec<usize>) -> Result<Self> {
        let expected = hidden_layers
            .checked_add(2)
            .ok_or(ConfigErr::TopologyTooLarge)?;
        if sizes.len() != expected {
            return Err(ConfigErr::LayerCountMismatch {
                got: sizes.len(),
                expected,
            }
            .into());
        }

        if let Some(layer) = sizes.iter().position(|&size| size == 0) {
            return Err(ConfigErr::EmptyLayer { layer }.into());
        }

        if checked_total_len(&sizes).is_none() {
            return Err(ConfigErr::TopologyTooLarge.into());
        }

        let max_size = sizes.iter().copied().max().unwrap_or_default();

        Ok(Self {
            hidden_layers,
            sizes,
            max_size,
        })
    }

    /// Creates a new `Topology` deriving the hidden layer count from the amount of sizes.
    pub fn from_sizes(sizes: Vec<usize>) -> Result<Self> {
        let hidden_layers = sizes.len().saturating_sub(2);
        Self::new(hidden_layers, sizes)
    }

    pub fn hidden_layers(&self) -> usize {
        self.hidden_layers
    }

    /// The total amount of layers, input and output included.
    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// The amount of units in the given layer, `None` if it doesn't exist.
    pub fn size(&self, layer: usize) -> Option<usize> {
        self.sizes.get(layer).copied()
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// The width of the widest layer, used to size forward pass buffers.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

/// Every interlayer weight plus one bias per unit, `None` if a `Vec<f64>` that long can't exist.
fn checked_total_len(sizes: &[usize]) -> Option<usize> {
    let weights = sizes
        .windows(2)
        .try_fold(0usize, |acc, pair| acc.checked_add(pair[0].checked_mul(pair[1])?))?;

    sizes
        .iter()
        .try_fold(weights, |acc, &size| acc.checked_add(size))
        .filter(|&total| total <= isize::MAX as usize / std::mem::size_of::<f64>())
}
