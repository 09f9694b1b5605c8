use std::ops::Range;

use ndarray::{ArrayView1, ArrayView2};

use crate::topology::Topology;

/// Maps layer/unit coordinates into offsets of a flat parameter vector.
///
/// The vector holds two contiguous super blocks:
/// 1. One weight block per adjacent layer pair `(k, k + 1)`, each of `sizes[k] * sizes[k + 1]`
///    entries, row major by source unit: the weight from unit `s` to unit `d` is at
///    `s * sizes[k + 1] + d` inside the block.
/// 2. One bias block per layer, input layer included, each of `sizes[j]` entries.
///
/// The input layer's bias block is never read by the forward pass but is part of the stored
/// format, so it is allocated anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    sizes: Vec<usize>,
    // weight_offsets[k] is where block (k, k + 1) starts, the last entry is the weights' length.
    weight_offsets: Vec<usize>,
    // bias_offsets[j] is where layer j's biases start, the last entry is the total length.
    bias_offsets: Vec<usize>,
}

impl Layout {
    /// Creates a new `Layout` precomputing the offset of every block.
    ///
    /// # Arguments
    /// * `topology` - The network topology.
    ///
    /// # Returns
    /// A new `Layout` instance.
    pub fn new(topology: &Topology) -> Self {
        // `Topology::new` refuses sizes whose total length overflows, so these sums can't.
        let sizes = topology.sizes().to_vec();

        let mut weight_offsets = Vec::with_capacity(sizes.len());
        let mut offset = 0;
        weight_offsets.push(offset);
        for pair in sizes.windows(2) {
            offset += pair[0] * pair[1];
            weight_offsets.push(offset);
        }

        let mut bias_offsets = Vec::with_capacity(sizes.len() + 1);
        bias_offsets.push(offset);
        for size in &sizes {
            offset += size;
            bias_offsets.push(offset);
        }

        Self {
            sizes,
            weight_offsets,
            bias_offsets,
        }
    }

    /// The amount of parameters required by the topology.
    pub fn total_len(&self) -> usize {
        self.bias_offsets[self.bias_offsets.len() - 1]
    }

    /// The amount of interlayer weights, which is also where the first bias block starts.
    pub fn weights_len(&self) -> usize {
        self.bias_offsets[0]
    }

    /// The amount of weight blocks, one per adjacent layer pair.
    pub fn num_weight_blocks(&self) -> usize {
        self.sizes.len() - 1
    }

    /// Returns the offset of the weight connecting `src_unit` in `src_layer` to `dst_unit` in
    /// `dst_layer`.
    ///
    /// # Returns
    /// `None` unless `dst_layer == src_layer + 1` and both units exist.
    pub fn weight_index(
        &self,
        src_layer: usize,
        src_unit: usize,
        dst_layer: usize,
        dst_unit: usize,
    ) -> Option<usize> {
        if src_layer.checked_add(1) != Some(dst_layer) || dst_layer >= self.sizes.len() {
            return None;
        }

        let (src_size, dst_size) = (self.sizes[src_layer], self.sizes[dst_layer]);
        if src_unit >= src_size || dst_unit >= dst_size {
            return None;
        }

        Some(self.weight_offsets[src_layer] + src_unit * dst_size + dst_unit)
    }

    /// Returns the offset of the bias of `unit` in `layer`, `None` if the unit doesn't exist.
    pub fn bias_index(&self, layer: usize, unit: usize) -> Option<usize> {
        let size = *self.sizes.get(layer)?;
        if unit >= size {
            return None;
        }

        Some(self.bias_offsets[layer] + unit)
    }

    /// The range covered by the weight block between layers `k` and `k + 1`.
    pub fn weight_range(&self, k: usize) -> Option<Range<usize>> {
        if k >= self.num_weight_blocks() {
            return None;
        }

        Some(self.weight_offsets[k]..self.weight_offsets[k + 1])
    }

    /// The range covered by the bias block of layer `j`.
    pub fn bias_range(&self, j: usize) -> Option<Range<usize>> {
        if j >= self.sizes.len() {
            return None;
        }

        Some(self.bias_offsets[j]..self.bias_offsets[j + 1])
    }

    /// Gives a view of the weight block between layers `k` and `k + 1` as a
    /// `sizes[k] x sizes[k + 1]` matrix, rows indexed by source unit.
    ///
    /// # Returns
    /// `None` if the block doesn't exist or `params` is too short to hold it.
    pub fn weight_block<'a>(&self, params: &'a [f64], k: usize) -> Option<ArrayView2<'a, f64>> {
        let range = self.weight_range(k)?;
        let shape = (self.sizes[k], self.sizes[k + 1]);
        ArrayView2::from_shape(shape, params.get(range)?).ok()
    }

    /// Gives a view of the bias block of layer `j`.
    ///
    /// # Returns
    /// `None` if the layer doesn't exist or `params` is too short to hold it.
    pub fn bias_block<'a>(&self, params: &'a [f64], j: usize) -> Option<ArrayView1<'a, f64>> {
        let range = self.bias_range(j)?;
        Some(ArrayView1::from(params.get(range)?))
    }

    /// Pairs every weight block with the bias block of the layer it feeds, input to output.
    pub fn layers<'a>(
        &'a self,
        params: &'a [f64],
    ) -> impl Iterator<Item = (ArrayView2<'a, f64>, ArrayView1<'a, f64>)> + 'a {
        (0..self.num_weight_blocks()).map_while(move |k| {
            Some((self.weight_block(params, k)?, self.bias_block(params, k + 1)?))
        })
    }
}
