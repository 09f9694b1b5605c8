use log::{debug, trace, warn};
use ndarray::{ArrayView1, ArrayView2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    activation::ActFn,
    error::{ConfigErr, NetErr, Result},
    initialization::{ParamGen, RandParamGen},
    layout::Layout,
    topology::Topology,
};

/// The constant input every bias weight is multiplied by.
const BIAS: f64 = 1.0;

/// Training hyperparameters. They are stored and exported along the network but nothing in
/// this crate reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub momentum: f64,
    pub learning_rate: f64,
}

impl NetworkConfig {
    pub fn new(momentum: f64, learning_rate: f64) -> Self {
        Self {
            momentum,
            learning_rate,
        }
    }
}

/// Reusable buffers for a forward pass, each as wide as the widest layer.
///
/// Taking it by `&mut` in [`Network::forward_with`] guarantees no two passes share one.
#[derive(Debug, Clone, Default)]
pub struct Scratch {
    layer_out: Vec<f64>,
    temp_out: Vec<f64>,
}

impl Scratch {
    /// Creates a new `Scratch` able to hold layers of up to `width` units.
    pub fn new(width: usize) -> Self {
        Self {
            layer_out: vec![0.; width],
            temp_out: vec![0.; width],
        }
    }

    /// Grows the buffers if they are narrower than `width`.
    fn fit(&mut self, width: usize) {
        if self.layer_out.len() < width {
            self.layer_out.resize(width, 0.);
            self.temp_out.resize(width, 0.);
        }
    }
}

/// A fully connected feed forward network.
///
/// The topology is fixed at construction and the parameters live in a single flat vector
/// addressed through a [`Layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    topology: Topology,
    layout: Layout,
    act_fn: ActFn,
    config: NetworkConfig,
    params: Vec<f64>,
}

impl Network {
    /// Creates a new `Network` from an explicit parameter vector.
    ///
    /// # Arguments
    /// * `topology` - The layer sizes.
    /// * `act_fn` - The activation applied to every non input unit.
    /// * `config` - Training hyperparameters, stored verbatim.
    /// * `params` - Weights then biases, in [`Layout`] order.
    ///
    /// # Returns
    /// The network, or a configuration error if `params` doesn't have exactly the amount of
    /// parameters the topology requires.
    pub fn from_params(
        topology: Topology,
        act_fn: ActFn,
        config: NetworkConfig,
        params: Vec<f64>,
    ) -> Result<Self> {
        let layout = Layout::new(&topology);
        let expected = layout.total_len();

        if params.len() != expected {
            warn!(got = params.len(), expected = expected; "refusing to build network");
            return Err(ConfigErr::WeightCountMismatch {
                got: params.len(),
                expected,
            }
            .into());
        }

        debug!(
            params = expected, act_fn = act_fn.tag();
            "built network with sizes {:?}", topology.sizes()
        );

        Ok(Self {
            topology,
            layout,
            act_fn,
            config,
            params,
        })
    }

    /// Creates a new `Network` whose parameters are drawn from `param_gen`.
    ///
    /// # Returns
    /// The network, or a configuration error if the generator is exhausted before the whole
    /// parameter vector is filled.
    pub fn with_param_gen<G: ParamGen>(
        topology: Topology,
        act_fn: ActFn,
        config: NetworkConfig,
        mut param_gen: G,
    ) -> Result<Self> {
        let expected = Layout::new(&topology).total_len();
        let mut params = Vec::with_capacity(expected);

        while params.len() < expected {
            match param_gen.sample(expected - params.len()) {
                Some(sample) if !sample.is_empty() => params.extend(sample),
                _ => {
                    return Err(ConfigErr::ParamGenExhausted {
                        got: params.len(),
                        expected,
                    }
                    .into());
                }
            }
        }

        Self::from_params(topology, act_fn, config, params)
    }

    /// Creates a new `Network` with every parameter, unused input biases included, drawn
    /// uniformly from `[-1, 1)`.
    pub fn random<R: Rng>(
        topology: Topology,
        act_fn: ActFn,
        config: NetworkConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let total = Layout::new(&topology).total_len();
        let param_gen = RandParamGen::standard(rng, total)?;
        Self::with_param_gen(topology, act_fn, config, param_gen)
    }

    /// Same as [`Network::random`] with a generator seeded from `seed`.
    pub fn seeded(
        topology: Topology,
        act_fn: ActFn,
        config: NetworkConfig,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(topology, act_fn, config, &mut rng)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }

    pub fn config(&self) -> NetworkConfig {
        self.config
    }

    /// The flat parameter vector.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// The weight from `src_unit` in `src_layer` to `dst_unit` in `dst_layer`.
    pub fn weight(
        &self,
        src_layer: usize,
        src_unit: usize,
        dst_layer: usize,
        dst_unit: usize,
    ) -> Option<f64> {
        let idx = self
            .layout
            .weight_index(src_layer, src_unit, dst_layer, dst_unit)?;
        Some(self.params[idx])
    }

    /// The bias weight of `unit` in `layer`.
    pub fn bias(&self, layer: usize, unit: usize) -> Option<f64> {
        let idx = self.layout.bias_index(layer, unit)?;
        Some(self.params[idx])
    }

    /// The weights between layers `k` and `k + 1`, rows indexed by source unit.
    pub fn weight_block(&self, k: usize) -> Option<ArrayView2<'_, f64>> {
        self.layout.weight_block(&self.params, k)
    }

    /// The bias weights of layer `j`.
    pub fn bias_block(&self, j: usize) -> Option<ArrayView1<'_, f64>> {
        self.layout.bias_block(&self.params, j)
    }

    /// A scratch wide enough for this network.
    pub fn scratch(&self) -> Scratch {
        Scratch::new(self.topology.max_size())
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `inputs` - One value per input unit.
    ///
    /// # Returns
    /// The activations of the output layer, or a dimension mismatch error if the amount of
    /// inputs differs from the input layer's size.
    pub fn forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        let mut scratch = self.scratch();
        self.forward_with(inputs, &mut scratch).map(<[f64]>::to_vec)
    }

    /// Makes a forward pass using the caller's buffers.
    ///
    /// # Returns
    /// A view of `scratch` holding exactly the output layer's activations.
    pub fn forward_with<'s>(
        &self,
        inputs: &[f64],
        scratch: &'s mut Scratch,
    ) -> Result<&'s [f64]> {
        let expected = self.topology.input_size();
        if inputs.len() != expected {
            return Err(NetErr::DimensionMismatch {
                got: inputs.len(),
                expected,
            });
        }

        trace!("forward pass over {} layers", self.topology.num_layers());

        scratch.fit(self.topology.max_size());
        let Scratch {
            layer_out,
            temp_out,
        } = scratch;

        layer_out[..expected].copy_from_slice(inputs);
        let mut last = expected;

        for (w, b) in self.layout.layers(&self.params) {
            let dst = w.ncols();
            for (a, (col, &bias_weight)) in w.columns().into_iter().zip(b).enumerate() {
                let sum = layer_out[..last]
                    .iter()
                    .zip(col)
                    .fold(0., |acc, (x, weight)| acc + x * weight)
                    + BIAS * bias_weight;

                temp_out[a] = self.act_fn.f(sum);
            }

            layer_out[..dst].copy_from_slice(&temp_out[..dst]);
            last = dst;
        }

        Ok(&layer_out[..last])
    }
}
