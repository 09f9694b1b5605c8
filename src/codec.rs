use std::{fs, io, path::Path};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::{
    activation::ActFn,
    error::{ConfigErr, Result},
    network::{Network, NetworkConfig},
    topology::Topology,
};

const INDENT: &[u8] = b"    ";

/// The stored form of a [`Network`].
///
/// Counts are kept signed and wide so that negative or oversized values reach
/// [`Network::import`] and are reported as configuration errors.
///
/// `weights` holds the whole parameter vector, interlayer weights first and then every bias
/// block. A file without it describes a network to be randomly initialized on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFile {
    #[serde(flatten)]
    pub config: NetworkConfig,
    pub hidden_layers: i128,
    pub activation_function: String,
    pub sizes: Vec<i128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl Network {
    /// Gives the stored form of this network.
    pub fn export(&self) -> NetworkFile {
        let topology = self.topology();

        NetworkFile {
            config: self.config(),
            hidden_layers: topology.hidden_layers() as i128,
            activation_function: self.act_fn().tag().to_string(),
            sizes: topology.sizes().iter().map(|&size| size as i128).collect(),
            weights: Some(self.params().to_vec()),
        }
    }

    /// Builds a network from its stored form, drawing missing weights from the thread rng.
    pub fn import(file: NetworkFile) -> Result<Self> {
        Self::import_with_rng(file, &mut rand::rng())
    }

    /// Builds a network from its stored form.
    ///
    /// # Arguments
    /// * `file` - The stored network.
    /// * `rng` - Only used when `file` has no weights.
    ///
    /// # Returns
    /// The network, or a configuration error if the activation tag is unknown, a count is
    /// negative, the amount of sizes doesn't match the hidden layers or the amount of weights
    /// doesn't match the sizes.
    pub fn import_with_rng<R: Rng>(file: NetworkFile, rng: &mut R) -> Result<Self> {
        let NetworkFile {
            config,
            hidden_layers,
            activation_function,
            sizes,
            weights,
        } = file;

        let act_fn: ActFn = activation_function.parse()?;
        let hidden_layers = to_count("hidden layer count", hidden_layers)?;
        let sizes = sizes
            .into_iter()
            .map(|size| to_count("layer size", size))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let topology = Topology::new(hidden_layers, sizes)?;

        match weights {
            Some(params) => Self::from_params(topology, act_fn, config, params),
            None => {
                debug!("stored network has no weights, initializing them");
                Self::random(topology, act_fn, config, rng)
            }
        }
    }

    /// Serializes the network as JSON indented with four spaces.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.export().serialize(&mut ser)?;

        Ok(String::from_utf8(buf).map_err(io::Error::other)?)
    }

    /// Parses a network from JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        let file: NetworkFile = serde_json::from_str(s)?;
        Self::import(file)
    }

    /// Writes the network to `path`, replacing any previous content.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!("saved network to {}", path.display());
        Ok(())
    }

    /// Reads a network from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("loading network from {}", path.display());
        Self::from_json(&content)
    }
}

/// Converts a stored count into a `usize`.
fn to_count(what: &'static str, value: i128) -> std::result::Result<usize, ConfigErr> {
    if value < 0 {
        return Err(ConfigErr::NegativeCount { what, value });
    }

    usize::try_from(value).map_err(|_| ConfigErr::TopologyTooLarge)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::NetErr;

    fn file(hidden_layers: i128, sizes: Vec<i128>, weights: Option<Vec<f64>>) -> NetworkFile {
        NetworkFile {
            config: NetworkConfig::new(0.9, 0.1),
            hidden_layers,
            activation_function: "LINEAR".to_string(),
            sizes,
            weights,
        }
    }

    #[test]
    fn export_uses_stored_field_names() {
        let topology = Topology::new(0, vec![2, 1]).unwrap();
        let config = NetworkConfig::new(0.5, 0.25);
        let net = Network::from_params(topology, ActFn::Sigmoid, config, vec![1., 2., 3., 4., 5.])
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&net.to_json().unwrap()).unwrap();

        assert_eq!(json["momentum"], 0.5);
        assert_eq!(json["learningRate"], 0.25);
        assert_eq!(json["hiddenLayers"], 0);
        assert_eq!(json["activationFunction"], "LOGISTIC");
        assert_eq!(json["sizes"], serde_json::json!([2, 1]));
        assert_eq!(json["weights"], serde_json::json!([1., 2., 3., 4., 5.]));
    }

    #[test]
    fn json_is_indented_with_four_spaces() {
        let topology = Topology::new(0, vec![1, 1]).unwrap();
        let config = NetworkConfig::default();
        let net = Network::from_params(topology, ActFn::Identity, config, vec![0.; 3]).unwrap();

        let json = net.to_json().unwrap();
        assert!(json.contains("\n    \"momentum\""));
    }

    #[test]
    fn import_uses_weights_verbatim() {
        let weights = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let net = Network::import(file(0, vec![2, 1], Some(weights.clone()))).unwrap();

        assert_eq!(net.params(), weights);
        assert_eq!(net.config(), NetworkConfig::new(0.9, 0.1));
    }

    #[test]
    fn import_without_weights_initializes_them() {
        let mut rng = StdRng::seed_from_u64(3);
        let net = Network::import_with_rng(file(1, vec![2, 3, 1], None), &mut rng).unwrap();

        assert_eq!(net.params().len(), net.layout().total_len());
        assert!(net.params().iter().all(|p| (-1.0..1.0).contains(p)));
    }

    #[test]
    fn import_rejects_layer_count_mismatch() {
        let err = Network::import(file(1, vec![2, 1], Some(vec![0.; 5]))).unwrap_err();
        assert!(matches!(
            err,
            NetErr::Config(ConfigErr::LayerCountMismatch { got: 2, expected: 3 })
        ));
    }

    #[test]
    fn import_rejects_weight_count_mismatch() {
        let err = Network::import(file(0, vec![2, 1], Some(vec![0.; 4]))).unwrap_err();
        assert!(matches!(
            err,
            NetErr::Config(ConfigErr::WeightCountMismatch { got: 4, expected: 5 })
        ));
    }

    #[test]
    fn import_rejects_unknown_activation() {
        let mut stored = file(0, vec![2, 1], Some(vec![0.; 5]));
        stored.activation_function = "TANH".to_string();

        let err = Network::import(stored).unwrap_err();
        assert!(matches!(err, NetErr::Config(ConfigErr::UnknownActivation(_))));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = Network::from_json("{\"momentum\": 0.1}").unwrap_err();
        assert!(matches!(err, NetErr::Json(_)));

        let err = Network::from_json("not json").unwrap_err();
        assert!(matches!(err, NetErr::Json(_)));
    }

    #[test]
    fn reads_integer_valued_floats() {
        let json = r#"{
            "momentum": 0,
            "learningRate": 1,
            "hiddenLayers": 0,
            "activationFunction": "LINEAR",
            "sizes": [1, 1],
            "weights": [2, 0, 1]
        }"#;

        let net = Network::from_json(json).unwrap();
        assert_eq!(net.forward(&[3.]).unwrap(), [7.]);
    }

    fn stored(hidden_layers: &str, sizes: &str) -> String {
        format!(
            r#"{{
                "momentum": 0.9,
                "learningRate": 0.1,
                "hiddenLayers": {hidden_layers},
                "activationFunction": "LINEAR",
                "sizes": {sizes},
                "weights": [0, 0, 0]
            }}"#
        )
    }

    #[test]
    fn oversized_hidden_layer_count_is_a_config_error() {
        let err = Network::from_json(&stored("18446744073709551615", "[1, 1]")).unwrap_err();
        assert!(matches!(err, NetErr::Config(ConfigErr::TopologyTooLarge)));
    }

    #[test]
    fn unaddressable_sizes_are_a_config_error() {
        let err = Network::from_json(&stored("0", "[4294967296, 4294967296]")).unwrap_err();
        assert!(matches!(err, NetErr::Config(ConfigErr::TopologyTooLarge)));
    }

    #[test]
    fn negative_counts_are_config_errors() {
        let err = Network::from_json(&stored("-1", "[1, 1]")).unwrap_err();
        assert!(matches!(
            err,
            NetErr::Config(ConfigErr::NegativeCount { value: -1, .. })
        ));

        let err = Network::from_json(&stored("0", "[1, -3]")).unwrap_err();
        assert!(matches!(
            err,
            NetErr::Config(ConfigErr::NegativeCount { value: -3, .. })
        ));
    }

    #[test]
    fn config_is_written_inline_before_the_topology() {
        let topology = Topology::new(0, vec![1, 1]).unwrap();
        let config = NetworkConfig::new(0.75, 0.5);
        let net = Network::from_params(topology, ActFn::Identity, config, vec![0.; 3]).unwrap();

        let json = net.to_json().unwrap();
        let momentum = json.find("\"momentum\": 0.75").unwrap();
        let learning_rate = json.find("\"learningRate\": 0.5").unwrap();
        let hidden_layers = json.find("\"hiddenLayers\"").unwrap();

        assert!(momentum < learning_rate && learning_rate < hidden_layers);
        assert!(!json.contains("\"config\""));
        assert_eq!(Network::from_json(&json).unwrap().config(), config);
    }
}
