use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

/// Shape and step size of a one-hidden-layer network.
///
/// Node counts are fixed for the lifetime of a `Network`; the learning rate
/// can be changed afterwards through `Network::set_learning_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_nodes: usize,
    pub hidden_nodes: usize,
    pub output_nodes: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

impl NetworkConfig {
    pub fn new(input_nodes: usize, hidden_nodes: usize, output_nodes: usize) -> Self {
        NetworkConfig {
            input_nodes,
            hidden_nodes,
            output_nodes,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_nodes == 0 || self.hidden_nodes == 0 || self.output_nodes == 0 {
            return Err(NnError::InvalidConfig(format!(
                "node counts must be positive, got {}-{}-{}",
                self.input_nodes, self.hidden_nodes, self.output_nodes
            )));
        }
        check_learning_rate(self.learning_rate)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NnError::InvalidConfig(format!(
            "learning rate must be finite and positive, got {learning_rate}"
        )))
    }
}
