pub mod math;
pub mod activation;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod persist;
pub mod data;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::{NnError, Result};
pub use metrics::{EpochRecord, MetricsSnapshot, TrainingMetrics};
pub use network::{Network, NetworkConfig, Parameters, Perceptron};
pub use persist::{ModelRecord, ModelStore};
pub use data::{Gate, LabelMode, Sample};
pub use train::{evaluate, train_loop, train_stochastic, TrainConfig};
