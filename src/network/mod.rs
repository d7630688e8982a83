pub mod config;
pub mod network;
pub mod params;
pub mod perceptron;

pub use config::{NetworkConfig, DEFAULT_LEARNING_RATE};
pub use network::Network;
pub use params::{GradientStep, Parameters};
pub use perceptron::Perceptron;
