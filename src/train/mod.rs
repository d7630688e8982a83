pub mod eval;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use eval::{argmax, evaluate, Evaluation};
pub use loop_fn::train_loop;
pub use train_config::{SampleOrder, TrainConfig};
pub use trainer::train_stochastic;
