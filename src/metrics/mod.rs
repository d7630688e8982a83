pub mod epoch_record;
pub mod training_metrics;

pub use epoch_record::EpochRecord;
pub use training_metrics::{MetricsSnapshot, TrainingMetrics};
