use serde::{Deserialize, Serialize};

/// One epoch boundary as seen by the metrics accumulator.
///
/// The training loop records one of these after every full pass over the
/// dataset and, when a progress channel is configured in `TrainConfig`,
/// sends a copy to the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Loss reported for this epoch (the most recent per-sample loss).
    pub loss: f64,
    /// Running accuracy at the end of the epoch, when one was available.
    pub accuracy: Option<f64>,
    /// Wall-clock capture time in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}
