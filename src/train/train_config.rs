use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::metrics::epoch_record::EpochRecord;

/// Order in which an epoch visits the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleOrder {
    /// Dataset order, every epoch.
    #[default]
    Sequential,
    /// A fresh permutation per epoch.
    Shuffled,
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      — total number of full passes over the training data
/// - `order`       — sample visiting order within an epoch
/// - `progress_tx` — optional channel sender; one `EpochRecord` is sent per
///                   completed epoch.  If the receiver is dropped the loop
///                   terminates early.
/// - `stop_flag`   — optional atomic flag; when set to `true` from another
///                   thread the loop terminates after the current epoch.
#[derive(Debug, Default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub order: SampleOrder,
    pub progress_tx: Option<mpsc::Sender<EpochRecord>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with sequential order, no progress
    /// channel and no stop flag.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            ..TrainConfig::default()
        }
    }

    pub fn shuffled(mut self) -> Self {
        self.order = SampleOrder::Shuffled;
        self
    }
}
