use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::loss::mse::MseLoss;
use crate::metrics::epoch_record::EpochRecord;

/// Read-only copy of everything `TrainingMetrics` tracks.
///
/// The series are cloned when the snapshot is taken; mutating them does not
/// touch the accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub epochs: usize,
    pub total_samples: u64,
    pub correct_predictions: u64,
    pub current_accuracy: f64,
    pub average_accuracy: f64,
    pub average_loss: f64,
    pub final_loss: Option<f64>,
    pub training_duration_ms: u64,
    pub training_duration_seconds: f64,
    pub losses: Vec<f64>,
    pub accuracies: Vec<f64>,
    pub epoch_metrics: Vec<EpochRecord>,
}

/// Bookkeeping for a training run: per-sample loss and accuracy series,
/// prediction counters, epoch records and the wall-clock span of the run.
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    epochs: usize,
    losses: Vec<f64>,
    accuracies: Vec<f64>,
    started_ms: Option<u64>,
    ended_ms: Option<u64>,
    total_samples: u64,
    correct_predictions: u64,
    epoch_metrics: Vec<EpochRecord>,
}

impl TrainingMetrics {
    pub fn new() -> Self {
        TrainingMetrics::default()
    }

    /// Returns every counter and series to its initial empty state.
    pub fn reset(&mut self) {
        *self = TrainingMetrics::default();
    }

    pub fn start_training(&mut self) {
        self.started_ms = Some(now_ms());
    }

    pub fn end_training(&mut self) {
        self.ended_ms = Some(now_ms());
    }

    pub fn record_loss(&mut self, loss: f64) {
        self.losses.push(loss);
    }

    pub fn record_accuracy(&mut self, accuracy: f64) {
        self.accuracies.push(accuracy);
    }

    /// Marks the end of epoch `epoch`.
    ///
    /// The loss (and accuracy, when given) also land in the running series so
    /// that averages cover both per-sample and per-epoch points.
    pub fn record_epoch(&mut self, epoch: usize, loss: f64, accuracy: Option<f64>) -> EpochRecord {
        self.epochs = epoch;
        self.losses.push(loss);
        if let Some(acc) = accuracy {
            self.accuracies.push(acc);
        }
        let record = EpochRecord {
            epoch,
            loss,
            accuracy,
            timestamp_ms: now_ms(),
        };
        self.epoch_metrics.push(record.clone());
        record
    }

    pub fn record_prediction(&mut self, correct: bool) {
        self.total_samples += 1;
        if correct {
            self.correct_predictions += 1;
        }
    }

    pub fn calculate_mse(errors: &[f64]) -> f64 {
        MseLoss::from_errors(errors)
    }

    pub fn average_loss(&self) -> f64 {
        mean(&self.losses)
    }

    pub fn average_accuracy(&self) -> f64 {
        mean(&self.accuracies)
    }

    /// Correct predictions over samples seen; `0` before the first sample.
    pub fn current_accuracy(&self) -> f64 {
        if self.total_samples == 0 {
            return 0.0;
        }
        self.correct_predictions as f64 / self.total_samples as f64
    }

    /// Milliseconds between `start_training` and `end_training` (or now, while
    /// the run is still open). `0` if training never started.
    pub fn training_duration_ms(&self) -> u64 {
        match self.started_ms {
            None => 0,
            Some(start) => self.ended_ms.unwrap_or_else(now_ms).saturating_sub(start),
        }
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn correct_predictions(&self) -> u64 {
        self.correct_predictions
    }

    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    pub fn accuracies(&self) -> &[f64] {
        &self.accuracies
    }

    pub fn epoch_metrics(&self) -> &[EpochRecord] {
        &self.epoch_metrics
    }

    pub fn last_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    pub fn last_accuracy(&self) -> Option<f64> {
        self.accuracies.last().copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let duration_ms = self.training_duration_ms();
        MetricsSnapshot {
            epochs: self.epochs,
            total_samples: self.total_samples,
            correct_predictions: self.correct_predictions,
            current_accuracy: self.current_accuracy(),
            average_accuracy: self.average_accuracy(),
            average_loss: self.average_loss(),
            final_loss: self.last_loss(),
            training_duration_ms: duration_ms,
            training_duration_seconds: duration_ms as f64 / 1000.0,
            losses: self.losses.clone(),
            accuracies: self.accuracies.clone(),
            epoch_metrics: self.epoch_metrics.clone(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
