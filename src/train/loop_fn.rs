use std::sync::atomic::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::sample::Sample;
use crate::error::{NnError, Result};
use crate::network::network::Network;
use crate::train::train_config::{SampleOrder, TrainConfig};

/// Trains `network` for up to `config.epochs` passes over `samples` and
/// returns the number of epochs completed.
///
/// Every sample goes through `Network::train`, so the network's metrics see
/// one point per sample. At each epoch boundary the most recent loss and
/// running accuracy are recorded as that epoch's figures. The run is bracketed
/// by `start_training` / `end_training`.
///
/// # Early termination
/// The loop stops after the current epoch if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidDataset` for an empty sample set; any shape error from a sample is
/// propagated and ends the run.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<usize> {
    if samples.is_empty() {
        return Err(NnError::InvalidDataset("no training samples".into()));
    }

    let mut indices: Vec<usize> = (0..samples.len()).collect();
    let mut completed = 0;

    network.metrics_mut().start_training();
    log::info!(
        "training {} samples for {} epochs ({:?} order)",
        samples.len(),
        config.epochs,
        config.order
    );

    let outcome = run_epochs(network, samples, config, rng, &mut indices, &mut completed);

    network.metrics_mut().end_training();
    outcome?;

    log::info!(
        "training finished after {completed} epochs in {} ms",
        network.metrics().training_duration_ms()
    );
    Ok(completed)
}

fn run_epochs<R: Rng + ?Sized>(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainConfig,
    rng: &mut R,
    indices: &mut [usize],
    completed: &mut usize,
) -> Result<()> {
    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            log::warn!("stop requested before epoch {epoch}");
            break;
        }

        if config.order == SampleOrder::Shuffled {
            indices.shuffle(rng);
        }
        for &idx in indices.iter() {
            let sample = &samples[idx];
            network.train(&sample.input, &sample.target)?;
        }

        let metrics = network.metrics_mut();
        let loss = metrics.last_loss().unwrap_or(0.0);
        let accuracy = metrics.last_accuracy();
        let record = metrics.record_epoch(epoch, loss, accuracy);
        *completed = epoch;

        log::debug!(
            "epoch {epoch}/{}: loss {:.6}, running accuracy {:.4}",
            config.epochs,
            loss,
            accuracy.unwrap_or(0.0)
        );

        if let Some(ref tx) = config.progress_tx {
            if tx.send(record).is_err() {
                log::warn!("progress receiver dropped, stopping after epoch {epoch}");
                break;
            }
        }
    }
    Ok(())
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
