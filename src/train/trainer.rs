use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::sample::Sample;
use crate::error::{NnError, Result};
use crate::network::network::Network;

/// Runs `steps` single-sample updates, each on a sample drawn uniformly at
/// random (with replacement) from `samples`.
///
/// Suited to tiny datasets such as logic gates where "epochs" carry no meaning.
pub fn train_stochastic<R: Rng + ?Sized>(
    network: &mut Network,
    samples: &[Sample],
    steps: usize,
    rng: &mut R,
) -> Result<()> {
    if samples.is_empty() {
        return Err(NnError::InvalidDataset("no training samples".into()));
    }

    network.metrics_mut().start_training();
    let mut outcome = Ok(());
    for _ in 0..steps {
        let Some(sample) = samples.choose(rng) else { break };
        outcome = network.train(&sample.input, &sample.target);
        if outcome.is_err() {
            break;
        }
    }
    network.metrics_mut().end_training();

    if outcome.is_ok() {
        log::info!(
            "{steps} stochastic steps, final loss {:.6}, running accuracy {:.4}",
            network.metrics().last_loss().unwrap_or(0.0),
            network.metrics().current_accuracy()
        );
    }
    outcome
}
