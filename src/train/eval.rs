use serde::{Deserialize, Serialize};

use crate::data::sample::Sample;
use crate::error::Result;
use crate::loss::mse::MseLoss;
use crate::network::network::Network;

/// Classification quality of a network over a held-out set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub samples: usize,
    /// Fraction of samples whose output argmax equals the target argmax.
    pub accuracy: f64,
    pub mean_loss: f64,
}

/// Index of the maximum element in a slice; ties go to the later index and an
/// empty slice yields `0`.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Argmax accuracy and mean MSE over `samples`, without training and without
/// touching the network's metrics.
pub fn evaluate(network: &Network, samples: &[Sample]) -> Result<Evaluation> {
    let mut correct = 0usize;
    let mut total_loss = 0.0;

    for sample in samples {
        let output = network.predict(&sample.input)?;
        total_loss += MseLoss::loss(&output, &sample.target);
        if argmax(&output) == argmax(&sample.target) {
            correct += 1;
        }
    }

    let n = samples.len();
    Ok(Evaluation {
        samples: n,
        accuracy: if n == 0 { 0.0 } else { correct as f64 / n as f64 },
        mean_loss: if n == 0 { 0.0 } else { total_loss / n as f64 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::config::NetworkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn argmax_indexes_largest_value() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn evaluation_is_read_only() {
        let net = Network::with_rng(NetworkConfig::new(2, 4, 2), &mut StdRng::seed_from_u64(3)).unwrap();
        let samples = vec![
            Sample::new(vec![0.0, 1.0], vec![0.0, 1.0]),
            Sample::new(vec![1.0, 0.0], vec![1.0, 0.0]),
        ];

        let eval = evaluate(&net, &samples).unwrap();

        assert_eq!(eval.samples, 2);
        assert!((0.0..=1.0).contains(&eval.accuracy));
        assert!(eval.mean_loss > 0.0);
        assert_eq!(net.metrics().total_samples(), 0);
    }

    #[test]
    fn empty_set_scores_zero() {
        let net = Network::with_rng(NetworkConfig::new(1, 1, 1), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(evaluate(&net, &[]).unwrap().accuracy, 0.0);
    }
}
