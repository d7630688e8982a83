use rand::Rng;

use crate::activation::sigmoid::{sigmoid, sigmoid_derivative};
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::metrics::training_metrics::TrainingMetrics;
use crate::network::config::{check_learning_rate, NetworkConfig};
use crate::network::params::{GradientStep, Parameters};
use crate::persist::store::ModelStore;

/// A fully connected `input -> hidden -> output` network with sigmoid
/// activations, trained one sample at a time.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    params: Parameters,
    metrics: TrainingMetrics,
}

impl Network {
    /// Builds a network with weights drawn from the thread-local RNG.
    pub fn new(config: NetworkConfig) -> Result<Network> {
        Network::with_rng(config, &mut rand::thread_rng())
    }

    /// Builds a network drawing its initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;
        Ok(Network {
            config,
            params: Parameters::random(&config, rng),
            metrics: TrainingMetrics::new(),
        })
    }

    /// Builds a network entirely from a stored record; node counts come from
    /// the record itself.
    pub fn from_store(store: &ModelStore) -> Result<Network> {
        let params = store.load_parameters()?.ok_or_else(|| NnError::PersistenceMissing {
            path: store.path().to_path_buf(),
        })?;
        let (input_nodes, hidden_nodes, output_nodes) = params.node_counts();
        let config = NetworkConfig::new(input_nodes, hidden_nodes, output_nodes)
            .with_learning_rate(params.learning_rate);
        Ok(Network { config, params, metrics: TrainingMetrics::new() })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut TrainingMetrics {
        &mut self.metrics
    }

    pub fn learning_rate(&self) -> f64 {
        self.params.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        check_learning_rate(learning_rate)?;
        self.params.learning_rate = learning_rate;
        self.config.learning_rate = learning_rate;
        Ok(())
    }

    /// Forward pass; returns the output layer as a column matrix.
    pub fn feed_forward(&self, input: &[f64]) -> Result<Matrix> {
        let (_, output) = self.forward(&Matrix::from_vector(input))?;
        Ok(output)
    }

    /// Forward pass flattened to a plain vector.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.feed_forward(input)?.to_vector())
    }

    /// One stochastic gradient step on a single `(input, target)` pair.
    ///
    /// Every replacement matrix is computed before anything is assigned, so a
    /// call that fails on a shape mismatch leaves the network and its metrics
    /// exactly as they were.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        let lr = self.params.learning_rate;
        let inputs = Matrix::from_vector(input);
        let targets = Matrix::from_vector(target);

        let (hidden, output) = self.forward(&inputs)?;
        let output_errors = targets.subtract(&output)?;

        // Output layer.
        let gradients = output_errors
            .hadamard(&output.map(sigmoid_derivative))?
            .scale(lr);
        let weights_out_delta = gradients.multiply(&hidden.transpose())?;

        // Hidden errors flow back through the weights as they were before this step.
        let hidden_errors = self.params.weights_out.transpose().multiply(&output_errors)?;
        let hidden_gradients = hidden_errors
            .hadamard(&hidden.map(sigmoid_derivative))?
            .scale(lr);
        let weights_in_delta = hidden_gradients.multiply(&inputs.transpose())?;

        let next = self.params.apply(&GradientStep {
            weights_in: weights_in_delta,
            weights_out: weights_out_delta,
            bias_hidden: hidden_gradients,
            bias_output: gradients,
        })?;

        self.record_metrics(&output_errors, target, &output);
        self.params = next;
        Ok(())
    }

    /// Writes the current parameters to `store`.
    pub fn save(&self, store: &ModelStore) -> Result<()> {
        store.save_parameters(&self.params)
    }

    /// Replaces the parameters with the record in `store`.
    ///
    /// Returns `Ok(false)` and leaves the network untouched when nothing has
    /// been saved. A record that is unreadable, inconsistent, or shaped for a
    /// different network fails with `PersistenceCorrupt`, also without
    /// touching the network.
    pub fn restore(&mut self, store: &ModelStore) -> Result<bool> {
        let params = match store.load_parameters()? {
            Some(params) => params,
            None => return Ok(false),
        };

        let expected = (self.config.input_nodes, self.config.hidden_nodes, self.config.output_nodes);
        let found = params.node_counts();
        if found != expected {
            return Err(store.corrupt(format!(
                "record is a {}-{}-{} network, expected {}-{}-{}",
                found.0, found.1, found.2, expected.0, expected.1, expected.2
            )));
        }

        self.config.learning_rate = params.learning_rate;
        self.params = params;
        log::info!("restored model from {}", store.path().display());
        Ok(true)
    }

    /// Returns `(hidden, output)` activations for a column input.
    fn forward(&self, inputs: &Matrix) -> Result<(Matrix, Matrix)> {
        let hidden = activate(
            &self.params.weights_in.multiply(inputs)?,
            &self.params.bias_hidden,
        )?;
        let output = activate(
            &self.params.weights_out.multiply(&hidden)?,
            &self.params.bias_output,
        )?;
        Ok((hidden, output))
    }

    fn record_metrics(&mut self, errors: &Matrix, targets: &[f64], outputs: &Matrix) {
        let loss = TrainingMetrics::calculate_mse(&errors.to_vector());
        self.metrics.record_loss(loss);

        // Exact match after rounding every output; strict for one-hot targets.
        let correct = outputs
            .to_vector()
            .iter()
            .zip(targets.iter())
            .all(|(o, t)| o.round() == *t);
        self.metrics.record_prediction(correct);

        let accuracy = self.metrics.current_accuracy();
        self.metrics.record_accuracy(accuracy);
    }
}

fn activate(weighted: &Matrix, bias: &Matrix) -> Result<Matrix> {
    Ok(weighted.add(bias)?.map(sigmoid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(config: NetworkConfig, seed: u64) -> Network {
        Network::with_rng(config, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    /// 1-1-1 network with hand-picked parameters.
    fn tiny() -> Network {
        let mut net = seeded(NetworkConfig::new(1, 1, 1).with_learning_rate(0.5), 0);
        net.params = Parameters {
            weights_in: Matrix::from_vector(&[0.5]),
            weights_out: Matrix::from_vector(&[-0.25]),
            bias_hidden: Matrix::from_vector(&[0.1]),
            bias_output: Matrix::from_vector(&[0.2]),
            learning_rate: 0.5,
        };
        net
    }

    #[test]
    fn forward_matches_hand_computation() {
        let net = tiny();
        let h = sigmoid(0.5 * 2.0 + 0.1);
        let o = sigmoid(-0.25 * h + 0.2);

        let out = net.feed_forward(&[2.0]).unwrap();

        assert_eq!(out.shape(), (1, 1));
        assert!((out.to_vector()[0] - o).abs() < 1e-15);
    }

    #[test]
    fn single_step_matches_hand_computation() {
        let mut net = tiny();
        let (x, t, lr) = (2.0, 1.0, 0.5);
        let (w_in, w_out, b_h, b_o) = (0.5, -0.25, 0.1, 0.2);

        let h = sigmoid(w_in * x + b_h);
        let o = sigmoid(w_out * h + b_o);
        let err = t - o;
        let g_out = lr * err * o * (1.0 - o);
        let hidden_err = w_out * err;
        let g_hidden = lr * hidden_err * h * (1.0 - h);

        net.train(&[x], &[t]).unwrap();

        let p = net.params();
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(p.weights_out.to_vector()[0], w_out + g_out * h));
        assert!(close(p.bias_output.to_vector()[0], b_o + g_out));
        assert!(close(p.weights_in.to_vector()[0], w_in + g_hidden * x));
        assert!(close(p.bias_hidden.to_vector()[0], b_h + g_hidden));
    }

    #[test]
    fn outputs_stay_in_open_unit_interval() {
        let net = seeded(NetworkConfig::new(3, 5, 4), 9);
        for input in [[0.0, 0.0, 0.0], [1e6, -1e6, 3.0], [-50.0, 20.0, 1e-9]] {
            for y in net.predict(&input).unwrap() {
                assert!(y > 0.0 && y < 1.0, "{y}");
            }
        }
    }

    #[test]
    fn wrong_input_length_is_a_dimension_mismatch() {
        let net = seeded(NetworkConfig::new(2, 3, 1), 1);
        let err = net.feed_forward(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, NnError::DimensionMismatch { op: "multiply", .. }));
    }

    #[test]
    fn failed_train_changes_nothing() {
        let mut net = seeded(NetworkConfig::new(2, 3, 1), 1);
        let before = net.params().clone();

        assert!(net.train(&[1.0, 0.0], &[1.0, 0.0]).is_err());
        assert!(net.train(&[1.0], &[1.0]).is_err());

        assert_eq!(net.params(), &before);
        assert_eq!(net.metrics().total_samples(), 0);
        assert!(net.metrics().losses().is_empty());
    }

    #[test]
    fn each_train_call_records_one_sample() {
        let mut net = seeded(NetworkConfig::new(2, 3, 1), 5);

        net.train(&[0.0, 1.0], &[1.0]).unwrap();
        net.train(&[1.0, 1.0], &[0.0]).unwrap();
        net.train(&[1.0, 0.0], &[1.0]).unwrap();

        let m = net.metrics();
        assert_eq!(m.total_samples(), 3);
        assert_eq!(m.losses().len(), 3);
        assert_eq!(m.accuracies().len(), 3);
        assert_eq!(m.last_accuracy(), Some(m.current_accuracy()));
        assert!(m.losses().iter().all(|l| (0.0..1.0).contains(l)));
    }

    #[test]
    fn correctness_requires_every_rounded_output_to_match() {
        let mut net = tiny();
        let out = net.predict(&[2.0]).unwrap()[0];
        let rounded = out.round();

        net.train(&[2.0], &[rounded]).unwrap();
        net.train(&[2.0], &[1.0 - rounded]).unwrap();

        assert_eq!(net.metrics().correct_predictions(), 1);
        assert_eq!(net.metrics().accuracies(), &[1.0, 0.5]);
    }

    #[test]
    fn seeded_construction_is_reproducible() {
        let a = seeded(NetworkConfig::new(4, 6, 2), 77);
        let b = seeded(NetworkConfig::new(4, 6, 2), 77);
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            Network::new(NetworkConfig::new(0, 3, 1)),
            Err(NnError::InvalidConfig(_))
        ));
    }

    #[test]
    fn learning_rate_is_configurable() {
        let mut net = seeded(NetworkConfig::new(2, 2, 1).with_learning_rate(0.3), 2);
        assert_eq!(net.learning_rate(), 0.3);

        net.set_learning_rate(0.05).unwrap();
        assert_eq!(net.learning_rate(), 0.05);
        assert_eq!(net.config().learning_rate, 0.05);
        assert!(net.set_learning_rate(-1.0).is_err());
    }

    #[test]
    fn save_then_restore_reproduces_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        let mut trained = seeded(NetworkConfig::new(2, 3, 1).with_learning_rate(0.37), 3);
        for _ in 0..25 {
            trained.train(&[1.0, 0.0], &[1.0]).unwrap();
        }
        trained.save(&store).unwrap();

        let mut fresh = seeded(NetworkConfig::new(2, 3, 1), 4);
        assert!(fresh.restore(&store).unwrap());

        assert_eq!(fresh.params(), trained.params());
        assert_eq!(fresh.learning_rate(), 0.37);
    }

    #[test]
    fn restore_without_record_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("missing.json"));
        let mut net = seeded(NetworkConfig::new(2, 3, 1), 8);
        let before = net.params().clone();

        assert!(!net.restore(&store).unwrap());
        assert_eq!(net.params(), &before);
    }

    #[test]
    fn restore_rejects_other_architectures() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        seeded(NetworkConfig::new(2, 4, 1), 1).save(&store).unwrap();

        let mut net = seeded(NetworkConfig::new(2, 3, 1), 2);
        let before = net.params().clone();

        let err = net.restore(&store).unwrap_err();
        assert!(matches!(err, NnError::PersistenceCorrupt { .. }));
        assert_eq!(net.params(), &before);
    }

    #[test]
    fn from_store_reads_shape_from_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));

        assert!(matches!(
            Network::from_store(&store),
            Err(NnError::PersistenceMissing { .. })
        ));

        let original = seeded(NetworkConfig::new(5, 2, 3).with_learning_rate(0.2), 6);
        original.save(&store).unwrap();

        let loaded = Network::from_store(&store).unwrap();
        assert_eq!(*loaded.config(), NetworkConfig::new(5, 2, 3).with_learning_rate(0.2));
        assert_eq!(loaded.params(), original.params());
    }
}
