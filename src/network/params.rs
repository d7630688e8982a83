use rand::Rng;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;

/// The learned state of a network: two weight matrices, two bias columns and
/// the learning rate used to scale gradients.
///
/// Shapes for `input -> hidden -> output`:
/// - `weights_in`  — hidden x input
/// - `weights_out` — output x hidden
/// - `bias_hidden` — hidden x 1
/// - `bias_output` — output x 1
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub weights_in: Matrix,
    pub weights_out: Matrix,
    pub bias_hidden: Matrix,
    pub bias_output: Matrix,
    pub learning_rate: f64,
}

/// Additive deltas for every matrix in a `Parameters` set.
#[derive(Debug, Clone)]
pub struct GradientStep {
    pub weights_in: Matrix,
    pub weights_out: Matrix,
    pub bias_hidden: Matrix,
    pub bias_output: Matrix,
}

impl Parameters {
    /// Draws every weight and bias uniformly from `[-1, 1]`.
    pub fn random<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Parameters {
        let NetworkConfig { input_nodes, hidden_nodes, output_nodes, learning_rate } = *config;
        Parameters {
            weights_in: Matrix::random(hidden_nodes, input_nodes, rng),
            weights_out: Matrix::random(output_nodes, hidden_nodes, rng),
            bias_hidden: Matrix::random(hidden_nodes, 1, rng),
            bias_output: Matrix::random(output_nodes, 1, rng),
            learning_rate,
        }
    }

    /// `(input, hidden, output)` node counts implied by the weight shapes.
    pub fn node_counts(&self) -> (usize, usize, usize) {
        (self.weights_in.cols(), self.weights_in.rows(), self.weights_out.rows())
    }

    /// Returns a new parameter set with `step` added to every matrix.
    pub fn apply(&self, step: &GradientStep) -> Result<Parameters> {
        Ok(Parameters {
            weights_in: self.weights_in.add(&step.weights_in)?,
            weights_out: self.weights_out.add(&step.weights_out)?,
            bias_hidden: self.bias_hidden.add(&step.bias_hidden)?,
            bias_output: self.bias_output.add(&step.bias_output)?,
            learning_rate: self.learning_rate,
        })
    }

    /// Checks that the four matrices agree on one `input -> hidden -> output`
    /// shape and that every value is finite. Returns a description of the first
    /// defect found.
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        let (input, hidden, output) = self.node_counts();
        if input == 0 || hidden == 0 || output == 0 {
            return Err(format!("empty layer in {input}-{hidden}-{output} network"));
        }

        let expected = [
            ("weights_out", &self.weights_out, (output, hidden)),
            ("bias_hidden", &self.bias_hidden, (hidden, 1)),
            ("bias_output", &self.bias_output, (output, 1)),
        ];
        for (name, matrix, shape) in expected {
            if matrix.shape() != shape {
                return Err(format!(
                    "{name} is {}x{}, expected {}x{}",
                    matrix.rows(), matrix.cols(), shape.0, shape.1
                ));
            }
        }

        let all = [
            ("weights_in", &self.weights_in),
            ("weights_out", &self.weights_out),
            ("bias_hidden", &self.bias_hidden),
            ("bias_output", &self.bias_output),
        ];
        for (name, matrix) in all {
            if matrix.data().iter().flatten().any(|x| !x.is_finite()) {
                return Err(format!("{name} contains a non-finite value"));
            }
        }

        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(format!("learning rate {} is not a positive finite number", self.learning_rate));
        }

        Ok(())
    }
}
