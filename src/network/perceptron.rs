use rand::Rng;

use crate::activation::sigmoid::{sigmoid, sigmoid_derivative};
use crate::error::{NnError, Result};
use crate::network::config::DEFAULT_LEARNING_RATE;

/// A single sigmoid neuron with no hidden layer.
///
/// Enough for linearly separable gates such as AND and OR; XOR needs `Network`.
#[derive(Debug, Clone, PartialEq)]
pub struct Perceptron {
    weights: Vec<f64>,
    bias: f64,
    learning_rate: f64,
}

impl Perceptron {
    pub fn new(inputs: usize) -> Perceptron {
        Perceptron::with_rng(inputs, &mut rand::thread_rng())
    }

    /// Weights and bias start uniformly in `[0, 1)`.
    pub fn with_rng<R: Rng + ?Sized>(inputs: usize, rng: &mut R) -> Perceptron {
        Perceptron {
            weights: (0..inputs).map(|_| rng.gen::<f64>()).collect(),
            bias: rng.gen::<f64>(),
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Perceptron {
        self.learning_rate = learning_rate;
        self
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        self.check_len(input)?;
        let z: f64 = input.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>() + self.bias;
        Ok(sigmoid(z))
    }

    /// One delta-rule step towards `target`.
    pub fn train(&mut self, input: &[f64], target: f64) -> Result<()> {
        let output = self.predict(input)?;
        let adjustment = (target - output) * sigmoid_derivative(output) * self.learning_rate;

        for (w, x) in self.weights.iter_mut().zip(input) {
            *w += x * adjustment;
        }
        self.bias += adjustment;
        Ok(())
    }

    fn check_len(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.weights.len() {
            return Err(NnError::DimensionMismatch {
                op: "perceptron input",
                left: (1, self.weights.len()),
                right: (input.len(), 1),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::gates::Gate;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn train_gate(gate: Gate, seed: u64) -> Perceptron {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut p = Perceptron::with_rng(2, &mut rng);
        let samples = gate.samples();
        for _ in 0..20_000 {
            let s = samples.choose(&mut rng).unwrap();
            p.train(&s.input, s.target[0]).unwrap();
        }
        p
    }

    #[test]
    fn learns_and() {
        let p = train_gate(Gate::And, 3);
        for s in Gate::And.samples() {
            assert_eq!(p.predict(&s.input).unwrap().round(), s.target[0], "{:?}", s.input);
        }
    }

    #[test]
    fn learns_or() {
        let p = train_gate(Gate::Or, 4);
        for s in Gate::Or.samples() {
            assert_eq!(p.predict(&s.input).unwrap().round(), s.target[0], "{:?}", s.input);
        }
    }

    #[test]
    fn initial_weights_in_unit_interval() {
        let p = Perceptron::with_rng(5, &mut StdRng::seed_from_u64(0));
        assert_eq!(p.weights().len(), 5);
        assert!(p.weights().iter().chain([p.bias()].iter()).all(|w| (0.0..1.0).contains(w)));
    }

    #[test]
    fn learning_rate_scales_the_step() {
        let base = Perceptron::new(2);
        let mut slow = base.clone().with_learning_rate(0.01);
        let mut fast = base.clone().with_learning_rate(1.0);

        slow.train(&[1.0, 1.0], 0.0).unwrap();
        fast.train(&[1.0, 1.0], 0.0).unwrap();

        let moved = |p: &Perceptron| (p.bias() - base.bias()).abs();
        assert!(moved(&fast) > moved(&slow));
    }

    #[test]
    fn rejects_wrong_arity() {
        let mut p = Perceptron::with_rng(2, &mut StdRng::seed_from_u64(0));
        assert!(matches!(p.predict(&[1.0]), Err(NnError::DimensionMismatch { .. })));
        assert!(p.train(&[1.0, 0.0, 1.0], 1.0).is_err());
    }
}
