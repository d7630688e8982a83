pub struct MseLoss;

impl MseLoss {
    /// Mean of squared errors; `0` for an empty slice.
    pub fn from_errors(errors: &[f64]) -> f64 {
        if errors.is_empty() {
            return 0.0;
        }
        errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64
    }

    /// Scalar MSE between two equally long vectors: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let errors: Vec<f64> = predicted.iter().zip(expected.iter())
            .map(|(a, b)| a - b)
            .collect();
        MseLoss::from_errors(&errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_errors_have_zero_loss() {
        assert_eq!(MseLoss::from_errors(&[]), 0.0);
    }

    #[test]
    fn symmetric_unit_errors() {
        assert_eq!(MseLoss::from_errors(&[1.0, -1.0]), 1.0);
        assert_eq!(MseLoss::loss(&[0.0, 2.0], &[1.0, 1.0]), 1.0);
    }
}
