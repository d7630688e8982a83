use std::f64::consts::E;

/// Largest `f64` strictly below 1.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Logistic sigmoid `1 / (1 + e^-x)`.
///
/// The result is clamped to the open interval `(0, 1)`: for `|x|` beyond
/// roughly 37 the exact expression rounds to 0 or 1 in `f64`.
pub fn sigmoid(x: f64) -> f64 {
    (1.0 / (1.0 + E.powf(-x))).clamp(f64::MIN_POSITIVE, BELOW_ONE)
}

/// Sigmoid derivative expressed on an already-activated value `a = sigmoid(x)`.
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}
