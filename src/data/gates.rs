use std::fmt;
use std::str::FromStr;

use crate::data::sample::Sample;

/// Two-input logic gates used as toy datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    And,
    Or,
    Xor,
}

impl Gate {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Gate::And => a && b,
            Gate::Or => a || b,
            Gate::Xor => a ^ b,
        }
    }

    /// The four-row truth table, inputs and targets as 0.0 / 1.0.
    pub fn samples(self) -> Vec<Sample> {
        [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .map(|(a, b)| {
                Sample::new(
                    vec![bit(a), bit(b)],
                    vec![bit(self.apply(a, b))],
                )
            })
            .collect()
    }

    /// Whether a single neuron can represent the gate.
    pub fn is_linearly_separable(self) -> bool {
        !matches!(self, Gate::Xor)
    }
}

fn bit(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gate::And => "and",
            Gate::Or => "or",
            Gate::Xor => "xor",
        };
        f.write_str(name)
    }
}

impl FromStr for Gate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Gate::And),
            "or" => Ok(Gate::Or),
            "xor" => Ok(Gate::Xor),
            other => Err(format!("unknown gate '{other}', expected and, or or xor")),
        }
    }
}
