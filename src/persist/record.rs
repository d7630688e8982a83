use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;
use crate::network::params::Parameters;

/// Schema version written by this crate.
pub const RECORD_VERSION: u32 = 1;

fn unversioned() -> u32 {
    1
}

/// On-disk form of a trained network.
///
/// Records written before versioning existed carry no `version` key and are
/// read as version 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(default = "unversioned")]
    pub version: u32,
    pub weights_in: Matrix,
    pub weights_out: Matrix,
    pub bias_hidden: Matrix,
    pub bias_output: Matrix,
    pub learning_rate: f64,
}

impl ModelRecord {
    /// Validates the record and converts it into a parameter set.
    ///
    /// The error string describes why the record cannot be used.
    pub fn into_parameters(self) -> Result<Parameters, String> {
        if self.version > RECORD_VERSION {
            return Err(format!(
                "record version {} is newer than supported version {}",
                self.version, RECORD_VERSION
            ));
        }
        let params = Parameters {
            weights_in: self.weights_in,
            weights_out: self.weights_out,
            bias_hidden: self.bias_hidden,
            bias_output: self.bias_output,
            learning_rate: self.learning_rate,
        };
        params.check_consistency()?;
        Ok(params)
    }
}

impl From<&Parameters> for ModelRecord {
    fn from(params: &Parameters) -> Self {
        ModelRecord {
            version: RECORD_VERSION,
            weights_in: params.weights_in.clone(),
            weights_out: params.weights_out.clone(),
            bias_hidden: params.bias_hidden.clone(),
            bias_output: params.bias_output.clone(),
            learning_rate: params.learning_rate,
        }
    }
}
