use std::io::Read;

use serde::{Deserialize, Serialize};
use tiny_http::Request;

use simple_mlp::train::argmax;
use simple_mlp::{ModelStore, Network, NnError};

use crate::routes::{error_response, json_response, HttpResponse};
use crate::state::{lock, SharedState};

#[derive(Deserialize)]
struct PredictRequest {
    input: Vec<f64>,
}

#[derive(Serialize)]
struct PredictResponse {
    output: Vec<f64>,
    class:  usize,
}

/// `POST /predict` with body `{"input": [..]}`.
///
/// Uses the network from the last `/train` call, falling back to the saved
/// model on disk.
pub fn handle(request: &mut Request, state: &SharedState) -> HttpResponse {
    let mut body = String::new();
    if let Err(e) = request.as_reader().read_to_string(&mut body) {
        return error_response(400, &format!("could not read body: {e}"));
    }
    let req: PredictRequest = match serde_json::from_str(&body) {
        Ok(r)  => r,
        Err(e) => return error_response(400, &format!("invalid request: {e}")),
    };

    let mut st = lock(state);
    if st.network.is_none() {
        let store = ModelStore::new(&st.settings.model_path);
        match Network::from_store(&store) {
            Ok(network) => st.network = Some(network),
            Err(NnError::PersistenceMissing { .. }) => {
                return error_response(409, "no model trained yet; call /train first");
            }
            Err(e) => return error_response(500, &e.to_string()),
        }
    }

    let Some(network) = st.network.as_ref() else {
        return error_response(409, "no model trained yet; call /train first");
    };
    match network.predict(&req.input) {
        Ok(output) => {
            let class = argmax(&output);
            json_response(200, &PredictResponse { output, class })
        }
        Err(e @ NnError::DimensionMismatch { .. }) => error_response(422, &e.to_string()),
        Err(e) => error_response(500, &e.to_string()),
    }
}
