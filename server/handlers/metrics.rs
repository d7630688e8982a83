use crate::routes::{error_response, json_response, HttpResponse};
use crate::state::{lock, SharedState};

/// `GET /metrics`: snapshot of the current network's training metrics.
pub fn handle(state: &SharedState) -> HttpResponse {
    let st = lock(state);
    match &st.network {
        Some(network) => json_response(200, &network.metrics().snapshot()),
        None => error_response(404, "no model trained yet; call /train first"),
    }
}
