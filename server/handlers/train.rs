use serde_json::json;

use simple_mlp::{ModelStore, Network, NetworkConfig, TrainConfig, train_loop};

use crate::routes::{error_response, json_response, query_get, HttpResponse};
use crate::state::{lock, ServerSettings, SharedState};

/// `GET /train[?epochs=N]`
///
/// Restores the saved model when one exists; otherwise trains a fresh network
/// on the configured gate and saves it. Responds with the metrics snapshot.
pub fn handle(query: &str, state: &SharedState) -> HttpResponse {
    let mut st = lock(state);

    let epochs = match query_get(query, "epochs").map(str::parse::<usize>) {
        None          => st.settings.epochs,
        Some(Ok(n))   => n,
        Some(Err(_))  => return error_response(400, "epochs must be a non-negative integer"),
    };

    match train_or_restore(&st.settings, epochs) {
        Ok((network, restored)) => {
            let body = json!({
                "restored": restored,
                "metrics":  network.metrics().snapshot(),
            });
            st.network = Some(network);
            json_response(200, &body)
        }
        Err(e) => {
            log::error!("training failed: {e}");
            error_response(500, &e.to_string())
        }
    }
}

fn train_or_restore(settings: &ServerSettings, epochs: usize) -> simple_mlp::Result<(Network, bool)> {
    let config = NetworkConfig::new(2, settings.hidden, 1).with_learning_rate(settings.learning_rate);
    let mut network = Network::new(config)?;
    let store = ModelStore::new(&settings.model_path);

    if network.restore(&store)? {
        return Ok((network, true));
    }

    log::info!("training new {} model for {epochs} epochs", settings.gate);
    let train_config = TrainConfig::new(epochs).shuffled();
    train_loop(&mut network, &settings.gate.samples(), &train_config, &mut rand::thread_rng())?;
    network.save(&store)?;
    Ok((network, false))
}
