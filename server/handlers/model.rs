use crate::routes::{json_download_response, not_found, HttpResponse};
use crate::state::{lock, SharedState};

/// `GET /model`: serves the saved model record as a downloadable attachment.
pub fn handle_download(state: &SharedState) -> HttpResponse {
    let path = lock(state).settings.model_path.clone();
    match std::fs::read(&path) {
        Ok(bytes) => {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("model.json");
            json_download_response(bytes, filename)
        }
        Err(_) => not_found(),
    }
}
