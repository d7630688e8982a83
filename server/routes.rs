use std::io::Cursor;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::SharedState;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn with_content_type(response: HttpResponse, content_type: &str) -> HttpResponse {
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_content_type(
            Response::from_data(bytes).with_status_code(StatusCode(status)),
            "application/json",
        ),
        Err(e) => error_response(500, &format!("could not encode response: {e}")),
    }
}

pub fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    with_content_type(
        Response::from_data(body.into_bytes()).with_status_code(StatusCode(status)),
        "application/json",
    )
}

pub fn json_download_response(body: Vec<u8>, filename: &str) -> HttpResponse {
    let response = with_content_type(Response::from_data(body), "application/json");
    let disposition = format!("attachment; filename=\"{}\"", filename);
    match Header::from_bytes(&b"Content-Disposition"[..], disposition.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

pub fn not_found() -> HttpResponse {
    error_response(404, "not found")
}

/// Returns the value of `key` in a `a=1&b=2` query string.
pub fn query_get<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path.to_owned(), query.to_owned()),
        None => (url.clone(), String::new()),
    };

    log::debug!("{} {}", method, url);

    let response = match (method, path.as_str()) {
        (Method::Get,  "/train")   => handlers::train::handle(&query, &state),
        (Method::Get,  "/metrics") => handlers::metrics::handle(&state),
        (Method::Post, "/predict") => handlers::predict::handle(&mut request, &state),
        (Method::Get,  "/model")   => handlers::model::handle_download(&state),
        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response for {}: {}", url, e);
    }
}
