use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub(crate) fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub(crate) fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub(crate) fn node_not_found(node: &str) -> Response {
    not_found(&format!("Node '{}' not found", node))
}

/// Nodes answer some failures with a bare string rather than JSON.
pub(crate) fn plain(status: StatusCode, msg: &str) -> Response {
    (status, msg.to_string()).into_response()
}
