use serde_json::Value;

use super::BackendError;
use crate::model::{ErrorInfo, ErrorKind};

/// Collapses every backend failure shape into the dashboard's error taxonomy.
pub fn normalize(err: BackendError) -> ErrorInfo {
    match err {
        BackendError::Transport { message } => ErrorInfo::new(ErrorKind::Network, message),
        BackendError::Status { status, body } => {
            ErrorInfo::new(ErrorKind::Server, server_message(status, &body))
        }
        BackendError::Reported { message } => ErrorInfo::new(ErrorKind::Server, message),
        BackendError::Decode { message } => ErrorInfo::new(ErrorKind::Unknown, message),
    }
}

fn server_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("server returned {}", status);
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => ["error", "message"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| Value::Object(map).to_string()),
        Ok(other) => other.to_string(),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/backend/normalize_tests.rs"]
mod normalize_tests;
