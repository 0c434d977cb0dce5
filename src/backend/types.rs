//! Wire DTOs and the transport-level error type.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{Node, TrainOutcome};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub images: Vec<String>,
}

/// Failure shapes produced by a [`super::Backend`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No response was received.
    #[error("request failed: {message}")]
    Transport { message: String },

    /// A non-2xx response; `body` is kept verbatim.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body reports an error.
    #[error("{message}")]
    Reported { message: String },

    /// A 2xx response that did not have the expected shape.
    #[error("{message}")]
    Decode { message: String },
}

impl BackendError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        BackendError::Transport { message }
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &[u8], route: &str) -> Result<T, BackendError> {
    serde_json::from_slice(body).map_err(|err| BackendError::Decode {
        message: format!("unexpected response from {}: {}", route, err),
    })
}

/// Decodes a job response, surfacing an `error` member as a reported failure.
pub(super) fn decode_job<T: DeserializeOwned>(body: &[u8], route: &str) -> Result<T, BackendError> {
    let value: Value = decode(body, route)?;
    from_job_value(value, route)
}

/// The broker answers `{"status": ...}` when it stops waiting on the node.
pub(super) fn decode_train(body: &[u8]) -> Result<TrainOutcome, BackendError> {
    let value: Value = decode(body, "/train")?;
    if value.get("model_path").is_none() {
        if let Some(status) = value.get("status").and_then(Value::as_str) {
            return Err(BackendError::Decode {
                message: format!("training did not complete: {}", status),
            });
        }
    }
    from_job_value(value, "/train")
}

fn from_job_value<T: DeserializeOwned>(value: Value, route: &str) -> Result<T, BackendError> {
    if let Some(err) = value.get("error") {
        let message = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(BackendError::Reported { message });
    }
    serde_json::from_value(value).map_err(|err| BackendError::Decode {
        message: format!("unexpected response from {}: {}", route, err),
    })
}
