use std::fmt;

use serde::{Deserialize, Serialize};

use super::SelectionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Train,
    Inference,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Train => f.write_str("train"),
            JobKind::Inference => f.write_str("inference"),
        }
    }
}

/// Base architecture the training node fine-tunes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Mobilenet,
    Efficientnet,
    Resnet,
}

impl ModelType {
    pub const ALL: [ModelType; 3] = [
        ModelType::Mobilenet,
        ModelType::Efficientnet,
        ModelType::Resnet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::Mobilenet => "mobilenet",
            ModelType::Efficientnet => "efficientnet",
            ModelType::Resnet => "resnet",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelType::Mobilenet => "MobileNet",
            ModelType::Efficientnet => "EfficientNet",
            ModelType::Resnet => "ResNet",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ModelType::Mobilenet => ModelType::Efficientnet,
            ModelType::Efficientnet => ModelType::Resnet,
            ModelType::Resnet => ModelType::Mobilenet,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ModelType::Mobilenet => ModelType::Resnet,
            ModelType::Efficientnet => ModelType::Mobilenet,
            ModelType::Resnet => ModelType::Efficientnet,
        }
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown model type '{}' (mobilenet|efficientnet|resnet)", s))
    }
}

/// Body of `POST /train`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub node: String,
    pub model_name: String,
    pub model_type: ModelType,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
}

/// Body of `POST /inference`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    pub node: String,
    pub model_name: String,
    pub image_path: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum JobRequest {
    Train(TrainRequest),
    Inference(InferenceRequest),
}

impl JobRequest {
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Train(_) => JobKind::Train,
            JobRequest::Inference(_) => JobKind::Inference,
        }
    }

    pub fn node(&self) -> &str {
        match self {
            JobRequest::Train(r) => &r.node,
            JobRequest::Inference(r) => &r.node,
        }
    }
}

/// Training fields that live outside the cascading selection.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainForm {
    pub model_name: String,
    pub model_type: ModelType,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
}

impl Default for TrainForm {
    fn default() -> Self {
        Self {
            model_name: String::new(),
            model_type: ModelType::default(),
            epochs: 1,
            batch_size: 32,
            learning_rate: 0.001,
        }
    }
}

impl TrainForm {
    pub fn request_for(&self, selection: &SelectionState) -> TrainRequest {
        TrainRequest {
            node: selection.selected_node.clone().unwrap_or_default(),
            model_name: self.model_name.clone(),
            model_type: self.model_type,
            epochs: self.epochs,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub model_path: String,
    pub output_contents: String,
    pub output_file: String,
    pub report_path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutcome {
    pub predicted_class: String,

    /// `(label, confidence)` pairs in the order the backend sent them.
    #[serde(default)]
    pub output: Vec<(String, f64)>,

    #[serde(default)]
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JobOutcome {
    Train(TrainOutcome),
    Inference(InferenceOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Missing required field; detected before any network call.
    Validation,
    /// A job of the same kind is already in flight.
    Busy,
    /// No response was received.
    Network,
    /// A response arrived carrying a failure.
    Server,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Busy => "busy",
            ErrorKind::Network => "network",
            ErrorKind::Server => "server",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorInfo {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "payload")]
pub enum JobState {
    Pending,
    Succeeded(JobOutcome),
    Failed(ErrorInfo),
}

/// One submission's lifecycle. Timestamps are RFC 3339.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobResult {
    pub kind: JobKind,
    pub state: JobState,
    pub started_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl JobResult {
    pub fn status(&self) -> JobStatus {
        match self.state {
            JobState::Pending => JobStatus::Pending,
            JobState::Succeeded(_) => JobStatus::Succeeded,
            JobState::Failed(_) => JobStatus::Failed,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match &self.state {
            JobState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&JobOutcome> {
        match &self.state {
            JobState::Succeeded(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, JobState::Pending)
    }
}
