use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::backend::{Backend, BackendError};
use crate::model::{InferenceOutcome, InferenceRequest, Node, TrainOutcome, TrainRequest};

#[derive(Clone, Debug)]
pub(crate) enum FakeFailure {
    Transport(String),
    Status(u16, String),
}

impl FakeFailure {
    fn into_error(self) -> BackendError {
        match self {
            FakeFailure::Transport(message) => BackendError::Transport { message },
            FakeFailure::Status(status, body) => BackendError::Status { status, body },
        }
    }
}

pub(crate) struct FakeState {
    pub nodes: Result<Vec<Node>, FakeFailure>,
    pub images: Result<Vec<String>, FakeFailure>,
    pub train: Result<TrainOutcome, FakeFailure>,
    pub infer: Result<InferenceOutcome, FakeFailure>,
    pub calls: Vec<String>,
    /// When set, jobs wait for a permit before answering.
    pub gate: Option<Arc<Notify>>,
}

/// In-memory broker that records every call it receives.
#[derive(Clone)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let state = FakeState {
            nodes: Ok(vec![
                Node {
                    name: "node0".to_string(),
                    models: vec!["test".to_string(), "test".to_string()],
                },
                Node {
                    name: "node1".to_string(),
                    models: Vec::new(),
                },
            ]),
            images: Ok(vec!["./images/cat.jpg".to_string()]),
            train: Ok(TrainOutcome {
                model_path: "m.pt".to_string(),
                output_contents: "log".to_string(),
                output_file: "o.txt".to_string(),
                report_path: "r.json".to_string(),
            }),
            infer: Ok(InferenceOutcome {
                predicted_class: "cat".to_string(),
                output: vec![("cat".to_string(), 0.875), ("dog".to_string(), 0.125)],
                timestamp: "2024-01-01T00:00:00".to_string(),
            }),
            calls: Vec::new(),
            gate: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: &str) -> Option<Arc<Notify>> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(call.to_string());
        st.gate.clone()
    }
}

impl Backend for FakeBackend {
    async fn list_nodes(&self) -> Result<Vec<Node>, BackendError> {
        self.record("nodes");
        self.state
            .lock()
            .unwrap()
            .nodes
            .clone()
            .map_err(FakeFailure::into_error)
    }

    async fn list_images(&self) -> Result<Vec<String>, BackendError> {
        self.record("images");
        self.state
            .lock()
            .unwrap()
            .images
            .clone()
            .map_err(FakeFailure::into_error)
    }

    async fn fetch_image(&self, image_path: &str) -> Result<Vec<u8>, BackendError> {
        self.record(&format!("image {}", image_path));
        Ok(vec![0xff, 0xd8, 0xff])
    }

    async fn fetch_report(
        &self,
        node: &str,
        model_name: &str,
    ) -> Result<serde_json::Value, BackendError> {
        self.record(&format!("report {} {}", node, model_name));
        Ok(serde_json::json!({ "epochs": 1 }))
    }

    async fn train(&self, request: &TrainRequest) -> Result<TrainOutcome, BackendError> {
        if let Some(gate) = self.record(&format!("train {}", request.model_name)) {
            gate.notified().await;
        }
        self.state
            .lock()
            .unwrap()
            .train
            .clone()
            .map_err(FakeFailure::into_error)
    }

    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceOutcome, BackendError> {
        if let Some(gate) = self.record(&format!("inference {}", request.model_name)) {
            gate.notified().await;
        }
        self.state
            .lock()
            .unwrap()
            .infer
            .clone()
            .map_err(FakeFailure::into_error)
    }
}
