//! The seam between the dashboard core and the broker's HTTP API.
//!
//! Everything above this module sees only [`Backend`]; the reqwest transport
//! lives in [`HttpBackend`].

use std::future::Future;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::DashboardConfig;
use crate::model::{InferenceOutcome, InferenceRequest, Node, TrainOutcome, TrainRequest};

mod http_client;

mod normalize;
pub use self::normalize::normalize;

mod types;
pub use self::types::*;

/// Operations the broker exposes to the dashboard.
pub trait Backend {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>, BackendError>>;

    fn list_images(&self) -> impl Future<Output = Result<Vec<String>, BackendError>>;

    /// Raw bytes of an image for previewing; no JSON envelope.
    fn fetch_image(&self, image_path: &str)
    -> impl Future<Output = Result<Vec<u8>, BackendError>>;

    /// The JSON report a node keeps for one of its models.
    fn fetch_report(
        &self,
        node: &str,
        model_name: &str,
    ) -> impl Future<Output = Result<serde_json::Value, BackendError>>;

    fn train(
        &self,
        request: &TrainRequest,
    ) -> impl Future<Output = Result<TrainOutcome, BackendError>>;

    fn infer(
        &self,
        request: &InferenceRequest,
    ) -> impl Future<Output = Result<InferenceOutcome, BackendError>>;
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("nodedash")
            .timeout(config.request_timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Address a browser would use to show the image directly.
    pub fn image_url(&self, image_path: &str) -> String {
        match reqwest::Url::parse(&self.url("/image")) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("imagePath", image_path);
                url.to_string()
            }
            Err(_) => format!("{}/image?imagePath={}", self.base_url, image_path),
        }
    }
}

impl Backend for HttpBackend {
    async fn list_nodes(&self) -> Result<Vec<Node>, BackendError> {
        debug!(base_url = %self.base_url, "GET /nodes");
        let body = self.send(self.client.get(self.url("/nodes"))).await?;
        let resp: NodesResponse = decode(&body, "/nodes")?;
        Ok(resp.nodes)
    }

    async fn list_images(&self) -> Result<Vec<String>, BackendError> {
        debug!(base_url = %self.base_url, "GET /images");
        let body = self.send(self.client.get(self.url("/images"))).await?;
        let resp: ImagesResponse = decode(&body, "/images")?;
        Ok(resp.images)
    }

    async fn fetch_image(&self, image_path: &str) -> Result<Vec<u8>, BackendError> {
        debug!(image_path, "GET /image");
        self.send(
            self.client
                .get(self.url("/image"))
                .query(&[("imagePath", image_path)]),
        )
        .await
    }

    async fn fetch_report(
        &self,
        node: &str,
        model_name: &str,
    ) -> Result<serde_json::Value, BackendError> {
        debug!(node, model_name, "GET /get_json");
        let body = self
            .send(
                self.client
                    .get(self.url("/get_json"))
                    .query(&[("node", node), ("json", model_name)]),
            )
            .await?;
        decode_job(&body, "/get_json")
    }

    async fn train(&self, request: &TrainRequest) -> Result<TrainOutcome, BackendError> {
        debug!(node = %request.node, model = %request.model_name, "POST /train");
        let body = self
            .send(self.client.post(self.url("/train")).json(request))
            .await?;
        decode_train(&body)
    }

    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceOutcome, BackendError> {
        debug!(node = %request.node, model = %request.model_name, image = %request.image_path, "POST /inference");
        let body = self
            .send(self.client.post(self.url("/inference")).json(request))
            .await?;
        decode_job(&body, "/inference")
    }
}

#[cfg(test)]
#[path = "tests/backend/http_backend_tests.rs"]
mod http_backend_tests;
