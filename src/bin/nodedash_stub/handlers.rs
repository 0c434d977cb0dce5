use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use nodedash::model::{InferenceOutcome, ModelType, Node, TrainOutcome};

use super::StubState;
use super::http_error::{bad_request, node_not_found, not_found, plain};

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn nodes(State(state): State<Arc<StubState>>) -> Response {
    let nodes = current_nodes(&state).await;
    Json(serde_json::json!({ "nodes": nodes })).into_response()
}

pub(crate) async fn images(State(state): State<Arc<StubState>>) -> Response {
    Json(serde_json::json!({ "images": state.fixtures.images })).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageQuery {
    #[serde(rename = "imagePath")]
    image_path: Option<String>,
}

pub(crate) async fn image(Query(q): Query<ImageQuery>) -> Response {
    let Some(path) = q.image_path else {
        return bad_request("Missing 'imagePath' parameter");
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(_) => not_found("Image not found"),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    node: Option<String>,
    json: Option<String>,
}

pub(crate) async fn get_json(
    State(state): State<Arc<StubState>>,
    Query(q): Query<ReportQuery>,
) -> Response {
    let (Some(node), Some(name)) = (q.node, q.json) else {
        return bad_request("Missing 'node' or 'json' parameter");
    };
    let Some(target) = find_node(&state, &node).await else {
        return node_not_found(&node);
    };
    if !target.models.contains(&name) {
        return not_found(&format!("Report for '{}' not found", name));
    }
    Json(serde_json::json!({
        "node": node,
        "model_name": name,
        "model_path": format!("models/{0}/{0}.pth", name),
        "epochs": 1,
        "classes": state.fixtures.classes,
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrainBody {
    node: String,
    model_name: String,
    model_type: ModelType,
    epochs: u32,
    batch_size: u32,
    learning_rate: f64,
}

pub(crate) async fn train(
    State(state): State<Arc<StubState>>,
    Json(body): Json<TrainBody>,
) -> Response {
    info!(node = %body.node, model = %body.model_name, "train request");
    if find_node(&state, &body.node).await.is_none() {
        return node_not_found(&body.node);
    }
    tokio::time::sleep(state.job_delay).await;

    let name = body.model_name.clone();
    let output_contents = (1..=body.epochs)
        .map(|e| {
            format!(
                "Epoch {}/{} ({}, batch {}, lr {}) done",
                e,
                body.epochs,
                body.model_type.as_str(),
                body.batch_size,
                body.learning_rate
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    state
        .trained
        .write()
        .await
        .entry(body.node.clone())
        .or_default()
        .push(name.clone());

    Json(TrainOutcome {
        model_path: format!("models/{0}/{0}.pth", name),
        output_contents,
        output_file: format!("models/{0}/{0}.txt", name),
        report_path: format!("models/{0}/{0}.json", name),
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InferenceBody {
    node: String,
    model_name: String,
    image_path: String,
}

pub(crate) async fn inference(
    State(state): State<Arc<StubState>>,
    Json(body): Json<InferenceBody>,
) -> Response {
    info!(node = %body.node, model = %body.model_name, image = %body.image_path, "inference request");
    let Some(target) = find_node(&state, &body.node).await else {
        return node_not_found(&body.node);
    };
    if !target.models.contains(&body.model_name) {
        return plain(StatusCode::NOT_FOUND, "model not found");
    }
    tokio::time::sleep(state.job_delay).await;

    let output = score(&state.fixtures.classes, &body.image_path);
    let predicted_class = output
        .first()
        .map(|(label, _)| label.clone())
        .unwrap_or_default();
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(InferenceOutcome {
        predicted_class,
        output,
        timestamp,
    })
    .into_response()
}

async fn current_nodes(state: &StubState) -> Vec<Node> {
    let trained = state.trained.read().await;
    state
        .fixtures
        .nodes
        .iter()
        .map(|n| {
            let mut node = n.clone();
            if let Some(extra) = trained.get(&n.name) {
                node.models.extend(extra.iter().cloned());
            }
            node
        })
        .collect()
}

async fn find_node(state: &StubState, name: &str) -> Option<Node> {
    current_nodes(state).await.into_iter().find(|n| n.name == name)
}

/// Deterministic pseudo-probabilities, highest first.
fn score(classes: &[String], image_path: &str) -> Vec<(String, f64)> {
    let seed = image_path
        .bytes()
        .fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let weights = classes
        .iter()
        .enumerate()
        .map(|(i, _)| 1 + (seed.rotate_left(i as u32 * 7) % 97))
        .collect::<Vec<_>>();
    let total = weights.iter().sum::<u64>() as f64;
    let mut out = classes
        .iter()
        .zip(weights)
        .map(|(c, w)| (c.clone(), w as f64 / total))
        .collect::<Vec<_>>();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}
