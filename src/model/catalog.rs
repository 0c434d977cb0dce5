use serde::{Deserialize, Serialize};

use super::ErrorInfo;

/// A compute target as reported by `GET /nodes`.
///
/// `models` is kept exactly as the backend sent it, duplicates included;
/// use [`Node::model_set`] for the deduplicated view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,

    #[serde(default)]
    pub models: Vec<String>,
}

impl Node {
    pub fn model_set(&self) -> ModelSet {
        ModelSet::from_names(self.models.iter().cloned())
    }
}

/// Deduplicated model names for one node.
///
/// Membership is what matters; the first-seen order is retained only so the
/// first name can serve as the default selection and lists render stably.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModelSet(Vec<String>);

impl ModelSet {
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Self(out)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|m| m == name)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|m| m == name)
    }
}

/// Nodes and images known to the dashboard.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Catalog {
    pub nodes: Vec<Node>,
    pub images: Vec<String>,
    pub loaded: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<ErrorInfo>,
}

impl Catalog {
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn node_position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn image_position(&self, path: &str) -> Option<usize> {
        self.images.iter().position(|i| i == path)
    }
}
