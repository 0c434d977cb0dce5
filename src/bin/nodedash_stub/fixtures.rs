use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use nodedash::model::Node;

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Fixtures {
    #[serde(default)]
    pub(crate) nodes: Vec<Node>,
    #[serde(default)]
    pub(crate) images: Vec<String>,
    /// Labels inference answers with.
    #[serde(default = "default_classes")]
    pub(crate) classes: Vec<String>,
}

fn default_classes() -> Vec<String> {
    ["cat", "dog", "bird"].iter().map(|s| s.to_string()).collect()
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            nodes: vec![
                Node {
                    name: "node0".to_string(),
                    models: vec!["test".to_string(), "test".to_string()],
                },
                Node {
                    name: "node1".to_string(),
                    models: Vec::new(),
                },
            ],
            images: vec![
                "./images/cat.jpg".to_string(),
                "./images/dog.png".to_string(),
            ],
            classes: default_classes(),
        }
    }
}

impl Fixtures {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read fixtures {}", path.display()))?;
        let fixtures: Fixtures = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse fixtures {}", path.display()))?;
        if fixtures.classes.is_empty() {
            anyhow::bail!("fixtures {} define no classes", path.display());
        }
        Ok(fixtures)
    }
}
