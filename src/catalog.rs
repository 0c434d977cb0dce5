//! Nodes and images fetched from the broker.

use tracing::{info, warn};

use crate::backend::{Backend, BackendError, normalize};
use crate::model::Catalog;

/// Holds the last catalog snapshot.
///
/// A failed load leaves an empty but usable catalog with `load_error` set;
/// nothing retries on its own, callers may simply `load` again.
#[derive(Clone, Debug, Default)]
pub struct ResourceCatalog {
    catalog: Catalog,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<B: Backend>(&mut self, backend: &B) -> &Catalog {
        info!("loading catalog");
        let fetched = async {
            let nodes = backend.list_nodes().await?;
            let images = backend.list_images().await?;
            Ok::<_, BackendError>((nodes, images))
        }
        .await;

        self.catalog = match fetched {
            Ok((nodes, images)) => {
                info!(nodes = nodes.len(), images = images.len(), "catalog loaded");
                Catalog {
                    nodes,
                    images,
                    loaded: true,
                    load_error: None,
                }
            }
            Err(err) => {
                let info = normalize(err);
                warn!(kind = %info.kind, message = %info.message, "catalog load failed");
                Catalog {
                    nodes: Vec::new(),
                    images: Vec::new(),
                    loaded: true,
                    load_error: Some(info),
                }
            }
        };
        &self.catalog
    }

    pub fn snapshot(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.loaded
    }
}

impl From<Catalog> for ResourceCatalog {
    fn from(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod catalog_tests;
