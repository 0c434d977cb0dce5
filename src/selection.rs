//! Cascading node → model → image selection.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::model::{Catalog, ModelSet, SelectionState};

/// A requested change to the selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    SetNode(String),
    /// An empty name clears the model.
    SetModel(String),
    /// An empty path clears the image.
    SetImage(String),
}

impl SelectionState {
    /// Applies `transition`, returning the next state, or `None` when the
    /// transition is rejected.
    pub fn apply(&self, catalog: &Catalog, transition: &Transition) -> Option<SelectionState> {
        match transition {
            Transition::SetNode(name) => {
                let available_models = if name.is_empty() {
                    ModelSet::default()
                } else {
                    catalog.node(name).map(|n| n.model_set()).unwrap_or_default()
                };
                Some(SelectionState {
                    selected_node: non_empty(name),
                    selected_model: available_models.first().map(str::to_string),
                    selected_image: self.selected_image.clone(),
                    available_models,
                })
            }
            Transition::SetModel(name) => {
                if !name.is_empty() && !self.available_models.contains(name) {
                    return None;
                }
                Some(SelectionState {
                    selected_model: non_empty(name),
                    ..self.clone()
                })
            }
            Transition::SetImage(path) => Some(SelectionState {
                selected_image: non_empty(path),
                ..self.clone()
            }),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Owns one session's [`SelectionState`] and publishes every accepted change.
///
/// Transitions run to completion one at a time, so a `SetNode` is always
/// visible before the next `SetModel` is checked.
#[derive(Debug)]
pub struct SelectionController {
    tx: watch::Sender<SelectionState>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SelectionState::default());
        Self { tx }
    }

    pub fn state(&self) -> SelectionState {
        self.tx.borrow().clone()
    }

    /// Receives a notification for every accepted transition.
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.tx.subscribe()
    }

    /// Returns whether the transition was accepted.
    pub fn dispatch(&self, catalog: &Catalog, transition: Transition) -> bool {
        let mut accepted = false;
        self.tx.send_if_modified(|state| match state.apply(catalog, &transition) {
            Some(next) => {
                accepted = true;
                let changed = next != *state;
                *state = next;
                changed
            }
            None => false,
        });
        if accepted {
            debug!(?transition, "selection transition applied");
        } else {
            warn!(?transition, "selection transition rejected");
        }
        accepted
    }

    pub fn set_node(&self, catalog: &Catalog, name: &str) -> bool {
        self.dispatch(catalog, Transition::SetNode(name.to_string()))
    }

    pub fn set_model(&self, catalog: &Catalog, name: &str) -> bool {
        self.dispatch(catalog, Transition::SetModel(name.to_string()))
    }

    pub fn set_image(&self, catalog: &Catalog, path: &str) -> bool {
        self.dispatch(catalog, Transition::SetImage(path.to_string()))
    }

    /// Selects the first catalog node, or clears the node when there is none.
    pub fn catalog_loaded(&self, catalog: &Catalog) {
        let first = catalog
            .first_node()
            .map(|n| n.name.clone())
            .unwrap_or_default();
        self.dispatch(catalog, Transition::SetNode(first));
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod selection_tests;
