use serde::Serialize;

use super::{InferenceRequest, ModelSet};

/// The operator's current node/model/image choice.
///
/// Only `SelectionController` produces new values of this type; when
/// `selected_node` is set, `available_models` is that node's model set and
/// `selected_model` is `None` or one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub selected_node: Option<String>,
    pub selected_model: Option<String>,
    pub selected_image: Option<String>,
    pub available_models: ModelSet,
}

impl SelectionState {
    pub fn inference_request(&self) -> InferenceRequest {
        InferenceRequest {
            node: self.selected_node.clone().unwrap_or_default(),
            model_name: self.selected_model.clone().unwrap_or_default(),
            image_path: self.selected_image.clone().unwrap_or_default(),
        }
    }
}
