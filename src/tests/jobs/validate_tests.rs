use super::*;

use crate::model::{ErrorKind, InferenceRequest, TrainForm, TrainRequest};

fn train(node: &str, model_name: &str) -> JobRequest {
    JobRequest::Train(TrainRequest {
        node: node.to_string(),
        model_name: model_name.to_string(),
        ..TrainForm::default().request_for(&Default::default())
    })
}

fn infer(node: &str, model: &str, image: &str) -> JobRequest {
    JobRequest::Inference(InferenceRequest {
        node: node.to_string(),
        model_name: model.to_string(),
        image_path: image.to_string(),
    })
}

#[test]
fn node_is_required_for_every_kind() {
    assert_eq!(validate(&train("", "m")).unwrap_err().message, "Node is not set.");
    assert_eq!(
        validate(&infer("", "m", "i.jpg")).unwrap_err().kind,
        ErrorKind::Validation
    );
}

#[test]
fn train_needs_a_model_name() {
    let err = validate(&train("node0", "")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Model name is required.");
    assert!(validate(&train("node0", "  ")).is_err());
    assert!(validate(&train("node0", "cats")).is_ok());
}

#[test]
fn train_hyperparameters_must_be_usable() {
    let mut req = TrainForm::default().request_for(&Default::default());
    req.node = "node0".to_string();
    req.model_name = "cats".to_string();

    let mut bad = req.clone();
    bad.epochs = 0;
    assert!(validate(&JobRequest::Train(bad)).is_err());

    let mut bad = req.clone();
    bad.batch_size = 0;
    assert!(validate(&JobRequest::Train(bad)).is_err());

    let mut bad = req.clone();
    bad.learning_rate = f64::NAN;
    assert!(validate(&JobRequest::Train(bad)).is_err());

    assert!(validate(&JobRequest::Train(req)).is_ok());
}

#[test]
fn inference_needs_model_and_image() {
    assert_eq!(
        validate(&infer("node0", "", "i.jpg")).unwrap_err().message,
        "Model is not selected."
    );
    assert_eq!(
        validate(&infer("node0", "test", "")).unwrap_err().message,
        "Image is not selected."
    );
    assert!(validate(&infer("node0", "test", "i.jpg")).is_ok());
}
