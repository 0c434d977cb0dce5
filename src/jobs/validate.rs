use crate::model::{ErrorInfo, JobRequest};

/// Local checks run before anything reaches the network.
pub fn validate(request: &JobRequest) -> Result<(), ErrorInfo> {
    if request.node().is_empty() {
        return Err(ErrorInfo::validation("Node is not set."));
    }
    match request {
        JobRequest::Train(req) => {
            if req.model_name.trim().is_empty() {
                return Err(ErrorInfo::validation("Model name is required."));
            }
            if req.epochs == 0 {
                return Err(ErrorInfo::validation("Epochs must be at least 1."));
            }
            if req.batch_size == 0 {
                return Err(ErrorInfo::validation("Batch size must be at least 1."));
            }
            if !(req.learning_rate.is_finite() && req.learning_rate > 0.0) {
                return Err(ErrorInfo::validation(
                    "Learning rate must be a positive number.",
                ));
            }
        }
        JobRequest::Inference(req) => {
            if req.model_name.is_empty() {
                return Err(ErrorInfo::validation("Model is not selected."));
            }
            if req.image_path.is_empty() {
                return Err(ErrorInfo::validation("Image is not selected."));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/jobs/validate_tests.rs"]
mod validate_tests;
