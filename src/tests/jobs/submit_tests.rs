use super::*;

use std::sync::Arc;

use tokio::sync::Notify;

use crate::fake_backend::{FakeBackend, FakeFailure};
use crate::model::{InferenceRequest, JobStatus, TrainForm, TrainOutcome, TrainRequest};

fn train_request(model_name: &str) -> JobRequest {
    JobRequest::Train(TrainRequest {
        node: "node0".to_string(),
        model_name: model_name.to_string(),
        ..TrainForm::default().request_for(&Default::default())
    })
}

fn inference_request() -> JobRequest {
    JobRequest::Inference(InferenceRequest {
        node: "node0".to_string(),
        model_name: "test".to_string(),
        image_path: "./images/cat.jpg".to_string(),
    })
}

#[tokio::test]
async fn validation_failure_never_reaches_the_backend() {
    let fake = FakeBackend::new();
    let submitter = JobSubmitter::new(fake.clone());

    let result = submitter.submit(train_request("")).await;

    assert_eq!(result.status(), JobStatus::Failed);
    assert_eq!(result.error().unwrap().kind, ErrorKind::Validation);
    assert!(fake.calls().is_empty());
    assert_eq!(submitter.result(JobKind::Train), Some(result));
}

#[tokio::test]
async fn train_success_reproduces_the_outcome_fields() {
    let fake = FakeBackend::new();
    let submitter = JobSubmitter::new(fake.clone());

    let result = submitter.submit(train_request("cats")).await;

    assert_eq!(result.status(), JobStatus::Succeeded);
    assert_eq!(
        result.outcome(),
        Some(&JobOutcome::Train(TrainOutcome {
            model_path: "m.pt".to_string(),
            output_contents: "log".to_string(),
            output_file: "o.txt".to_string(),
            report_path: "r.json".to_string(),
        }))
    );
    assert!(result.finished_at.is_some());
    assert_eq!(fake.calls(), vec!["train cats".to_string()]);
}

#[tokio::test]
async fn plain_string_server_failure_is_normalized() {
    let fake = FakeBackend::new().with(|s| {
        s.infer = Err(FakeFailure::Status(404, "model not found".to_string()));
    });
    let submitter = JobSubmitter::new(fake);

    let result = submitter.submit(inference_request()).await;

    let err = result.error().unwrap();
    assert_eq!(err.kind, ErrorKind::Server);
    assert_eq!(err.message, "model not found");
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let fake = FakeBackend::new().with(|s| {
        s.train = Err(FakeFailure::Transport("connection refused".to_string()));
    });
    let submitter = JobSubmitter::new(fake);

    let result = submitter.submit(train_request("cats")).await;
    assert_eq!(result.error().unwrap().kind, ErrorKind::Network);
    assert!(!submitter.is_in_flight(JobKind::Train));
}

#[tokio::test]
async fn second_submission_of_same_kind_is_busy() {
    let gate = Arc::new(Notify::new());
    let fake = FakeBackend::new().with(|s| s.gate = Some(gate.clone()));
    let submitter = JobSubmitter::new(fake.clone());

    let first = submitter.submit(inference_request());
    let second = async {
        while !submitter.is_in_flight(JobKind::Inference) {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            submitter.result(JobKind::Inference).map(|r| r.status()),
            Some(JobStatus::Pending)
        );
        let busy = submitter.submit(inference_request()).await;
        gate.notify_one();
        busy
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(second.error().unwrap().kind, ErrorKind::Busy);
    assert_eq!(first.status(), JobStatus::Succeeded);
    assert_eq!(submitter.result(JobKind::Inference), Some(first));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn invalid_submission_keeps_running_job_slot() {
    let gate = Arc::new(Notify::new());
    let fake = FakeBackend::new().with(|s| s.gate = Some(gate.clone()));
    let submitter = JobSubmitter::new(fake.clone());

    let first = submitter.submit(inference_request());
    let second = async {
        while !submitter.is_in_flight(JobKind::Inference) {
            tokio::task::yield_now().await;
        }
        let invalid = submitter
            .submit(JobRequest::Inference(InferenceRequest {
                image_path: String::new(),
                ..match inference_request() {
                    JobRequest::Inference(req) => req,
                    JobRequest::Train(_) => unreachable!(),
                }
            }))
            .await;
        assert_eq!(
            submitter.result(JobKind::Inference).map(|r| r.status()),
            Some(JobStatus::Pending)
        );
        gate.notify_one();
        invalid
    };
    let (first, invalid) = tokio::join!(first, second);

    assert_eq!(invalid.error().unwrap().kind, ErrorKind::Validation);
    assert_eq!(submitter.result(JobKind::Inference), Some(first));
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn dropped_submission_closes_its_slot() {
    let gate = Arc::new(Notify::new());
    let fake = FakeBackend::new().with(|s| s.gate = Some(gate));
    let submitter = JobSubmitter::new(fake);

    let timed_out = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        submitter.submit(train_request("cats")),
    )
    .await;
    assert!(timed_out.is_err());

    let slot = submitter.result(JobKind::Train).unwrap();
    assert_eq!(slot.status(), JobStatus::Failed);
    assert_eq!(slot.error().unwrap().kind, ErrorKind::Unknown);
    assert_eq!(slot.error().unwrap().message, "submission abandoned");
    assert!(slot.finished_at.is_some());
    assert!(!submitter.is_in_flight(JobKind::Train));

    // The kind is free again.
    assert_eq!(
        submitter.submit(train_request("")).await.error().unwrap().kind,
        ErrorKind::Validation
    );
}

#[tokio::test]
async fn different_kinds_may_run_together() {
    let gate = Arc::new(Notify::new());
    let fake = FakeBackend::new().with(|s| s.gate = Some(gate.clone()));
    let submitter = JobSubmitter::new(fake);

    let train = submitter.submit(train_request("cats"));
    let infer = async {
        while !submitter.is_in_flight(JobKind::Train) {
            tokio::task::yield_now().await;
        }
        let fut = submitter.submit(inference_request());
        gate.notify_one();
        gate.notify_one();
        fut.await
    };
    let (train, infer) = tokio::join!(train, infer);

    assert_eq!(train.status(), JobStatus::Succeeded);
    assert_eq!(infer.status(), JobStatus::Succeeded);
}

#[tokio::test]
async fn board_subscribers_are_notified() {
    let submitter = JobSubmitter::new(FakeBackend::new());
    let mut rx = submitter.subscribe();

    submitter.submit(inference_request()).await;

    assert!(rx.has_changed().unwrap());
    let board = rx.borrow_and_update().clone();
    assert_eq!(
        board.inference.map(|r| r.status()),
        Some(JobStatus::Succeeded)
    );
    assert!(board.train.is_none());
}
