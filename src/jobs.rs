//! Asynchronous train/inference submission.

use std::collections::HashSet;
use std::sync::Mutex;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::backend::{Backend, normalize};
use crate::model::{
    ErrorInfo, ErrorKind, JobKind, JobOutcome, JobRequest, JobResult, JobState,
};

mod validate;
pub use self::validate::validate;

/// Latest result per job kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobBoard {
    pub train: Option<JobResult>,
    pub inference: Option<JobResult>,
}

impl JobBoard {
    pub fn get(&self, kind: JobKind) -> Option<&JobResult> {
        match kind {
            JobKind::Train => self.train.as_ref(),
            JobKind::Inference => self.inference.as_ref(),
        }
    }

    fn set(&mut self, result: JobResult) {
        match result.kind {
            JobKind::Train => self.train = Some(result),
            JobKind::Inference => self.inference = Some(result),
        }
    }
}

/// Validates, dispatches and records jobs.
///
/// At most one job per kind is in flight; a second submission of the same
/// kind is answered with a `Busy` failure and leaves the board untouched, as
/// does a validation failure while that kind is running.
pub struct JobSubmitter<B> {
    backend: B,
    in_flight: Mutex<HashSet<JobKind>>,
    board: watch::Sender<JobBoard>,
}

impl<B: Backend> JobSubmitter<B> {
    pub fn new(backend: B) -> Self {
        let (board, _rx) = watch::channel(JobBoard::default());
        Self {
            backend,
            in_flight: Mutex::new(HashSet::new()),
            board,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn board(&self) -> JobBoard {
        self.board.borrow().clone()
    }

    pub fn result(&self, kind: JobKind) -> Option<JobResult> {
        self.board.borrow().get(kind).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<JobBoard> {
        self.board.subscribe()
    }

    pub fn is_in_flight(&self, kind: JobKind) -> bool {
        self.lock_in_flight().contains(&kind)
    }

    pub async fn submit(&self, request: JobRequest) -> JobResult {
        let kind = request.kind();
        let started_at = now_rfc3339();

        if let Err(err) = validate(&request) {
            warn!(%kind, message = %err.message, "job rejected by validation");
            let result = finished(kind, JobState::Failed(err), started_at);
            // A running job of this kind keeps its slot until it settles.
            let held = self.lock_in_flight();
            if !held.contains(&kind) {
                self.publish(result.clone());
            }
            return result;
        }

        let Some(guard) = InFlightGuard::acquire(&self.in_flight, &self.board, kind, &started_at)
        else {
            warn!(%kind, "job rejected: already in flight");
            return finished(
                kind,
                JobState::Failed(ErrorInfo::new(
                    ErrorKind::Busy,
                    format!("a {} job is already running", kind),
                )),
                started_at,
            );
        };

        self.publish(JobResult {
            kind,
            state: JobState::Pending,
            started_at: started_at.clone(),
            finished_at: None,
        });
        info!(%kind, node = request.node(), "job dispatched");

        let state = match &request {
            JobRequest::Train(req) => match self.backend.train(req).await {
                Ok(out) => JobState::Succeeded(JobOutcome::Train(out)),
                Err(err) => JobState::Failed(normalize(err)),
            },
            JobRequest::Inference(req) => match self.backend.infer(req).await {
                Ok(out) => JobState::Succeeded(JobOutcome::Inference(out)),
                Err(err) => JobState::Failed(normalize(err)),
            },
        };

        match &state {
            JobState::Failed(err) => {
                warn!(%kind, error_kind = %err.kind, message = %err.message, "job failed")
            }
            _ => info!(%kind, "job succeeded"),
        }

        guard.settle(state)
    }

    fn publish(&self, result: JobResult) {
        self.board.send_modify(|b| b.set(result));
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashSet<JobKind>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owns one kind's in-flight mark and its board slot for a dispatched job.
///
/// If the submission future is dropped before [`InFlightGuard::settle`], the
/// slot is closed as abandoned so it never stays `Pending`.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<JobKind>>,
    board: &'a watch::Sender<JobBoard>,
    kind: JobKind,
    started_at: String,
    settled: bool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(
        set: &'a Mutex<HashSet<JobKind>>,
        board: &'a watch::Sender<JobBoard>,
        kind: JobKind,
        started_at: &str,
    ) -> Option<Self> {
        let mut held = set.lock().unwrap_or_else(|p| p.into_inner());
        if !held.insert(kind) {
            return None;
        }
        Some(Self {
            set,
            board,
            kind,
            started_at: started_at.to_string(),
            settled: false,
        })
    }

    fn settle(mut self, state: JobState) -> JobResult {
        self.settled = true;
        let result = finished(self.kind, state, self.started_at.clone());
        self.publish(result.clone());
        result
    }

    fn publish(&self, result: JobResult) {
        self.board.send_modify(|b| b.set(result));
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(kind = %self.kind, "job abandoned before the backend answered");
            self.publish(finished(
                self.kind,
                JobState::Failed(ErrorInfo::new(ErrorKind::Unknown, "submission abandoned")),
                self.started_at.clone(),
            ));
        }
        let mut held = self.set.lock().unwrap_or_else(|p| p.into_inner());
        held.remove(&self.kind);
    }
}

fn finished(kind: JobKind, state: JobState, started_at: String) -> JobResult {
    JobResult {
        kind,
        state,
        started_at,
        finished_at: Some(now_rfc3339()),
    }
}

pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

#[cfg(test)]
#[path = "tests/jobs/submit_tests.rs"]
mod submit_tests;
