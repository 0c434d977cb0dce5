mod catalog;
mod job;
mod selection;

pub use self::catalog::{Catalog, ModelSet, Node};
pub use self::job::{
    ErrorInfo, ErrorKind, InferenceOutcome, InferenceRequest, JobKind, JobOutcome, JobRequest,
    JobResult, JobState, JobStatus, ModelType, TrainForm, TrainOutcome, TrainRequest,
};
pub use self::selection::SelectionState;
