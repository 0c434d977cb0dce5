//! Display formatting for finished (or pending) jobs.

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::{ErrorKind, JobKind, JobOutcome, JobResult, JobState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfidenceRow {
    pub label: String,
    /// Two decimal places.
    pub confidence: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DisplayModel {
    Pending {
        kind: JobKind,
        status_line: String,
    },
    Training {
        status_line: String,
        model_path: String,
        output_file: String,
        report_path: String,
        output_contents: String,
        elapsed: Option<String>,
    },
    Inference {
        predicted_class: String,
        confidences: Vec<ConfidenceRow>,
        timestamp: String,
        elapsed: Option<String>,
    },
    Failed {
        kind: JobKind,
        error_kind: ErrorKind,
        message: String,
        status_line: String,
    },
}

pub fn present(result: &JobResult) -> DisplayModel {
    let elapsed = elapsed(result);
    match &result.state {
        JobState::Pending => DisplayModel::Pending {
            kind: result.kind,
            status_line: match result.kind {
                JobKind::Train => "Training started...".to_string(),
                JobKind::Inference => "Inference running...".to_string(),
            },
        },
        JobState::Succeeded(JobOutcome::Train(out)) => DisplayModel::Training {
            status_line: "Training successfully completed.".to_string(),
            model_path: out.model_path.clone(),
            output_file: out.output_file.clone(),
            report_path: out.report_path.clone(),
            output_contents: out.output_contents.clone(),
            elapsed,
        },
        JobState::Succeeded(JobOutcome::Inference(out)) => DisplayModel::Inference {
            predicted_class: out.predicted_class.clone(),
            confidences: out
                .output
                .iter()
                .map(|(label, confidence)| ConfidenceRow {
                    label: label.clone(),
                    confidence: format!("{:.2}", confidence),
                })
                .collect(),
            timestamp: out.timestamp.clone(),
            elapsed,
        },
        JobState::Failed(err) => DisplayModel::Failed {
            kind: result.kind,
            error_kind: err.kind,
            message: err.message.clone(),
            status_line: format!("Error: {}", err.message),
        },
    }
}

impl DisplayModel {
    pub fn is_failure(&self) -> bool {
        matches!(self, DisplayModel::Failed { .. })
    }

    /// Plain-text rendering shared by the CLI and the dashboard panels.
    pub fn lines(&self) -> Vec<String> {
        match self {
            DisplayModel::Pending { status_line, .. } => vec![status_line.clone()],
            DisplayModel::Training {
                status_line,
                model_path,
                output_file,
                report_path,
                output_contents,
                elapsed,
            } => {
                let mut lines = vec![status_line.clone()];
                if let Some(e) = elapsed {
                    lines.push(format!("Elapsed: {}", e));
                }
                lines.push(format!("Model Path: {}", model_path));
                lines.push(format!("Output File: {}", output_file));
                lines.push(format!("Report Path: {}", report_path));
                if !output_contents.is_empty() {
                    lines.push(String::new());
                    lines.extend(output_contents.lines().map(str::to_string));
                }
                lines
            }
            DisplayModel::Inference {
                predicted_class,
                confidences,
                timestamp,
                elapsed,
            } => {
                let mut lines = vec![format!("Predicted Class: {}", predicted_class)];
                for row in confidences {
                    lines.push(format!("  {}: {}", row.label, row.confidence));
                }
                lines.push(format!("Timestamp: {}", timestamp));
                if let Some(e) = elapsed {
                    lines.push(format!("Elapsed: {}", e));
                }
                lines
            }
            DisplayModel::Failed { status_line, .. } => vec![status_line.clone()],
        }
    }
}

fn elapsed(result: &JobResult) -> Option<String> {
    let start = OffsetDateTime::parse(&result.started_at, &Rfc3339).ok()?;
    let end = OffsetDateTime::parse(result.finished_at.as_deref()?, &Rfc3339).ok()?;
    let secs = (end - start).as_seconds_f64();
    (secs >= 0.0).then(|| format!("{:.1}s", secs))
}

#[cfg(test)]
#[path = "tests/present_tests.rs"]
mod present_tests;
