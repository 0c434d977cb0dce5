//! Operator dashboard for a small training/inference cluster.
//!
//! The core is a chain of four pieces: [`catalog::ResourceCatalog`] loads
//! nodes and images, [`selection::SelectionController`] keeps the chosen
//! node/model/image consistent, [`jobs::JobSubmitter`] dispatches jobs and
//! normalizes failures, and [`present::present`] formats the results.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod jobs;
pub mod logging;
pub mod model;
pub mod present;
pub mod selection;
pub mod tui;
mod tui_shell;

#[cfg(test)]
#[path = "tests/support/fake_backend.rs"]
pub(crate) mod fake_backend;
