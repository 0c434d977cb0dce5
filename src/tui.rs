use anyhow::Result;

use crate::config::DashboardConfig;

/// Runs the interactive dashboard until the operator quits.
pub fn run(config: DashboardConfig) -> Result<()> {
    crate::tui_shell::run(config)
}
