use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where the broker lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base address without a trailing `/`.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = validate_base_url(base_url)?;
        if request_timeout.is_zero() {
            anyhow::bail!("request timeout must be greater than zero");
        }
        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed)
        .with_context(|| format!("invalid backend url '{}'", raw))?;
    match url.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("unsupported backend url scheme '{}' (use http or https)", other),
    }
    if url.host_str().is_none() {
        anyhow::bail!("backend url '{}' has no host", raw);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
