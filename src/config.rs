//! Fetcher configuration and its environment layer.
//!
//! Values come from defaults, then `SCOUT_*` environment variables (a `.env`
//! file is loaded by [`crate::init`]), then whatever the caller overrides.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::error::Result;
use crate::rdap::DEFAULT_RDAP_BASE;

pub const ENV_CONCURRENCY: &str = "SCOUT_CONCURRENCY";
pub const ENV_TIMEOUT_SECS: &str = "SCOUT_TIMEOUT_SECS";
pub const ENV_RDAP_BASE: &str = "SCOUT_RDAP_BASE";
pub const ENV_PACING_MS: &str = "SCOUT_PACING_MS";
pub const ENV_USER_AGENT: &str = "SCOUT_USER_AGENT";

/// Configuration for a batch fetcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Requests allowed in flight at once
    pub concurrency: usize,
    /// Wall-clock limit for one request, body included
    pub timeout: Duration,
    /// Base URL the query key is appended to
    pub base_url: String,
    /// Fixed delay spent holding a slot before each request
    pub pacing: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 20,
            timeout: Duration::from_secs(10),
            base_url: DEFAULT_RDAP_BASE.to_string(),
            pacing: Duration::ZERO,
            user_agent: format!("domain-scout/{}", crate::VERSION),
        }
    }
}

impl FetchConfig {
    /// Defaults overlaid with `SCOUT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`, keyed by variable name
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(concurrency) = parse_var::<usize, _>(&lookup, ENV_CONCURRENCY)? {
            config.concurrency = concurrency;
        }
        if let Some(secs) = parse_var::<f64, _>(&lookup, ENV_TIMEOUT_SECS)? {
            if !secs.is_finite() || secs < 0.0 {
                return Err(config_error!(
                    "{} must be a non-negative number, got {}",
                    ENV_TIMEOUT_SECS,
                    secs
                ));
            }
            config.timeout = Duration::from_secs_f64(secs);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_PACING_MS)? {
            config.pacing = Duration::from_millis(ms);
        }
        if let Some(base) = lookup(ENV_RDAP_BASE).filter(|v| !v.trim().is_empty()) {
            config.base_url = base.trim().to_string();
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject settings that can never produce a meaningful batch
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(config_error!("concurrency must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(config_error!("request timeout must be greater than zero"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(config_error!("RDAP base URL must be http(s), got '{}'", self.base_url));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| config_error!("invalid {} '{}': {}", name, raw, e)),
        _ => Ok(None),
    }
}
