//! Core types and structures for domain-scout

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::rdap::Classification;

/// Availability outcome for one query key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The registry answered "not found"
    Available,
    /// The registry answered with anything else
    Taken,
    /// The lookup failed; not confirmed available
    Unknown,
    /// The batch was cancelled before this key's request was issued
    NotAttempted,
}

impl Outcome {
    pub fn is_available(&self) -> bool {
        matches!(self, Outcome::Available)
    }

    /// True when the registry actually answered for this key
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Available | Outcome::Taken)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Available => write!(f, "available"),
            Outcome::Taken => write!(f, "taken"),
            Outcome::Unknown => write!(f, "unknown"),
            Outcome::NotAttempted => write!(f, "not_attempted"),
        }
    }
}

/// Why a lookup degraded to `Outcome::Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Connection refused, DNS failure, transport or body read error
    Network,
    /// No response within the per-request timeout
    Timeout,
    /// Body was not JSON
    Parse,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Parse => write!(f, "parse"),
        }
    }
}

/// Result of checking one query key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub key: String,
    pub outcome: Outcome,
    pub failure: Option<FailureKind>,
    pub error_message: Option<String>,
    /// `errorCode` reported by the registry, if the body carried one
    pub error_code: Option<i64>,
    pub check_duration: Option<Duration>,
    pub checked_at: DateTime<Utc>,
}

impl CheckRecord {
    /// Record for a key the registry answered for
    pub fn resolved(
        key: impl Into<String>,
        classification: Classification,
        duration: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            outcome: classification.outcome,
            failure: None,
            error_message: None,
            error_code: classification.error_code,
            check_duration: Some(duration),
            checked_at: Utc::now(),
        }
    }

    /// Record for a key whose lookup failed
    pub fn failed(key: impl Into<String>, error: &ScoutError, duration: Option<Duration>) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome::Unknown,
            failure: Some(error.failure_kind()),
            error_message: Some(error.to_string()),
            error_code: None,
            check_duration: duration,
            checked_at: Utc::now(),
        }
    }

    /// Record for a key that was never sent because the batch was cancelled
    pub fn not_attempted(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            outcome: Outcome::NotAttempted,
            failure: None,
            error_message: None,
            error_code: None,
            check_duration: None,
            checked_at: Utc::now(),
        }
    }
}

/// Per-outcome counts of a result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub available: usize,
    pub taken: usize,
    pub unknown: usize,
    pub not_attempted: usize,
}

/// Finished batch: exactly one record per query key, iterated in key order.
///
/// Built by collecting `CheckRecord`s; a later record for the same key
/// replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: BTreeMap<String, CheckRecord>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&CheckRecord> {
        self.records.get(key)
    }

    pub fn outcome(&self, key: &str) -> Option<Outcome> {
        self.records.get(key).map(|r| r.outcome)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.values()
    }

    /// Records with the given outcome, in key order
    pub fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &CheckRecord> {
        self.records.values().filter(move |r| r.outcome == outcome)
    }

    pub fn available(&self) -> Vec<&str> {
        self.keys_with(Outcome::Available)
    }

    pub fn taken(&self) -> Vec<&str> {
        self.keys_with(Outcome::Taken)
    }

    /// Keys whose lookup failed. These are the ones worth re-running.
    pub fn unknown_keys(&self) -> Vec<String> {
        self.with_outcome(Outcome::Unknown).map(|r| r.key.clone()).collect()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.with_outcome(outcome).count()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.records.len(),
            ..Default::default()
        };
        for record in self.records.values() {
            match record.outcome {
                Outcome::Available => summary.available += 1,
                Outcome::Taken => summary.taken += 1,
                Outcome::Unknown => summary.unknown += 1,
                Outcome::NotAttempted => summary.not_attempted += 1,
            }
        }
        summary
    }

    /// Combine with the results of a follow-up batch; records in `newer`
    /// replace records for the same key.
    pub fn merge(mut self, newer: ResultSet) -> ResultSet {
        self.records.extend(newer.records);
        self
    }

    fn keys_with(&self, outcome: Outcome) -> Vec<&str> {
        self.with_outcome(outcome).map(|r| r.key.as_str()).collect()
    }
}

impl FromIterator<CheckRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = CheckRecord>>(iter: I) -> Self {
        let records = iter.into_iter().map(|r| (r.key.clone(), r)).collect();
        Self { records }
    }
}

impl IntoIterator for ResultSet {
    type Item = CheckRecord;
    type IntoIter = std::collections::btree_map::IntoValues<String, CheckRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}
