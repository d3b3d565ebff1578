//! Query key validation and normalisation

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, ScoutError};
use crate::validation_error;

/// Lowercase LDH labels separated by dots
const SAFE_KEY_PATTERN: &str = r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$";

/// Longest key accepted (the DNS name limit)
const MAX_KEY_LEN: usize = 253;

fn safe_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SAFE_KEY_PATTERN).expect("safe key pattern is valid"))
}

/// True when `key` can be substituted into a URL path segment as-is
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= MAX_KEY_LEN && safe_key_regex().is_match(key)
}

/// Lowercase and trim `label`, appending `.tld` when it has no dot
pub fn qualify(label: &str, tld: &str) -> String {
    let label = label.trim().trim_end_matches('.').to_lowercase();
    let tld = tld.trim().trim_start_matches('.').to_lowercase();
    if label.contains('.') || tld.is_empty() {
        label
    } else {
        format!("{label}.{tld}")
    }
}

/// Validate a batch of keys, collapsing duplicates while keeping first-seen order.
///
/// Returns the unique keys and how many duplicates were dropped.
pub fn prepare_keys<I, S>(keys: I) -> Result<(Vec<String>, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut duplicates = 0;

    for key in keys {
        let key = key.into();
        if !is_safe_key(&key) {
            return Err(validation_error!("unsafe query key '{}'", key));
        }
        if seen.insert(key.clone()) {
            unique.push(key);
        } else {
            duplicates += 1;
        }
    }

    Ok((unique, duplicates))
}

/// Parse a key list: one per line, blank lines and `#` comments ignored
pub fn parse_key_list(content: &str, tld: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(|line| qualify(line, tld))
        .collect()
}

/// Read a key list file (see [`parse_key_list`])
pub fn read_key_file(path: &Path, tld: &str) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ScoutError::io(e.to_string(), Some(path.display().to_string())))?;
    Ok(parse_key_list(&content, tld))
}
