//! Central RDAP server registry.
//!
//! A small, static mapping. `.ai` is served by the Identity Digital RDAP
//! endpoint, which is also the default base for the poller.

use std::collections::BTreeMap;

use crate::config_error;
use crate::error::Result;

/// Default base URL; the query key is appended as the final path segment.
pub const DEFAULT_RDAP_BASE: &str = "https://rdap.identitydigital.services/rdap/domain/";

/// Get the RDAP domain base URL for a TLD (lowercase, without leading dot).
///
/// Returned URL ends with `/` and already includes the `domain/` segment.
pub fn rdap_base_url(tld: &str) -> Option<&'static str> {
    match tld {
        "ai" => Some(DEFAULT_RDAP_BASE),
        "com" => Some("https://rdap.verisign.com/com/v1/domain/"),
        "net" => Some("https://rdap.verisign.com/net/v1/domain/"),
        "org" => Some("https://rdap.publicinterestregistry.org/rdap/domain/"),
        "io" => Some("https://rdap.identitydigital.services/rdap/domain/"),
        "app" | "dev" => Some("https://pubapi.registry.google/rdap/domain/"),
        "xyz" => Some("https://rdap.centralnic.com/xyz/domain/"),
        _ => None,
    }
}

/// Build the query URL by substituting `key` as the final path segment of `base`.
pub fn domain_url(base: &str, key: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{key}")
    } else {
        format!("{base}/{key}")
    }
}

/// TLD of a qualified key (the label after the last dot)
pub fn tld_of(key: &str) -> Option<&str> {
    key.rsplit_once('.')
        .map(|(_, tld)| tld)
        .filter(|tld| !tld.is_empty())
}

/// Split `keys` by the RDAP registry serving their TLD.
///
/// Groups are ordered by base URL and keep the input order of their keys.
/// A key whose TLD has no known registry is an error: another registry would
/// answer "not found" for it.
pub fn group_by_registry<I, S>(keys: I) -> Result<Vec<(&'static str, Vec<String>)>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut groups: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

    for key in keys {
        let key = key.into();
        let base = match tld_of(&key) {
            Some(tld) => rdap_base_url(tld)
                .ok_or_else(|| config_error!("No RDAP server found for TLD '{}' ({})", tld, key))?,
            None => return Err(config_error!("'{}' has no TLD to pick an RDAP server by", key)),
        };
        groups.entry(base).or_default().push(key);
    }

    Ok(groups.into_iter().collect())
}
