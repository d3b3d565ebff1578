//! RDAP utilities shared across modules.
//!
//! Endpoint knowledge and response classification live here so the fetcher
//! and the CLI agree on what a registry answer means.

pub mod registry;
pub mod response;

pub use registry::{domain_url, group_by_registry, rdap_base_url, tld_of, DEFAULT_RDAP_BASE};
pub use response::{classify_body, Classification, NOT_FOUND_CODE};
