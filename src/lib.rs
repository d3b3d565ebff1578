//! Domain Scout - bounded-concurrency RDAP availability checking
//!
//! Checks batches of domain names against an RDAP endpoint with a hard cap on
//! simultaneous requests, classifying each as available, taken or unknown.
//! Also ships the candidate generator and presets the CLI feeds into a batch.

pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod metrics;
pub mod rdap;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::FetchConfig;
pub use error::{Result, ScoutError};
pub use metrics::{MetricsSnapshot, PerformanceMetrics};
pub use types::{CheckRecord, FailureKind, Outcome, ResultSet, Summary};

// Re-export main functionality
pub use fetch::{BoundedBatchFetcher, HttpTransport, Transport};
pub use generate::{CandidateGenerator, GeneratorConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
