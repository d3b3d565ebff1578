//! Bounded-concurrency batch lookups against an RDAP endpoint.
//!
//! [`BoundedBatchFetcher`] maps every query key to exactly one
//! [`CheckRecord`](crate::types::CheckRecord). At most `concurrency` requests
//! are in flight at once; the limit is enforced by an [`AdmissionGate`] and
//! the HTTP work sits behind the [`Transport`] trait so tests can swap in a
//! scripted fake.

mod fetcher;
mod gate;
mod transport;

pub use fetcher::BoundedBatchFetcher;
pub use gate::{AdmissionGate, GatePermit};
pub use transport::{HttpTransport, Transport};
