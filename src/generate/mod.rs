//! Candidate generation: pattern families, pronounceability filtering and
//! the fixed presets.

pub mod candidates;
pub mod filter;
pub mod presets;

pub use candidates::{sample, CandidateGenerator, CandidateSet, Family, GeneratorConfig};
pub use filter::{is_pronounceable, ExclusionList};
pub use presets::{targeted, two_letter, TARGETED};
