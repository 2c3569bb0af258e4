//! Pipeline orchestration and entity resolution for EndorseTrack.
//!
//! This crate ties the markup walker and the statement extractors into the
//! end-to-end import transform (document text → ordered records) and houses
//! the fuzzy resolver cascade against the endorser registry.

pub mod pipeline;
pub mod resolver;

pub use pipeline::{ImportOptions, ProgressReporter, SilentProgress, content_hash, import_document};
pub use resolver::{EndorserRegistry, InMemoryRegistry, Resolver};
