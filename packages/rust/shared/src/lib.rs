//! Shared types, error model, and configuration for EndorseTrack.
//!
//! This crate is the foundation depended on by all other EndorseTrack crates.
//! It provides:
//! - [`EndorseTrackError`], the unified error type
//! - Domain types ([`SectionPath`], [`RawStatement`], [`Citation`],
//!   [`ParsedStatement`], [`EndorsementRecord`], [`ImportId`])
//! - Configuration ([`AppConfig`], [`ResolverPolicy`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ImportConfig, ResolverPolicy, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{EndorseTrackError, Result};
pub use types::{
    Citation, EndorsementRecord, EndorserId, EndorserRecord, ImportId, MatchResult,
    ParsedStatement, RawStatement, SECTION_SEPARATOR, SectionPath,
};
