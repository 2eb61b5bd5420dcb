//! Shared types, error model, and configuration for stagedoor.
//!
//! This crate is the foundation depended on by all other stagedoor crates.
//! It provides:
//! - [`CatalogError`] — the unified error type
//! - Domain types ([`Actor`], [`Character`], [`Play`] and their projections)
//! - Configuration ([`AppConfig`], [`SourceConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    API_BASE_ENV, AppConfig, SourceConfig, SourceKind, SourceSection, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{CatalogError, Result};
pub use types::{
    Actor, ActorDetail, ActorId, ActorRef, ActorShort, CastEntry, Character, CharacterDetail,
    CharacterId, Play, PlayCastEntry, PlayDetail, PlayId, PlayRef, PlayShort,
};
