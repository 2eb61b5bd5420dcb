//! Entity source adapters and the normalization boundary.
//!
//! This crate provides:
//! - [`record`] — Raw CSV row types with loose string/number coercion
//! - [`normalize`] — Raw rows → typed, validated entities
//! - [`CsvSource`] — Static CSV files, local or HTTP-served
//! - [`RestSource`] — The theater REST API

pub mod csv;
pub mod normalize;
pub mod record;
pub mod rest;

pub use self::csv::{ACTORS_FILE, CHARACTERS_FILE, CatalogTables, CsvSource, PLAY_FILE};
pub use self::normalize::{age_on, normalize_actors, normalize_characters, normalize_plays};
pub use self::rest::RestSource;
