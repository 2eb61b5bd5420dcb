//! Raw CSV row types and field coercion.
//!
//! Every field deserializes as an optional string so that a malformed cell
//! never fails the whole parse; the coercion helpers here and the
//! normalizer decide what a row means. Numeric cells may arrive quoted,
//! blank cells mean absent, and principal flags are `1`/`0` (with
//! `true`/`false` also accepted).

use serde::Deserialize;
use serde::de::DeserializeOwned;

use stagedoor_shared::{CatalogError, Result};

/// Raw row of `actors.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorRow {
    #[serde(rename = "ActorId", default)]
    pub actor_id: Option<String>,
    #[serde(rename = "FirstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", default)]
    pub last_name: Option<String>,
    #[serde(rename = "DOB", default)]
    pub dob: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "SkinColor", default)]
    pub skin_color: Option<String>,
    #[serde(rename = "EyeColor", default)]
    pub eye_color: Option<String>,
    #[serde(rename = "HairColor", default)]
    pub hair_color: Option<String>,
    #[serde(rename = "FrontImage", default)]
    pub front_image: Option<String>,
    #[serde(rename = "FullBodyImage", default)]
    pub full_body_image: Option<String>,
}

/// Raw row of `characters.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterRow {
    #[serde(rename = "CharacterId", default)]
    pub character_id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Age", default)]
    pub age: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Principal", default)]
    pub principal: Option<String>,
    #[serde(rename = "Image", default)]
    pub image: Option<String>,
    #[serde(rename = "ActorId", default)]
    pub actor_id: Option<String>,
    #[serde(rename = "PlayId", default)]
    pub play_id: Option<String>,
}

/// Raw row of `play.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayRow {
    #[serde(rename = "PlayId", default)]
    pub play_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Format", default)]
    pub format: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Script", default)]
    pub script: Option<String>,
    #[serde(rename = "Reference", default)]
    pub reference: Option<String>,
    #[serde(rename = "SoundTrack", default)]
    pub sound_track: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse CSV text into raw rows, tagged with the table name for errors.
pub fn parse_rows<T: DeserializeOwned>(text: &str, table: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record
            .map_err(|e| CatalogError::parse(format!("{table}: {e}")))?;
        rows.push(row);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Trim a cell; blank means absent.
pub fn clean(cell: Option<&String>) -> Option<String> {
    cell.map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from)
}

/// Coerce a cell to a positive integer id. Blank or non-numeric → `None`.
pub fn coerce_id(cell: Option<&String>) -> Option<u32> {
    let value = cell.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    match value.parse::<u32>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

/// Coerce a principal flag: `1` or `true` means set, anything else unset.
pub fn coerce_flag(cell: Option<&String>) -> bool {
    matches!(
        cell.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true")
    )
}
