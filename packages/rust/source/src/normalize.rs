//! The normalization boundary: raw CSV rows → typed entities.
//!
//! Rows with a missing or non-numeric primary id are skipped with a warning
//! rather than propagated. Duplicate primary ids within a table fail the
//! whole table with a validation error.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use stagedoor_shared::{
    Actor, ActorId, CatalogError, Character, CharacterId, Play, PlayId, Result,
};

use crate::record::{ActorRow, CharacterRow, PlayRow, clean, coerce_flag, coerce_id};

/// Age in whole years at `today` for someone born on `dob`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Parse a `YYYY-MM-DD` date cell; anything else is treated as absent.
fn parse_dob(cell: Option<String>) -> Option<NaiveDate> {
    let value = cell?;
    match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(dob = %value, "unparseable DOB, dropping");
            None
        }
    }
}

/// Fail the table if `id` was already seen.
fn check_duplicate(seen: &mut HashSet<u32>, id: u32, column: &str, table: &str) -> Result<()> {
    if !seen.insert(id) {
        return Err(CatalogError::validation(format!(
            "duplicate {column} {id} in {table}"
        )));
    }
    Ok(())
}

/// Normalize actor rows, deriving ages against `today`.
pub fn normalize_actors(rows: Vec<ActorRow>, today: NaiveDate) -> Result<Vec<Actor>> {
    let mut seen = HashSet::new();
    let mut actors = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let Some(id) = coerce_id(row.actor_id.as_ref()) else {
            warn!(row = i + 1, "actors.csv: row without a numeric ActorId, skipping");
            continue;
        };
        check_duplicate(&mut seen, id, "ActorId", "actors.csv")?;

        let dob = parse_dob(clean(row.dob.as_ref()));

        actors.push(Actor {
            actor_id: ActorId(id),
            first_name: clean(row.first_name.as_ref()).unwrap_or_default(),
            last_name: clean(row.last_name.as_ref()).unwrap_or_default(),
            dob,
            age: dob.map(|d| age_on(d, today)),
            gender: clean(row.gender.as_ref()),
            skin_color: clean(row.skin_color.as_ref()),
            eye_color: clean(row.eye_color.as_ref()),
            hair_color: clean(row.hair_color.as_ref()),
            front_image: clean(row.front_image.as_ref()),
            full_body_image: clean(row.full_body_image.as_ref()),
        });
    }

    Ok(actors)
}

/// Normalize character rows. Foreign keys that fail coercion become absent.
pub fn normalize_characters(rows: Vec<CharacterRow>) -> Result<Vec<Character>> {
    let mut seen = HashSet::new();
    let mut characters = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let Some(id) = coerce_id(row.character_id.as_ref()) else {
            warn!(
                row = i + 1,
                "characters.csv: row without a numeric CharacterId, skipping"
            );
            continue;
        };
        check_duplicate(&mut seen, id, "CharacterId", "characters.csv")?;

        characters.push(Character {
            character_id: CharacterId(id),
            name: clean(row.name.as_ref()).unwrap_or_default(),
            description: clean(row.description.as_ref()),
            age: clean(row.age.as_ref()),
            gender: clean(row.gender.as_ref()),
            principal: coerce_flag(row.principal.as_ref()),
            image: clean(row.image.as_ref()),
            actor_id: coerce_id(row.actor_id.as_ref()).map(ActorId),
            play_id: coerce_id(row.play_id.as_ref()).map(PlayId),
        });
    }

    Ok(characters)
}

/// Normalize play rows.
pub fn normalize_plays(rows: Vec<PlayRow>) -> Result<Vec<Play>> {
    let mut seen = HashSet::new();
    let mut plays = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let Some(id) = coerce_id(row.play_id.as_ref()) else {
            warn!(row = i + 1, "play.csv: row without a numeric PlayId, skipping");
            continue;
        };
        check_duplicate(&mut seen, id, "PlayId", "play.csv")?;

        plays.push(Play {
            play_id: PlayId(id),
            title: clean(row.title.as_ref()).unwrap_or_default(),
            genre: clean(row.genre.as_ref()),
            format: clean(row.format.as_ref()),
            description: clean(row.description.as_ref()),
            poster: clean(row.poster.as_ref()),
            script_link: clean(row.script.as_ref()),
            reference: clean(row.reference.as_ref()),
            sound_track: clean(row.sound_track.as_ref()),
        });
    }

    Ok(plays)
}
