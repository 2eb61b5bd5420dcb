//! The in-memory catalog and its relational joiner.
//!
//! [`Catalog`] holds the three normalized entity tables and assembles the
//! same joined views the REST API serves pre-built: list projections with
//! derived counts, and detail views with related entities attached by
//! foreign key. A missing primary entity is an error; a missing secondary
//! relation degrades to an absent field.

use std::collections::HashMap;

use tracing::{debug, instrument};

use stagedoor_shared::{
    Actor, ActorDetail, ActorId, ActorRef, ActorShort, CastEntry, CatalogError, Character,
    CharacterDetail, CharacterId, Play, PlayCastEntry, PlayDetail, PlayId, PlayRef, PlayShort,
    Result,
};

use crate::pipeline::{Direction, View};

/// The three entity tables, loaded once per view and then read-only.
#[derive(Debug, Clone)]
pub struct Catalog {
    actors: Vec<Actor>,
    characters: Vec<Character>,
    plays: Vec<Play>,
}

impl Catalog {
    /// Build a catalog from normalized tables. Ids are unique within each
    /// table by the time they get here (the normalizer enforces it).
    pub fn new(actors: Vec<Actor>, characters: Vec<Character>, plays: Vec<Play>) -> Self {
        debug!(
            actors = actors.len(),
            characters = characters.len(),
            plays = plays.len(),
            "catalog assembled"
        );
        Self {
            actors,
            characters,
            plays,
        }
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    fn actor_index(&self) -> HashMap<ActorId, &Actor> {
        self.actors.iter().map(|a| (a.actor_id, a)).collect()
    }

    fn play_index(&self) -> HashMap<PlayId, &Play> {
        self.plays.iter().map(|p| (p.play_id, p)).collect()
    }

    // -----------------------------------------------------------------------
    // List projections
    // -----------------------------------------------------------------------

    /// Actor list cards with derived character/principal counts.
    pub fn actor_shorts(&self) -> Vec<ActorShort> {
        let mut character_counts: HashMap<ActorId, usize> = HashMap::new();
        let mut principal_counts: HashMap<ActorId, usize> = HashMap::new();

        for character in &self.characters {
            if let Some(actor_id) = character.actor_id {
                *character_counts.entry(actor_id).or_default() += 1;
                if character.principal {
                    *principal_counts.entry(actor_id).or_default() += 1;
                }
            }
        }

        self.actors
            .iter()
            .map(|actor| ActorShort {
                actor_id: actor.actor_id,
                first_name: actor.first_name.clone(),
                last_name: actor.last_name.clone(),
                age: actor.age,
                gender: actor.gender.clone(),
                front_image: actor.front_image.clone(),
                character_count: character_counts.get(&actor.actor_id).copied().unwrap_or(0),
                principal_count: principal_counts.get(&actor.actor_id).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Play list cards with derived character counts.
    pub fn play_shorts(&self) -> Vec<PlayShort> {
        let mut character_counts: HashMap<PlayId, usize> = HashMap::new();
        for character in &self.characters {
            if let Some(play_id) = character.play_id {
                *character_counts.entry(play_id).or_default() += 1;
            }
        }

        self.plays
            .iter()
            .map(|play| PlayShort {
                play_id: play.play_id,
                title: play.title.clone(),
                genre: play.genre.clone(),
                format: play.format.clone(),
                poster: play.poster.clone(),
                character_count: character_counts.get(&play.play_id).copied().unwrap_or(0),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Detail views
    // -----------------------------------------------------------------------

    /// An actor's profile plus the characters they play, ordered principal
    /// first, then play title, then character name.
    #[instrument(skip(self))]
    pub fn actor_detail(&self, id: ActorId) -> Result<ActorDetail> {
        let actor = self
            .actors
            .iter()
            .find(|a| a.actor_id == id)
            .ok_or(CatalogError::not_found("actor", id.0))?;

        let plays = self.play_index();
        let cast: Vec<CastEntry> = self
            .characters
            .iter()
            .filter(|c| c.actor_id == Some(id))
            .map(|c| {
                let play = c.play_id.and_then(|pid| plays.get(&pid));
                CastEntry {
                    character_id: c.character_id,
                    name: c.name.clone(),
                    principal: c.principal,
                    image: c.image.clone(),
                    play_title: play.map(|p| p.title.clone()),
                    play_format: play.and_then(|p| p.format.clone()),
                }
            })
            .collect();

        let characters = View::of(&cast)
            .order_by(|a, b| a.principal.cmp(&b.principal), Direction::Desc)
            .order_by(|a, b| a.play_title.cmp(&b.play_title), Direction::Asc)
            .order_by(|a, b| a.name.cmp(&b.name), Direction::Asc)
            .collect_cloned();

        Ok(ActorDetail {
            actor: actor.clone(),
            characters,
        })
    }

    /// A play's profile plus its cast, ordered principal first, then
    /// character name.
    #[instrument(skip(self))]
    pub fn play_detail(&self, id: PlayId) -> Result<PlayDetail> {
        let play = self
            .plays
            .iter()
            .find(|p| p.play_id == id)
            .ok_or(CatalogError::not_found("play", id.0))?;

        let actors = self.actor_index();
        let cast: Vec<PlayCastEntry> = self
            .characters
            .iter()
            .filter(|c| c.play_id == Some(id))
            .map(|c| PlayCastEntry {
                character_id: c.character_id,
                name: c.name.clone(),
                principal: c.principal,
                image: c.image.clone(),
                actor: c
                    .actor_id
                    .and_then(|aid| actors.get(&aid))
                    .map(|a| ActorRef::from(*a)),
            })
            .collect();

        let characters = View::of(&cast)
            .order_by(|a, b| a.principal.cmp(&b.principal), Direction::Desc)
            .order_by(|a, b| a.name.cmp(&b.name), Direction::Asc)
            .collect_cloned();

        Ok(PlayDetail {
            play: play.clone(),
            characters,
        })
    }

    /// A character's profile with its actor and play attached when their
    /// foreign keys resolve.
    #[instrument(skip(self))]
    pub fn character_detail(&self, id: CharacterId) -> Result<CharacterDetail> {
        let character = self
            .characters
            .iter()
            .find(|c| c.character_id == id)
            .ok_or(CatalogError::not_found("character", id.0))?;

        let actor = character
            .actor_id
            .and_then(|aid| self.actors.iter().find(|a| a.actor_id == aid))
            .map(ActorRef::from);

        let play = character
            .play_id
            .and_then(|pid| self.plays.iter().find(|p| p.play_id == pid))
            .map(PlayRef::from);

        Ok(CharacterDetail {
            character: character.clone(),
            actor,
            play,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagedoor_shared::{ActorId, CharacterId, PlayId};

    fn actor(id: u32, first: &str, last: &str) -> Actor {
        Actor {
            actor_id: ActorId(id),
            first_name: first.into(),
            last_name: last.into(),
            dob: None,
            age: None,
            gender: None,
            skin_color: None,
            eye_color: None,
            hair_color: None,
            front_image: None,
            full_body_image: None,
        }
    }

    fn character(
        id: u32,
        name: &str,
        principal: bool,
        actor_id: Option<u32>,
        play_id: Option<u32>,
    ) -> Character {
        Character {
            character_id: CharacterId(id),
            name: name.into(),
            description: None,
            age: None,
            gender: None,
            principal,
            image: None,
            actor_id: actor_id.map(ActorId),
            play_id: play_id.map(PlayId),
        }
    }

    fn play(id: u32, title: &str) -> Play {
        Play {
            play_id: PlayId(id),
            title: title.into(),
            genre: None,
            format: None,
            description: None,
            poster: None,
            script_link: None,
            reference: None,
            sound_track: None,
        }
    }

    /// Three actors, five characters, two plays.
    fn fixture() -> Catalog {
        Catalog::new(
            vec![
                actor(1, "Imogen", "Hale"),
                actor(2, "Theo", "Marsh"),
                actor(3, "Priya", "Anand"),
            ],
            vec![
                character(1, "Hamlet", true, Some(1), Some(1)),
                character(2, "Agnes", true, Some(2), Some(1)),
                character(3, "Judith", false, Some(1), Some(1)),
                character(4, "Ariel", true, Some(3), Some(2)),
                character(5, "Caliban", false, None, Some(2)),
            ],
            vec![play(1, "Hamnet"), play(2, "The Tempest")],
        )
    }

    #[test]
    fn principal_counts_match_referencing_characters() {
        let shorts = fixture().actor_shorts();

        let by_id: HashMap<u32, &ActorShort> =
            shorts.iter().map(|s| (s.actor_id.0, s)).collect();
        assert_eq!(by_id[&1].character_count, 2);
        assert_eq!(by_id[&1].principal_count, 1);
        assert_eq!(by_id[&2].character_count, 1);
        assert_eq!(by_id[&2].principal_count, 1);
        assert_eq!(by_id[&3].principal_count, 1);
    }

    #[test]
    fn play_shorts_count_cast() {
        let shorts = fixture().play_shorts();
        assert_eq!(shorts[0].character_count, 3);
        assert_eq!(shorts[1].character_count, 2);
    }

    #[test]
    fn missing_actor_is_not_found_not_a_panic() {
        let err = fixture().actor_detail(ActorId(7)).unwrap_err();
        assert_eq!(err.to_string(), "actor 7 not found");
    }

    #[test]
    fn actor_detail_orders_principal_then_play_then_name() {
        let detail = fixture().actor_detail(ActorId(1)).unwrap();
        let names: Vec<_> = detail.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Hamlet", "Judith"]);
        assert_eq!(detail.characters[0].play_title.as_deref(), Some("Hamnet"));
    }

    #[test]
    fn play_detail_attaches_actors_and_degrades_missing_ones() {
        let detail = fixture().play_detail(PlayId(2)).unwrap();
        let names: Vec<_> = detail.characters.iter().map(|c| c.name.as_str()).collect();
        // Principal first, then name
        assert_eq!(names, ["Ariel", "Caliban"]);
        assert_eq!(
            detail.characters[0].actor.as_ref().map(|a| a.full_name()),
            Some("Priya Anand".into())
        );
        // Caliban has no ActorId; the relation is absent, not an error
        assert!(detail.characters[1].actor.is_none());
    }

    #[test]
    fn character_detail_resolves_relations() {
        let detail = fixture().character_detail(CharacterId(1)).unwrap();
        assert_eq!(detail.actor.as_ref().map(|a| a.first_name.as_str()), Some("Imogen"));
        assert_eq!(detail.play.as_ref().map(|p| p.title.as_str()), Some("Hamnet"));

        let unassigned = fixture().character_detail(CharacterId(5)).unwrap();
        assert!(unassigned.actor.is_none());
        assert_eq!(unassigned.play.as_ref().map(|p| p.title.as_str()), Some("The Tempest"));
    }

    #[test]
    fn unresolvable_foreign_key_degrades_to_absent() {
        let catalog = Catalog::new(
            vec![],
            vec![character(9, "Orphan", false, Some(99), Some(99))],
            vec![],
        );
        let detail = catalog.character_detail(CharacterId(9)).unwrap();
        assert!(detail.actor.is_none());
        assert!(detail.play.is_none());
    }
}
