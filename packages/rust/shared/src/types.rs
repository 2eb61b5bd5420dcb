//! Domain entity types for the theater catalog.
//!
//! Serde renames follow the JSON the original REST API emits (camelCase
//! fields, count fields named `characters`/`principals`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity ids
// ---------------------------------------------------------------------------

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::CatalogError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|_| crate::error::CatalogError::invalid_id(s))
            }
        }
    };
}

entity_id!(
    /// Primary id of an [`Actor`].
    ActorId
);
entity_id!(
    /// Primary id of a [`Character`].
    CharacterId
);
entity_id!(
    /// Primary id of a [`Play`].
    PlayId
);

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// A performer in the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub actor_id: ActorId,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth; absent when the source row left it blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    /// Age in whole years, derived from `dob` at load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_body_image: Option<String>,
}

impl Actor {
    /// "First Last" display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// List-view projection of an [`Actor`] with derived role counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorShort {
    pub actor_id: ActorId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_image: Option<String>,
    /// Number of characters played by this actor.
    #[serde(rename = "characters")]
    pub character_count: usize,
    /// Number of those characters flagged principal.
    #[serde(rename = "principals")]
    pub principal_count: usize,
}

impl ActorShort {
    /// "First Last" display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Summary of an actor attached to a joined character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRef {
    pub actor_id: ActorId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_image: Option<String>,
}

impl ActorRef {
    /// "First Last" display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&Actor> for ActorRef {
    fn from(actor: &Actor) -> Self {
        Self {
            actor_id: actor.actor_id,
            first_name: actor.first_name.clone(),
            last_name: actor.last_name.clone(),
            gender: actor.gender.clone(),
            front_image: actor.front_image.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A role in a play, optionally assigned to an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub character_id: CharacterId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form in the source data ("30s", "ageless", "17").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Lead/starring role flag.
    #[serde(default)]
    pub principal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Foreign key to the performing actor; absent for unassigned roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<ActorId>,
    /// Foreign key to the play this role belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_id: Option<PlayId>,
}

// ---------------------------------------------------------------------------
// Play
// ---------------------------------------------------------------------------

/// A production in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub play_id: PlayId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_track: Option<String>,
}

/// List-view projection of a [`Play`] with its derived character count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayShort {
    pub play_id: PlayId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Number of characters in this play.
    #[serde(rename = "characters")]
    pub character_count: usize,
}

/// Summary of a play attached to a joined character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRef {
    pub play_id: PlayId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl From<&Play> for PlayRef {
    fn from(play: &Play) -> Self {
        Self {
            play_id: play.play_id,
            title: play.title.clone(),
            genre: play.genre.clone(),
            format: play.format.clone(),
            poster: play.poster.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Joined views
// ---------------------------------------------------------------------------
//
// These are the shapes the REST API returns for detail endpoints and the
// shapes the in-memory joiner assembles from CSV tables. Secondary relations
// are optional; an unresolvable foreign key leaves them absent.

/// A character as listed on an actor's profile, with its play attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastEntry {
    pub character_id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub principal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_format: Option<String>,
}

/// A character as listed on a play's page, with its actor attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCastEntry {
    pub character_id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub principal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorRef>,
}

/// An actor profile with the characters they play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDetail {
    #[serde(flatten)]
    pub actor: Actor,
    #[serde(default)]
    pub characters: Vec<CastEntry>,
}

/// A character profile with its actor and play references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub character: Character,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<PlayRef>,
}

/// A play profile with its cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayDetail {
    #[serde(flatten)]
    pub play: Play,
    #[serde(default)]
    pub characters: Vec<PlayCastEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id: ActorId = "42".parse().expect("parse ActorId");
        assert_eq!(id, ActorId(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn id_rejects_non_numeric() {
        let err = "seven".parse::<PlayId>().unwrap_err();
        assert!(err.to_string().contains("seven"));
        assert!("-3".parse::<CharacterId>().is_err());
    }

    #[test]
    fn actor_short_serializes_count_fields() {
        let short = ActorShort {
            actor_id: ActorId(1),
            first_name: "Imogen".into(),
            last_name: "Hale".into(),
            age: Some(34),
            gender: Some("Female".into()),
            front_image: None,
            character_count: 3,
            principal_count: 1,
        };

        let json = serde_json::to_string(&short).expect("serialize");
        assert!(json.contains("\"characters\":3"));
        assert!(json.contains("\"principals\":1"));
        assert!(json.contains("\"firstName\":\"Imogen\""));
    }

    #[test]
    fn character_deserializes_with_absent_relations() {
        let json = r#"{"characterId": 5, "name": "Ghost", "principal": false}"#;
        let character: Character = serde_json::from_str(json).expect("deserialize");
        assert_eq!(character.character_id, CharacterId(5));
        assert!(character.actor_id.is_none());
        assert!(character.play_id.is_none());
    }

    #[test]
    fn character_detail_flattens_relations() {
        let json = r#"{
            "characterId": 3,
            "name": "Hamlet",
            "principal": true,
            "actorId": 1,
            "playId": 2,
            "actor": {"actorId": 1, "firstName": "Imogen", "lastName": "Hale"},
            "play": {"playId": 2, "title": "Hamnet"}
        }"#;
        let detail: CharacterDetail = serde_json::from_str(json).expect("deserialize");
        assert_eq!(detail.character.name, "Hamlet");
        assert_eq!(detail.actor.as_ref().map(|a| a.actor_id), Some(ActorId(1)));
        assert_eq!(detail.play.as_ref().map(|p| p.title.as_str()), Some("Hamnet"));
    }

    #[test]
    fn play_roundtrip() {
        let play = Play {
            play_id: PlayId(2),
            title: "Hamnet".into(),
            genre: Some("Drama".into()),
            format: Some("Two acts".into()),
            description: None,
            poster: None,
            script_link: None,
            reference: None,
            sound_track: None,
        };

        let json = serde_json::to_string(&play).expect("serialize");
        let parsed: Play = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, play);
    }
}
