//! CSV source adapter.
//!
//! Fetches `actors.csv`, `characters.csv`, and `play.csv` from a base
//! location (an http(s) URL or a local directory), parses them, and runs
//! the rows through the normalization boundary. The three tables load as a
//! fixed fan-out of concurrent fetches joined before normalization.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use stagedoor_shared::{Actor, CatalogError, Character, Play, Result};

use crate::normalize::{normalize_actors, normalize_characters, normalize_plays};
use crate::record::parse_rows;

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("stagedoor/", env!("CARGO_PKG_VERSION"));

/// File name of the actors table.
pub const ACTORS_FILE: &str = "actors.csv";
/// File name of the characters table.
pub const CHARACTERS_FILE: &str = "characters.csv";
/// File name of the plays table (singular, as served by the original site).
pub const PLAY_FILE: &str = "play.csv";

/// The three normalized entity tables, loaded together.
#[derive(Debug, Clone)]
pub struct CatalogTables {
    pub actors: Vec<Actor>,
    pub characters: Vec<Character>,
    pub plays: Vec<Play>,
}

/// Where the CSV files live.
#[derive(Debug, Clone)]
enum DataLocation {
    /// Served over http(s), e.g. `https://theater.example.com/data`.
    Remote(Url),
    /// A directory on disk.
    Local(PathBuf),
}

/// Loads and normalizes the static CSV tables.
#[derive(Debug, Clone)]
pub struct CsvSource {
    location: DataLocation,
    client: Client,
}

impl CsvSource {
    /// Create a source for a base location: an http(s) URL or a directory path.
    pub fn new(location: &str) -> Result<Self> {
        let location = if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location)
                .map_err(|e| CatalogError::config(format!("invalid data URL '{location}': {e}")))?;
            DataLocation::Remote(url)
        } else {
            DataLocation::Local(PathBuf::from(location))
        };

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { location, client })
    }

    /// Fetch the raw text of one table.
    async fn fetch_text(&self, file: &str) -> Result<String> {
        match &self.location {
            DataLocation::Remote(base) => {
                // Keep the base path intact; Url::join would drop a
                // trailing path segment without the slash.
                let url = format!("{}/{file}", base.as_str().trim_end_matches('/'));
                debug!(%url, "fetching table");

                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Network(format!("{url}: HTTP {status}")));
                }

                response
                    .text()
                    .await
                    .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))
            }
            DataLocation::Local(dir) => {
                let path = dir.join(file);
                debug!(?path, "reading table");
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| CatalogError::io(&path, e))
            }
        }
    }

    /// Load all three tables concurrently and normalize them.
    #[instrument(skip_all)]
    pub async fn load(&self) -> Result<CatalogTables> {
        let (actors_text, characters_text, plays_text) = tokio::try_join!(
            self.fetch_text(ACTORS_FILE),
            self.fetch_text(CHARACTERS_FILE),
            self.fetch_text(PLAY_FILE),
        )?;

        let today = Utc::now().date_naive();

        let actors = normalize_actors(parse_rows(&actors_text, ACTORS_FILE)?, today)?;
        let characters = normalize_characters(parse_rows(&characters_text, CHARACTERS_FILE)?)?;
        let plays = normalize_plays(parse_rows(&plays_text, PLAY_FILE)?)?;

        debug!(
            actors = actors.len(),
            characters = characters.len(),
            plays = plays.len(),
            "catalog tables loaded"
        );

        Ok(CatalogTables {
            actors,
            characters,
            plays,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> String {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../../fixtures/csv").to_string()
    }

    #[tokio::test]
    async fn load_from_local_fixture() {
        let source = CsvSource::new(&fixture_dir()).unwrap();
        let tables = source.load().await.unwrap();

        assert_eq!(tables.actors.len(), 3);
        assert_eq!(tables.characters.len(), 5);
        assert_eq!(tables.plays.len(), 2);
    }

    #[tokio::test]
    async fn load_from_missing_dir_is_io_error() {
        let source = CsvSource::new("/definitely/not/a/dir").unwrap();
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[tokio::test]
    async fn load_over_http() {
        let server = wiremock::MockServer::start().await;

        let actors = "\
ActorId,FirstName,LastName,DOB,Gender,SkinColor,EyeColor,HairColor,FrontImage,FullBodyImage
1,Imogen,Hale,1990-06-15,Female,,,,,
";
        let characters = "\
CharacterId,Name,Principal,Image,ActorId,PlayId
1,Hamlet,1,,1,1
";
        let plays = "\
PlayId,Title,Genre,Format,Description,Poster,Script
1,Hamnet,Drama,,,,
";

        for (path, body) in [
            ("/data/actors.csv", actors),
            ("/data/characters.csv", characters),
            ("/data/play.csv", plays),
        ] {
            wiremock::Mock::given(wiremock::matchers::method("GET"))
                .and(wiremock::matchers::path(path))
                .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(body))
                .mount(&server)
                .await;
        }

        let source = CsvSource::new(&format!("{}/data", server.uri())).unwrap();
        let tables = source.load().await.unwrap();

        assert_eq!(tables.actors.len(), 1);
        assert_eq!(tables.characters[0].name, "Hamlet");
        assert_eq!(tables.plays[0].title, "Hamnet");
    }

    #[tokio::test]
    async fn http_error_fails_the_load() {
        let server = wiremock::MockServer::start().await;

        // Only actors.csv exists; the other two 404
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/actors.csv"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string("ActorId,FirstName,LastName\n1,A,B\n"),
            )
            .mount(&server)
            .await;

        let source = CsvSource::new(&server.uri()).unwrap();
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert!(err.to_string().contains("404"));
    }
}
