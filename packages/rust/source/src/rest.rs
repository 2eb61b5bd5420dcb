//! REST source adapter.
//!
//! Client for the theater API, mirroring the endpoints the original site
//! consumed: actor list/detail, play list, and character detail. Detail
//! payloads arrive pre-joined, so no client-side join is needed on this
//! path.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use stagedoor_shared::{
    ActorDetail, ActorId, ActorShort, CatalogError, CharacterDetail, CharacterId, PlayShort,
    Result,
};

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("stagedoor/", env!("CARGO_PKG_VERSION"));

/// Client for the theater REST API.
#[derive(Debug, Clone)]
pub struct RestSource {
    base: String,
    client: Client,
}

impl RestSource {
    /// Create a client for the given API base URL (e.g. `http://host/api`).
    pub fn new(api_base_url: &str) -> Result<Self> {
        let url = Url::parse(api_base_url)
            .map_err(|e| CatalogError::config(format!("invalid API base '{api_base_url}': {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `GET {base}/actors/all`
    #[instrument(skip(self))]
    pub async fn actors(&self) -> Result<Vec<ActorShort>> {
        self.get_json(&format!("{}/actors/all", self.base), None).await
    }

    /// `GET {base}/actors/{id}`
    #[instrument(skip(self))]
    pub async fn actor(&self, id: ActorId) -> Result<ActorDetail> {
        self.get_json(&format!("{}/actors/{id}", self.base), Some(("actor", id.0)))
            .await
    }

    /// `GET {base}/plays/all`
    #[instrument(skip(self))]
    pub async fn plays(&self) -> Result<Vec<PlayShort>> {
        self.get_json(&format!("{}/plays/all", self.base), None).await
    }

    /// `GET {base}/characters/{id}`
    #[instrument(skip(self))]
    pub async fn character(&self, id: CharacterId) -> Result<CharacterDetail> {
        self.get_json(
            &format!("{}/characters/{id}", self.base),
            Some(("character", id.0)),
        )
        .await
    }

    /// GET a JSON body. A 404 on a detail request maps to `NotFound` for
    /// the named entity; every other non-2xx is a network error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        entity: Option<(&'static str, u32)>,
    ) -> Result<T> {
        debug!(%url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some((entity, id)) = entity {
                return Err(CatalogError::not_found(entity, id));
            }
        }
        if !status.is_success() {
            return Err(CatalogError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))?;

        serde_json::from_str(&body).map_err(|e| CatalogError::parse(format!("{url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_api() -> (MockServer, RestSource) {
        let server = MockServer::start().await;
        let source = RestSource::new(&format!("{}/api", server.uri())).unwrap();
        (server, source)
    }

    #[tokio::test]
    async fn actors_list_decodes() {
        let (server, source) = mock_api().await;

        let body = serde_json::json!([
            {
                "actorId": 1,
                "firstName": "Imogen",
                "lastName": "Hale",
                "age": 34,
                "gender": "Female",
                "characters": 3,
                "principals": 1
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/api/actors/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let actors = source.actors().await.unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].full_name(), "Imogen Hale");
        assert_eq!(actors[0].character_count, 3);
        assert_eq!(actors[0].principal_count, 1);
    }

    #[tokio::test]
    async fn actor_detail_includes_cast() {
        let (server, source) = mock_api().await;

        let body = serde_json::json!({
            "actorId": 2,
            "firstName": "Theo",
            "lastName": "Marsh",
            "characters": [
                {
                    "characterId": 4,
                    "name": "Banquo",
                    "principal": false,
                    "playTitle": "Macbeth",
                    "playFormat": "Three acts"
                }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api/actors/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let detail = source.actor(ActorId(2)).await.unwrap();
        assert_eq!(detail.actor.first_name, "Theo");
        assert_eq!(detail.characters.len(), 1);
        assert_eq!(detail.characters[0].play_title.as_deref(), Some("Macbeth"));
    }

    #[tokio::test]
    async fn missing_actor_is_not_found() {
        let (server, source) = mock_api().await;

        Mock::given(method("GET"))
            .and(path("/api/actors/7"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such actor"))
            .mount(&server)
            .await;

        let err = source.actor(ActorId(7)).await.unwrap_err();
        assert_eq!(err.to_string(), "actor 7 not found");
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let (server, source) = mock_api().await;

        Mock::given(method("GET"))
            .and(path("/api/plays/all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source.plays().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (server, source) = mock_api().await;

        Mock::given(method("GET"))
            .and(path("/api/characters/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source.character(CharacterId(3)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
