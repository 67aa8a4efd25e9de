//! HTTP implementation of the [`GameApi`] contract.
//!
//! Plain JSON over HTTP, no auth headers, no versioning. Any non-2xx
//! status is a uniform failure carrying the status code and the raw body
//! text; the body is logged, never parsed into error codes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use undercover_core::api::GameApi;
use undercover_core::error::{GameError, Result};
use undercover_core::model::{
    Category, EliminationResult, PlayerId, Question, Round, RoundId, Session, SessionConfig,
    SessionId, Vote,
};

use crate::config::ClientConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    player_names: &'a [String],
    session_config_dto: &'a SessionConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CastVoteRequest {
    round_id: RoundId,
    voter_id: PlayerId,
    voted_for_id: PlayerId,
}

/// The game backend over HTTP.
#[derive(Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%method, %url, "api request");
        self.client.request(method, url)
    }

    /// Sends a request and returns the body text of a 2xx response.
    async fn send(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(status = status.as_u16(), %body, "server rejected request");
            return Err(GameError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.send(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn create_session(&self, names: &[String], config: &SessionConfig) -> Result<Session> {
        let request = CreateSessionRequest {
            player_names: names,
            session_config_dto: config,
        };
        self.fetch(self.request(Method::POST, "game/session").json(&request))
            .await
    }

    async fn start_round(&self, session_id: SessionId) -> Result<Round> {
        self.fetch(self.request(Method::POST, &format!("game/{session_id}/round")))
            .await
    }

    async fn session_status(&self, session_id: SessionId) -> Result<Session> {
        self.fetch(self.request(Method::GET, &format!("game/{session_id}/status")))
            .await
    }

    async fn finish_round(&self, round_id: RoundId) -> Result<()> {
        self.send(self.request(Method::POST, &format!("game/round/{round_id}/finish")))
            .await?;
        Ok(())
    }

    async fn next_round(&self, session_id: SessionId, current_round_id: RoundId) -> Result<Round> {
        self.fetch(self.request(
            Method::POST,
            &format!("game/{session_id}/next-round/{current_round_id}"),
        ))
        .await
    }

    async fn finish_session(&self, session_id: SessionId) -> Result<()> {
        self.send(self.request(Method::POST, &format!("game/{session_id}/end")))
            .await?;
        Ok(())
    }

    async fn cast_vote(
        &self,
        round_id: RoundId,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<Vote> {
        let request = CastVoteRequest {
            round_id,
            voter_id: voter,
            voted_for_id: target,
        };
        self.fetch(self.request(Method::POST, "votes/cast").json(&request))
            .await
    }

    async fn votes_for_round(&self, round_id: RoundId) -> Result<Vec<Vote>> {
        let body = self
            .send(self.request(Method::GET, &format!("votes/round/{round_id}")))
            .await?;
        // Shape check: an empty list is a legitimate "no votes" state,
        // but anything that is not a list at all is invalid data.
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if !value.is_array() {
            warn!(round = round_id, %value, "votes endpoint returned a non-list");
            return Err(GameError::invalid_data(
                "votes endpoint returned a non-list",
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn player_vote(&self, round_id: RoundId, player: PlayerId) -> Result<Option<Vote>> {
        let builder = self.request(
            Method::GET,
            &format!("votes/round/{round_id}/player/{player}"),
        );
        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(status = status.as_u16(), %body, "server rejected request");
            return Err(GameError::Api {
                status: status.as_u16(),
                body,
            });
        }
        decode_optional_vote(&body)
    }

    async fn vote_count(&self, round_id: RoundId) -> Result<u32> {
        let body = self
            .send(self.request(Method::GET, &format!("votes/round/{round_id}/count")))
            .await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        value
            .as_u64()
            .map(|n| n as u32)
            .ok_or_else(|| GameError::invalid_data("vote count endpoint returned a non-number"))
    }

    async fn eliminate_player(
        &self,
        round_id: RoundId,
        player: PlayerId,
    ) -> Result<EliminationResult> {
        let body = self
            .send(self.request(
                Method::POST,
                &format!("game/round/{round_id}/eliminate/{player}"),
            ))
            .await?;
        // Some backend versions return only the updated player.
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.get("player").is_some() {
            Ok(serde_json::from_value(value)?)
        } else {
            #[derive(Deserialize)]
            struct Bare(undercover_core::model::Player);
            let Bare(player) = serde_json::from_value(value)?;
            Ok(EliminationResult {
                player,
                session: None,
            })
        }
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.fetch(self.request(Method::GET, "categories")).await
    }

    async fn random_question(&self) -> Result<Question> {
        self.fetch(self.request(Method::GET, "questions/random"))
            .await
    }
}

/// An empty body means the player has not voted yet; anything else must
/// parse, so a garbled payload is reported instead of passing for "no
/// vote".
fn decode_optional_vote(body: &str) -> Result<Option<Vote>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpGameApi {
        let config = ClientConfig {
            base_url: "http://localhost:9999/api/".into(),
            ..ClientConfig::default()
        };
        HttpGameApi::new(&config).unwrap()
    }

    #[test]
    fn trailing_slash_is_normalized() {
        assert_eq!(api().base_url(), "http://localhost:9999/api");
    }

    #[test]
    fn create_session_request_matches_backend_shape() {
        let names = vec!["Ada".to_string(), "Bob".to_string(), "Cyd".to_string()];
        let config = SessionConfig::classic(1, 3);
        let request = CreateSessionRequest {
            player_names: &names,
            session_config_dto: &config,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["playerNames"][0], "Ada");
        assert_eq!(json["sessionConfigDto"]["categoryId"], 1);
        assert_eq!(json["sessionConfigDto"]["gameMode"], "CLASSIC");
    }

    #[test]
    fn cast_vote_request_matches_backend_shape() {
        let request = CastVoteRequest {
            round_id: 10,
            voter_id: 1,
            voted_for_id: 2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["roundId"], 10);
        assert_eq!(json["voterId"], 1);
        assert_eq!(json["votedForId"], 2);
    }

    #[test]
    fn empty_player_vote_body_means_no_vote() {
        assert!(decode_optional_vote("").unwrap().is_none());
        assert!(decode_optional_vote("   \n").unwrap().is_none());
    }

    #[test]
    fn garbled_player_vote_body_is_invalid_data() {
        let err = decode_optional_vote("{not json").unwrap_err();
        assert!(err.is_invalid_data());
    }

    #[test]
    fn player_vote_body_parses_when_well_formed() {
        let body = r#"{"id": 7, "voter": null, "votedFor": null}"#;
        let vote = decode_optional_vote(body).unwrap().unwrap();
        assert_eq!(vote.id, 7);
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_transport_error() {
        // Nothing listens on this port; the client must fail with a
        // transport error, not a panic or a status error.
        let err = api().categories().await.unwrap_err();
        assert!(err.is_network());
    }
}
