use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use storage::{
    dto::consensus::{CastVoteRequest, ConfirmMenuRequest, ProgressResponse, ShareResponse},
    models::{Course, DuelVote, FinalMenuRecord},
    services::{consensus::ConsensusResolution, duels::Duel},
};

use crate::error::{ClientError, Result};

/// Thin client for the consensus endpoints of the menu API
pub struct MenuApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl MenuApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("menu-poll/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn progress(&self) -> Result<ProgressResponse> {
        self.send(self.client.get(self.url("/api/consensus/progress")))
            .await
    }

    pub async fn results(&self, force: bool) -> Result<ConsensusResolution> {
        let request = self
            .client
            .get(self.url("/api/consensus/results"))
            .query(&[("force", force)]);
        self.send(request).await
    }

    pub async fn share(&self) -> Result<ShareResponse> {
        self.send(self.client.get(self.url("/api/consensus/share")))
            .await
    }

    pub async fn duels(&self, course: Course, user_name: &str) -> Result<Vec<Duel>> {
        let request = self
            .client
            .get(self.url(&format!("/api/consensus/duels/{}", course)))
            .query(&[("user_name", user_name)]);
        self.send(request).await
    }

    pub async fn cast_vote(&self, vote: &CastVoteRequest) -> Result<DuelVote> {
        self.send(self.client.post(self.url("/api/consensus/votes")).json(vote))
            .await
    }

    pub async fn confirm(&self, event_key: Option<String>) -> Result<FinalMenuRecord> {
        let body = ConfirmMenuRequest { event_key };
        self.send(self.client.post(self.url("/api/consensus/confirm")).json(&body))
            .await
    }
}

/// Turn an error response into [`ClientError::ApiError`], preferring the
/// server's `{"error": ...}` message over the raw body
fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    ClientError::ApiError {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_error_field() {
        let err = api_error(
            StatusCode::CONFLICT,
            br#"{"error":"Not every participant has finished voting"}"#,
        );
        assert!(err.is_not_ready());
        assert_eq!(
            err.to_string(),
            "Server returned 409: Not every participant has finished voting"
        );
    }

    #[test]
    fn test_api_error_falls_back_to_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, b"upstream down");
        assert!(!err.is_not_ready());
        assert!(err.to_string().ends_with("upstream down"));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = MenuApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.url("/api/x"), "http://localhost:8080/api/x");
    }
}
