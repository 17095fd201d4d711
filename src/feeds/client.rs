use super::{ApiError, CommunityApi, LeaderboardEntry, LikeOutcome, LikeTarget, Post};
use crate::config::ApiConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const POSTS_PATH: &str = "/api/posts/";
pub const LEADERBOARD_PATH: &str = "/api/leaderboard/";
pub const LIKE_PATH: &str = "/api/like/";

const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP implementation of [`CommunityApi`]. One instance is built at startup
/// and shared by every view.
pub struct HttpApi {
    base_url: String,
    csrf_token: Option<String>,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url)
            .with_context(|| format!("invalid API base URL: {}", base_url))?;

        // Django session auth: seed the jar so every request carries the
        // session, and let the server's Set-Cookie headers update it.
        let jar = Jar::default();
        if let Some(session_id) = &config.session_id {
            jar.add_cookie_str(&format!("sessionid={}; Path=/", session_id), &origin);
        }
        if let Some(csrf_token) = &config.csrf_token {
            jar.add_cookie_str(&format!("csrftoken={}; Path=/", csrf_token), &origin);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("playtui/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(Arc::new(jar))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url,
            csrf_token: config.csrf_token.clone(),
            client,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport { path, source })?;

        let body = read_body(path, response).await?;
        decode(path, &body)
    }
}

/// Parses a JSON body without serde_json's nesting limit. Comment threads
/// arrive as nested `replies` arrays of any depth; the stack grows on the
/// heap as needed and the renderer applies its own depth guard.
fn decode<T: DeserializeOwned>(path: &'static str, body: &str) -> Result<T, ApiError> {
    let mut de = serde_json::Deserializer::from_str(body);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(|source| ApiError::Decode { path, source })?;
    de.end().map_err(|source| ApiError::Decode { path, source })?;
    Ok(value)
}

/// Reads the body of a successful response, turning any other status into
/// [`ApiError::Status`].
async fn read_body(path: &'static str, response: Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status { path, status });
    }

    response
        .text()
        .await
        .map_err(|source| ApiError::Transport { path, source })
}

#[async_trait]
impl CommunityApi for HttpApi {
    async fn posts(&self) -> Result<Vec<Post>, ApiError> {
        self.get_json(POSTS_PATH).await
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.get_json(LEADERBOARD_PATH).await
    }

    async fn like(&self, target: LikeTarget) -> Result<LikeOutcome, ApiError> {
        tracing::debug!(path = LIKE_PATH, %target, "POST");
        let mut request = self.client.post(self.endpoint(LIKE_PATH)).json(&target);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            path: LIKE_PATH,
            source,
        })?;

        let status = response.status();
        let body = read_body(LIKE_PATH, response).await?;
        let outcome = LikeOutcome::from_body(&body);
        if outcome == LikeOutcome::Unrecognised {
            tracing::warn!(%status, body = %body, "unrecognised like response");
        }
        Ok(outcome)
    }
}
