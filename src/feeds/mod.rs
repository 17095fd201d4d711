pub mod client;
pub mod leaderboard;
pub mod like;
pub mod posts;

#[cfg(test)]
pub(crate) mod mock;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

pub use like::{ContentType, LikeMessage, LikeOutcome, LikeTarget};

/// Result of a view's mount fetch, tagged with the mount that requested it.
#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub mount_id: u64,
    pub data: FeedData,
}

#[derive(Debug, Clone)]
pub enum FeedData {
    Posts(Vec<Post>),
    Leaderboard(Vec<LeaderboardEntry>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author: User,
    pub content: String,
    pub like_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author: User,
    pub content: String,
    pub like_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

// Reply chains can be nested far deeper than the call stack allows, so
// tear them down with a worklist instead of recursive drops.
impl Drop for Comment {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut comment) = pending.pop() {
            pending.append(&mut comment.replies);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: u64,
    pub username: String,
    pub karma: f64,
}

/// Failure modes of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned HTTP {status}")]
    Status {
        path: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("malformed response from {path}: {source}")]
    Decode {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The three endpoints the client talks to.
#[async_trait]
pub trait CommunityApi: Send + Sync {
    async fn posts(&self) -> Result<Vec<Post>, ApiError>;
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;
    async fn like(&self, target: LikeTarget) -> Result<LikeOutcome, ApiError>;
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FeedData>;
}
