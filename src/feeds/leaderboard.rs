use super::{CommunityApi, FeedData, FeedFetcher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub struct LeaderboardFetcher {
    api: Arc<dyn CommunityApi>,
}

impl LeaderboardFetcher {
    pub fn new(api: Arc<dyn CommunityApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FeedFetcher for LeaderboardFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        let leaders = self
            .api
            .leaderboard()
            .await
            .context("failed to load leaderboard")?;
        tracing::debug!(count = leaders.len(), "fetched leaderboard");
        Ok(FeedData::Leaderboard(leaders))
    }
}
