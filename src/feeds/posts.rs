use super::{CommunityApi, FeedData, FeedFetcher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub struct PostsFetcher {
    api: Arc<dyn CommunityApi>,
}

impl PostsFetcher {
    pub fn new(api: Arc<dyn CommunityApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FeedFetcher for PostsFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        let posts = self.api.posts().await.context("failed to load posts")?;
        tracing::debug!(count = posts.len(), "fetched posts");
        Ok(FeedData::Posts(posts))
    }
}
