//! In-memory [`CommunityApi`] and fixtures for unit tests.

use super::{
    ApiError, Comment, CommunityApi, LeaderboardEntry, LikeOutcome, LikeTarget, Post, User,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockApi {
    posts: Vec<Post>,
    leaders: Vec<LeaderboardEntry>,
    fail: bool,
    post_calls: AtomicUsize,
    leaderboard_calls: AtomicUsize,
    likes: Mutex<Vec<LikeTarget>>,
}

impl MockApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn with_leaders(leaders: Vec<LeaderboardEntry>) -> Self {
        Self {
            leaders,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    pub fn leaderboard_calls(&self) -> usize {
        self.leaderboard_calls.load(Ordering::SeqCst)
    }

    pub fn likes(&self) -> Vec<LikeTarget> {
        self.likes.lock().unwrap().clone()
    }

    fn unavailable(path: &'static str) -> ApiError {
        ApiError::Status {
            path,
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[async_trait]
impl CommunityApi for MockApi {
    async fn posts(&self) -> Result<Vec<Post>, ApiError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Self::unavailable("/api/posts/"));
        }
        Ok(self.posts.clone())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.leaderboard_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Self::unavailable("/api/leaderboard/"));
        }
        Ok(self.leaders.clone())
    }

    async fn like(&self, target: LikeTarget) -> Result<LikeOutcome, ApiError> {
        self.likes.lock().unwrap().push(target);
        if self.fail {
            return Err(Self::unavailable("/api/like/"));
        }
        Ok(LikeOutcome::Liked)
    }
}

pub fn user(id: u64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
    }
}

pub fn comment(id: u64, username: &str, replies: Vec<Comment>) -> Comment {
    Comment {
        id,
        author: user(id, username),
        content: format!("comment {}", id),
        like_count: 0,
        created_at: None,
        parent: None,
        replies,
    }
}

pub fn post(id: u64, comments: Vec<Comment>) -> Post {
    Post {
        id,
        author: user(id, "poster"),
        content: format!("post {}", id),
        like_count: 0,
        created_at: None,
        comments,
    }
}

pub fn leader(user_id: u64, username: &str, karma: f64) -> LeaderboardEntry {
    LeaderboardEntry {
        user_id,
        username: username.to_string(),
        karma,
    }
}
