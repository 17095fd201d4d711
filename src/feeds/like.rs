use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Comment,
}

/// Payload of `POST /api/like/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeTarget {
    pub content_type: ContentType,
    pub object_id: u64,
}

impl LikeTarget {
    pub fn post(object_id: u64) -> Self {
        Self {
            content_type: ContentType::Post,
            object_id,
        }
    }

    pub fn comment(object_id: u64) -> Self {
        Self {
            content_type: ContentType::Comment,
            object_id,
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.content_type {
            ContentType::Post => "post",
            ContentType::Comment => "comment",
        };
        write!(f, "{} #{}", kind, self.object_id)
    }
}

/// What the server said about a like. Only used for the status line; the
/// displayed counts always come from the next posts fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    AlreadyLiked,
    Unrecognised,
}

#[derive(Debug, Deserialize)]
struct LikeResponse {
    status: String,
}

impl LikeOutcome {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<LikeResponse>(body) {
            Ok(response) => match response.status.as_str() {
                "liked" => Self::Liked,
                "already_liked" => Self::AlreadyLiked,
                _ => Self::Unrecognised,
            },
            Err(_) => Self::Unrecognised,
        }
    }
}

/// Completion of a like write, tagged with the mount that issued it.
#[derive(Debug, Clone)]
pub struct LikeMessage {
    pub mount_id: u64,
    pub target: LikeTarget,
    pub result: Result<LikeOutcome, String>,
}
