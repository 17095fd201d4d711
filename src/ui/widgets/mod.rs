pub mod comment;
pub mod feed;
pub mod leaderboard;

use crate::feeds::{CommunityApi, FeedData, FeedFetcher, LikeOutcome, LikeTarget};
use ratatui::{layout::Rect, Frame};
use std::any::Any;
use std::sync::Arc;

pub use feed::FeedView;
pub use leaderboard::LeaderboardView;

/// A view mounted under one tab. A fresh instance is created on every mount,
/// so implementations hold no state that should survive a tab switch.
pub trait TabView: Send {
    fn title(&self) -> &str;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Applies the result of this view's mount fetch.
    fn update_data(&mut self, data: FeedData);

    fn create_fetcher(&self, api: Arc<dyn CommunityApi>) -> Box<dyn FeedFetcher>;

    fn scroll_up(&mut self);

    fn scroll_down(&mut self);

    /// The like control under the cursor, if the view has one.
    fn like_target(&self) -> Option<LikeTarget> {
        None
    }

    fn record_like(&mut self, _target: LikeTarget, _result: &Result<LikeOutcome, String>) {}

    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}
