use crate::feeds::posts::PostsFetcher;
use crate::feeds::{CommunityApi, FeedData, FeedFetcher, LikeOutcome, LikeTarget, Post};
use crate::ui::widgets::comment::{flatten_posts, FeedRow};
use crate::ui::widgets::TabView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct StatusLine {
    text: String,
    is_error: bool,
}

/// Posts with their comment threads. Like counts shown here are whatever the
/// last posts fetch returned; liking never edits them locally.
pub struct FeedView {
    posts: Vec<Post>,
    rows: Vec<FeedRow>,
    loading: bool,
    error: Option<String>,
    status: Option<StatusLine>,
    scroll_state: ListState,
}

impl FeedView {
    pub fn new() -> Self {
        let mut scroll_state = ListState::default();
        scroll_state.select(Some(0));

        Self {
            posts: Vec::new(),
            rows: Vec::new(),
            loading: true,
            error: None,
            status: None,
            scroll_state,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn rows(&self) -> &[FeedRow] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    pub fn selected_row(&self) -> Option<&FeedRow> {
        self.scroll_state.selected().and_then(|i| self.rows.get(i))
    }

    #[cfg(test)]
    fn select_target(&mut self, target: LikeTarget) -> bool {
        match self
            .rows
            .iter()
            .position(|row| row.like_target() == Some(target))
        {
            Some(index) => {
                self.scroll_state.select(Some(index));
                true
            }
            None => false,
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(status) = &self.status else {
            return;
        };
        let style = if status.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(status.text.as_str(), style))),
            area,
        );
    }
}

impl Default for FeedView {
    fn default() -> Self {
        Self::new()
    }
}

impl TabView for FeedView {
    fn title(&self) -> &str {
        "Feed"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // With posts on screen a failed refetch gets one line above them;
        // the full error screen is only for a feed that never loaded.
        let error_height = if self.error.is_some() && !self.rows.is_empty() {
            1
        } else {
            0
        };
        let status_height = if self.status.is_some() { 1 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(error_height),
                Constraint::Min(0),
                Constraint::Length(status_height),
            ])
            .split(inner);

        self.render_status(frame, chunks[2]);

        if self.loading && self.posts.is_empty() {
            frame.render_widget(List::new(vec![ListItem::new("Loading posts...")]), chunks[1]);
            return;
        }

        if let Some(ref error) = self.error {
            if self.rows.is_empty() {
                let lines = vec![
                    ListItem::new(Span::styled(
                        format!("Error: {}", error),
                        Style::default().fg(Color::Red),
                    )),
                    ListItem::new(Span::styled(
                        "Press r to retry.",
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                frame.render_widget(List::new(lines), chunks[1]);
                return;
            }

            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("Error: {} (r to retry)", error),
                    Style::default().fg(Color::Red),
                ))),
                chunks[0],
            );
        }

        if self.rows.is_empty() {
            frame.render_widget(List::new(vec![ListItem::new("No posts yet.")]), chunks[1]);
            return;
        }

        let width = chunks[1].width as usize;
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| row.to_list_item(width))
            .collect();

        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = self.scroll_state.clone();
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn update_data(&mut self, data: FeedData) {
        self.loading = false;
        match data {
            FeedData::Posts(posts) => {
                self.rows = flatten_posts(&posts);
                self.posts = posts;
                self.error = None;

                let selected = self.scroll_state.selected().unwrap_or(0);
                self.scroll_state.select(match self.rows.len() {
                    0 => None,
                    n => Some(selected.min(n - 1)),
                });
            }
            FeedData::Error(e) => {
                self.error = Some(e);
            }
            FeedData::Leaderboard(_) => {}
        }
    }

    fn create_fetcher(&self, api: Arc<dyn CommunityApi>) -> Box<dyn FeedFetcher> {
        Box::new(PostsFetcher::new(api))
    }

    fn scroll_up(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected > 0 {
                self.scroll_state.select(Some(selected - 1));
            }
        }
    }

    fn scroll_down(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected < self.rows.len().saturating_sub(1) {
                self.scroll_state.select(Some(selected + 1));
            }
        }
    }

    fn like_target(&self) -> Option<LikeTarget> {
        self.selected_row().and_then(FeedRow::like_target)
    }

    fn record_like(&mut self, target: LikeTarget, result: &Result<LikeOutcome, String>) {
        self.status = Some(match result {
            Ok(LikeOutcome::Liked) => StatusLine {
                text: format!("Liked {}. Press r to refresh counts.", target),
                is_error: false,
            },
            Ok(LikeOutcome::AlreadyLiked) => StatusLine {
                text: format!("You already liked {}.", target),
                is_error: false,
            },
            Ok(LikeOutcome::Unrecognised) => StatusLine {
                text: format!("Like sent for {}.", target),
                is_error: false,
            },
            Err(e) => StatusLine {
                text: format!("Could not like {}: {}", target, e),
                is_error: true,
            },
        });
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
