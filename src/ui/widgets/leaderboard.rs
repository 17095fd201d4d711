use crate::feeds::leaderboard::LeaderboardFetcher;
use crate::feeds::{CommunityApi, FeedData, FeedFetcher, LeaderboardEntry};
use crate::ui::widgets::TabView;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use std::any::Any;
use std::sync::Arc;

/// Which of the three leaderboard screens to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardDisplay {
    Loading,
    Empty,
    Ranked,
}

impl LeaderboardDisplay {
    pub fn select(loading: bool, count: usize) -> Self {
        match (loading, count) {
            (true, _) => Self::Loading,
            (false, 0) => Self::Empty,
            (false, _) => Self::Ranked,
        }
    }
}

/// `loading` starts true and drops to false on the first fetch result,
/// success or failure. It only comes back with a new mount.
pub struct LeaderboardView {
    leaders: Vec<LeaderboardEntry>,
    loading: bool,
    error: Option<String>,
    scroll_state: ListState,
}

impl LeaderboardView {
    pub fn new() -> Self {
        let mut scroll_state = ListState::default();
        scroll_state.select(Some(0));

        Self {
            leaders: Vec::new(),
            loading: true,
            error: None,
            scroll_state,
        }
    }

    pub fn leaders(&self) -> &[LeaderboardEntry] {
        &self.leaders
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn display(&self) -> LeaderboardDisplay {
        LeaderboardDisplay::select(self.loading, self.leaders.len())
    }
}

impl Default for LeaderboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl TabView for LeaderboardView {
    fn title(&self) -> &str {
        "Leaderboard (Last 24h)"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let muted = Style::default().fg(Color::DarkGray);

        match self.display() {
            LeaderboardDisplay::Loading => {
                let text = List::new(vec![ListItem::new(Span::styled(
                    "Loading leaderboard...",
                    muted,
                ))])
                .block(block);
                frame.render_widget(text, area);
            }
            LeaderboardDisplay::Empty => {
                let mut items = vec![ListItem::new(Span::styled(
                    "No karma activity in the last 24 hours.",
                    muted,
                ))];
                if let Some(ref error) = self.error {
                    items.push(ListItem::new(Span::styled(
                        format!("Error: {}", error),
                        Style::default().fg(Color::Red),
                    )));
                }
                frame.render_widget(List::new(items).block(block), area);
            }
            LeaderboardDisplay::Ranked => {
                let items: Vec<ListItem> = self
                    .leaders
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| {
                        ListItem::new(Line::from(vec![
                            Span::styled(format!("{}. ", i + 1), muted),
                            Span::styled(
                                entry.username.as_str(),
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(" — {} points", entry.karma)),
                        ]))
                    })
                    .collect();

                let list = List::new(items).block(block).highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                );

                let mut state = self.scroll_state.clone();
                frame.render_stateful_widget(list, area, &mut state);
            }
        }
    }

    fn update_data(&mut self, data: FeedData) {
        self.loading = false;
        match data {
            FeedData::Leaderboard(leaders) => {
                self.leaders = leaders;
                self.error = None;
            }
            FeedData::Error(e) => {
                self.error = Some(e);
            }
            FeedData::Posts(_) => {}
        }
    }

    fn create_fetcher(&self, api: Arc<dyn CommunityApi>) -> Box<dyn FeedFetcher> {
        Box::new(LeaderboardFetcher::new(api))
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
            if selected < self.leaders.len().saturating_sub(1) {
                self.scroll_state.select(Some(selected + 1));
            }
        }
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::mock::leader;
    use crate::ui::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(view: &LeaderboardView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(50, 8)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_display_is_a_function_of_loading_and_count() {
        use LeaderboardDisplay::*;
        assert_eq!(LeaderboardDisplay::select(true, 0), Loading);
        assert_eq!(LeaderboardDisplay::select(true, 3), Loading);
        assert_eq!(LeaderboardDisplay::select(false, 0), Empty);
        assert_eq!(LeaderboardDisplay::select(false, 1), Ranked);
        assert_eq!(LeaderboardDisplay::select(false, 5), Ranked);
    }

    #[test]
    fn test_initial_state_is_loading() {
        let view = LeaderboardView::new();
        assert!(view.is_loading());
        assert!(view.leaders().is_empty());
        assert_eq!(view.display(), LeaderboardDisplay::Loading);
        assert!(render(&view).contains("Loading leaderboard..."));
    }

    #[test]
    fn test_success_transition() {
        let mut view = LeaderboardView::new();
        view.update_data(FeedData::Leaderboard(vec![leader(1, "a", 10.0)]));
        assert!(!view.is_loading());
        assert_eq!(view.display(), LeaderboardDisplay::Ranked);
    }

    #[test]
    fn test_failure_transition_shows_empty_state() {
        let mut view = LeaderboardView::new();
        view.update_data(FeedData::Error("failed to load leaderboard".to_string()));

        assert!(!view.is_loading());
        assert!(view.leaders().is_empty());
        assert_eq!(view.display(), LeaderboardDisplay::Empty);
        assert_eq!(view.error(), Some("failed to load leaderboard"));

        let screen = render(&view);
        assert!(screen.contains("No karma activity in the last 24 hours."));
        assert!(screen.contains("Error: failed to load leaderboard"));
    }

    #[test]
    fn test_empty_response() {
        let mut view = LeaderboardView::new();
        view.update_data(FeedData::Leaderboard(vec![]));
        assert_eq!(view.display(), LeaderboardDisplay::Empty);
        assert_eq!(view.error(), None);
    }

    #[test]
    fn test_loading_never_returns_after_settling() {
        let mut view = LeaderboardView::new();
        view.update_data(FeedData::Leaderboard(vec![leader(1, "a", 1.0)]));
        view.update_data(FeedData::Error("late".to_string()));
        view.update_data(FeedData::Leaderboard(vec![]));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_ranked_list_keeps_server_order() {
        let mut view = LeaderboardView::new();
        view.update_data(FeedData::Leaderboard(vec![
            leader(1, "a", 10.0),
            leader(2, "b", 5.0),
        ]));

        let screen = render(&view);
        let lines: Vec<&str> = screen.lines().collect();
        let first = lines.iter().position(|l| l.contains("1. a — 10")).unwrap();
        let second = lines.iter().position(|l| l.contains("2. b — 5")).unwrap();
        assert!(first < second);
        assert!(lines[first].contains("1. a — 10 points"));
    }

    #[test]
    fn test_fractional_karma() {
        let mut view = LeaderboardView::new();
        view.update_data(FeedData::Leaderboard(vec![leader(3, "c", 2.5)]));
        assert!(render(&view).contains("1. c — 2.5 points"));
    }
}
