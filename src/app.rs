use crate::config::Config;
use crate::feeds::{CommunityApi, FeedData, FeedMessage, LikeMessage};
use crate::ui;
use crate::ui::widgets::{FeedView, LeaderboardView, TabView};
use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Feed,
    Leaderboard,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Feed, Tab::Leaderboard];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Feed => "Feed",
            Tab::Leaderboard => "Leaderboard",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Feed => 0,
            Tab::Leaderboard => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Feed => Tab::Leaderboard,
            Tab::Leaderboard => Tab::Feed,
        }
    }

    fn view(self) -> Box<dyn TabView> {
        match self {
            Tab::Feed => Box::new(FeedView::new()),
            Tab::Leaderboard => Box::new(LeaderboardView::new()),
        }
    }
}

/// Everything background tasks report back to the UI loop.
#[derive(Debug)]
pub enum AppMessage {
    Feed(FeedMessage),
    Like(LikeMessage),
}

/// The root shell. Owns the mounted view and the tasks working for it.
///
/// Each mount gets a new `mount_id`; results carrying an older id belong to
/// a view that no longer exists and are dropped.
pub struct App {
    api: Arc<dyn CommunityApi>,
    tx: UnboundedSender<AppMessage>,
    tab: Tab,
    view: Box<dyn TabView>,
    mount_id: u64,
    fetch_task: Option<JoinHandle<()>>,
    refetch_after_like: bool,
    should_quit: bool,
}

impl App {
    /// Creates the shell and mounts the configured default tab. Must be
    /// called inside a Tokio runtime.
    pub fn new(api: Arc<dyn CommunityApi>, config: &Config, tx: UnboundedSender<AppMessage>) -> Self {
        let tab = config.ui.default_tab;
        let mut app = Self {
            api,
            tx,
            tab,
            view: tab.view(),
            mount_id: 0,
            fetch_task: None,
            refetch_after_like: config.feed.refetch_after_like,
            should_quit: false,
        };
        app.mount(tab);
        app
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn view(&self) -> &dyn TabView {
        self.view.as_ref()
    }

    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replaces the current view with a fresh one for `tab` and starts its
    /// fetch. Selecting the tab that is already shown remounts it too.
    pub fn mount(&mut self, tab: Tab) {
        self.mount_id += 1;
        self.tab = tab;
        self.view = tab.view();
        tracing::info!(tab = tab.title(), mount_id = self.mount_id, "mounting view");
        self.spawn_fetch();
    }

    /// Runs the mounted view's fetch again without replacing the view.
    fn refetch(&mut self) {
        tracing::debug!(mount_id = self.mount_id, "refetching");
        self.spawn_fetch();
    }

    fn spawn_fetch(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }

        let fetcher = self.view.create_fetcher(Arc::clone(&self.api));
        let tx = self.tx.clone();
        let mount_id = self.mount_id;

        self.fetch_task = Some(tokio::spawn(async move {
            let data = match fetcher.fetch().await {
                Ok(data) => data,
                Err(e) => {
                    let message = format!("{:#}", e);
                    tracing::warn!(mount_id, error = %message, "fetch failed");
                    FeedData::Error(message)
                }
            };
            // Only fails once the UI loop has exited.
            let _ = tx.send(AppMessage::Feed(FeedMessage { mount_id, data }));
        }));
    }

    /// Sends a like for whatever is under the cursor. Every call is an
    /// independent write; nothing is deduplicated.
    pub fn like_selected(&mut self) {
        let Some(target) = self.view.like_target() else {
            return;
        };

        tracing::info!(%target, "sending like");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let mount_id = self.mount_id;

        tokio::spawn(async move {
            let result = api.like(target).await.map_err(|e| {
                tracing::warn!(%target, error = %e, "like failed");
                e.to_string()
            });
            let _ = tx.send(AppMessage::Like(LikeMessage {
                mount_id,
                target,
                result,
            }));
        });
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Feed(FeedMessage { mount_id, data }) => {
                if mount_id != self.mount_id {
                    tracing::debug!(mount_id, current = self.mount_id, "dropping stale fetch result");
                    return;
                }
                self.fetch_task = None;
                self.view.update_data(data);
            }
            AppMessage::Like(LikeMessage {
                mount_id,
                target,
                result,
            }) => {
                if mount_id != self.mount_id {
                    tracing::debug!(mount_id, current = self.mount_id, "dropping stale like result");
                    return;
                }
                self.view.record_like(target, &result);
                if result.is_ok() && self.refetch_after_like {
                    self.refetch();
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('1') => self.mount(Tab::Feed),
            KeyCode::Char('2') => self.mount(Tab::Leaderboard),
            KeyCode::Tab | KeyCode::BackTab => self.mount(self.tab.next()),
            KeyCode::Char('j') | KeyCode::Down => self.view.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.view.scroll_up(),
            KeyCode::Char('l') | KeyCode::Enter => self.like_selected(),
            KeyCode::Char('r') => self.mount(self.tab),
            _ => {}
        }
    }
}

/// Drives the UI until the user quits or the terminal event stream ends.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut UnboundedReceiver<AppMessage>,
    tick_rate: Duration,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick_rate);

    while !app.should_quit() {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("failed to draw frame")?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => break,
            },
            Some(message) = rx.recv() => app.handle_message(message),
            _ = ticker.tick() => {}
        }
    }

    Ok(())
}
