pub mod widgets;

use crate::app::{App, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

const HELP: &[(&str, &str)] = &[
    ("1/2/Tab", "switch"),
    ("j/k", "scroll"),
    ("l", "like"),
    ("r", "refresh"),
    ("q", "quit"),
];

/// Draws the shell: tab bar, the mounted view, and the key help line.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!("{} {}", tab.index() + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Playto Community ")
                .borders(Borders::ALL),
        )
        .select(app.tab().index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, chunks[0]);

    app.view().render(frame, chunks[1]);

    let mut help = Vec::new();
    for (i, (key, action)) in HELP.iter().enumerate() {
        if i > 0 {
            help.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
        }
        help.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        help.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(help)), chunks[2]);
}

/// Flattens a rendered buffer into one string per row.
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
