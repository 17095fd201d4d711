//! Flattening of posts and their reply trees into list rows.
//!
//! Every post becomes one row at depth 0 and every comment one row at its
//! nesting depth, in pre-order, so a single scrollable list can show an
//! arbitrarily nested thread. The walk uses an explicit stack; subtrees
//! nested deeper than [`MAX_COMMENT_DEPTH`] collapse into one marker row.

use crate::feeds::{Comment, LikeTarget, Post};
use chrono::{DateTime, Utc};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

pub const MAX_COMMENT_DEPTH: usize = 64;

const INDENT: &str = "│ ";
const INDENT_WIDTH: usize = 2;
const MIN_TEXT_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Post,
    Comment,
    /// Stand-in for the replies of comment `id` beyond the depth limit.
    Hidden { replies: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub kind: RowKind,
    pub depth: usize,
    pub id: u64,
    pub author: String,
    pub content: String,
    pub like_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl FeedRow {
    fn post(post: &Post) -> Self {
        Self {
            kind: RowKind::Post,
            depth: 0,
            id: post.id,
            author: post.author.username.clone(),
            content: post.content.clone(),
            like_count: post.like_count,
            created_at: post.created_at,
        }
    }

    fn comment(comment: &Comment, depth: usize) -> Self {
        Self {
            kind: RowKind::Comment,
            depth,
            id: comment.id,
            author: comment.author.username.clone(),
            content: comment.content.clone(),
            like_count: comment.like_count,
            created_at: comment.created_at,
        }
    }

    fn hidden(parent: &Comment, depth: usize) -> Self {
        Self {
            kind: RowKind::Hidden {
                replies: count_comments(&parent.replies),
            },
            depth,
            id: parent.id,
            author: String::new(),
            content: String::new(),
            like_count: 0,
            created_at: None,
        }
    }

    pub fn like_target(&self) -> Option<LikeTarget> {
        match self.kind {
            RowKind::Post => Some(LikeTarget::post(self.id)),
            RowKind::Comment => Some(LikeTarget::comment(self.id)),
            RowKind::Hidden { .. } => None,
        }
    }

    /// Renders the row for a list of the given inner width.
    pub fn to_list_item(&self, width: usize) -> ListItem<'static> {
        let guide = Style::default().fg(Color::DarkGray);
        let indent = || Span::styled(INDENT.repeat(self.depth), guide);

        if let RowKind::Hidden { replies } = self.kind {
            let noun = if replies == 1 { "reply" } else { "replies" };
            return ListItem::new(Line::from(vec![
                indent(),
                Span::styled(
                    format!("… {} more {} hidden", replies, noun),
                    guide.add_modifier(Modifier::ITALIC),
                ),
            ]));
        }

        let author_style = match self.kind {
            RowKind::Post => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::Cyan),
        };

        let mut header = vec![indent(), Span::styled(self.author.clone(), author_style)];
        if let Some(created_at) = self.created_at {
            header.push(Span::styled(
                format!("  {}", created_at.format("%Y-%m-%d %H:%M")),
                guide,
            ));
        }

        let mut lines = vec![Line::from(header)];

        let text_width = width
            .saturating_sub(self.depth * INDENT_WIDTH)
            .max(MIN_TEXT_WIDTH);
        for chunk in textwrap::wrap(&self.content, text_width) {
            lines.push(Line::from(vec![indent(), Span::raw(chunk.into_owned())]));
        }

        let label = match self.kind {
            RowKind::Post => "Like Post",
            _ => "Like",
        };
        lines.push(Line::from(vec![
            indent(),
            Span::styled(
                format!("♥ {} · {}", label, self.like_count),
                Style::default().fg(Color::Blue),
            ),
        ]));

        ListItem::new(lines)
    }
}

pub fn flatten_posts(posts: &[Post]) -> Vec<FeedRow> {
    let mut rows = Vec::new();
    for post in posts {
        rows.push(FeedRow::post(post));
        flatten_comments(&post.comments, &mut rows);
    }
    rows
}

/// Appends one row per comment in `comments` and their replies, depth-first,
/// with top-level comments at depth 1.
pub fn flatten_comments(comments: &[Comment], rows: &mut Vec<FeedRow>) {
    let mut stack: Vec<(&Comment, usize)> = comments.iter().rev().map(|c| (c, 1)).collect();

    while let Some((comment, depth)) = stack.pop() {
        rows.push(FeedRow::comment(comment, depth));

        if comment.replies.is_empty() {
            continue;
        }
        if depth >= MAX_COMMENT_DEPTH {
            rows.push(FeedRow::hidden(comment, depth + 1));
            continue;
        }
        stack.extend(comment.replies.iter().rev().map(|r| (r, depth + 1)));
    }
}

fn count_comments(comments: &[Comment]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&Comment> = comments.iter().collect();
    while let Some(comment) = stack.pop() {
        count += 1;
        stack.extend(comment.replies.iter());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::mock::{comment, post};

    /// A single chain of `len` comments, each replying to the previous one.
    fn chain(len: u64) -> Vec<Comment> {
        let mut replies = Vec::new();
        for id in (1..=len).rev() {
            replies = vec![comment(id, "u", replies)];
        }
        replies
    }

    #[test]
    fn test_one_row_per_comment_in_reply_order() {
        let posts = vec![
            post(
                1,
                vec![
                    comment(10, "a", vec![comment(11, "b", vec![comment(12, "c", vec![])])]),
                    comment(20, "d", vec![comment(21, "e", vec![]), comment(22, "f", vec![])]),
                ],
            ),
            post(2, vec![comment(30, "g", vec![])]),
        ];

        let rows = flatten_posts(&posts);
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(ids, vec![1, 10, 11, 12, 20, 21, 22, 2, 30]);
        assert_eq!(depths, vec![0, 1, 2, 3, 1, 2, 2, 0, 1]);
        assert_eq!(rows[0].kind, RowKind::Post);
        assert!(rows[1..7].iter().all(|r| r.kind == RowKind::Comment));
    }

    #[test]
    fn test_row_count_for_depths_up_to_limit() {
        for depth in 0..=MAX_COMMENT_DEPTH as u64 {
            let rows = flatten_posts(&[post(1, chain(depth))]);
            assert_eq!(rows.len() as u64, depth + 1);
            assert!(rows
                .iter()
                .all(|r| !matches!(r.kind, RowKind::Hidden { .. })));
        }
    }

    #[test]
    fn test_post_without_comments() {
        let rows = flatten_posts(&[post(7, vec![])]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].like_target(), Some(LikeTarget::post(7)));
    }

    #[test]
    fn test_depth_guard_collapses_deep_threads() {
        let depth = MAX_COMMENT_DEPTH as u64 + 10;
        let rows = flatten_posts(&[post(1, chain(depth))]);

        // post + comments up to the limit + one marker
        assert_eq!(rows.len(), MAX_COMMENT_DEPTH + 2);
        let marker = rows.last().unwrap();
        assert_eq!(marker.kind, RowKind::Hidden { replies: 10 });
        assert_eq!(marker.depth, MAX_COMMENT_DEPTH + 1);
        assert_eq!(marker.like_target(), None);
    }

    #[test]
    fn test_comment_like_target() {
        let rows = flatten_posts(&[post(1, vec![comment(42, "a", vec![])])]);
        assert_eq!(rows[1].like_target(), Some(LikeTarget::comment(42)));
    }

    #[test]
    fn test_list_item_height_includes_wrapped_content() {
        let mut row = FeedRow::comment(&comment(1, "a", vec![]), 1);
        row.content = "one two three four five six seven eight".to_string();

        // header + wrapped content + like control
        assert_eq!(row.to_list_item(80).height(), 3);
        assert_eq!(row.to_list_item(12).height(), 7);
    }
}
