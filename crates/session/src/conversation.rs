//! Append-only question/answer history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Bot,
}

/// One entry in the conversation. The role is stored, never inferred
/// from position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOrder {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a question and its answer: one user turn, then one bot turn.
    pub fn append_exchange(&mut self, question: &str, answer: &str) {
        let at = Utc::now();
        self.turns.push(Turn {
            role: TurnRole::User,
            content: question.to_string(),
            at,
        });
        self.turns.push(Turn {
            role: TurnRole::Bot,
            content: answer.to_string(),
            at,
        });
    }

    /// Turns in chronological order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn render(&self, order: RenderOrder) -> Vec<Turn> {
        match order {
            RenderOrder::Newest => self.turns.iter().rev().cloned().collect(),
            RenderOrder::Oldest => self.turns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with(exchanges: &[(&str, &str)]) -> ConversationLog {
        let mut log = ConversationLog::new();
        for (q, a) in exchanges {
            log.append_exchange(q, a);
        }
        log
    }

    #[test]
    fn exchange_appends_user_then_bot() {
        let log = log_with(&[("What color is the sky?", "blue")]);
        let turns = log.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "What color is the sky?");
        assert_eq!(turns[1].role, TurnRole::Bot);
        assert_eq!(turns[1].content, "blue");
    }

    #[test]
    fn newest_first_keeps_stored_roles() {
        let log = log_with(&[("q1", "a1"), ("q2", "a2")]);
        let rendered = log.render(RenderOrder::Newest);
        let got: Vec<_> = rendered.iter().map(|t| (t.role, t.content.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (TurnRole::Bot, "a2"),
                (TurnRole::User, "q2"),
                (TurnRole::Bot, "a1"),
                (TurnRole::User, "q1"),
            ]
        );
    }

    #[test]
    fn user_content_is_not_sliced() {
        // A longer question than answer must come back whole.
        let log = log_with(&[("a rather long question here", "short")]);
        let rendered = log.render(RenderOrder::Newest);
        assert_eq!(rendered[1].content, "a rather long question here");
    }

    #[test]
    fn oldest_first_is_chronological() {
        let log = log_with(&[("q1", "a1"), ("q2", "a2")]);
        let rendered = log.render(RenderOrder::Oldest);
        assert_eq!(rendered[0].content, "q1");
        assert_eq!(rendered[3].content, "a2");
        assert_eq!(log.exchanges(), 2);
    }

    #[test]
    fn render_order_parses_from_query_values() {
        let newest: RenderOrder = serde_json::from_str("\"newest\"").unwrap();
        let oldest: RenderOrder = serde_json::from_str("\"oldest\"").unwrap();
        assert_eq!(newest, RenderOrder::Newest);
        assert_eq!(oldest, RenderOrder::Oldest);
        assert_eq!(RenderOrder::default(), RenderOrder::Newest);
    }
}
