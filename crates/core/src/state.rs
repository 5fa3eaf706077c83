//! Emotional-state domain types.
//!
//! An [`EmotionalState`] is the per-traveler aggregate that the state
//! store folds incoming messages into: latest anxiety level, a bounded
//! rolling history, a derived trend, and the consecutive high-anxiety
//! streak. `trend` and `spikes_in_row` are derived by the aggregator,
//! never set directly by callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anxiety samples at or above this value count as a spike.
pub const HIGH_ANXIETY_THRESHOLD: u8 = 7;

/// Maximum retained history samples (levels and messages). Oldest
/// entries are evicted past this bound.
pub const HISTORY_LIMIT: usize = 50;

/// Direction of the traveler's recent anxiety, derived from the last
/// few samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Strictly increasing over the recent window
    Rising,
    /// Strictly decreasing over the recent window
    Falling,
    /// Neither strictly increasing nor decreasing
    Stable,
    /// Fewer than two samples exist
    Unknown,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
            Trend::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// The per-traveler emotional aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Latest self-reported or engine-derived anxiety, clamped to [0,10]
    pub anxiety_level: u8,

    /// Chronological anxiety samples, bounded to [`HISTORY_LIMIT`]
    pub anxiety_history: Vec<u8>,

    /// Raw past user messages, same bound and order as `anxiety_history`
    pub message_history: Vec<String>,

    /// Derived direction of recent samples
    pub trend: Trend,

    /// Consecutive samples at or above [`HIGH_ANXIETY_THRESHOLD`]
    pub spikes_in_row: u32,

    /// Most recent raw user text
    pub last_message: String,

    /// When this state was first created
    pub created_at: DateTime<Utc>,

    /// When the last sample was folded in
    pub updated_at: DateTime<Utc>,
}

impl EmotionalState {
    /// Create an empty state for a first contact.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            anxiety_level: 0,
            anxiety_history: Vec::new(),
            message_history: Vec::new(),
            trend: Trend::Unknown,
            spikes_in_row: 0,
            last_message: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mean of the recorded anxiety samples, or `None` before the first
    /// sample.
    pub fn average_anxiety(&self) -> Option<f32> {
        if self.anxiety_history.is_empty() {
            return None;
        }
        let sum: u32 = self.anxiety_history.iter().map(|&v| v as u32).sum();
        Some(sum as f32 / self.anxiety_history.len() as f32)
    }

    /// The last `n` recorded messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[String] {
        let start = self.message_history.len().saturating_sub(n);
        &self.message_history[start..]
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_unknown_trend() {
        let state = EmotionalState::new();
        assert_eq!(state.trend, Trend::Unknown);
        assert_eq!(state.spikes_in_row, 0);
        assert!(state.average_anxiety().is_none());
    }

    #[test]
    fn average_over_history() {
        let mut state = EmotionalState::new();
        state.anxiety_history = vec![2, 4, 6];
        assert_eq!(state.average_anxiety(), Some(4.0));
    }

    #[test]
    fn recent_messages_returns_tail() {
        let mut state = EmotionalState::new();
        state.message_history = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let recent = state.recent_messages(3);
        assert_eq!(recent, &["b".to_string(), "c".into(), "d".into()]);
    }

    #[test]
    fn recent_messages_handles_short_history() {
        let mut state = EmotionalState::new();
        state.message_history = vec!["only".into()];
        assert_eq!(state.recent_messages(3).len(), 1);
    }
}
