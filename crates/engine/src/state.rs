//! State aggregator — the single owner of per-traveler mutable state.
//!
//! An explicit keyed store (user id → [`EmotionalState`]) shared via
//! `Arc`, replacing any notion of module-level global state. Entries are
//! created on first contact, updated in place on every message, and
//! evictable on inactivity. Reads return defensive copies so callers
//! can never corrupt in-place history; same-user concurrent updates are
//! serialized by the store's write lock.

use calmwing_core::state::{EmotionalState, HIGH_ANXIETY_THRESHOLD, HISTORY_LIMIT, Trend};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// How many trailing samples the trend derivation looks at.
const TREND_WINDOW: usize = 3;

/// Keyed per-traveler state store.
pub struct StateStore {
    states: RwLock<HashMap<String, EmotionalState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Fold a new message and anxiety sample into the traveler's state,
    /// creating it on first contact. Out-of-range levels are clamped to
    /// [0,10], never rejected. Returns a snapshot of the updated state.
    pub async fn update(&self, user_id: &str, message: &str, anxiety_level: i32) -> EmotionalState {
        let level = anxiety_level.clamp(0, 10) as u8;

        let mut states = self.states.write().await;
        let state = states.entry(user_id.to_string()).or_default();

        state.anxiety_level = level;
        state.anxiety_history.push(level);
        state.message_history.push(message.to_string());
        if state.anxiety_history.len() > HISTORY_LIMIT {
            state.anxiety_history.remove(0);
        }
        if state.message_history.len() > HISTORY_LIMIT {
            state.message_history.remove(0);
        }

        state.trend = derive_trend(&state.anxiety_history);
        state.spikes_in_row = if level >= HIGH_ANXIETY_THRESHOLD {
            state.spikes_in_row + 1
        } else {
            0
        };
        state.last_message = message.to_string();
        state.updated_at = Utc::now();

        debug!(
            user_id,
            level,
            trend = %state.trend,
            spikes = state.spikes_in_row,
            "state updated"
        );

        state.clone()
    }

    /// Read a defensive copy of the traveler's state, if any.
    pub async fn read(&self, user_id: &str) -> Option<EmotionalState> {
        self.states.read().await.get(user_id).cloned()
    }

    /// Drop entries that have not been updated within `max_idle`.
    /// Returns how many were evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut states = self.states.write().await;
        let before = states.len();
        states.retain(|_, s| s.updated_at >= cutoff);
        before - states.len()
    }

    /// Number of travelers currently tracked.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the trend from the trailing window of samples: strictly
/// increasing → Rising, strictly decreasing → Falling, otherwise
/// Stable. Fewer than two samples → Unknown.
fn derive_trend(history: &[u8]) -> Trend {
    if history.len() < 2 {
        return Trend::Unknown;
    }
    let start = history.len().saturating_sub(TREND_WINDOW);
    let window = &history[start..];

    let rising = window.windows(2).all(|pair| pair[1] > pair[0]);
    let falling = window.windows(2).all(|pair| pair[1] < pair[0]);

    if rising {
        Trend::Rising
    } else if falling {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_contact_creates_state() {
        let store = StateStore::new();
        assert!(store.read("amelia").await.is_none());

        let state = store.update("amelia", "hi", 3).await;
        assert_eq!(state.anxiety_level, 3);
        assert_eq!(state.trend, Trend::Unknown);
        assert!(store.read("amelia").await.is_some());
    }

    #[tokio::test]
    async fn out_of_range_levels_are_clamped() {
        let store = StateStore::new();
        let state = store.update("u", "way too much", 15).await;
        assert_eq!(state.anxiety_level, 10);

        let state = store.update("u", "negative", -3).await;
        assert_eq!(state.anxiety_level, 0);
    }

    #[tokio::test]
    async fn rising_trend_from_increasing_samples() {
        let store = StateStore::new();
        for level in [4, 5, 6, 7] {
            store.update("u", "msg", level).await;
        }
        let state = store.read("u").await.unwrap();
        assert_eq!(state.trend, Trend::Rising);
    }

    #[tokio::test]
    async fn falling_trend_from_decreasing_samples() {
        let store = StateStore::new();
        for level in [7, 6, 5, 4] {
            store.update("u", "msg", level).await;
        }
        let state = store.read("u").await.unwrap();
        assert_eq!(state.trend, Trend::Falling);
    }

    #[tokio::test]
    async fn single_sample_is_unknown() {
        let store = StateStore::new();
        let state = store.update("u", "msg", 5).await;
        assert_eq!(state.trend, Trend::Unknown);
    }

    #[tokio::test]
    async fn flat_samples_are_stable() {
        let store = StateStore::new();
        for level in [5, 5, 5] {
            store.update("u", "msg", level).await;
        }
        let state = store.read("u").await.unwrap();
        assert_eq!(state.trend, Trend::Stable);
    }

    #[tokio::test]
    async fn spike_streak_counts_and_resets() {
        let store = StateStore::new();
        store.update("u", "msg", 8).await;
        store.update("u", "msg", 7).await;
        let state = store.update("u", "msg", 9).await;
        assert_eq!(state.spikes_in_row, 3);

        let state = store.update("u", "msg", 4).await;
        assert_eq!(state.spikes_in_row, 0);
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let store = StateStore::new();
        for i in 0..(HISTORY_LIMIT + 10) {
            store.update("u", &format!("msg {}", i), 5).await;
        }
        let state = store.read("u").await.unwrap();
        assert_eq!(state.anxiety_history.len(), HISTORY_LIMIT);
        assert_eq!(state.message_history.len(), HISTORY_LIMIT);
        // Oldest entries were the ones evicted.
        assert_eq!(state.message_history[0], "msg 10");
    }

    #[tokio::test]
    async fn reads_are_defensive_copies() {
        let store = StateStore::new();
        store.update("u", "original", 5).await;

        let mut copy = store.read("u").await.unwrap();
        copy.anxiety_history.clear();
        copy.spikes_in_row = 99;

        let fresh = store.read("u").await.unwrap();
        assert_eq!(fresh.anxiety_history.len(), 1);
        assert_eq!(fresh.spikes_in_row, 0);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = StateStore::new();
        store.update("a", "calm", 2).await;
        store.update("b", "panicking", 9).await;

        assert_eq!(store.read("a").await.unwrap().anxiety_level, 2);
        assert_eq!(store.read("b").await.unwrap().anxiety_level, 9);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_same_user_updates_lose_nothing() {
        use std::sync::Arc;

        let store = Arc::new(StateStore::new());
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.update("u", &format!("msg {}", i), 5).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let state = store.read("u").await.unwrap();
        assert_eq!(state.anxiety_history.len(), 20);
        assert_eq!(state.message_history.len(), 20);
    }

    #[tokio::test]
    async fn idle_entries_are_evicted() {
        let store = StateStore::new();
        store.update("u", "msg", 5).await;

        assert_eq!(store.evict_idle(Duration::hours(1)).await, 0);
        assert_eq!(store.len().await, 1);

        // Anything idle for a negative duration is by definition stale.
        assert_eq!(store.evict_idle(Duration::seconds(-1)).await, 1);
        assert!(store.is_empty().await);
    }
}
