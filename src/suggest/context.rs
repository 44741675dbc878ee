//! Per-conversation session state consulted by the timing gate and scoring.
//!
//! Owned by the caller and handed in every turn. The decision core only reads
//! it and appends to the suggestion history; a new conversation gets a fresh
//! `ConversationContext::default()`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One affect snapshot per user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectSnapshot {
    pub emotion: String,
    pub energy: u8,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    #[serde(default)]
    pub turn_count: u32,
    #[serde(default)]
    pub last_assistant_message: String,
    /// Activity ids in the order they were suggested. Append-only.
    #[serde(default)]
    pub suggested_activities: Vec<String>,
    /// Set on the first need-based (non-explicit) suggestion.
    #[serde(default)]
    pub has_suggested_in_session: bool,
    #[serde(default)]
    pub emotion_progression: Vec<AffectSnapshot>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more user turn. Never decreases.
    pub fn record_user_turn(&mut self) {
        self.turn_count = self.turn_count.saturating_add(1);
    }

    pub fn record_assistant_message(&mut self, text: impl Into<String>) {
        self.last_assistant_message = text.into();
    }

    pub fn record_affect(&mut self, emotion: &str, energy: u8) {
        self.emotion_progression.push(AffectSnapshot {
            emotion: emotion.to_string(),
            energy,
            timestamp: chrono::Utc::now().timestamp(),
        });
    }

    pub(crate) fn record_suggestion(&mut self, activity_id: &str, need_based: bool) {
        self.suggested_activities.push(activity_id.to_string());
        if need_based {
            self.has_suggested_in_session = true;
        }
    }

    /// Whether `activity_id` is among the last `window` suggestions.
    pub fn was_recently_suggested(&self, activity_id: &str, window: usize) -> bool {
        self.suggested_activities
            .iter()
            .rev()
            .take(window)
            .any(|id| id == activity_id)
    }

    /// Most frequent emotion label so far; the earliest label wins ties.
    pub fn dominant_emotion(&self) -> Option<&str> {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (idx, snap) in self.emotion_progression.iter().enumerate() {
            let entry = counts.entry(snap.emotion.as_str()).or_insert((0, idx));
            entry.0 += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(emotion, _)| emotion)
    }
}
