//! Shared config utilities for loading/saving JSON config files,
//! plus the tunable knobs of the suggestion scoring engine.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SuggestResult;

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                tracing::info!("[{}] Loaded config from {}", label, path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "[{}] Failed to parse config {}: {} — using defaults",
                    label,
                    path.display(),
                    e
                );
                T::default()
            }
        },
        Err(_) => {
            tracing::info!(
                "[{}] No config file at {} — using defaults",
                label,
                path.display()
            );
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> SuggestResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    tracing::info!("[{}] Saved config to {}", label, path.display());
    Ok(())
}

// ── Scoring knobs ──────────────────────────────────────────

/// Per-dimension multipliers applied when matching needs against capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionWeights {
    #[serde(default = "default_calming_weight")]
    pub calming: f32,
    #[serde(default = "default_distraction_weight")]
    pub distraction: f32,
    #[serde(default = "default_activation_weight")]
    pub activation: f32,
    #[serde(default = "default_processing_weight")]
    pub processing: f32,
}

fn default_calming_weight() -> f32 {
    100.0
}

fn default_distraction_weight() -> f32 {
    80.0
}

fn default_activation_weight() -> f32 {
    70.0
}

fn default_processing_weight() -> f32 {
    60.0
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            calming: default_calming_weight(),
            distraction: default_distraction_weight(),
            activation: default_activation_weight(),
            processing: default_processing_weight(),
        }
    }
}

/// Tunables for the timing gate and the need-based scoring tier.
///
/// Persisted to `suggestion_config.json`; every field has a default so a
/// partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionConfig {
    #[serde(default)]
    pub weights: DimensionWeights,
    /// A need dimension contributes only when strictly above this value.
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,
    /// Urgency strictly above this switches on the urgent modifiers.
    #[serde(default = "default_urgency_threshold")]
    pub urgency_threshold: f32,
    /// Score multiplier under urgency is `1 + immediacy * immediacy_boost`.
    #[serde(default = "default_immediacy_boost")]
    pub immediacy_boost: f32,
    #[serde(default = "default_urgent_commitment_penalty")]
    pub urgent_commitment_penalty: f32,
    /// Turns strictly below this count as early in the conversation.
    #[serde(default = "default_early_turn_threshold")]
    pub early_turn_threshold: u32,
    #[serde(default = "default_early_commitment_penalty")]
    pub early_commitment_penalty: f32,
    /// Distraction need strictly above this marks a withdrawing user.
    #[serde(default = "default_withdrawal_threshold")]
    pub withdrawal_threshold: f32,
    #[serde(default = "default_talking_penalty")]
    pub talking_penalty: f32,
    /// How many trailing entries of the suggestion history count as recent.
    #[serde(default = "default_recency_window")]
    pub recency_window: usize,
    #[serde(default = "default_recency_penalty")]
    pub recency_penalty: f32,
    /// Turns at or below this are too early for any suggestion.
    #[serde(default = "default_too_early_turns")]
    pub too_early_turns: u32,
    /// Night window start hour (inclusive), 0-23.
    #[serde(default = "default_night_start")]
    pub night_start_hour: u32,
    /// Night window end hour (exclusive), 0-23.
    #[serde(default = "default_night_end")]
    pub night_end_hour: u32,
}

fn default_dead_zone() -> f32 {
    0.3
}

fn default_urgency_threshold() -> f32 {
    0.6
}

fn default_immediacy_boost() -> f32 {
    0.5
}

fn default_urgent_commitment_penalty() -> f32 {
    15.0
}

fn default_early_turn_threshold() -> u32 {
    5
}

fn default_early_commitment_penalty() -> f32 {
    10.0
}

fn default_withdrawal_threshold() -> f32 {
    0.7
}

fn default_talking_penalty() -> f32 {
    20.0
}

fn default_recency_window() -> usize {
    3
}

fn default_recency_penalty() -> f32 {
    30.0
}

fn default_too_early_turns() -> u32 {
    1
}

fn default_night_start() -> u32 {
    22
}

fn default_night_end() -> u32 {
    6
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::default(),
            dead_zone: default_dead_zone(),
            urgency_threshold: default_urgency_threshold(),
            immediacy_boost: default_immediacy_boost(),
            urgent_commitment_penalty: default_urgent_commitment_penalty(),
            early_turn_threshold: default_early_turn_threshold(),
            early_commitment_penalty: default_early_commitment_penalty(),
            withdrawal_threshold: default_withdrawal_threshold(),
            talking_penalty: default_talking_penalty(),
            recency_window: default_recency_window(),
            recency_penalty: default_recency_penalty(),
            too_early_turns: default_too_early_turns(),
            night_start_hour: default_night_start(),
            night_end_hour: default_night_end(),
        }
    }
}

impl SuggestionConfig {
    /// Load from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        load_json_config(path, "Config")
    }

    /// Whether `hour` (0-23) falls inside the night window. The window may wrap midnight.
    pub fn is_night(&self, hour: u32) -> bool {
        let hour = hour % 24;
        if self.night_start_hour <= self.night_end_hour {
            hour >= self.night_start_hour && hour < self.night_end_hour
        } else {
            hour >= self.night_start_hour || hour < self.night_end_hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = SuggestionConfig::default();
        assert_eq!(c.weights.calming, 100.0);
        assert_eq!(c.weights.distraction, 80.0);
        assert_eq!(c.weights.activation, 70.0);
        assert_eq!(c.weights.processing, 60.0);
        assert_eq!(c.recency_window, 3);
        assert_eq!(c.too_early_turns, 1);
    }

    #[test]
    fn night_window_wraps_midnight() {
        let c = SuggestionConfig::default();
        assert!(c.is_night(22));
        assert!(c.is_night(23));
        assert!(c.is_night(0));
        assert!(c.is_night(5));
        assert!(!c.is_night(6));
        assert!(!c.is_night(14));
        assert!(!c.is_night(21));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suggestion_config.json");
        std::fs::write(&path, r#"{ "recency_penalty": 50.0 }"#).unwrap();

        let c = SuggestionConfig::load(&path);
        assert_eq!(c.recency_penalty, 50.0);
        assert_eq!(c.dead_zone, 0.3);
        assert_eq!(c.weights, DimensionWeights::default());
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SuggestionConfig::load(&dir.path().join("nope.json"));
        assert_eq!(missing, SuggestionConfig::default());

        let broken_path = dir.path().join("broken.json");
        std::fs::write(&broken_path, "{ not json").unwrap();
        assert_eq!(SuggestionConfig::load(&broken_path), SuggestionConfig::default());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("suggestion_config.json");
        let mut c = SuggestionConfig::default();
        c.talking_penalty = 35.0;
        save_json_config(&path, &c, "Config").unwrap();
        assert_eq!(SuggestionConfig::load(&path).talking_penalty, 35.0);
    }
}
