//! Affect reading: the upstream emotion analyzer's verdict on a message.
//!
//! Parsing is fail-open: anything missing or malformed degrades to a neutral
//! reading (emotion "neutral", energy 5) instead of an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NEUTRAL_EMOTION: &str = "neutral";
pub const NEUTRAL_ENERGY: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    #[default]
    Low,
    Medium,
    High,
    Crisis,
}

impl UrgencyLevel {
    /// Lenient parse; unknown labels are `Low`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "medium" => Self::Medium,
            "high" => Self::High,
            "crisis" => Self::Crisis,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectReading {
    pub emotion: String,
    /// 1 (very low) to 10 (very high).
    pub energy: u8,
    pub urgency: UrgencyLevel,
    pub themes: Vec<String>,
}

impl Default for AffectReading {
    fn default() -> Self {
        Self::neutral()
    }
}

// Analyzer keys first, then the camelCase collaborator keys. The first key
// present with a usable value wins, so a payload carrying two spellings of
// the same field still parses.
const EMOTION_KEYS: &[&str] = &["emotion_state", "emotion", "emotionLabel", "emotion_label"];
const ENERGY_KEYS: &[&str] = &["energy_level", "energy", "energyLevel"];
const URGENCY_KEYS: &[&str] = &["urgency_level", "urgency", "urgencyLevel"];
const THEME_KEYS: &[&str] = &["detected_themes", "themes"];

impl AffectReading {
    pub fn neutral() -> Self {
        Self {
            emotion: NEUTRAL_EMOTION.to_string(),
            energy: NEUTRAL_ENERGY,
            urgency: UrgencyLevel::Low,
            themes: Vec::new(),
        }
    }

    /// Build a reading, normalizing the label and clamping energy into 1..=10.
    pub fn new(emotion: &str, energy: u8) -> Self {
        let emotion = emotion.trim().to_lowercase();
        Self {
            emotion: if emotion.is_empty() {
                NEUTRAL_EMOTION.to_string()
            } else {
                emotion
            },
            energy: energy.clamp(1, 10),
            ..Self::neutral()
        }
    }

    pub fn with_urgency(mut self, urgency: UrgencyLevel) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.themes = themes;
        self
    }

    /// Parse the analyzer's raw text output.
    ///
    /// Accepts a bare JSON object or one wrapped in a markdown code fence.
    /// Returns a neutral reading when the payload cannot be understood.
    pub fn from_model_output(text: &str) -> Self {
        match serde_json::from_str::<Value>(strip_code_fence(text)) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!("[Affect] Unparsable affect reading ({}), using neutral", e);
                Self::neutral()
            }
        }
    }

    /// Convert an already-parsed JSON value (e.g. a request body field).
    /// Fields that are missing or of the wrong type keep their neutral value.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::warn!("[Affect] Affect value is not an object, using neutral");
            return Self::neutral();
        };

        let emotion = first_of(obj, EMOTION_KEYS, Value::as_str).unwrap_or(NEUTRAL_EMOTION);
        let energy = first_of(obj, ENERGY_KEYS, energy_from_value).unwrap_or(NEUTRAL_ENERGY);
        let mut reading = Self::new(emotion, energy);
        reading.urgency = first_of(obj, URGENCY_KEYS, Value::as_str)
            .map(UrgencyLevel::parse)
            .unwrap_or_default();
        reading.themes = first_of(obj, THEME_KEYS, Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        reading
    }

    pub fn is_one_of(&self, labels: &[&str]) -> bool {
        labels.iter().any(|l| self.emotion == *l)
    }
}

fn first_of<'a, T>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
    read: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(read)
}

/// Energy may arrive as a number, a float, or a numeric string.
fn energy_from_value(v: &Value) -> Option<u8> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(1.0, 10.0) as u8)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
