//! Companion phrase banks: localized lines that frame a suggestion card.
//!
//! Presentation only. The banks live in a JSON resource so wording and new
//! locales can change without touching the decision logic.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::locale::{Language, LocalizedText};
use crate::error::{SuggestError, SuggestResult};

const BUILTIN_PHRASES: &str = include_str!("../../resources/phrases.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalizedList {
    pub vi: Vec<String>,
    pub en: Vec<String>,
}

impl LocalizedList {
    fn get(&self, language: Language) -> &[String] {
        match language {
            Language::Vi => &self.vi,
            Language::En => &self.en,
        }
    }

    fn is_complete(&self) -> bool {
        !self.vi.is_empty() && !self.en.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseBank {
    lead_in: LocalizedList,
    follow_up: LocalizedList,
    /// Placeholders: `{name}`, `{duration}`, `{reason}`.
    offer_template: LocalizedText,
    /// Placeholders: `{name}`, `{emotion}`.
    reason_template: LocalizedText,
    /// Placeholder: `{name}`.
    reason_generic: LocalizedText,
    #[serde(default)]
    emotion_labels: HashMap<String, LocalizedText>,
}

impl PhraseBank {
    pub fn builtin() -> SuggestResult<Self> {
        Self::from_json(BUILTIN_PHRASES)
    }

    pub fn from_json(json: &str) -> SuggestResult<Self> {
        let bank: Self = serde_json::from_str(json)?;
        if !bank.lead_in.is_complete() || !bank.follow_up.is_complete() {
            return Err(SuggestError::Config(
                "phrase bank needs at least one lead-in and follow-up per language".to_string(),
            ));
        }
        Ok(bank)
    }

    pub fn load_or_builtin(path: &Path) -> SuggestResult<Self> {
        let loaded = std::fs::read_to_string(path)
            .map_err(SuggestError::from)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(bank) => {
                tracing::info!("[Phrases] Loaded phrase bank from {}", path.display());
                Ok(bank)
            }
            Err(e) => {
                tracing::warn!(
                    "[Phrases] Could not load {}: {} — using built-in phrases",
                    path.display(),
                    e
                );
                Self::builtin()
            }
        }
    }

    pub fn lead_in<R: Rng + ?Sized>(&self, language: Language, rng: &mut R) -> &str {
        pick(self.lead_in.get(language), rng)
    }

    pub fn follow_up<R: Rng + ?Sized>(&self, language: Language, rng: &mut R) -> &str {
        pick(self.follow_up.get(language), rng)
    }

    /// Why this activity fits, mentioning the emotion when it has a known label.
    pub fn reason(&self, activity_name: &str, emotion: &str, language: Language) -> String {
        match self.emotion_labels.get(emotion) {
            Some(label) => self
                .reason_template
                .get(language)
                .replace("{name}", activity_name)
                .replace("{emotion}", label.get(language)),
            None => self
                .reason_generic
                .get(language)
                .replace("{name}", activity_name),
        }
    }

    /// One-line gentle offer for clients that do not render cards.
    pub fn offer(
        &self,
        activity_name: &str,
        duration_minutes: u32,
        reason: &str,
        language: Language,
    ) -> String {
        let name = match language {
            // Mid-sentence in Vietnamese: "Bạn thử hít thở 4-7-8 nhé?"
            Language::Vi => activity_name.to_lowercase(),
            Language::En => activity_name.to_string(),
        };
        self.offer_template
            .get(language)
            .replace("{name}", &name)
            .replace("{duration}", &duration_minutes.to_string())
            .replace("{reason}", reason)
    }
}

fn pick<'a, R: Rng + ?Sized>(options: &'a [String], rng: &mut R) -> &'a str {
    options.choose(rng).map(String::as_str).unwrap_or_default()
}
