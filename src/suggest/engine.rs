//! Suggestion Engine — the facade the chat-turn orchestration calls.
//!
//! Wires the timing gate, signal extraction, needs aggregation, and selection
//! together, and renders the chosen activity into a localized payload.

use chrono::Timelike;
use serde::Serialize;

use super::affect::AffectReading;
use super::catalog::{ActivityCatalog, ActivityProfile};
use super::context::ConversationContext;
use super::locale::Language;
use super::needs::{aggregate_needs, NeedsVector};
use super::phrases::PhraseBank;
use super::scoring::{select_activity, SelectionTier};
use super::signals::{KeywordSignalExtractor, SignalExtractor};
use super::timing::{TimingGate, TimingState};
use crate::config::SuggestionConfig;
use crate::error::SuggestResult;

/// What the transport layer renders as a suggestion card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPayload {
    pub activity_id: String,
    pub card_title: String,
    pub description: String,
    /// Minutes.
    pub duration: u32,
    pub action_text: String,
    pub visual_style: String,
    pub icon: String,
    pub display_name: String,
    pub route_path: String,
    pub reason: String,
    /// Plain-text offer for clients without card rendering.
    pub inline_message: String,
    pub tier: SelectionTier,
}

pub struct SuggestionEngine {
    catalog: ActivityCatalog,
    phrases: PhraseBank,
    config: SuggestionConfig,
    extractor: Box<dyn SignalExtractor>,
}

impl SuggestionEngine {
    /// Engine over the built-in catalog and phrase banks with default tuning.
    pub fn new() -> SuggestResult<Self> {
        Ok(Self::with_parts(
            ActivityCatalog::builtin()?,
            PhraseBank::builtin()?,
            SuggestionConfig::default(),
        ))
    }

    pub fn with_parts(
        catalog: ActivityCatalog,
        phrases: PhraseBank,
        config: SuggestionConfig,
    ) -> Self {
        Self {
            catalog,
            phrases,
            config,
            extractor: Box::new(KeywordSignalExtractor),
        }
    }

    /// Swap the keyword matcher for another signal source.
    pub fn with_extractor(mut self, extractor: impl SignalExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Gate state for this turn.
    pub fn timing_state(
        &self,
        message: &str,
        turn_count: u32,
        last_assistant_message: &str,
        context: &ConversationContext,
    ) -> TimingState {
        let signals = self.extractor.extract(message);
        TimingGate::new(self.config.too_early_turns).evaluate(
            message,
            &signals,
            turn_count,
            last_assistant_message,
            context,
        )
    }

    /// Whether a suggestion may be surfaced this turn.
    pub fn should_suggest(
        &self,
        message: &str,
        affect: &AffectReading,
        turn_count: u32,
        last_assistant_message: &str,
        context: &ConversationContext,
    ) -> bool {
        let state = self.timing_state(message, turn_count, last_assistant_message, context);
        tracing::debug!(
            "[Timing] turn={} emotion={} state={:?}",
            turn_count,
            affect.emotion,
            state
        );
        state.allows()
    }

    pub fn compute_needs(
        &self,
        message: &str,
        affect: &AffectReading,
        hour_of_day: u32,
    ) -> NeedsVector {
        let signals = self.extractor.extract(message);
        aggregate_needs(&signals, affect, self.config.is_night(hour_of_day))
    }

    /// Pick and render an activity using the local wall-clock hour.
    pub fn suggest_activity(
        &self,
        affect: &AffectReading,
        message: &str,
        language: Language,
        context: &mut ConversationContext,
    ) -> Option<SuggestionPayload> {
        let hour = chrono::Local::now().hour();
        self.suggest_activity_at(affect, message, language, context, hour)
    }

    /// Same as [`suggest_activity`](Self::suggest_activity) with an explicit hour (0-23).
    pub fn suggest_activity_at(
        &self,
        affect: &AffectReading,
        message: &str,
        language: Language,
        context: &mut ConversationContext,
        hour_of_day: u32,
    ) -> Option<SuggestionPayload> {
        let needs = self.compute_needs(message, affect, hour_of_day);
        tracing::debug!("[Suggest] needs={:?}", needs);

        let selection = select_activity(
            message,
            &needs,
            context,
            &self.catalog,
            self.extractor.as_ref(),
            &self.config,
        )?;
        Some(self.render(selection.activity, selection.tier, affect, language))
    }

    pub fn lead_in_phrase(&self, language: Language) -> String {
        self.phrases
            .lead_in(language, &mut rand::thread_rng())
            .to_string()
    }

    pub fn follow_up_phrase(&self, language: Language) -> String {
        self.phrases
            .follow_up(language, &mut rand::thread_rng())
            .to_string()
    }

    fn render(
        &self,
        activity: &ActivityProfile,
        tier: SelectionTier,
        affect: &AffectReading,
        language: Language,
    ) -> SuggestionPayload {
        let display_name = activity.name.get(language).to_string();
        let reason = self.phrases.reason(&display_name, &affect.emotion, language);
        let inline_message =
            self.phrases
                .offer(&display_name, activity.duration_minutes, &reason, language);
        SuggestionPayload {
            activity_id: activity.id.clone(),
            card_title: activity.title.get(language).to_string(),
            description: activity.description.get(language).to_string(),
            duration: activity.duration_minutes,
            action_text: activity.action_text.get(language).to_string(),
            visual_style: activity.visual_style.clone(),
            icon: activity.icon.clone(),
            display_name,
            route_path: activity.route.clone(),
            reason,
            inline_message,
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::signals::{SignalCategory, SignalSet};

    fn engine() -> SuggestionEngine {
        SuggestionEngine::new().expect("built-in resources must load")
    }

    #[test]
    fn payload_is_localized() {
        let e = engine();
        let mut vi_ctx = ConversationContext {
            turn_count: 6,
            ..Default::default()
        };
        let mut en_ctx = vi_ctx.clone();
        let affect = AffectReading::new("anxious", 5);

        let vi = e
            .suggest_activity_at(&affect, "hít thở", Language::Vi, &mut vi_ctx, 12)
            .unwrap();
        let en = e
            .suggest_activity_at(&affect, "hít thở", Language::En, &mut en_ctx, 12)
            .unwrap();
        assert_eq!(vi.activity_id, en.activity_id);
        assert_eq!(vi.display_name, "Hít thở 4-7-8");
        assert_eq!(en.display_name, "4-7-8 Breathing");
        assert_eq!(vi.route_path, "/activities/breathing/478");
        assert!(vi.reason.contains("lo âu"));
        assert!(en.inline_message.contains("5 min"));
        assert_eq!(vi.tier, SelectionTier::ExplicitRequest);
    }

    #[test]
    fn payload_serializes_in_camel_case() {
        let e = engine();
        let mut ctx = ConversationContext {
            turn_count: 6,
            ..Default::default()
        };
        let p = e
            .suggest_activity_at(&AffectReading::neutral(), "nhạc", Language::En, &mut ctx, 12)
            .unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("activityId").is_some());
        assert!(json.get("routePath").is_some());
        assert_eq!(json["tier"], "explicit_request");
    }

    #[test]
    fn companion_phrases_are_never_empty() {
        let e = engine();
        for lang in [Language::Vi, Language::En] {
            assert!(!e.lead_in_phrase(lang).is_empty());
            assert!(!e.follow_up_phrase(lang).is_empty());
        }
    }

    struct AlwaysBreathless;

    impl SignalExtractor for AlwaysBreathless {
        fn extract(&self, _message: &str) -> SignalSet {
            [SignalCategory::BreathingIssues, SignalCategory::AnxietyPhysical]
                .into_iter()
                .collect()
        }
    }

    #[test]
    fn custom_extractor_drives_needs() {
        let e = engine().with_extractor(AlwaysBreathless);
        let needs = e.compute_needs("anything at all", &AffectReading::neutral(), 12);
        assert!(needs.calming > 0.9);
        assert!(needs.urgency > 0.8);

        let mut ctx = ConversationContext {
            turn_count: 8,
            ..Default::default()
        };
        let p = e
            .suggest_activity_at(&AffectReading::neutral(), "anything", Language::En, &mut ctx, 12)
            .unwrap();
        assert_eq!(p.activity_id, "breathing_478");
        assert_eq!(p.tier, SelectionTier::NeedBased);
    }

    #[test]
    fn neutral_turn_yields_nothing() {
        let e = engine();
        let mut ctx = ConversationContext {
            turn_count: 8,
            ..Default::default()
        };
        assert!(e
            .suggest_activity_at(&AffectReading::neutral(), "", Language::Vi, &mut ctx, 12)
            .is_none());
        assert!(ctx.suggested_activities.is_empty());
    }
}
