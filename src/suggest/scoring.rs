//! Scoring & Selection — pick the activity that best matches the inferred needs.
//!
//! Three tiers, first match wins:
//! 1. Continuation of an offer the assistant made last turn.
//! 2. An activity the user asks for by name.
//! 3. Need-based scoring over the whole catalog.
//!
//! Tiers 1 and 2 bypass scoring. A domain with no catalog entry falls through
//! to the next tier instead of failing.

use serde::Serialize;

use super::catalog::{ActivityCatalog, ActivityProfile};
use super::context::ConversationContext;
use super::needs::{NeedDimension, NeedsVector};
use super::signals::{is_agreement, SignalExtractor};
use crate::config::SuggestionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    ContinuationOfOffer,
    ExplicitRequest,
    NeedBased,
}

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub activity: &'a ActivityProfile,
    pub tier: SelectionTier,
    /// Final score for need-based selections.
    pub score: Option<f32>,
}

/// Choose an activity for this turn, or `None`.
///
/// On any selection the id is appended to the context's suggestion history;
/// need-based selections also mark the session as having suggested.
pub fn select_activity<'a>(
    message: &str,
    needs: &NeedsVector,
    context: &mut ConversationContext,
    catalog: &'a ActivityCatalog,
    extractor: &dyn SignalExtractor,
    config: &SuggestionConfig,
) -> Option<Selection<'a>> {
    let selection = resolve_continuation(message, context, catalog, extractor)
        .or_else(|| resolve_explicit(message, catalog, extractor))
        .or_else(|| resolve_by_score(needs, context, catalog, config))?;

    context.record_suggestion(
        &selection.activity.id,
        selection.tier == SelectionTier::NeedBased,
    );
    tracing::info!(
        "[Suggest] Selected {} via {:?} (score {:?})",
        selection.activity.id,
        selection.tier,
        selection.score
    );
    Some(selection)
}

fn resolve_continuation<'a>(
    message: &str,
    context: &ConversationContext,
    catalog: &'a ActivityCatalog,
    extractor: &dyn SignalExtractor,
) -> Option<Selection<'a>> {
    if context.last_assistant_message.is_empty() || !is_agreement(message) {
        return None;
    }
    let domain = extractor
        .extract(&context.last_assistant_message)
        .requested_domain()?;
    let Some(activity) = catalog.best_for_domain(domain) else {
        tracing::debug!("[Suggest] Offered domain {:?} has no catalog entry", domain);
        return None;
    };
    Some(Selection {
        activity,
        tier: SelectionTier::ContinuationOfOffer,
        score: None,
    })
}

fn resolve_explicit<'a>(
    message: &str,
    catalog: &'a ActivityCatalog,
    extractor: &dyn SignalExtractor,
) -> Option<Selection<'a>> {
    let domain = extractor.extract(message).requested_domain()?;
    let Some(activity) = catalog.best_for_domain(domain) else {
        tracing::debug!("[Suggest] Requested domain {:?} has no catalog entry", domain);
        return None;
    };
    Some(Selection {
        activity,
        tier: SelectionTier::ExplicitRequest,
        score: None,
    })
}

fn resolve_by_score<'a>(
    needs: &NeedsVector,
    context: &ConversationContext,
    catalog: &'a ActivityCatalog,
    config: &SuggestionConfig,
) -> Option<Selection<'a>> {
    let mut best: Option<(&ActivityProfile, f32)> = None;
    for activity in catalog.iter() {
        let score = score_activity(activity, needs, context, config);
        tracing::trace!("[Suggest] {} scored {:.2}", activity.id, score);
        // Strictly greater: earlier catalog entries win ties.
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((activity, score));
        }
    }
    best.map(|(activity, score)| Selection {
        activity,
        tier: SelectionTier::NeedBased,
        score: Some(score),
    })
}

fn weight(config: &SuggestionConfig, dim: NeedDimension) -> f32 {
    match dim {
        NeedDimension::Calming => config.weights.calming,
        NeedDimension::Distraction => config.weights.distraction,
        NeedDimension::Activation => config.weights.activation,
        NeedDimension::Processing => config.weights.processing,
    }
}

fn capability(activity: &ActivityProfile, dim: NeedDimension) -> f32 {
    let c = &activity.capabilities;
    match dim {
        NeedDimension::Calming => c.calming,
        NeedDimension::Distraction => c.distraction,
        NeedDimension::Activation => c.activation,
        NeedDimension::Processing => c.processing,
    }
}

/// Need-based score for one activity, floored at 0.
///
/// An activity that matches no need above the dead-zone scores 0 outright,
/// so base priority alone never produces a suggestion.
pub fn score_activity(
    activity: &ActivityProfile,
    needs: &NeedsVector,
    context: &ConversationContext,
    config: &SuggestionConfig,
) -> f32 {
    let mut score: f32 = NeedDimension::ALL
        .iter()
        .filter(|&&dim| needs.get(dim) > config.dead_zone)
        .map(|&dim| needs.get(dim) * capability(activity, dim) * weight(config, dim))
        .sum();
    if score <= 0.0 {
        return 0.0;
    }

    let commitment = f32::from(activity.commitment_level);

    if needs.urgency > config.urgency_threshold {
        score *= 1.0 + activity.immediacy * config.immediacy_boost;
        score -= commitment * config.urgent_commitment_penalty;
    }
    if context.turn_count < config.early_turn_threshold {
        score -= commitment * config.early_commitment_penalty;
    }
    if needs.distraction > config.withdrawal_threshold && activity.requires_talking {
        score -= config.talking_penalty;
    }
    if context.was_recently_suggested(&activity.id, config.recency_window) {
        score -= config.recency_penalty;
    }
    score += activity.base_priority as f32;

    score.max(0.0)
}
