//! Needs Aggregator — fold signals, affect, and time of day into a needs vector.
//!
//! Additive linear model: every matched layer adds a fixed increment to one
//! or more dimensions, then each dimension is clamped to [0, 1]. Overlaps are
//! resolved by the clamp, never by precedence. The increments below are
//! empirically chosen weights, meant to be re-tuned.

use serde::{Deserialize, Serialize};

use super::affect::{AffectReading, UrgencyLevel};
use super::signals::{KeywordSignalExtractor, SignalCategory, SignalExtractor, SignalSet};
use crate::config::SuggestionConfig;

/// The four dimensions an activity can satisfy. Urgency is a modifier, not a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedDimension {
    Calming,
    Distraction,
    Activation,
    Processing,
}

impl NeedDimension {
    pub const ALL: [NeedDimension; 4] = [
        Self::Calming,
        Self::Distraction,
        Self::Activation,
        Self::Processing,
    ];
}

/// Inferred needs for one message. Every field is in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedsVector {
    pub calming: f32,
    pub distraction: f32,
    pub activation: f32,
    pub processing: f32,
    pub urgency: f32,
}

impl NeedsVector {
    pub fn get(&self, dim: NeedDimension) -> f32 {
        match dim {
            NeedDimension::Calming => self.calming,
            NeedDimension::Distraction => self.distraction,
            NeedDimension::Activation => self.activation,
            NeedDimension::Processing => self.processing,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    fn add(&mut self, d: NeedsDelta) {
        self.calming += d.calming;
        self.distraction += d.distraction;
        self.activation += d.activation;
        self.processing += d.processing;
        self.urgency += d.urgency;
    }

    fn clamped(self) -> Self {
        Self {
            calming: self.calming.clamp(0.0, 1.0),
            distraction: self.distraction.clamp(0.0, 1.0),
            activation: self.activation.clamp(0.0, 1.0),
            processing: self.processing.clamp(0.0, 1.0),
            urgency: self.urgency.clamp(0.0, 1.0),
        }
    }
}

// ── Increment tables ───────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct NeedsDelta {
    calming: f32,
    distraction: f32,
    activation: f32,
    processing: f32,
    urgency: f32,
}

const fn delta(
    calming: f32,
    distraction: f32,
    activation: f32,
    processing: f32,
    urgency: f32,
) -> NeedsDelta {
    NeedsDelta {
        calming,
        distraction,
        activation,
        processing,
        urgency,
    }
}

const NONE: NeedsDelta = delta(0.0, 0.0, 0.0, 0.0, 0.0);

//                                     calm  distr  activ  proc   urg
fn signal_delta(category: SignalCategory) -> NeedsDelta {
    match category {
        SignalCategory::SleepIssues => delta(0.5, 0.2, 0.0, 0.0, 0.2),
        SignalCategory::AnxietyPhysical => delta(0.6, 0.0, 0.0, 0.0, 0.4),
        SignalCategory::BreathingIssues => delta(0.6, 0.0, 0.0, 0.0, 0.5),
        SignalCategory::Pain => delta(0.4, 0.3, 0.0, 0.0, 0.2),
        SignalCategory::Fatigue => delta(0.3, 0.3, 0.0, 0.0, 0.0),
        SignalCategory::Overwhelm => delta(0.5, 0.0, 0.0, 0.3, 0.3),
        SignalCategory::Overthinking => delta(0.3, 0.6, 0.0, 0.0, 0.0),
        SignalCategory::RacingThoughts => delta(0.5, 0.4, 0.0, 0.0, 0.3),
        SignalCategory::Anger => delta(0.0, 0.0, 0.4, 0.3, 0.0),
        SignalCategory::Sadness => delta(0.0, 0.3, 0.0, 0.5, 0.0),
        SignalCategory::Frustration => delta(0.0, 0.0, 0.2, 0.4, 0.0),
        SignalCategory::WorkStress => delta(0.3, 0.0, 0.0, 0.2, 0.0),
        SignalCategory::SocialConflict => delta(0.0, 0.0, 0.0, 0.5, 0.0),
        SignalCategory::Refusal => delta(0.0, 0.4, 0.0, -0.3, 0.0),
        SignalCategory::Shutdown => delta(0.0, 0.5, 0.0, -0.3, 0.1),
        // Explicit requests are resolved by selection tiers, not by needs.
        SignalCategory::RequestMusic
        | SignalCategory::RequestBreathing
        | SignalCategory::RequestRoutine
        | SignalCategory::RequestJournaling => NONE,
    }
}

const ANXIOUS_LABELS: &[&str] = &["anxious", "stressed", "overwhelmed"];
const SAD_LABELS: &[&str] = &["sad", "depressed"];
const ANGRY_LABELS: &[&str] = &["angry", "frustrated"];

const ANXIOUS: NeedsDelta = delta(0.4, 0.0, 0.0, 0.0, 0.3);
const ANXIOUS_LOW_ENERGY: NeedsDelta = delta(0.2, 0.0, 0.0, 0.0, 0.2);
const SAD: NeedsDelta = delta(0.0, 0.3, 0.0, 0.4, 0.0);
const ANGRY: NeedsDelta = delta(0.0, 0.0, 0.0, 0.3, 0.0);
const ANGRY_HIGH_ENERGY: NeedsDelta = delta(0.0, 0.0, 0.5, 0.0, 0.0);
const ANGRY_LOW_ENERGY: NeedsDelta = delta(0.4, 0.0, 0.0, 0.0, 0.0);
const REFUSE: NeedsDelta = delta(0.0, 0.4, 0.0, -0.4, 0.0);
const TIRED: NeedsDelta = delta(0.2, 0.3, 0.0, 0.0, 0.0);
const NIGHT: NeedsDelta = delta(0.2, 0.0, 0.0, 0.0, 0.0);

fn affect_deltas(affect: &AffectReading) -> Vec<NeedsDelta> {
    let mut out = Vec::new();
    if affect.is_one_of(ANXIOUS_LABELS) {
        out.push(ANXIOUS);
        if affect.energy <= 4 {
            out.push(ANXIOUS_LOW_ENERGY);
        }
    } else if affect.is_one_of(SAD_LABELS) {
        out.push(SAD);
    } else if affect.is_one_of(ANGRY_LABELS) {
        out.push(ANGRY);
        out.push(if affect.energy >= 7 {
            ANGRY_HIGH_ENERGY
        } else {
            ANGRY_LOW_ENERGY
        });
    } else if affect.emotion == "refuse" {
        out.push(REFUSE);
    } else if affect.emotion == "tired" {
        out.push(TIRED);
    }

    match affect.urgency {
        UrgencyLevel::High => out.push(delta(0.0, 0.0, 0.0, 0.0, 0.3)),
        UrgencyLevel::Crisis => out.push(delta(0.0, 0.0, 0.0, 0.0, 0.5)),
        UrgencyLevel::Low | UrgencyLevel::Medium => {}
    }
    out
}

// ── Aggregation ────────────────────────────────────────────

/// Fold pre-extracted signals, the affect reading, and the night flag into needs.
pub fn aggregate_needs(signals: &SignalSet, affect: &AffectReading, is_night: bool) -> NeedsVector {
    let mut needs = NeedsVector::default();

    for category in signals.iter() {
        needs.add(signal_delta(category));
    }
    for d in affect_deltas(affect) {
        needs.add(d);
    }
    let restless = affect.is_one_of(&["anxious", "stressed"])
        || signals.contains(SignalCategory::SleepIssues);
    if is_night && restless {
        needs.add(NIGHT);
    }

    needs.clamped()
}

/// Convenience entry point with the keyword extractor and the default night window.
pub fn compute_needs(message: &str, affect: &AffectReading, hour_of_day: u32) -> NeedsVector {
    let signals = KeywordSignalExtractor.extract(message);
    let is_night = SuggestionConfig::default().is_night(hour_of_day);
    aggregate_needs(&signals, affect, is_night)
}
