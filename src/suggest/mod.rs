//! Activity suggestion decision core.
//!
//! Timing gate → signal extraction + needs aggregation → tiered selection
//! over the catalog → session context update.

pub mod affect;
pub mod catalog;
pub mod context;
pub mod engine;
pub mod locale;
pub mod needs;
pub mod phrases;
pub mod scoring;
pub mod signals;
pub mod timing;

pub use affect::{AffectReading, UrgencyLevel};
pub use catalog::{
    ActivityCatalog, ActivityDomain, ActivityProfile, CapabilityVector, EnergyRequirement,
};
pub use context::ConversationContext;
pub use engine::{SuggestionEngine, SuggestionPayload};
pub use locale::{Language, LocalizedText};
pub use needs::{aggregate_needs, compute_needs, NeedDimension, NeedsVector};
pub use phrases::PhraseBank;
pub use scoring::{score_activity, select_activity, Selection, SelectionTier};
pub use signals::{KeywordSignalExtractor, SignalCategory, SignalExtractor, SignalGroup, SignalSet};
pub use timing::{TimingGate, TimingState};
