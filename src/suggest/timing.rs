//! Timing Gate: decides *whether* a suggestion may be shown this turn.
//!
//! Independent of *which* activity would be chosen. Evaluated fresh each turn
//! from the turn count, the session's exhaustion flag, and the pairing of the
//! assistant's last offer with the user's reply.

use serde::Serialize;

use super::context::ConversationContext;
use super::signals::{has_invitation, is_agreement, SignalSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimingState {
    /// Too few turns for any suggestion, even an explicit one.
    TooEarly,
    /// No offer/agreement pairing yet.
    AwaitingEligibility,
    Eligible,
    /// A need-based suggestion was already made this session.
    Exhausted,
}

impl TimingState {
    pub fn allows(self) -> bool {
        self == Self::Eligible
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimingGate {
    /// Turn counts at or below this are too early.
    too_early_turns: u32,
}

impl Default for TimingGate {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TimingGate {
    pub fn new(too_early_turns: u32) -> Self {
        Self { too_early_turns }
    }

    pub fn evaluate(
        &self,
        message: &str,
        signals: &SignalSet,
        turn_count: u32,
        last_assistant_message: &str,
        context: &ConversationContext,
    ) -> TimingState {
        if turn_count <= self.too_early_turns {
            return TimingState::TooEarly;
        }

        // Explicit requests override exhaustion
        if signals.has_explicit_intent() {
            return TimingState::Eligible;
        }

        if context.has_suggested_in_session {
            return TimingState::Exhausted;
        }

        if has_invitation(last_assistant_message) && is_agreement(message) {
            TimingState::Eligible
        } else {
            TimingState::AwaitingEligibility
        }
    }
}
