//! Per-conversation execution lanes.
//!
//! Each conversation id maps to one `ConversationContext` behind an async
//! mutex, so turns for the same conversation run one at a time while
//! different conversations proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::suggest::context::ConversationContext;

pub type ConversationLane = Arc<AsyncMutex<ConversationContext>>;

#[derive(Debug, Default)]
pub struct ConversationLanes {
    lanes: Mutex<HashMap<String, ConversationLane>>,
}

impl ConversationLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lane for `conversation_id`, created with a fresh context on first use.
    pub fn lane(&self, conversation_id: &str) -> ConversationLane {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("[Lanes] Opened lane for conversation {}", conversation_id);
                Arc::new(AsyncMutex::new(ConversationContext::default()))
            })
            .clone()
    }

    /// Run `f` with exclusive access to the conversation's context.
    pub async fn with_context<T>(
        &self,
        conversation_id: &str,
        f: impl FnOnce(&mut ConversationContext) -> T,
    ) -> T {
        let lane = self.lane(conversation_id);
        let mut ctx = lane.lock().await;
        f(&mut *ctx)
    }

    /// Drop the lane when the conversation ends. In-flight holders keep their `Arc`.
    pub fn close(&self, conversation_id: &str) -> bool {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes.remove(conversation_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lanes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
