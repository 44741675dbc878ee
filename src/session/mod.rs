//! Collaborators for the chat-turn orchestration layer.

pub mod cache;
pub mod lanes;

pub use cache::{MemoryTtlCache, TtlCache};
pub use lanes::{ConversationLane, ConversationLanes};
