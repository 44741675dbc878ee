pub mod config;
pub mod error;
pub mod session;
pub mod suggest;
pub mod utils;

pub use config::SuggestionConfig;
pub use error::{SuggestError, SuggestResult};
pub use suggest::{
    AffectReading, ConversationContext, Language, SuggestionEngine, SuggestionPayload,
};
