pub mod message_composer;
pub mod templates;
pub mod tie_classification;

pub use message_composer::{ComposedMessage, FallbackSelection, MessageComposer, MessageError};
