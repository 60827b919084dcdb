// The message composer turns standings into the text we post.
//
// Flow per run:
//   1. classify the tie shape and fill the matching model instruction
//   2. ask the model once, bounded by the configured timeout
//   3. on timeout or any failure, fill a template from the fallback pool
// There are no retries; the model gets exactly one attempt.

use rand::Rng;
use thiserror::Error;

use super::templates::{self, TemplateValues, FALLBACK_TEMPLATES};
use super::tie_classification::TieClass;
use crate::core::ai::{AiError, AiProvider, AiService};
use crate::core::standings::Standings;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Need at least four tracked people for the standings message, got {0}")]
    NotEnoughParticipants(usize),
}

/// Why the fallback pool was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Timeout,
    RequestFailed,
}

/// Where the final message text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Model,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub source: MessageSource,
}

/// How a fallback template is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackSelection {
    #[default]
    Random,
    /// Always use this template (wrapped into the pool's range).
    Fixed(usize),
}

pub struct MessageComposer<P: AiProvider> {
    ai: AiService<P>,
    assistant_name: String,
    fallback: FallbackSelection,
}

impl<P: AiProvider> MessageComposer<P> {
    pub fn new(ai: AiService<P>, assistant_name: impl Into<String>) -> Self {
        Self {
            ai,
            assistant_name: assistant_name.into(),
            fallback: FallbackSelection::Random,
        }
    }

    pub fn with_fallback_selection(mut self, fallback: FallbackSelection) -> Self {
        self.fallback = fallback;
        self
    }

    /// Composes the standings message.
    ///
    /// **Returns:**
    /// - `Ok(ComposedMessage)` from the model, or from the fallback pool when the
    ///   model timed out or failed
    /// - `Err(MessageError::NotEnoughParticipants)` for fewer than four people
    pub async fn compose(&self, standings: &Standings) -> Result<ComposedMessage, MessageError> {
        let tie = TieClass::classify(standings)
            .ok_or(MessageError::NotEnoughParticipants(standings.len()))?;
        let values = TemplateValues::from_standings(&self.assistant_name, standings)
            .ok_or(MessageError::NotEnoughParticipants(standings.len()))?;

        let instruction = templates::fill(templates::instruction_for(tie), &values);
        tracing::debug!(?tie, "Created model instruction");

        let reason = match self.ai.generate(&instruction).await {
            Ok(text) => {
                tracing::debug!(message = %text, "Got model message");
                return Ok(ComposedMessage {
                    text,
                    source: MessageSource::Model,
                });
            }
            Err(AiError::Timeout(after)) => {
                tracing::warn!(?after, "Model request timed out, using fallback message");
                FallbackReason::Timeout
            }
            Err(AiError::Request(e)) => {
                tracing::error!(error = %e, "Model request failed, using fallback message");
                FallbackReason::RequestFailed
            }
        };

        let index = self.pick_fallback_index();
        tracing::info!(index, ?reason, "Using fallback message");

        Ok(ComposedMessage {
            text: templates::fill(FALLBACK_TEMPLATES[index], &values),
            source: MessageSource::Fallback(reason),
        })
    }

    fn pick_fallback_index(&self) -> usize {
        match self.fallback {
            FallbackSelection::Fixed(index) => index % FALLBACK_TEMPLATES.len(),
            FallbackSelection::Random => rand::thread_rng().gen_range(0..FALLBACK_TEMPLATES.len()),
        }
    }
}
