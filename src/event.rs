use teloxide::types::{ChatId, Update, UpdateKind};

use crate::error::FloodError;

/// Event shapes the flood gate knows how to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundEvent {
    /// A message with an identifiable sender. `reply_to` is where a warning
    /// can be delivered, if anywhere.
    Message { user_id: u64, reply_to: Option<ChatId> },
    Unsupported,
}

pub trait Classify {
    fn classify(&self) -> Result<InboundEvent, FloodError>;
}

impl Classify for InboundEvent {
    fn classify(&self) -> Result<InboundEvent, FloodError> {
        Ok(*self)
    }
}

impl Classify for Update {
    fn classify(&self) -> Result<InboundEvent, FloodError> {
        match &self.kind {
            UpdateKind::Message(msg) => Ok(match msg.from() {
                Some(user) => InboundEvent::Message {
                    user_id: user.id.0,
                    reply_to: Some(msg.chat.id),
                },
                None => InboundEvent::Unsupported,
            }),
            UpdateKind::Error(raw) => Err(FloodError::MalformedEvent(format!(
                "update {} could not be parsed: {}",
                self.id, raw
            ))),
            _ => Ok(InboundEvent::Unsupported),
        }
    }
}
