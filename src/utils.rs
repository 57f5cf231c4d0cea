use std::fmt::Display;
use std::future::Future;

use teloxide::errors::RequestError;
use teloxide::prelude::Requester;
use teloxide::types::ChatId;
use teloxide::Bot;

pub const FLOOD_WARNING: &str = "⚠️ Too many requests! Please wait.";

/// Reply channel used to warn a flooding user.
pub trait Notifier {
    type Error: Display + Send;

    fn notify(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl Notifier for Bot {
    type Error = RequestError;

    async fn notify(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError> {
        log::info!("Attempting to send flood warning in chat {}", chat_id);
        self.send_message(chat_id, text.to_owned()).await?;
        Ok(())
    }
}
