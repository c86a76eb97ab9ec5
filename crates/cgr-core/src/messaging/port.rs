use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::types::{ChatAction, TextFormat},
    Result,
};

/// Cross-messenger port.
///
/// Telegram is the first implementation; the shape is deliberately small so
/// future adapters (Slack/Discord) can fit behind the same interface.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send a text message, optionally as a reply to an earlier message.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef>;

    /// Replace the text of a previously sent message.
    ///
    /// Returns the (possibly refreshed) reference to the edited message so
    /// callers can keep targeting it.
    async fn edit_text(&self, msg: MessageRef, text: &str, format: TextFormat)
        -> Result<MessageRef>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;
}
