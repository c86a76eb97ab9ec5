use crate::domain::{ChatId, ChatKind, MessageId};

/// Incoming chat message as delivered by the messenger adapter.
///
/// Telegram-specific fields stay in the Telegram adapter; the relay only
/// needs the routing ids, the chat classification and the raw text.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub chat_kind: ChatKind,
    pub text: Option<String>,
}

/// Outgoing "chat action" (typing indicator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
}

/// How outgoing text should be parsed by the platform.
///
/// Partial snapshots go out plain (they are mid-sentence fragments that would
/// trip the Markdown parser); the final reply is platform-parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
}
