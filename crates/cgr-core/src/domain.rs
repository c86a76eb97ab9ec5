/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Chat classification as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Group-style chats only get a relayed reply when the bot is mentioned.
    pub fn requires_mention(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// Continuity identifiers from the most recently completed exchange.
///
/// Both ids are opaque strings assigned by the completion backend; empty on
/// the first turn and after a `/reset`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub conversation_id: Option<String>,
    pub parent_message_id: Option<String>,
}

impl ConversationState {
    pub fn is_empty(&self) -> bool {
        self.conversation_id.is_none() && self.parent_message_id.is_none()
    }
}
