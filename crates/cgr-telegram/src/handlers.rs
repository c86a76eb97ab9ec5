//! Telegram update handlers.
//!
//! The single message handler converts the teloxide update into the core's
//! transport-agnostic shape and hands it to the relay; the relay never
//! returns an error, so the dispatcher stays alive no matter what one
//! message does.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use cgr_core::{
    domain::{ChatId, ChatKind, MessageId},
    messaging::types::IncomingMessage,
};

use crate::router::AppState;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let incoming = to_incoming(&msg);
    state
        .relay
        .handle_message(state.messenger.clone(), &state.bot_name, incoming)
        .await;
    Ok(())
}

fn to_incoming(msg: &Message) -> IncomingMessage {
    IncomingMessage {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        chat_kind: chat_kind(&msg.chat),
        text: msg.text().map(|s| s.to_string()),
    }
}

fn chat_kind(chat: &teloxide::types::Chat) -> ChatKind {
    if chat.is_group() {
        ChatKind::Group
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Private
    }
}
