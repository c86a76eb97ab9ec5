//! Relay loop: incoming chat message → completion backend → streamed
//! placeholder edits.
//!
//! One incoming message drives one bounded operation: post a placeholder
//! reply, stream partial snapshots into it through the throttled sink, and
//! commit the chat's continuity identifiers once the backend resolves. No
//! failure in here may escape to the dispatcher.

use std::sync::Arc;

use tokio::sync::mpsc;

use tracing::{error, info};

use crate::{
    command::{self, Command},
    config::Config,
    domain::{ChatId, ConversationState},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, IncomingMessage},
    },
    model::{
        client::ChatModel,
        types::{CompletionChunk, CompletionRequest},
    },
    session::SessionStore,
    streaming::EditSink,
    Result,
};

/// Short filler shown while the backend is thinking.
pub const PLACEHOLDER_TEXT: &str = "🤔";

pub const TOKEN_EXPIRED_NOTICE: &str = "🔑 Истек срок токена, обновите.";

pub const GENERIC_FAILURE_NOTICE: &str = "🤖 Ой, что-то пошло не так, попробуйте позже.";

pub struct Relay {
    cfg: Arc<Config>,
    model: Arc<dyn ChatModel>,
    sessions: SessionStore,
}

impl Relay {
    pub fn new(cfg: Arc<Config>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            cfg,
            model,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Entry point for one incoming message. All failures are consumed here:
    /// logged, and surfaced as a best-effort chat notice where the contract
    /// asks for one.
    pub async fn handle_message(
        &self,
        api: Arc<dyn MessagingPort>,
        bot_name: &str,
        msg: IncomingMessage,
    ) {
        let Some(text) = msg.text.clone() else {
            return;
        };

        // Group chats only get a relayed reply when the message leads with
        // the bot's mention; bare commands still work there.
        let mention = format!("@{bot_name}");
        if msg.chat_kind.requires_mention() && !text.starts_with(&mention) {
            self.try_command(api.as_ref(), msg.chat_id, &text, bot_name)
                .await;
            return;
        }

        if self
            .try_command(api.as_ref(), msg.chat_id, &text, bot_name)
            .await
        {
            return;
        }

        let prompt = command::strip_mention(&text, bot_name);
        if prompt.is_empty() {
            return;
        }

        info!(chat_id = msg.chat_id.0, "message: {prompt}");
        self.relay(api, msg, prompt).await;
    }

    /// Runs the command interpreter; true means the message was a command
    /// and has been fully handled.
    async fn try_command(
        &self,
        api: &dyn MessagingPort,
        chat_id: ChatId,
        text: &str,
        bot_name: &str,
    ) -> bool {
        let stripped = command::strip_mention(text, bot_name);
        match command::parse(&stripped) {
            Some(Command::Reset) => {
                self.sessions.reset(chat_id).await;
                if let Err(e) = api
                    .send_text(chat_id, command::RESET_CONFIRMATION, None)
                    .await
                {
                    error!("telegram error: {e}");
                }
                info!(chat_id = chat_id.0, "dialog reset");
                true
            }
            Some(Command::Help) => {
                if let Err(e) = api.send_text(chat_id, command::HELP_TEXT, None).await {
                    error!("telegram error: {e}");
                }
                true
            }
            None => false,
        }
    }

    async fn relay(&self, api: Arc<dyn MessagingPort>, msg: IncomingMessage, prompt: String) {
        let chat_id = msg.chat_id;

        // Placeholder reply + typing signal. A transport failure here aborts
        // the whole operation: nothing has been promised to the user yet.
        let placeholder = match api
            .send_text(chat_id, PLACEHOLDER_TEXT, Some(msg.message_id))
            .await
        {
            Ok(m) => m,
            Err(e) => {
                error!("telegram error: {e}");
                return;
            }
        };
        let _ = api.send_chat_action(chat_id, ChatAction::Typing).await;

        let state = self.sessions.get(chat_id).await;
        let req = CompletionRequest {
            text: prompt,
            conversation_id: state.conversation_id,
            parent_message_id: state.parent_message_id,
        };

        // Partial snapshots are pumped through a channel into a task that
        // owns the edit sink; the model callback only enqueues. Awaiting the
        // pump after the model resolves guarantees the final edit is last.
        let (tx, mut rx) = mpsc::unbounded_channel::<CompletionChunk>();
        let pump_api = api.clone();
        let window = self.cfg.edit_throttle;
        let pump = tokio::spawn(async move {
            let mut sink = EditSink::new(placeholder, PLACEHOLDER_TEXT, window);
            while let Some(chunk) = rx.recv().await {
                if sink.push(pump_api.as_ref(), &chunk.text).await {
                    let _ = pump_api.send_chat_action(chat_id, ChatAction::Typing).await;
                }
            }
            sink
        });

        // `move` so dropping the closure drops the sender and lets the pump
        // drain to completion.
        let mut on_progress = move |chunk: CompletionChunk| -> Result<()> {
            tx.send(chunk)
                .map_err(|_| Error::Backend("progress pump stopped".to_string()))?;
            Ok(())
        };

        let result = self.model.send_message(req, &mut on_progress).await;
        drop(on_progress);

        let mut sink = match pump.await {
            Ok(sink) => sink,
            Err(e) => {
                error!("progress pump task failed: {e}");
                return;
            }
        };

        match result {
            Ok(done) => {
                // Commit continuity first, then render: the exchange
                // succeeded even if the final edit is rejected.
                self.sessions
                    .update(
                        chat_id,
                        ConversationState {
                            conversation_id: done.conversation_id.clone(),
                            parent_message_id: Some(done.id.clone()),
                        },
                    )
                    .await;
                sink.finalize(api.as_ref(), &done.text).await;
                info!(chat_id = chat_id.0, "response delivered");
            }
            Err(err) => {
                error!("chatgpt error: {err}");
                let notice = if err.is_session_expired() {
                    TOKEN_EXPIRED_NOTICE
                } else {
                    GENERIC_FAILURE_NOTICE
                };
                if let Err(e) = api.send_text(chat_id, notice, None).await {
                    error!("telegram error: {e}");
                }
            }
        }
    }
}
