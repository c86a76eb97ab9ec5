use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tracing::info;

use cgr_core::{messaging::port::MessagingPort, relay::Relay};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub messenger: Arc<dyn MessagingPort>,
    pub bot_name: String,
}

pub async fn run_polling(token: &str, relay: Arc<Relay>) -> anyhow::Result<()> {
    let bot = Bot::new(token.to_string());

    // Bot identity is load-bearing: the mention handle gates group replies.
    let me = bot.get_me().await?;
    let bot_name = me.user.username.clone().unwrap_or_default();
    if bot_name.is_empty() {
        anyhow::bail!("bot username not found");
    }
    info!("bot @{bot_name} has started");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState {
        relay,
        messenger,
        bot_name,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
