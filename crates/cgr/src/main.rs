use std::sync::Arc;

use cgr_chatgpt::ChatGptClient;

use cgr_core::{config::Config, relay::Relay};

#[tokio::main]
async fn main() -> Result<(), cgr_core::Error> {
    cgr_core::logging::init("cgr")?;

    let cfg = Arc::new(Config::load()?);

    let model = Arc::new(ChatGptClient::new(&cfg)?);
    let relay = Arc::new(Relay::new(cfg.clone(), model));

    cgr_telegram::router::run_polling(&cfg.telegram_bot_token, relay)
        .await
        .map_err(|e| cgr_core::Error::Transport(format!("telegram bot failed: {e}")))?;

    Ok(())
}
