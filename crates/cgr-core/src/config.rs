use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed runtime configuration.
///
/// Everything comes from the environment (with best-effort `.env` loading).
/// The two secrets are required; the rest has domain defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,

    /// Base URL of the conversational completion backend.
    pub chatgpt_api_base: String,
    pub chatgpt_model: String,

    /// Leading-edge window for throttled placeholder edits.
    pub edit_throttle: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let openai_api_key = env_str("OPENAI_API_KEY").unwrap_or_default();
        if openai_api_key.trim().is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY environment variable is required".to_string(),
            ));
        }

        let chatgpt_api_base = env_str("CHATGPT_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| "https://chat.openai.com/backend-api".to_string());
        let chatgpt_model = env_str("CHATGPT_MODEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "text-davinci-002-render-sha".to_string());

        let edit_throttle = Duration::from_millis(env_u64("EDIT_THROTTLE_MS").unwrap_or(4000));

        Ok(Self {
            telegram_bot_token,
            openai_api_key,
            chatgpt_api_base,
            chatgpt_model,
            edit_throttle,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
