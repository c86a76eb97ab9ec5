//! Control-command interpreter.
//!
//! Commands are matched by exact string comparison after the bot mention has
//! been stripped and the text trimmed. Anything else falls through to the
//! relay.

/// The closed set of recognized control commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/reset` or `/reload`: drop the chat's conversation continuity.
    Reset,
    /// `/help`: send the fixed help text.
    Help,
}

pub const RESET_CONFIRMATION: &str = "🔄 Диалог сброшен!";

pub const HELP_TEXT: &str = "🤖 Это бот на основе ChatGPT. Доступные команды:\n\n/reload - начать диалог заного\n/help - показать это сообщение;)";

/// Remove the first `@bot_name` occurrence and trim surrounding whitespace.
///
/// This also normalizes the `/cmd@bot_name` form Telegram produces for
/// commands addressed to a specific bot in group chats.
pub fn strip_mention(text: &str, bot_name: &str) -> String {
    let mention = format!("@{bot_name}");
    text.replacen(&mention, "", 1).trim().to_string()
}

/// Match stripped text against the command set. Exact match only, no
/// prefix or argument handling.
pub fn parse(text: &str) -> Option<Command> {
    match text.trim() {
        "/reload" | "/reset" => Some(Command::Reset),
        "/help" => Some(Command::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reset_and_reload() {
        assert_eq!(parse("/reset"), Some(Command::Reset));
        assert_eq!(parse("/reload"), Some(Command::Reset));
        assert_eq!(parse("  /reset  "), Some(Command::Reset));
    }

    #[test]
    fn parses_help() {
        assert_eq!(parse("/help"), Some(Command::Help));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(parse("/helpme"), None);
        assert_eq!(parse("reset"), None);
        assert_eq!(parse("/reset now"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn strips_leading_mention() {
        assert_eq!(strip_mention("@bot hello", "bot"), "hello");
        assert_eq!(strip_mention("hello", "bot"), "hello");
        assert_eq!(strip_mention("@bot", "bot"), "");
    }

    #[test]
    fn strips_command_suffix_mention() {
        assert_eq!(strip_mention("/reset@bot", "bot"), "/reset");
        assert_eq!(parse(&strip_mention("/reset@bot", "bot")), Some(Command::Reset));
    }

    #[test]
    fn strips_only_first_occurrence() {
        assert_eq!(strip_mention("@bot say @bot", "bot"), "say @bot");
    }
}
