use orca_core::Msg;
use thiserror::Error;

pub const HELP: &str = "commands: search <text> | delete <uid> | yes | no | pause | resume | help | quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Delete(String),
    Confirm,
    Cancel,
    Pause,
    Resume,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; type help for a list")]
    Unknown(String),
    #[error("usage: delete <uid>")]
    MissingUid,
}

/// Parses a line of input. Blank lines yield `Ok(None)`.
///
/// The search text is passed through untrimmed so that validation happens in
/// one place.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };
    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "search" | "s" => Command::Search(rest.trim_end_matches(['\r', '\n']).to_string()),
        "delete" | "d" => match rest.trim() {
            "" => return Err(CommandError::MissingUid),
            uid => Command::Delete(uid.to_string()),
        },
        "yes" | "y" => Command::Confirm,
        "no" | "n" => Command::Cancel,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    /// The core message for this command, if it has one.
    pub fn to_msg(&self) -> Option<Msg> {
        match self {
            Command::Search(text) => Some(Msg::SearchSubmitted(text.clone())),
            Command::Delete(uid) => Some(Msg::DeleteRequested { uid: uid.clone() }),
            Command::Confirm => Some(Msg::DeleteConfirmed),
            Command::Cancel => Some(Msg::DeleteCancelled),
            Command::Pause => Some(Msg::PollingToggled(false)),
            Command::Resume => Some(Msg::PollingToggled(true)),
            Command::Help | Command::Quit => None,
        }
    }
}
