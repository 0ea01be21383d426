//! Console line protocol.
//!
//! One event per line, whitespace separated:
//!
//! ```text
//! join <id> <name>
//! quit <id>
//! rename <id> <name>
//! chat <id> <message...>
//! cmd <id|console> <command> [args...]
//! stats
//! ```

use crate::state::{ParseParticipantIdError, ParticipantId};
use thiserror::Error;

/// Errors parsing a console line.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("{event}: missing {what}")]
    MissingArgument {
        event: &'static str,
        what: &'static str,
    },

    #[error("{event}: unexpected input '{rest}'")]
    TrailingInput { event: &'static str, rest: String },

    #[error(transparent)]
    InvalidId(#[from] ParseParticipantIdError),
}

/// Who a `cmd` line runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRef {
    Console,
    Player(ParticipantId),
}

/// A parsed console event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Join { id: ParticipantId, name: String },
    Quit { id: ParticipantId },
    Rename { id: ParticipantId, name: String },
    Chat { id: ParticipantId, message: String },
    Command {
        sender: SenderRef,
        command: String,
        args: Vec<String>,
    },
    Stats,
}

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<HostEvent>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (event, rest) = split_word(line);
    let event = match event {
        "join" => {
            let (id, name) = id_and_name("join", rest)?;
            HostEvent::Join { id, name }
        }
        "rename" => {
            let (id, name) = id_and_name("rename", rest)?;
            HostEvent::Rename { id, name }
        }
        "quit" => {
            let (id, rest) = split_word(rest);
            let id = require("quit", "id", id)?.parse()?;
            no_trailing("quit", rest)?;
            HostEvent::Quit { id }
        }
        "chat" => {
            let (id, message) = split_word(rest);
            let id = require("chat", "id", id)?.parse()?;
            HostEvent::Chat {
                id,
                message: message.to_string(),
            }
        }
        "cmd" => {
            let (sender, rest) = split_word(rest);
            let sender = match require("cmd", "sender", sender)? {
                s if s.eq_ignore_ascii_case("console") => SenderRef::Console,
                s => SenderRef::Player(s.parse()?),
            };
            let mut words = rest.split_whitespace();
            let command = words.next().ok_or(ConsoleError::MissingArgument {
                event: "cmd",
                what: "command",
            })?;
            HostEvent::Command {
                sender,
                command: command.to_string(),
                args: words.map(str::to_string).collect(),
            }
        }
        "stats" => {
            no_trailing("stats", rest)?;
            HostEvent::Stats
        }
        other => return Err(ConsoleError::UnknownEvent(other.to_string())),
    };
    Ok(Some(event))
}

/// Split off the first whitespace-delimited word. The remainder keeps its
/// inner spacing but loses the separator.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

fn require<'a>(
    event: &'static str,
    what: &'static str,
    word: &'a str,
) -> Result<&'a str, ConsoleError> {
    if word.is_empty() {
        Err(ConsoleError::MissingArgument { event, what })
    } else {
        Ok(word)
    }
}

fn no_trailing(event: &'static str, rest: &str) -> Result<(), ConsoleError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ConsoleError::TrailingInput {
            event,
            rest: rest.to_string(),
        })
    }
}

fn id_and_name(event: &'static str, rest: &str) -> Result<(ParticipantId, String), ConsoleError> {
    let (id, rest) = split_word(rest);
    let id = require(event, "id", id)?.parse()?;
    let (name, rest) = split_word(rest);
    let name = require(event, "name", name)?;
    no_trailing(event, rest)?;
    Ok((id, name.to_string()))
}
