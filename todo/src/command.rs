//! Line commands for the terminal front end.
//!
//! A command is parsed from one line of input and then expanded into the
//! [`UiEvent`]s a pointer-driven front end would have produced, so both go
//! through the same [`crate::events::intent`] mapping.

use crate::error::CommandError;
use crate::events::{Key, UiEvent};
use crate::storage::STORAGE_KEY;
use crate::types::TodoId;
use crate::view::View;

/// Shown for `help` and after a parse error
pub const HELP: &str = "\
Commands:
  add <text>           add a task
  toggle <ref>         mark a task done or not done
  edit <ref> <text>    change a task's text
  rm <ref>             delete a task
  clear                delete every completed task
  filter <name>        show all, active or completed tasks
  reload               re-read the saved list
  show                 print the list again
  help                 print this help
  quit                 leave
<ref> is a row number from the list or a task id.";

/// A parsed terminal command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`
    Add(String),
    /// `toggle <ref>`
    Toggle(String),
    /// `edit <ref> <text>`
    Edit {
        /// Row number or id
        reference: String,
        /// Replacement text
        text: String,
    },
    /// `rm <ref>`
    Remove(String),
    /// `clear`
    Clear,
    /// `filter <name>`
    Filter(String),
    /// `reload`
    Reload,
    /// `show`
    Show,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

impl Command {
    /// Parses one line; blank lines yield `None`
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for an unknown command word or a missing
    /// argument.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "add" | "a" => Self::Add(required(rest, "add <text>")?.to_string()),
            "toggle" | "t" => Self::Toggle(required(rest, "toggle <ref>")?.to_string()),
            "edit" | "e" => {
                let (reference, text) = required(rest, "edit <ref> <text>")?
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("edit <ref> <text>"))?;
                Self::Edit {
                    reference: reference.to_string(),
                    text: text.trim().to_string(),
                }
            },
            "rm" | "remove" | "delete" => Self::Remove(required(rest, "rm <ref>")?.to_string()),
            "clear" => Self::Clear,
            "filter" | "f" => {
                Self::Filter(required(rest, "filter <all|active|completed>")?.to_string())
            },
            "reload" => Self::Reload,
            "show" | "ls" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }

    /// The events this command stands for
    ///
    /// Row references are resolved against `view`, the list as the user last
    /// saw it. Commands that only affect the terminal yield no events.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownTask`] if a reference matches no row.
    pub fn into_events(self, view: &View) -> Result<Vec<UiEvent>, CommandError> {
        let events = match self {
            Self::Add(text) => vec![UiEvent::NewTaskKey {
                key: Key::Enter,
                value: text,
            }],
            Self::Toggle(reference) => vec![UiEvent::ToggleClicked {
                id: resolve(&reference, view)?,
            }],
            Self::Edit { reference, text } => {
                let id = resolve(&reference, view)?;
                vec![
                    UiEvent::LabelDoubleClicked { id },
                    UiEvent::EditKey {
                        key: Key::Enter,
                        value: text,
                    },
                ]
            },
            Self::Remove(reference) => vec![UiEvent::DeleteClicked {
                id: resolve(&reference, view)?,
            }],
            Self::Clear => vec![UiEvent::ClearCompletedClicked],
            Self::Filter(filter) => vec![UiEvent::FilterClicked { filter }],
            Self::Reload => vec![UiEvent::StorageChanged {
                key: STORAGE_KEY.to_string(),
            }],
            Self::Show | Self::Help | Self::Quit => Vec::new(),
        };
        Ok(events)
    }
}

/// Resolves a 1-based row number or a task id against the rendered rows
///
/// # Errors
///
/// Returns [`CommandError::UnknownTask`] if nothing on screen matches.
pub fn resolve(reference: &str, view: &View) -> Result<TodoId, CommandError> {
    let rows = view.row_ids();

    let by_position = reference
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| rows.get(index));

    by_position
        .or_else(|| rows.iter().find(|id| id.as_str() == reference))
        .map(|id| TodoId::new(id.as_str()))
        .ok_or_else(|| CommandError::UnknownTask(reference.to_string()))
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(usage))
    } else {
        Ok(rest)
    }
}
