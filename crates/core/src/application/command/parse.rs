// Command text -> Command

use crate::domain::{DomainError, IndexError};

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { name: String, reason: String },
    Insert { index: i64, name: String, reason: String },
    Remove { index: i64 },
    Shoot,
    Clear,
    Show,
    History,
    Help,
}

type Parser = fn(&[&str]) -> Result<Command, DomainError>;

/// Verb dispatch table; `modify` is the old name of `remove`
const VERBS: &[(&str, Parser)] = &[
    ("add", parse_add),
    ("insert", parse_insert),
    ("remove", parse_remove),
    ("modify", parse_remove),
    ("shoot", parse_shoot),
    ("clear", parse_clear),
    ("show", parse_show),
    ("history", parse_history),
    ("help", parse_help),
];

impl Command {
    /// Whitespace-tokenize `text` and parse verb + arguments
    ///
    /// # Errors
    /// - `UnknownCommand` for empty text or an unrecognised verb
    /// - `MissingArgument` / `InvalidIndex` for malformed arguments
    pub fn parse(text: &str) -> Result<Command, DomainError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let Some((verb, args)) = tokens.split_first() else {
            return Err(DomainError::UnknownCommand(String::new()));
        };

        VERBS
            .iter()
            .find(|(name, _)| name == verb)
            .map(|(_, parser)| parser(args))
            .unwrap_or_else(|| Err(DomainError::UnknownCommand(verb.to_string())))
    }

    /// Verb as logged
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Insert { .. } => "insert",
            Command::Remove { .. } => "remove",
            Command::Shoot => "shoot",
            Command::Clear => "clear",
            Command::Show => "show",
            Command::History => "history",
            Command::Help => "help",
        }
    }
}

fn parse_add(args: &[&str]) -> Result<Command, DomainError> {
    let (name, reason) = name_and_reason(args)?;
    Ok(Command::Add { name, reason })
}

fn parse_insert(args: &[&str]) -> Result<Command, DomainError> {
    let (raw, rest) = args
        .split_first()
        .ok_or(DomainError::MissingArgument("index"))?;
    let index = IndexError::parse(raw)?;
    let (name, reason) = name_and_reason(rest)?;
    Ok(Command::Insert {
        index,
        name,
        reason,
    })
}

fn parse_remove(args: &[&str]) -> Result<Command, DomainError> {
    let raw = args.first().ok_or(DomainError::MissingArgument("index"))?;
    let index = IndexError::parse(raw)?;
    Ok(Command::Remove { index })
}

// Trailing arguments are ignored for the bare verbs
fn parse_shoot(_: &[&str]) -> Result<Command, DomainError> {
    Ok(Command::Shoot)
}

fn parse_clear(_: &[&str]) -> Result<Command, DomainError> {
    Ok(Command::Clear)
}

fn parse_show(_: &[&str]) -> Result<Command, DomainError> {
    Ok(Command::Show)
}

fn parse_history(_: &[&str]) -> Result<Command, DomainError> {
    Ok(Command::History)
}

fn parse_help(_: &[&str]) -> Result<Command, DomainError> {
    Ok(Command::Help)
}

// An empty reason is left to the service, which checks the roster first
fn name_and_reason(args: &[&str]) -> Result<(String, String), DomainError> {
    let (name, reason) = args
        .split_first()
        .ok_or(DomainError::MissingArgument("name"))?;
    Ok((name.to_string(), reason.join(" ")))
}
