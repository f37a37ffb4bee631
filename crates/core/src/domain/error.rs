// Domain Error Types
//
// Every variant here is a user mistake, not a fault: the command boundary
// turns them into reply text and the webhook still answers 200.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("The coffee queue is empty")]
    EmptyQueue,

    #[error("Invalid index: {0}")]
    InvalidIndex(#[from] IndexError),

    #[error("{0} is not a member of the roster")]
    NotInRoster(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: {0:?}")]
    UnknownCommand(String),
}

/// Why an index argument was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("{0:?} is not a number")]
    NotNumeric(String),

    /// `len` is the number of valid slots (count for remove, count + 1 for insert)
    #[error("{index} is out of range (valid: 0..{len})")]
    OutOfRange { index: i64, len: usize },
}

impl IndexError {
    /// Parse a user-supplied zero-based index token
    pub fn parse(raw: &str) -> std::result::Result<i64, IndexError> {
        raw.parse::<i64>()
            .map_err(|_| IndexError::NotNumeric(raw.to_string()))
    }

    /// Check `index` against the half-open range `0..len`
    pub fn check(index: i64, len: usize) -> std::result::Result<usize, IndexError> {
        if index < 0 || index as u64 >= len as u64 {
            return Err(IndexError::OutOfRange { index, len });
        }
        Ok(index as usize)
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
