// Reply texts

use crate::domain::{render_queue, DomainError, IndexError, LogRecord, QueueEntry};

pub const HELP: &str = "\
Coffee queue commands (indices are zero-based):
  add <name> <reason>           queue <name> at the tail
  insert <index> <name> <reason> queue <name> at <index>
  remove <index>                drop the entry at <index> (alias: modify)
  shoot                         the head pays and leaves the queue
  show                          who pays next
  clear                         empty the queue
  history                       actions from the retention window
  help                          this text";

pub const INVALID_COMMAND: &str = "Invalid command. Type `help` for usage.";

fn with_queue(headline: String, queue: &[QueueEntry]) -> String {
    format!("{}\nCurrent queue:\n{}", headline, render_queue(queue))
}

pub fn added(entry: &QueueEntry, queue: &[QueueEntry]) -> String {
    with_queue(
        format!("{} has been added to the coffee queue.", entry.name),
        queue,
    )
}

pub fn inserted(entry: &QueueEntry, queue: &[QueueEntry]) -> String {
    with_queue(
        format!(
            "{} has been inserted into the coffee queue at position {}.",
            entry.name, entry.position
        ),
        queue,
    )
}

pub fn removed(entry: &QueueEntry, queue: &[QueueEntry]) -> String {
    with_queue(
        format!("{} has been removed from the coffee queue.", entry.name),
        queue,
    )
}

pub fn shot(entry: &QueueEntry, queue: &[QueueEntry]) -> String {
    with_queue(
        format!(
            "{} is about to pay for coffee! 🔫 Removed from the queue.",
            entry.name
        ),
        queue,
    )
}

pub fn cleared(queue: &[QueueEntry]) -> String {
    with_queue("The coffee queue has been cleared.".to_string(), queue)
}

pub fn head(entry: &QueueEntry, queue: &[QueueEntry]) -> String {
    with_queue(
        format!("{} is about to pay for coffee. 🔫", entry.name),
        queue,
    )
}

pub fn history(records: &[LogRecord], retention_days: i64) -> String {
    if records.is_empty() {
        return format!("No logs in the last {} days.", retention_days);
    }
    let lines: Vec<String> = records.iter().map(LogRecord::render).collect();
    format!(
        "Logs from the last {} days:\n{}",
        retention_days,
        lines.join("\n")
    )
}

/// Reply for a refused command
///
/// Everything except unknown input shows the queue as it stands.
pub fn rejected(err: &DomainError, queue: &[QueueEntry]) -> String {
    let headline = match err {
        DomainError::UnknownCommand(_) => return INVALID_COMMAND.to_string(),
        DomainError::EmptyQueue => "The coffee queue is empty.".to_string(),
        DomainError::NotInRoster(name) => format!("{} is not a member of the team.", name),
        DomainError::MissingArgument("reason") => {
            "Please give a reason, e.g. `add <name> <reason>`.".to_string()
        }
        DomainError::MissingArgument(what) => {
            format!("Missing {}. Type `help` for usage.", what)
        }
        DomainError::InvalidIndex(IndexError::NotNumeric(raw)) => {
            format!("{:?} is not a number. Please enter a valid number.", raw)
        }
        DomainError::InvalidIndex(IndexError::OutOfRange { index, len }) => {
            if *len == 0 {
                format!("Invalid index {}: there is nothing to remove.", index)
            } else {
                format!(
                    "Invalid index {}. Enter an index between 0 and {}.",
                    index,
                    len - 1
                )
            }
        }
    };
    with_queue(headline, queue)
}
