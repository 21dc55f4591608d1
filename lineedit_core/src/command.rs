//! Command parsing

use thiserror::Error;

/// Command parsing error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {keyword} N  (N is a 1-based line number)")]
    MissingArgument { keyword: &'static str },

    #[error("Invalid line number '{argument}'. Usage: {keyword} N")]
    MalformedIndex {
        keyword: &'static str,
        argument: String,
    },
}

/// Parsed command
///
/// Line numbers are kept exactly as typed (signed, 1-based). Range checks
/// happen against the buffer at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Persist and exit
    Save,
    /// Exit without persisting
    Quit,
    /// List the buffer with line numbers
    Show,
    /// Show the command reference
    Help,
    /// Insert supplied text before `line`
    Insert { line: i64 },
    /// Remove `line`
    Delete { line: i64 },
    /// Overwrite `line` with supplied text
    Replace { line: i64 },
    /// Anything else: the raw input becomes a new last line
    Append(String),
}

/// Parse one input line.
///
/// Keywords are case-sensitive and matched against the leading token of
/// the trimmed line. `SAVE`, `QUIT`, `SHOW` and `HELP` ignore whatever
/// follows them. Input that matches no keyword is returned untrimmed as
/// [`Command::Append`].
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let trimmed = input.trim();
    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (trimmed, ""),
    };

    match keyword {
        "SAVE" => Ok(Command::Save),
        "QUIT" => Ok(Command::Quit),
        "SHOW" => Ok(Command::Show),
        "HELP" => Ok(Command::Help),
        "INSERT" => parse_line_number("INSERT", rest).map(|line| Command::Insert { line }),
        "DELETE" => parse_line_number("DELETE", rest).map(|line| Command::Delete { line }),
        "REPLACE" => parse_line_number("REPLACE", rest).map(|line| Command::Replace { line }),
        _ => Ok(Command::Append(input.to_string())),
    }
}

fn parse_line_number(keyword: &'static str, argument: &str) -> Result<i64, CommandError> {
    if argument.is_empty() {
        return Err(CommandError::MissingArgument { keyword });
    }
    argument
        .parse::<i64>()
        .map_err(|_| CommandError::MalformedIndex {
            keyword,
            argument: argument.to_string(),
        })
}
