//! Session state and the command interpreter
//!
//! One input line in, one [`Response`] and one [`Outcome`] out. The
//! interpreter never touches the filesystem or the terminal; persisting
//! on [`Outcome::SaveAndExit`] and drawing the response are the host's job.

use thiserror::Error;

use crate::{
    buffer::LineBuffer,
    command::{parse_command, Command, CommandError},
    snapshot::SessionSnapshot,
    supplier::LineSupplier,
};

pub const INSERT_PROMPT: &str = "Insert text: ";
pub const REPLACE_PROMPT: &str = "Replacement text: ";

/// Minimum width of the line-number gutter in listings
const GUTTER_WIDTH: usize = 4;

/// Recoverable editing error. The buffer is never modified when one is
/// reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Line number out of range: {line} (buffer has {len} lines)")]
    OutOfRange { line: i64, len: usize },

    #[error("{keyword} cancelled: no text supplied")]
    InputCancelled { keyword: &'static str },
}

/// What the session should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep reading commands
    Continue,
    /// Persist the buffer, then end the session
    SaveAndExit,
    /// End the session without persisting
    DiscardAndExit,
}

/// Displayable result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing to show
    Silent,
    /// One-line confirmation
    Message(String),
    /// Numbered buffer listing, one entry per line
    Listing(Vec<String>),
    /// The static command reference
    Help,
    /// A recovered error
    Error(EditError),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

/// Result of [`interpret`]: the next session state plus what happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub session: Session,
    pub response: Response,
    pub outcome: Outcome,
}

/// Editing session: the buffer plus the file it belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    buffer: LineBuffer,
    path: Option<String>,
    dirty: bool,
}

impl Session {
    /// Start with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(buffer: LineBuffer) -> Self {
        Self {
            buffer,
            path: None,
            dirty: false,
        }
    }

    /// Attach a path label (display only; the host decides where to write)
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// True once any command has modified the buffer since load or save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            path: self.path.clone(),
            lines: self.buffer.lines().to_vec(),
            dirty: self.dirty,
        }
    }

    /// Interpret one input line in place.
    pub fn apply<S>(&mut self, input: &str, supplier: &mut S) -> (Response, Outcome)
    where
        S: LineSupplier + ?Sized,
    {
        let result = parse_command(input)
            .map_err(EditError::from)
            .and_then(|command| self.execute(command, supplier));

        match result {
            Ok(done) => done,
            Err(err) => (Response::Error(err), Outcome::Continue),
        }
    }

    fn execute<S>(
        &mut self,
        command: Command,
        supplier: &mut S,
    ) -> Result<(Response, Outcome), EditError>
    where
        S: LineSupplier + ?Sized,
    {
        let response = match command {
            Command::Save => return Ok((Response::Silent, Outcome::SaveAndExit)),
            Command::Quit => return Ok((Response::Silent, Outcome::DiscardAndExit)),
            Command::Show => Response::Listing(self.listing()),
            Command::Help => Response::Help,
            Command::Insert { line } => {
                let row = self.resolve(line, self.buffer.line_count() + 1)?;
                let text = supplier
                    .supply_line(INSERT_PROMPT)
                    .ok_or(EditError::InputCancelled { keyword: "INSERT" })?;
                if !self.buffer.insert_line(row, &text) {
                    return Err(self.out_of_range(line));
                }
                self.dirty = true;
                Response::Message(format!("Inserted at line {}", line))
            }
            Command::Delete { line } => {
                let row = self.resolve(line, self.buffer.line_count())?;
                let removed = self
                    .buffer
                    .delete_line(row)
                    .ok_or_else(|| self.out_of_range(line))?;
                self.dirty = true;
                Response::Message(format!("Deleted line {}: {}", line, removed))
            }
            Command::Replace { line } => {
                let row = self.resolve(line, self.buffer.line_count())?;
                let text = supplier
                    .supply_line(REPLACE_PROMPT)
                    .ok_or(EditError::InputCancelled { keyword: "REPLACE" })?;
                if !self.buffer.replace_line(row, &text) {
                    return Err(self.out_of_range(line));
                }
                self.dirty = true;
                Response::Message(format!("Replaced line {}", line))
            }
            Command::Append(text) => {
                self.buffer.append_line(&text);
                self.dirty = true;
                Response::Silent
            }
        };

        Ok((response, Outcome::Continue))
    }

    /// Map a 1-based line number onto a 0-based row, accepting `1..=max`.
    fn resolve(&self, line: i64, max: usize) -> Result<usize, EditError> {
        usize::try_from(line)
            .ok()
            .filter(|n| (1..=max).contains(n))
            .map(|n| n - 1)
            .ok_or_else(|| self.out_of_range(line))
    }

    fn out_of_range(&self, line: i64) -> EditError {
        EditError::OutOfRange {
            line,
            len: self.buffer.line_count(),
        }
    }

    fn listing(&self) -> Vec<String> {
        let width = self.buffer.line_count().to_string().len().max(GUTTER_WIDTH);
        self.buffer
            .lines()
            .iter()
            .enumerate()
            .map(|(row, line)| format!("{:>width$}: {}", row + 1, line, width = width))
            .collect()
    }
}

/// Interpret one input line, consuming the session and handing back its
/// successor.
pub fn interpret<S>(mut session: Session, input: &str, supplier: &mut S) -> Turn
where
    S: LineSupplier + ?Sized,
{
    let (response, outcome) = session.apply(input, supplier);
    Turn {
        session,
        response,
        outcome,
    }
}
