//! # Line Editor Core
//!
//! Command interpreter and buffer logic for a line-oriented text editor.
//!
//! ## Philosophy
//!
//! - **Pure**: No filesystem, no terminal; the host owns all I/O
//! - **Explicit state**: The session is a value passed in and handed back
//! - **Deterministic**: Same inputs and supplied lines => same session
//! - **Recoverable errors**: Bad line numbers never touch the buffer
//!
//! ## Design
//!
//! The core provides:
//! - LineBuffer: Ordered lines, persisted as newline-terminated text
//! - Command: The parsed command grammar, with append as the fallback
//! - Session / interpret: One input line in, Response + Outcome out
//! - LineSupplier: The capability INSERT and REPLACE use to ask for text
//! - SessionSnapshot: Serializable state for comparisons

pub mod buffer;
pub mod command;
pub mod help;
pub mod interpreter;
pub mod snapshot;
pub mod supplier;

pub use buffer::LineBuffer;
pub use command::{parse_command, Command, CommandError};
pub use help::help_text;
pub use interpreter::{
    interpret, EditError, Outcome, Response, Session, Turn, INSERT_PROMPT, REPLACE_PROMPT,
};
pub use snapshot::SessionSnapshot;
pub use supplier::{LineSupplier, ScriptedLines};
