//! # Line Editor Host
//!
//! Console and filesystem host for the line editor core.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The interpreter never prints or touches files
//! - **Explicit saves**: Nothing reaches disk until SAVE
//! - **Atomic writes**: A failed save leaves the previous file intact
//! - **Deterministic mode is first-class**: Any `BufRead` can drive a session
//!
//! ## Responsibilities
//!
//! The host:
//! - Resolves the target path (argument or prompt)
//! - Loads the document, treating a missing file as a new, empty one
//! - Runs the prompt loop (input -> interpret -> render)
//! - Answers INSERT/REPLACE text requests from the same console
//! - Persists on SAVE and maps the session end to an exit status

pub mod io;
pub mod render;
pub mod runtime;

pub use io::{DocumentIo, FileDocumentIo, IoError, MemoryDocumentIo, OpenResult, SaveResult};
pub use render::{ResponseView, EMPTY_BUFFER_NOTICE};
pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError, SessionEnd};
