//! # Host Runtime
//!
//! The prompt loop that ties the interpreter to a console and a document.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use lineedit_core::{LineSupplier, Outcome, Session};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::io::{DocumentIo, FileDocumentIo, IoError};
use crate::render::ResponseView;

pub const PROMPT: &str = "> ";
pub const FILENAME_PROMPT: &str = "Filename to open/create: ";
pub const CONFIRM_DISCARD_PROMPT: &str = "Exit without saving? (y/N): ";
pub const USAGE_HINT: &str = "Type HELP for available commands. Type SAVE to save and exit.";

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("No filename provided. Exiting.")]
    NoFilename,

    #[error("Error opening file: {0}")]
    Open(#[source] IoError),

    #[error("Error saving file: {0}")]
    Save(#[source] IoError),

    #[error("Console error: {0}")]
    Console(#[from] io::Error),
}

/// Host runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRuntimeConfig {
    /// Document to edit; prompted for when absent
    pub path: Option<PathBuf>,
    /// Create missing parent directories when opening a new document
    pub create_parents: bool,
    /// Ask before QUIT throws away unsaved changes
    pub confirm_discard: bool,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            path: None,
            create_parents: true,
            confirm_discard: false,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// SAVE succeeded
    Saved { lines: usize },
    /// QUIT, or input ran out
    Discarded,
}

/// Host runtime
pub struct HostRuntime<R, W, D = FileDocumentIo> {
    config: HostRuntimeConfig,
    input: R,
    output: W,
    io: D,
    view: ResponseView,
}

impl<R: BufRead, W: Write> HostRuntime<R, W, FileDocumentIo> {
    /// Creates a runtime backed by the filesystem
    pub fn new(config: HostRuntimeConfig, input: R, output: W) -> Self {
        let io = FileDocumentIo::new().with_create_parents(config.create_parents);
        Self::with_io(config, input, output, io)
    }
}

impl<R: BufRead, W: Write, D: DocumentIo> HostRuntime<R, W, D> {
    pub fn with_io(config: HostRuntimeConfig, input: R, output: W, io: D) -> Self {
        Self {
            config,
            input,
            output,
            io,
            view: ResponseView::new(),
        }
    }

    pub fn io(&self) -> &D {
        &self.io
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_parts(self) -> (R, W, D) {
        (self.input, self.output, self.io)
    }

    /// Runs one editing session to completion
    ///
    /// Returns when:
    /// - SAVE succeeds (or fails, as an error)
    /// - QUIT is accepted
    /// - Input ends
    pub fn run(&mut self) -> Result<SessionEnd, HostRuntimeError> {
        let path = self.resolve_path()?;
        let opened = self.io.open(&path).map_err(HostRuntimeError::Open)?;
        info!(
            path = %path.display(),
            lines = opened.buffer.line_count(),
            is_new = opened.is_new,
            "opened document"
        );

        let mut session = Session::with_buffer(opened.buffer).with_path(path.display().to_string());

        if opened.is_new {
            writeln!(self.output, "Editing file: {} (new file)", path.display())?;
        } else {
            writeln!(self.output, "Editing file: {}", path.display())?;
        }
        writeln!(self.output, "{}", USAGE_HINT)?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let Some(line) = read_line(&mut self.input)? else {
                writeln!(self.output)?;
                info!(dirty = session.is_dirty(), "input ended; discarding session");
                return Ok(SessionEnd::Discarded);
            };

            let (response, outcome) = {
                let mut supplier = ConsoleSupplier::new(&mut self.input, &mut self.output);
                let result = session.apply(&line, &mut supplier);
                if let Some(err) = supplier.error.take() {
                    return Err(err.into());
                }
                result
            };

            if response.is_error() {
                debug!(input = %line, ?response, "command rejected");
            } else {
                debug!(
                    input = %line,
                    ?outcome,
                    lines = session.buffer().line_count(),
                    "command applied"
                );
            }

            self.output.write_all(self.view.render(&response).as_bytes())?;

            match outcome {
                Outcome::Continue => {}
                Outcome::SaveAndExit => return self.save(&path, &mut session),
                Outcome::DiscardAndExit => {
                    if self.confirm_discard(&session)? {
                        writeln!(self.output, "Exiting without saving.")?;
                        info!(dirty = session.is_dirty(), "session discarded");
                        return Ok(SessionEnd::Discarded);
                    }
                }
            }
        }
    }

    fn resolve_path(&mut self) -> Result<PathBuf, HostRuntimeError> {
        if let Some(path) = &self.config.path {
            return Ok(path.clone());
        }

        write!(self.output, "{}", FILENAME_PROMPT)?;
        self.output.flush()?;

        match read_line(&mut self.input)? {
            Some(name) if !name.trim().is_empty() => Ok(PathBuf::from(name.trim())),
            _ => Err(HostRuntimeError::NoFilename),
        }
    }

    fn save(&mut self, path: &Path, session: &mut Session) -> Result<SessionEnd, HostRuntimeError> {
        match self.io.save(path, session.buffer()) {
            Ok(result) => {
                session.mark_saved();
                info!(
                    path = %path.display(),
                    lines = result.lines_written,
                    bytes = result.bytes_written,
                    "document saved"
                );
                writeln!(
                    self.output,
                    "Saved {} lines to {}",
                    result.lines_written,
                    path.display()
                )?;
                Ok(SessionEnd::Saved {
                    lines: result.lines_written,
                })
            }
            Err(err) => {
                error!(path = %path.display(), %err, "save failed");
                Err(HostRuntimeError::Save(err))
            }
        }
    }

    /// Whether a QUIT should go through
    fn confirm_discard(&mut self, session: &Session) -> Result<bool, HostRuntimeError> {
        if !self.config.confirm_discard || !session.is_dirty() {
            return Ok(true);
        }

        write!(self.output, "{}", CONFIRM_DISCARD_PROMPT)?;
        self.output.flush()?;

        match read_line(&mut self.input)? {
            Some(answer) => {
                let confirmed = answer.trim().eq_ignore_ascii_case("y");
                if !confirmed {
                    debug!("discard declined");
                }
                Ok(confirmed)
            }
            // Nothing left to read; there is no session to go back to.
            None => {
                writeln!(self.output)?;
                Ok(true)
            }
        }
    }
}

/// Supplies INSERT/REPLACE text by prompting on the same console.
///
/// Console failures cancel the command and are kept for the caller to
/// propagate.
struct ConsoleSupplier<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
    error: Option<io::Error>,
}

impl<'a, R: BufRead, W: Write> ConsoleSupplier<'a, R, W> {
    fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            input,
            output,
            error: None,
        }
    }

    fn prompt_and_read(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let line = read_line(&mut *self.input)?;
        if line.is_none() {
            writeln!(self.output)?;
            warn!(prompt, "input ended while waiting for text");
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> LineSupplier for ConsoleSupplier<'_, R, W> {
    fn supply_line(&mut self, prompt: &str) -> Option<String> {
        match self.prompt_and_read(prompt) {
            Ok(line) => line,
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

/// Read one line without its terminator; `None` at end of input.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the
/// session.
fn read_line<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Option<String>> {
    let mut bytes = Vec::new();
    if input.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    if bytes.ends_with(b"\n") {
        bytes.pop();
        if bytes.ends_with(b"\r") {
            bytes.pop();
        }
    }
    let line = match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(err) => {
            warn!(
                valid_up_to = err.utf8_error().valid_up_to(),
                "input line is not valid UTF-8; replacing invalid bytes"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryDocumentIo;
    use std::io::Cursor;

    fn runtime(
        config: HostRuntimeConfig,
        script: impl AsRef<[u8]>,
        io: MemoryDocumentIo,
    ) -> HostRuntime<Cursor<Vec<u8>>, Vec<u8>, MemoryDocumentIo> {
        HostRuntime::with_io(config, Cursor::new(script.as_ref().to_vec()), Vec::new(), io)
    }

    fn config_for(path: &str) -> HostRuntimeConfig {
        HostRuntimeConfig {
            path: Some(PathBuf::from(path)),
            ..HostRuntimeConfig::default()
        }
    }

    fn output_of<R: BufRead, D: DocumentIo>(runtime: &HostRuntime<R, Vec<u8>, D>) -> String {
        String::from_utf8_lossy(runtime.output()).into_owned()
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let mut input = Cursor::new("a\r\nb\nc".as_bytes());
        assert_eq!(read_line(&mut input).unwrap(), Some("a".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), Some("b".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), Some("c".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_read_line_replaces_invalid_utf8() {
        let mut input = Cursor::new(b"caf\xe9\r\nok\n".to_vec());
        assert_eq!(read_line(&mut input).unwrap(), Some("caf\u{FFFD}".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), Some("ok".to_string()));
    }

    #[test]
    fn test_invalid_utf8_input_keeps_session() {
        let script = [&b"important edit\n"[..], b"caf\xe9\n", b"SAVE\n"].concat();
        let mut rt = runtime(config_for("doc.txt"), script, MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Saved { lines: 2 });
        assert_eq!(
            rt.io().document("doc.txt"),
            Some("important edit\ncaf\u{FFFD}\n")
        );
    }

    #[test]
    fn test_invalid_utf8_supplied_text_keeps_session() {
        let script = [&b"INSERT 1\n"[..], b"\xff\xfe\n", b"SAVE\n"].concat();
        let mut rt = runtime(config_for("doc.txt"), script, MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Saved { lines: 1 });
        assert_eq!(rt.io().document("doc.txt"), Some("\u{FFFD}\u{FFFD}\n"));
    }

    #[test]
    fn test_banner_and_prompt() {
        let mut rt = runtime(config_for("doc.txt"), "QUIT\n", MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Discarded);
        let out = output_of(&rt);
        assert!(out.starts_with("Editing file: doc.txt (new file)\n"));
        assert!(out.contains(USAGE_HINT));
        assert!(out.contains("> Exiting without saving.\n"));
    }

    #[test]
    fn test_save_writes_through_io() {
        let io = MemoryDocumentIo::new().with_document("doc.txt", "b\n");
        let mut rt = runtime(config_for("doc.txt"), "INSERT 1\na\nSAVE\n", io);
        assert_eq!(rt.run().unwrap(), SessionEnd::Saved { lines: 2 });
        assert_eq!(rt.io().document("doc.txt"), Some("a\nb\n"));
        let out = output_of(&rt);
        assert!(out.contains("> Insert text: Inserted at line 1\n"));
        assert!(out.ends_with("Saved 2 lines to doc.txt\n"));
    }

    #[test]
    fn test_quit_leaves_document_untouched() {
        let io = MemoryDocumentIo::new().with_document("doc.txt", "keep\n");
        let mut rt = runtime(config_for("doc.txt"), "extra\nQUIT\n", io);
        assert_eq!(rt.run().unwrap(), SessionEnd::Discarded);
        assert_eq!(rt.io().document("doc.txt"), Some("keep\n"));
    }

    #[test]
    fn test_end_of_input_discards() {
        let mut rt = runtime(config_for("doc.txt"), "typed\n", MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Discarded);
        assert_eq!(rt.io().document("doc.txt"), None);
    }

    #[test]
    fn test_save_failure_is_error() {
        let io = MemoryDocumentIo::new().with_failing_save("ro.txt");
        let mut rt = runtime(config_for("ro.txt"), "x\nSAVE\n", io);
        let err = rt.run().unwrap_err();
        assert!(matches!(err, HostRuntimeError::Save(_)));
        assert!(err.to_string().starts_with("Error saving file: "));
    }

    #[test]
    fn test_prompts_for_filename() {
        let mut rt = runtime(
            HostRuntimeConfig::default(),
            "  named.txt \nhello\nSAVE\n",
            MemoryDocumentIo::new(),
        );
        rt.run().unwrap();
        assert!(output_of(&rt).starts_with(FILENAME_PROMPT));
        assert_eq!(rt.io().document("named.txt"), Some("hello\n"));
    }

    #[test]
    fn test_empty_filename_is_error() {
        let mut rt = runtime(HostRuntimeConfig::default(), "\n", MemoryDocumentIo::new());
        assert!(matches!(rt.run(), Err(HostRuntimeError::NoFilename)));

        let mut rt = runtime(HostRuntimeConfig::default(), "", MemoryDocumentIo::new());
        assert!(matches!(rt.run(), Err(HostRuntimeError::NoFilename)));
    }

    #[test]
    fn test_confirm_discard_declined_then_accepted() {
        let config = HostRuntimeConfig {
            confirm_discard: true,
            ..config_for("doc.txt")
        };
        let mut rt = runtime(config, "dirty\nQUIT\nn\nQUIT\ny\n", MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Discarded);
        let out = output_of(&rt);
        assert_eq!(out.matches(CONFIRM_DISCARD_PROMPT).count(), 2);
        assert!(out.ends_with("Exiting without saving.\n"));
    }

    #[test]
    fn test_confirm_discard_skipped_when_clean() {
        let config = HostRuntimeConfig {
            confirm_discard: true,
            ..config_for("doc.txt")
        };
        let mut rt = runtime(config, "SHOW\nQUIT\n", MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Discarded);
        assert!(!output_of(&rt).contains(CONFIRM_DISCARD_PROMPT));
    }

    #[test]
    fn test_insert_cancelled_by_end_of_input() {
        let mut rt = runtime(config_for("doc.txt"), "INSERT 1\n", MemoryDocumentIo::new());
        assert_eq!(rt.run().unwrap(), SessionEnd::Discarded);
        assert!(output_of(&rt).contains("INSERT cancelled: no text supplied"));
    }
}
