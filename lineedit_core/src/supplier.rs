//! Line supply for commands that need extra text

use std::collections::VecDeque;

/// Source of the single line of text `INSERT` and `REPLACE` ask for.
///
/// Returning `None` means no more input is available; the requesting
/// command is cancelled and the buffer stays untouched.
pub trait LineSupplier {
    fn supply_line(&mut self, prompt: &str) -> Option<String>;
}

impl<F> LineSupplier for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn supply_line(&mut self, prompt: &str) -> Option<String> {
        self(prompt)
    }
}

/// Pre-recorded answers, handed out in order.
///
/// Every prompt asked is recorded so tests can check the interpreter only
/// asked when it should have.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSupplier for ScriptedLines {
    fn supply_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front()
    }
}
