//! Line buffer storage

/// Ordered sequence of text lines.
///
/// Rows are 0-based here; the interpreter owns the translation from the
/// 1-based line numbers users type. No stored line contains a line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a buffer from file contents.
    ///
    /// Splits on `\n`, tolerating `\r\n` and a missing final newline.
    /// Empty content yields an empty buffer.
    pub fn from_text(content: &str) -> Self {
        Self {
            lines: content.lines().map(String::from).collect(),
        }
    }

    /// Serialize for persistence: every line terminated by `\n`.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Insert a line before `row`; `row == line_count()` appends.
    pub fn insert_line(&mut self, row: usize, text: &str) -> bool {
        if row > self.lines.len() {
            return false;
        }
        self.lines.insert(row, single_line(text));
        true
    }

    /// Remove the line at `row`, returning its text
    pub fn delete_line(&mut self, row: usize) -> Option<String> {
        if row >= self.lines.len() {
            return None;
        }
        Some(self.lines.remove(row))
    }

    /// Replace the line at `row` wholesale
    pub fn replace_line(&mut self, row: usize, text: &str) -> bool {
        match self.lines.get_mut(row) {
            Some(line) => {
                *line = single_line(text);
                true
            }
            None => false,
        }
    }

    pub fn append_line(&mut self, text: &str) {
        self.lines.push(single_line(text));
    }
}

impl From<Vec<String>> for LineBuffer {
    fn from(lines: Vec<String>) -> Self {
        Self {
            lines: lines.iter().map(|l| single_line(l)).collect(),
        }
    }
}

/// Cut text at its first line break.
fn single_line(text: &str) -> String {
    let first = text.split('\n').next().unwrap_or_default();
    first.strip_suffix('\r').unwrap_or(first).to_string()
}
