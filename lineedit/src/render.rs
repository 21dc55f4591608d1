//! Response rendering and output

use lineedit_core::{help_text, Response};

/// Shown in place of a listing when the buffer has no lines
pub const EMPTY_BUFFER_NOTICE: &str = "[buffer is empty]";

/// Turns interpreter responses into console text
#[derive(Debug, Clone, Default)]
pub struct ResponseView;

impl ResponseView {
    pub fn new() -> Self {
        Self
    }

    /// Render a response to newline-terminated text (empty for silent ones)
    pub fn render(&self, response: &Response) -> String {
        let mut output = String::new();
        for line in self.lines(response) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    fn lines(&self, response: &Response) -> Vec<String> {
        match response {
            Response::Silent => Vec::new(),
            Response::Message(message) => vec![message.clone()],
            Response::Listing(rows) if rows.is_empty() => vec![EMPTY_BUFFER_NOTICE.to_string()],
            Response::Listing(rows) => rows.clone(),
            Response::Help => help_text().lines().map(String::from).collect(),
            Response::Error(err) => vec![err.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineedit_core::EditError;

    #[test]
    fn test_render_silent() {
        assert_eq!(ResponseView::new().render(&Response::Silent), "");
    }

    #[test]
    fn test_render_message() {
        let out = ResponseView::new().render(&Response::Message("Replaced line 2".into()));
        assert_eq!(out, "Replaced line 2\n");
    }

    #[test]
    fn test_render_listing() {
        let listing = Response::Listing(vec!["   1: a".into(), "   2: b".into()]);
        assert_eq!(ResponseView::new().render(&listing), "   1: a\n   2: b\n");
    }

    #[test]
    fn test_render_empty_listing() {
        let out = ResponseView::new().render(&Response::Listing(Vec::new()));
        assert_eq!(out, "[buffer is empty]\n");
    }

    #[test]
    fn test_render_help() {
        let out = ResponseView::new().render(&Response::Help);
        assert!(out.starts_with("Available commands:"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_render_error() {
        let out = ResponseView::new().render(&Response::Error(EditError::OutOfRange {
            line: 9,
            len: 2,
        }));
        assert_eq!(out, "Line number out of range: 9 (buffer has 2 lines)\n");
    }
}
