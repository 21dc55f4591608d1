//! # Help Text
//!
//! Static command reference shown for `HELP`

/// The command reference, one command per line
pub fn help_text() -> &'static str {
    "Available commands:\n\
     \x20 SAVE           Save changes to disk and exit\n\
     \x20 QUIT           Exit without saving\n\
     \x20 SHOW           Display current buffer with line numbers\n\
     \x20 HELP           Show this help text\n\
     \x20 INSERT N       Insert a line before line number N (1-based). You will be\n\
     \x20                prompted for the inserted text.\n\
     \x20 DELETE N       Delete line number N\n\
     \x20 REPLACE N      Replace line number N. You will be prompted for the new text.\n\
     \n\
     Commands are case-sensitive. Any other input is appended to the end of the\n\
     buffer as a new line."
}
