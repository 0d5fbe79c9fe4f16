//! File-name rules applied to what the stores return

/// Ctrl-D. Ends the board's paste mode, so leaving it in loaded text would
/// abort the next run.
pub const EXECUTION_ABORT_BYTE: char = '\u{4}';

/// Keep only user-facing entries from a raw board listing.
///
/// Entries without an extension (directories such as `lib`) and dot-files
/// (system artifacts such as `.boot`) are dropped. Order is preserved.
pub fn filter_serial_listing(raw: Vec<String>) -> Vec<String> {
    raw.into_iter().filter(|name| is_user_file(name)).collect()
}

fn is_user_file(name: &str) -> bool {
    name.contains('.') && !name.starts_with('.')
}

/// Remove execution-aborting control bytes from text loaded off the board
pub fn strip_control_bytes(content: &str) -> String {
    content.replace(EXECUTION_ABORT_BYTE, "")
}
