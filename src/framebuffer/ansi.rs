//! The entire ANSI vocabulary the engine is permitted to emit. No other
//! escape bytes originate from this crate.

pub const CLEAR_SCREEN_HOME: &str = "\x1b[2J\x1b[H";
pub const CLEAR_TO_EOL: &str = "\x1b[K";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const RESET_ATTRS: &str = "\x1b[0m";

/// 1-based cursor position sequence (ANSI is 1-based; callers pass 0-based
/// grid coordinates and this adds the offset).
pub fn cursor_position(row0: usize, col0: usize) -> String {
    format!("\x1b[{};{}H", row0 + 1, col0 + 1)
}

/// Wrap `text` in a raw SGR attribute prefix (passthrough — the engine does
/// not interpret these codes, it only joins and frames them) and a reset
/// suffix.
pub fn with_attrs(text: &str, attrs: &[u32]) -> String {
    if attrs.is_empty() {
        return text.to_string();
    }
    let codes: Vec<String> = attrs.iter().map(|c| c.to_string()).collect();
    format!("\x1b[{}m{}{}", codes.join(";"), text, RESET_ATTRS)
}
