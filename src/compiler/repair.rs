//! Control-character repair.
//!
//! Content that went through a lossy JSON round trip can arrive with `\t`,
//! `\b` and `\f` already decoded into control bytes, so `\text{x}` shows up
//! as a tab followed by `ext{x}`. Rewriting the byte back into its escape
//! restores the LaTeX command name.

use super::protect::{TOKEN_CLOSE, TOKEN_OPEN};

/// Rewrite tab, backspace and form-feed into their two-character escapes and
/// drop the placeholder sentinels so no token can come from the source.
pub fn repair_control_chars(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            TOKEN_OPEN | TOKEN_CLOSE => {}
            _ => out.push(c),
        }
    }
    out
}
