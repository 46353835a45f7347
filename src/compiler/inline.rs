//! Emphasis and link passes over the escaped buffer.

use super::lexer::{enclosed, link, rewrite, url_scheme};
use super::protect::has_block_token;
use crate::config::LinkConfig;

/// Emphasis rules, longest delimiter first so `**x**` is never eaten by `*`.
const EMPHASIS_RULES: &[(&str, &str, &str)] = &[
    ("***", "<strong><em>", "</em></strong>"),
    ("**", "<strong>", "</strong>"),
    ("__", "<strong>", "</strong>"),
    ("*", "<em>", "</em>"),
    ("_", "<em>", "</em>"),
];

/// Apply every emphasis rule, each as its own pass over the buffer.
pub fn emphasis(input: &str) -> String {
    EMPHASIS_RULES
        .iter()
        .fold(input.to_string(), |buffer, (delim, open, close)| {
            emphasis_pass(&buffer, delim, open, close)
        })
}

fn emphasis_pass(input: &str, delim: &str, open: &str, close: &str) -> String {
    let Some(marker) = delim.chars().next() else {
        return input.to_string();
    };

    rewrite(input, marker, |before, rest| {
        let (after, body) = enclosed(rest, delim).ok()?;
        if !is_emphasis_body(body, marker) {
            return None;
        }
        // Underscores inside a word (`snake_case_name`) are not emphasis.
        if marker == '_'
            && (before.is_some_and(char::is_alphanumeric)
                || after.starts_with(char::is_alphanumeric))
        {
            return None;
        }
        Some((format!("{}{}{}", open, body, close), after))
    })
}

/// A body that spans a block placeholder would be split across paragraphs.
fn is_emphasis_body(body: &str, marker: char) -> bool {
    !body.is_empty()
        && !body.contains('\n')
        && !has_block_token(body)
        && body.chars().any(|c| c != marker)
        && !body.starts_with(char::is_whitespace)
        && !body.ends_with(char::is_whitespace)
}

/// Turn `[text](url)` into an anchor that opens in a new context.
///
/// URLs with a scheme outside the allowed list are left as text.
pub fn links(input: &str, config: &LinkConfig) -> String {
    rewrite(input, '[', |_, rest| {
        let (after, (text, url)) = link(rest).ok()?;
        if has_block_token(text) || !is_allowed_url(url, config) {
            return None;
        }
        Some((
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                url, text
            ),
            after,
        ))
    })
}

fn is_allowed_url(url: &str, config: &LinkConfig) -> bool {
    match url_scheme(url) {
        Ok((_, scheme)) => config
            .allowed_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme)),
        Err(_) => true,
    }
}
