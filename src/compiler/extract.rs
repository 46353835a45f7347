//! Extraction stages: math first, then code spans classified as math or code.

use super::classify::{is_math_language, looks_like_latex};
use super::lexer::{display_math, fenced_code, inline_code, inline_math, rewrite};
use super::protect::{MathKind, ProtectedRegions};
use crate::config::HeuristicConfig;
use crate::escape::escape_html;

/// Replace every `$$...$$` span with a block placeholder.
pub fn extract_block_math(input: &str, regions: &mut ProtectedRegions) -> String {
    rewrite(input, '$', |_, rest| {
        let (after, body) = display_math(rest).ok()?;
        let source = &rest[..rest.len() - after.len()];
        Some((regions.protect_math(MathKind::Block, body, source), after))
    })
}

/// Replace every single-line `$...$` span with an inline placeholder.
pub fn extract_inline_math(input: &str, regions: &mut ProtectedRegions) -> String {
    rewrite(input, '$', |_, rest| {
        let (after, body) = inline_math(rest).ok()?;
        let source = &rest[..rest.len() - after.len()];
        Some((regions.protect_math(MathKind::Inline, body, source), after))
    })
}

/// Classify each fenced span: LaTeX becomes block math, anything else an
/// escaped code block.
pub fn extract_fenced_code(
    input: &str,
    regions: &mut ProtectedRegions,
    heuristic: &HeuristicConfig,
) -> String {
    rewrite(input, '`', |_, rest| {
        let (after, (lang, body)) = fenced_code(rest).ok()?;
        let source = &rest[..rest.len() - after.len()];
        let body = regions.unprotect(body);

        let token = if is_math_language(lang, heuristic) || looks_like_latex(&body, heuristic) {
            regions.protect_math(MathKind::Block, &body, source)
        } else {
            let class = if lang.is_empty() {
                String::new()
            } else {
                format!(r#" class="language-{}""#, escape_html(lang))
            };
            let markup = format!(
                r#"<pre class="code-block"><code{}>{}</code></pre>"#,
                class,
                escape_html(body.trim_end_matches('\n'))
            );
            regions.protect_code(true, markup, source)
        };
        Some((token, after))
    })
}

/// Classify each single-backtick span: LaTeX becomes inline math, anything
/// else escaped inline code.
pub fn extract_inline_code(
    input: &str,
    regions: &mut ProtectedRegions,
    heuristic: &HeuristicConfig,
) -> String {
    rewrite(input, '`', |_, rest| {
        let (after, body) = inline_code(rest).ok()?;
        let source = &rest[..rest.len() - after.len()];
        let body = regions.unprotect(body);

        let token = if looks_like_latex(&body, heuristic) {
            regions.protect_math(MathKind::Inline, body.trim(), source)
        } else {
            let markup = format!(r#"<code class="inline-code">{}</code>"#, escape_html(&body));
            regions.protect_code(false, markup, source)
        };
        Some((token, after))
    })
}
