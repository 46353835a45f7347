//! Markdown-with-math compiler.
//!
//! The stages run in a fixed order, and the order is what keeps LaTeX
//! intact:
//!
//! 1. control-character repair
//! 2. `$$...$$` extraction
//! 3. `$...$` extraction (after block math, so `$$a$$` is never split)
//! 4. fenced code classified as block math or code
//! 5. inline code classified as inline math or code
//! 6. HTML escaping of everything left in the buffer
//! 7. headings, emphasis, lists, rules, links
//! 8. paragraph wrapping
//! 9. placeholder restoration
//!
//! Math and code leave the buffer before escaping and come back only in
//! stage 9, so no markdown pass ever sees them.

mod block;
mod classify;
mod extract;
mod inline;
mod lexer;
mod protect;
mod repair;

pub use classify::looks_like_latex;
pub use protect::{MathKind, Region};

use crate::config::CompileConfig;
use crate::escape::escape_html;
use protect::ProtectedRegions;

/// Compile Markdown with embedded math into HTML using the default config.
///
/// Never fails: unbalanced delimiters are rendered as escaped text.
pub fn compile(source: &str) -> String {
    compile_with_config(source, &CompileConfig::default())
}

/// Compile Markdown with embedded math into HTML.
pub fn compile_with_config(source: &str, config: &CompileConfig) -> String {
    if source.is_empty() {
        return String::new();
    }

    let mut regions = ProtectedRegions::new();

    let buffer = repair::repair_control_chars(source);
    let buffer = extract::extract_block_math(&buffer, &mut regions);
    let buffer = extract::extract_inline_math(&buffer, &mut regions);
    let buffer = extract::extract_fenced_code(&buffer, &mut regions, &config.heuristic);
    let buffer = extract::extract_inline_code(&buffer, &mut regions, &config.heuristic);

    let buffer = escape_html(&buffer);

    let buffer = block::headings(&buffer);
    let buffer = inline::emphasis(&buffer);
    let buffer = block::lists(&buffer);
    let buffer = block::horizontal_rules(&buffer);
    let buffer = inline::links(&buffer, &config.links);

    let buffer = block::paragraphs(&buffer);

    log::trace!(
        "compile: {} block and {} inline math regions",
        regions.block().len(),
        regions.inline().len()
    );
    regions.restore(&buffer)
}

/// Compile a possibly missing source; `None` compiles as empty.
pub fn compile_opt(source: Option<&str>) -> String {
    compile(source.unwrap_or_default())
}
