//! Line-oriented passes: headings, lists, rules and paragraph wrapping.

use super::lexer::{heading, list_item, thematic_break, ListMarker};
use super::protect::{has_block_token, segments, Segment};

/// Markup that already forms a block and must not be wrapped in `<p>`.
const BLOCK_PREFIXES: &[&str] = &["<h2>", "<h3>", "<h4>", "<h5>", "<ul>", "<ol>", "<hr>"];

/// `#` to `####` become `<h2>` to `<h5>`.
///
/// A line holding block math or a code block stays text, since a heading
/// cannot contain a block.
pub fn headings(input: &str) -> String {
    map_lines(input, |line| {
        let (_, (level, content)) = heading(line.trim_start()).ok()?;
        if has_block_token(content) {
            return None;
        }
        let tag = level + 1;
        Some(format!("<h{}>{}</h{}>", tag, content.trim(), tag))
    })
}

/// Coalesce consecutive list items of one kind into a single list.
pub fn lists(input: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<(ListMarker, String)> = None;

    for line in input.split('\n') {
        match list_item(line.trim_start()) {
            Ok((_, (marker, content))) => {
                if let Some((current, items)) = open.as_mut() {
                    if *current == marker {
                        push_item(items, content);
                        continue;
                    }
                }
                close_list(&mut out, open.take());
                let mut items = String::new();
                push_item(&mut items, content);
                open = Some((marker, items));
            }
            Err(_) => {
                close_list(&mut out, open.take());
                out.push(line.to_string());
            }
        }
    }
    close_list(&mut out, open.take());
    out.join("\n")
}

fn push_item(items: &mut String, content: &str) {
    items.push_str("<li>");
    items.push_str(content.trim());
    items.push_str("</li>");
}

fn close_list(out: &mut Vec<String>, list: Option<(ListMarker, String)>) {
    if let Some((marker, items)) = list {
        let tag = match marker {
            ListMarker::Bullet => "ul",
            ListMarker::Ordered => "ol",
        };
        out.push(format!("<{}>{}</{}>", tag, items, tag));
    }
}

/// A line of only `---`, `***` or `___` becomes `<hr>`.
pub fn horizontal_rules(input: &str) -> String {
    map_lines(input, |line| {
        thematic_break(line.trim())
            .ok()
            .map(|_| "<hr>".to_string())
    })
}

/// Wrap blank-line separated text runs in `<p>`, joining their lines with
/// `<br>`. Block markup and block placeholders stand on their own.
pub fn paragraphs(input: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut para: Vec<String> = Vec::new();

    for line in input.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut para, &mut blocks);
            continue;
        }
        if BLOCK_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            flush_paragraph(&mut para, &mut blocks);
            blocks.push(trimmed.to_string());
            continue;
        }

        let mut current = String::new();
        for segment in segments(trimmed) {
            match segment {
                Segment::Token(token, literal) if token.tag.is_block() => {
                    push_line(&mut para, &mut current);
                    flush_paragraph(&mut para, &mut blocks);
                    blocks.push(literal.to_string());
                }
                Segment::Token(_, text) | Segment::Text(text) => current.push_str(text),
            }
        }
        push_line(&mut para, &mut current);
    }
    flush_paragraph(&mut para, &mut blocks);

    blocks.join("\n")
}

fn push_line(para: &mut Vec<String>, current: &mut String) {
    let line = current.trim();
    if !line.is_empty() {
        para.push(line.to_string());
    }
    current.clear();
}

fn flush_paragraph(para: &mut Vec<String>, blocks: &mut Vec<String>) {
    if !para.is_empty() {
        blocks.push(format!("<p>{}</p>", para.join("<br>")));
        para.clear();
    }
}

fn map_lines<F>(input: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    input
        .split('\n')
        .map(|line| f(line).unwrap_or_else(|| line.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}
