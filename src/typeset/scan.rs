//! Delimiter scanning over a parsed copy of the container's markup.
//!
//! Text nodes are searched for delimiter pairs and ignored elements are
//! written back whole. Each span is typeset on its own, and a failing span
//! keeps its source text.

use super::dom::{self, Handle, Node, NodeData};
use super::math::MathRenderer;
use super::{SpanFailure, TypesetReport};
use crate::config::{Delimiter, TypesetConfig};
use crate::escape::escape_text;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Typeset every math span in `markup`.
pub fn typeset_markup(
    markup: &str,
    renderer: &dyn MathRenderer,
    config: &TypesetConfig,
) -> (String, TypesetReport) {
    let root = dom::parse_fragment(markup);
    let mut scanner = Scanner {
        renderer,
        config,
        report: TypesetReport::default(),
    };
    let mut out = String::with_capacity(markup.len());
    scanner.walk(&root, &mut out);
    (out, scanner.report)
}

struct Scanner<'a> {
    renderer: &'a dyn MathRenderer,
    config: &'a TypesetConfig,
    report: TypesetReport,
}

impl Scanner<'_> {
    fn walk(&mut self, parent: &Handle, out: &mut String) {
        for child in parent.children.borrow().iter() {
            match &child.data {
                NodeData::Text { contents } if !parent.is_raw_text() => {
                    self.typeset_text(&contents.borrow(), out);
                }
                NodeData::Element { .. } if !self.skips(child) => {
                    dom::write_start_tag(child, out);
                    if !child.is_void() {
                        self.walk(child, out);
                        dom::write_end_tag(child, out);
                    }
                }
                _ => dom::serialize(child, out),
            }
        }
    }

    fn skips(&self, element: &Node) -> bool {
        let Some(name) = element.local_name() else {
            return false;
        };
        if self
            .config
            .ignored_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(name))
        {
            return true;
        }
        element
            .classes()
            .iter()
            .any(|class| self.config.ignored_classes.contains(class))
    }

    /// Typeset the decoded text of one text node, writing escaped markup.
    fn typeset_text(&mut self, text: &str, out: &mut String) {
        let mut plain = 0;
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];

            if let Some((delimiter, len)) = self.find_math(rest) {
                let raw = &rest[..len];
                let body = &raw[delimiter.left.len()..len - delimiter.right.len()];
                let display = delimiter.display;
                out.push_str(&escape_text(&text[plain..i]));
                out.push_str(&self.render_span(raw, body, display));
                i += len;
                plain = i;
                continue;
            }

            // An escaped dollar is never an opener.
            if rest.starts_with("\\$") {
                i += 2;
                continue;
            }

            match rest.chars().next() {
                Some(c) => i += c.len_utf8(),
                None => break,
            }
        }

        out.push_str(&escape_text(&text[plain..]));
    }

    /// Find a delimited span at the start of `text`, returning its delimiter
    /// and total length.
    fn find_math(&self, text: &str) -> Option<(&Delimiter, usize)> {
        self.config.delimiters.iter().find_map(|delimiter| {
            if !text.starts_with(delimiter.left.as_str()) {
                return None;
            }
            let start = delimiter.left.len();
            let end = find_closing(text, start, &delimiter.right)?;
            if text[start..end].trim().is_empty() {
                return None;
            }
            Some((delimiter, end + delimiter.right.len()))
        })
    }

    fn render_span(&mut self, raw: &str, latex: &str, display: bool) -> String {
        let renderer = self.renderer;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if display {
                renderer.render_display(latex)
            } else {
                renderer.render_inline(latex)
            }
        }));

        let message = match outcome {
            Ok(Ok(html)) => {
                self.report.typeset += 1;
                return html;
            }
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        log::warn!("typeset: leaving {:?} as source: {}", raw, message);
        self.report.failures.push(SpanFailure {
            source: raw.to_string(),
            message,
        });
        escape_text(raw)
    }
}

/// Find the closing delimiter, skipping backslash escapes and anything
/// nested inside braces.
fn find_closing(text: &str, start: usize, right: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut idx = start;

    while idx < text.len() {
        let rest = &text[idx..];
        if depth <= 0 && rest.starts_with(right) {
            return Some(idx);
        }
        let c = rest.chars().next()?;
        idx += c.len_utf8();
        match c {
            '\\' => {
                if let Some(next) = text[idx..].chars().next() {
                    idx += next.len_utf8();
                }
            }
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }

    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("renderer panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("renderer panicked: {}", s)
    } else {
        "renderer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeset::math::ClientRenderer;
    use pretty_assertions::assert_eq;

    fn run(markup: &str) -> (String, TypesetReport) {
        typeset_markup(markup, &ClientRenderer::katex(), &TypesetConfig::default())
    }

    #[test]
    fn test_inline_dollars() {
        let (out, report) = run(r#"<span class="math-inline" dir="ltr">$x_1^2$</span>"#);
        assert_eq!(
            out,
            r#"<span class="math-inline" dir="ltr"><span class="typeset katex-inline">\(x_1^2\)</span></span>"#
        );
        assert_eq!(report.typeset, 1);
    }

    #[test]
    fn test_display_dollars() {
        let (out, _) = run(r#"<div class="math-block" dir="ltr">$$\frac{1}{2}$$</div>"#);
        assert!(out.contains(r#"<span class="typeset katex-display">\[\frac{1}{2}\]</span>"#));
    }

    #[test]
    fn test_bracket_delimiters() {
        let (out, report) = run(r"<p>\(a\) and \[b\]</p>");
        assert_eq!(report.typeset, 2);
        assert!(out.contains("katex-inline"));
        assert!(out.contains("katex-display"));
    }

    #[test]
    fn test_code_is_ignored() {
        let markup = r#"<pre class="code-block"><code>echo $A $B</code></pre><code class="inline-code">$x$</code>"#;
        let (out, report) = run(markup);
        assert_eq!(out, markup);
        assert_eq!(report.typeset, 0);
    }

    #[test]
    fn test_entities_decoded_before_rendering() {
        struct Echo;
        impl MathRenderer for Echo {
            fn render_inline(&self, latex: &str) -> crate::Result<String> {
                Ok(format!("[{}]", latex))
            }
            fn render_display(&self, latex: &str) -> crate::Result<String> {
                Ok(format!("[[{}]]", latex))
            }
            fn head_content(&self) -> Option<String> {
                None
            }
        }

        let (out, _) = typeset_markup("<p>$a &lt; b &amp; c$</p>", &Echo, &TypesetConfig::default());
        assert_eq!(out, "<p>[a < b & c]</p>");
    }

    #[test]
    fn test_braces_hide_closing_delimiter() {
        let (_, report) = run(r"<p>$\text{cost $5}$</p>");
        assert_eq!(report.typeset, 1);
    }

    #[test]
    fn test_unclosed_dollar_left_alone() {
        let (out, report) = run("<p>costs $5</p>");
        assert_eq!(out, "<p>costs $5</p>");
        assert_eq!(report.typeset, 0);
    }

    #[test]
    fn test_escaped_dollar_not_opener() {
        let (out, report) = run(r"<p>\$5 and \$6</p>");
        assert_eq!(out, r"<p>\$5 and \$6</p>");
        assert_eq!(report.typeset, 0);
    }

    #[test]
    fn test_rerun_is_stable() {
        let (first, _) = run(r#"<p><span class="math-inline" dir="ltr">$x$</span></p>"#);
        let (second, report) = run(&first);
        assert_eq!(first, second);
        assert_eq!(report.typeset, 0);
    }

    #[test]
    fn test_nested_ignored_elements() {
        let markup = r#"<pre><code><span>$a$</span></code></pre><p><code>$b$</code> $c$</p>"#;
        let (out, report) = run(markup);
        assert_eq!(report.typeset, 1);
        assert!(out.starts_with(r#"<pre><code><span>$a$</span></code></pre><p><code>$b$</code> "#));
    }

    #[test]
    fn test_attribute_text_is_not_math() {
        let (out, report) = run(r#"<a title="x > $y$" href="/">$z$</a>"#);
        assert_eq!(report.typeset, 1);
        assert!(out.contains("$y$"));
        assert!(out.contains(r#"<span class="typeset katex-inline">\(z\)</span>"#));
    }

    #[test]
    fn test_failed_span_is_written_escaped() {
        let (out, report) = run(r"<p>$a \) &lt; b$</p>");
        assert_eq!(out, r"<p>$a \) &lt; b$</p>");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, r"$a \) < b$");
    }

    #[test]
    fn test_malformed_markup_is_repaired() {
        let (out, report) = run("<p><em>$x$");
        assert_eq!(
            out,
            r#"<p><em><span class="typeset katex-inline">\(x\)</span></em></p>"#
        );
        assert_eq!(report.typeset, 1);
    }
}
