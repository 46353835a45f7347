//! Client-side passthrough: math is rewritten into `\(..\)` / `\[..\]` spans
//! that KaTeX or MathJax typesets in the browser.

use super::MathRenderer;
use crate::error::{RenderError, Result};
use crate::escape::escape_text;

const KATEX_VERSION: &str = "0.16.9";
const MATHJAX_VERSION: &str = "3";

/// Browser-side engine that picks up the rewritten spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEngine {
    KaTeX,
    MathJax,
}

impl ClientEngine {
    fn class_prefix(self) -> &'static str {
        match self {
            ClientEngine::KaTeX => "katex",
            ClientEngine::MathJax => "mathjax",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClientRenderer {
    engine: ClientEngine,
}

impl ClientRenderer {
    pub fn new(engine: ClientEngine) -> Self {
        Self { engine }
    }

    pub fn katex() -> Self {
        Self::new(ClientEngine::KaTeX)
    }

    pub fn mathjax() -> Self {
        Self::new(ClientEngine::MathJax)
    }

    pub fn engine(&self) -> ClientEngine {
        self.engine
    }

    fn wrap(&self, latex: &str, display: bool) -> Result<String> {
        let (mode, open, close) = if display {
            ("display", "\\[", "\\]")
        } else {
            ("inline", "\\(", "\\)")
        };
        // The browser engine would end the span at the first closing bracket.
        if latex.contains(close) {
            return Err(RenderError::Unsupported(format!(
                "{} math containing {} cannot be passed to the browser",
                mode, close
            ))
            .into());
        }
        Ok(format!(
            r#"<span class="typeset {}-{}">{}{}{}</span>"#,
            self.engine.class_prefix(),
            mode,
            open,
            escape_text(latex),
            close
        ))
    }
}

impl Default for ClientRenderer {
    fn default() -> Self {
        Self::katex()
    }
}

impl MathRenderer for ClientRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        self.wrap(latex, false)
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        self.wrap(latex, true)
    }

    fn head_content(&self) -> Option<String> {
        Some(match self.engine {
            ClientEngine::KaTeX => katex_head(),
            ClientEngine::MathJax => mathjax_head(),
        })
    }
}

fn katex_head() -> String {
    let cdn = format!("https://cdn.jsdelivr.net/npm/katex@{}/dist", KATEX_VERSION);
    format!(
        r#"<link rel="stylesheet" href="{cdn}/katex.min.css" crossorigin="anonymous">
<script defer src="{cdn}/katex.min.js" crossorigin="anonymous"></script>
<script defer src="{cdn}/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {{
        delimiters: [
            {{left: '\\[', right: '\\]', display: true}},
            {{left: '\\(', right: '\\)', display: false}}
        ],
        throwOnError: false
    }});"></script>"#,
        cdn = cdn
    )
}

fn mathjax_head() -> String {
    format!(
        r#"<script>
window.MathJax = {{
    tex: {{ inlineMath: [['\\(', '\\)']], displayMath: [['\\[', '\\]']], processEscapes: true }}
}};
</script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@{}/es5/tex-mml-chtml.js"></script>"#,
        MATHJAX_VERSION
    )
}
