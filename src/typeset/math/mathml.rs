//! Server-side MathML conversion via `latex2mathml`.

use super::MathRenderer;
use crate::error::{RenderError, Result};
use latex2mathml::{latex_to_mathml, DisplayStyle};

/// Converts LaTeX to MathML for native browser rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMLRenderer;

impl MathMLRenderer {
    fn convert(&self, latex: &str, style: DisplayStyle) -> Result<String> {
        let markup = latex_to_mathml(latex, style)
            .map_err(|e| RenderError::Math(format!("{}: {}", latex, e)))?;
        // The generated `<math>` root is matched by the ignored tags on re-runs.
        Ok(markup)
    }
}

impl MathRenderer for MathMLRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        self.convert(latex, DisplayStyle::Inline)
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        self.convert(latex, DisplayStyle::Block)
    }

    fn head_content(&self) -> Option<String> {
        Some(
            "<style>\n.math-block > math { display: block; margin: 1em auto; }\n.math-inline > math { font-size: 1.05em; }\n</style>"
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_is_mathml() {
        let out = MathMLRenderer.render_inline("x^2").unwrap();
        assert!(out.starts_with("<math"));
    }

    #[test]
    fn test_display_is_mathml() {
        let out = MathMLRenderer.render_display("\\frac{1}{2}").unwrap();
        assert!(out.starts_with("<math"));
    }
}
