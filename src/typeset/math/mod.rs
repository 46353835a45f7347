//! Math rendering backends used by the typesetter.

mod client;
#[cfg(feature = "mathml")]
mod mathml;

pub use self::client::{ClientEngine, ClientRenderer};
#[cfg(feature = "mathml")]
pub use self::mathml::MathMLRenderer;

use crate::error::Result;
use serde::Deserialize;

/// Math rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Rewrite to `\(...\)` / `\[...\]` for KaTeX to render client-side.
    #[default]
    #[serde(alias = "KaTeX")]
    KaTeX,
    /// Same passthrough, with MathJax head assets.
    #[serde(alias = "MathJax")]
    MathJax,
    /// Convert to MathML for native browser rendering.
    #[serde(alias = "MathML")]
    MathML,
}

impl MathBackend {
    /// Parse a backend name, falling back to KaTeX.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mathjax" => MathBackend::MathJax,
            "mathml" => MathBackend::MathML,
            _ => MathBackend::KaTeX,
        }
    }
}

/// The typesetting library behind the adapter.
///
/// Implementations may fail or even panic on a malformed formula; the
/// typesetter isolates each call.
pub trait MathRenderer {
    fn render_inline(&self, latex: &str) -> Result<String>;

    fn render_display(&self, latex: &str) -> Result<String>;

    /// Scripts and styles the rendered output needs in the page head.
    fn head_content(&self) -> Option<String>;
}

/// Create a math renderer for the given backend.
///
/// Without the `mathml` feature the MathML backend falls back to KaTeX.
pub fn create_renderer(backend: MathBackend) -> Box<dyn MathRenderer> {
    match backend {
        MathBackend::KaTeX => Box::new(ClientRenderer::katex()),
        MathBackend::MathJax => Box::new(ClientRenderer::mathjax()),
        #[cfg(feature = "mathml")]
        MathBackend::MathML => Box::new(MathMLRenderer),
        #[cfg(not(feature = "mathml"))]
        MathBackend::MathML => {
            log::warn!("mathml backend requested without the `mathml` feature, using KaTeX");
            Box::new(ClientRenderer::katex())
        }
    }
}
