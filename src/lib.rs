//! # mathdown
//!
//! Markdown with embedded LaTeX math, compiled to safe HTML.
//!
//! The compiler protects math spans before any Markdown transform runs, so
//! `_`, `*` and backticks inside a formula never turn into emphasis or code.
//! Code spans that are really LaTeX are detected and treated as math. All
//! remaining author text is HTML-escaped.
//!
//! A second, separate step typesets the math in the rendered markup through a
//! pluggable backend.
//!
//! ## Quick Start
//!
//! ```rust
//! use mathdown::{compile, Container, Typesetter};
//!
//! let html = compile("## Energy\n\nThe relation $E = mc^2$ is *famous*.");
//! assert!(html.contains(r#"<span class="math-inline" dir="ltr">$E = mc^2$</span>"#));
//!
//! let mut container = Container::with_markup(html);
//! let mut typesetter = Typesetter::default();
//! let report = typesetter.content_changed(&mut container);
//! assert_eq!(report.typeset, 1);
//! ```
//!
//! ## Syntax Reference
//!
//! - Math: inline `$x^2$`, display `$$\int_0^1 x\,dx$$`
//! - Code: fenced ```` ```lang ```` blocks and `` `inline` `` spans; either
//!   is treated as math when its content looks like LaTeX
//! - Headings `#` to `####` (rendered as `h2` to `h5`)
//! - Emphasis `***both***`, `**strong**`, `__strong__`, `*em*`, `_em_`
//! - Lists `-`, `*`, `+` and `1.`
//! - Horizontal rules `---`, `***`, `___`
//! - Links `[text](https://example.com)`
//!
//! ## Math Backends
//!
//! - `KaTeX` (default): client-side rendering with KaTeX
//! - `MathJax`: client-side rendering with MathJax
//! - `MathML`: native browser rendering (requires `mathml` feature)
//!
//! ## Features
//!
//! - `mathml`: Enable MathML rendering backend (requires `latex2mathml` crate)
//! - `wasm`: Enable WebAssembly bindings (requires `wasm-bindgen`)

pub mod compiler;
pub mod config;
pub mod error;
pub mod escape;
pub mod typeset;

// FFI module (always compiled for cdylib)
pub mod ffi;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

pub use compiler::{compile, compile_opt, compile_with_config, looks_like_latex};
pub use config::{CompileConfig, Config, TypesetConfig};
pub use error::{ConfigError, Error, RenderError, Result};
pub use typeset::math::MathBackend;
pub use typeset::{Container, TypesetReport, Typesetter};

/// Compile and typeset in one step with default settings.
///
/// # Example
///
/// ```rust
/// let html = mathdown::render("Area: $\\pi r^2$");
/// assert!(html.contains(r#"<span class="typeset katex-inline">\(\pi r^2\)</span>"#));
/// ```
pub fn render(source: &str) -> String {
    render_with(source, &Config::default()).0
}

/// Compile and typeset with the given configuration.
pub fn render_with(source: &str, config: &Config) -> (String, TypesetReport) {
    let mut container = Container::with_markup(compile_with_config(source, &config.compiler));
    let mut typesetter = Typesetter::new(config.typeset.clone());
    let report = typesetter.content_changed(&mut container);
    (container.into_markup(), report)
}
