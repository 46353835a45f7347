//! Typesetter adapter.
//!
//! The host inserts compiled markup into a [`Container`] and calls
//! [`Typesetter::content_changed`]. Math spans are rendered in place through
//! a [`MathRenderer`]; a span the renderer rejects keeps its source text and
//! the rest of the container is still processed.

mod dom;
pub mod math;
mod scan;

use crate::config::TypesetConfig;
use math::{create_renderer, MathRenderer};
use std::panic::{self, AssertUnwindSafe};

/// The rendered-content area the host owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    markup: String,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Replace the content, as the host does on every recompile.
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

/// Adapter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypesetState {
    #[default]
    Idle,
    Typesetting,
}

/// A span left as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanFailure {
    /// The span including its delimiters, as decoded text.
    pub source: String,
    pub message: String,
}

/// Outcome of one typesetting pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypesetReport {
    /// Spans rendered successfully.
    pub typeset: usize,
    pub failures: Vec<SpanFailure>,
    /// The pass itself failed and the container was left untouched.
    pub aborted: bool,
}

impl TypesetReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }
}

/// Typeset every math span in `container` with per-span failure isolation.
pub fn typeset_element(
    container: &mut Container,
    renderer: &dyn MathRenderer,
    options: &TypesetConfig,
) -> TypesetReport {
    let (markup, report) = scan::typeset_markup(&container.markup, renderer, options);
    container.markup = markup;
    report
}

/// Stateful adapter between the host's container and a math renderer.
pub struct Typesetter {
    renderer: Box<dyn MathRenderer>,
    config: TypesetConfig,
    state: TypesetState,
}

impl Typesetter {
    /// Create an adapter using the backend named in `config`.
    pub fn new(config: TypesetConfig) -> Self {
        let renderer = create_renderer(config.backend);
        Self::with_renderer(renderer, config)
    }

    pub fn with_renderer(renderer: Box<dyn MathRenderer>, config: TypesetConfig) -> Self {
        Self {
            renderer,
            config,
            state: TypesetState::Idle,
        }
    }

    pub fn state(&self) -> TypesetState {
        self.state
    }

    pub fn config(&self) -> &TypesetConfig {
        &self.config
    }

    /// Scripts and styles the backend needs in the page head.
    pub fn head_content(&self) -> Option<String> {
        self.renderer.head_content()
    }

    /// Typeset the container after its content changed.
    ///
    /// Never panics: failures are logged and reported, and a pass that fails
    /// as a whole leaves the container as it was.
    pub fn content_changed(&mut self, container: &mut Container) -> TypesetReport {
        self.state = TypesetState::Typesetting;

        let renderer = self.renderer.as_ref();
        let config = &self.config;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            scan::typeset_markup(container.markup(), renderer, config)
        }));

        let report = match outcome {
            Ok((markup, report)) => {
                container.markup = markup;
                report
            }
            Err(_) => {
                log::warn!("typeset: pass aborted, container left unchanged");
                TypesetReport {
                    aborted: true,
                    ..TypesetReport::default()
                }
            }
        };

        log::debug!(
            "typeset: {} spans rendered, {} left as source",
            report.typeset,
            report.failures.len()
        );
        self.state = TypesetState::Idle;
        report
    }

    /// Replace the container's content and typeset it.
    pub fn replace_content(
        &mut self,
        container: &mut Container,
        markup: impl Into<String>,
    ) -> TypesetReport {
        container.set_markup(markup);
        self.content_changed(container)
    }
}

impl Default for Typesetter {
    fn default() -> Self {
        Self::new(TypesetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::math::{ClientRenderer, MathBackend};
    use super::*;
    use crate::error::{RenderError, Result};
    use pretty_assertions::assert_eq;

    struct Picky;

    impl MathRenderer for Picky {
        fn render_inline(&self, latex: &str) -> Result<String> {
            match latex {
                "bad" => Err(RenderError::Math("undefined control sequence".into()).into()),
                "boom" => panic!("renderer blew up"),
                _ => Ok(format!(r#"<span class="typeset">{}</span>"#, latex)),
            }
        }

        fn render_display(&self, latex: &str) -> Result<String> {
            self.render_inline(latex)
        }

        fn head_content(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_failing_span_is_isolated() {
        let mut typesetter = Typesetter::with_renderer(Box::new(Picky), TypesetConfig::default());
        let mut container = Container::with_markup("<p>$a$ $bad$ $boom$ $c$</p>");

        let report = typesetter.content_changed(&mut container);

        assert_eq!(
            container.markup(),
            r#"<p><span class="typeset">a</span> $bad$ $boom$ <span class="typeset">c</span></p>"#
        );
        assert_eq!(report.typeset, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].source, "$bad$");
        assert!(report.failures[1].message.contains("blew up"));
        assert!(!report.aborted);
        assert_eq!(typesetter.state(), TypesetState::Idle);
    }

    #[test]
    fn test_rerun_on_typeset_content() {
        let mut typesetter = Typesetter::default();
        let mut container =
            Container::with_markup(r#"<span class="math-inline" dir="ltr">$x$</span>"#);

        typesetter.content_changed(&mut container);
        let once = container.markup().to_string();
        let report = typesetter.content_changed(&mut container);

        assert_eq!(container.markup(), once);
        assert_eq!(report.typeset, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_replace_content() {
        let mut typesetter = Typesetter::with_renderer(
            Box::new(ClientRenderer::katex()),
            TypesetConfig::default(),
        );
        let mut container = Container::new();

        typesetter.replace_content(&mut container, "<p>$a$</p>");
        let report = typesetter.replace_content(&mut container, "<p>$b$ and $c$</p>");

        assert_eq!(report.typeset, 2);
        assert!(!container.markup().contains("katex-inline\">\\(a"));
    }

    #[test]
    fn test_head_content_follows_backend() {
        let config = TypesetConfig {
            backend: MathBackend::MathJax,
            ..TypesetConfig::default()
        };
        let typesetter = Typesetter::new(config);
        assert!(typesetter.head_content().unwrap().contains("MathJax"));
    }

    #[test]
    fn test_typeset_element() {
        let mut container = Container::with_markup("<p>$y$</p>");
        let report = typeset_element(
            &mut container,
            &ClientRenderer::katex(),
            &TypesetConfig::default(),
        );
        assert_eq!(report.typeset, 1);
        assert_eq!(
            container.into_markup(),
            r#"<p><span class="typeset katex-inline">\(y\)</span></p>"#
        );
    }
}
