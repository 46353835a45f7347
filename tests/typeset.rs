use mathdown::error::{RenderError, Result};
use mathdown::typeset::math::MathRenderer;
use mathdown::typeset::{Container, TypesetState, Typesetter};
use mathdown::{compile, TypesetConfig};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every formula it is asked to render.
#[derive(Clone, Default)]
struct Recorder {
    seen: Rc<RefCell<Vec<(String, bool)>>>,
}

impl MathRenderer for Recorder {
    fn render_inline(&self, latex: &str) -> Result<String> {
        self.seen.borrow_mut().push((latex.to_string(), false));
        if latex.contains("\\undefined") {
            return Err(RenderError::Math(format!("unknown macro in {}", latex)).into());
        }
        Ok(r#"<span class="typeset">inline</span>"#.to_string())
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        self.seen.borrow_mut().push((latex.to_string(), true));
        Ok(r#"<span class="typeset">display</span>"#.to_string())
    }

    fn head_content(&self) -> Option<String> {
        None
    }
}

fn typeset(source: &str) -> (Container, Recorder, mathdown::TypesetReport) {
    let recorder = Recorder::default();
    let mut typesetter =
        Typesetter::with_renderer(Box::new(recorder.clone()), TypesetConfig::default());
    let mut container = Container::with_markup(compile(source));
    let report = typesetter.content_changed(&mut container);
    (container, recorder, report)
}

#[test]
fn renderer_sees_original_math_source() {
    let (_, recorder, report) = typeset("$a<b$ and $x_1 & \"y\"$\n\n$$\\frac{p}{q} > 0$$");

    assert_eq!(
        *recorder.seen.borrow(),
        vec![
            ("a<b".to_string(), false),
            ("x_1 & \"y\"".to_string(), false),
            ("\\frac{p}{q} > 0".to_string(), true),
        ]
    );
    assert_eq!(report.typeset, 3);
}

#[test]
fn failed_span_keeps_source() {
    let (container, _, report) = typeset("$\\undefined{x}$ then $y$");

    assert_eq!(
        container.markup(),
        concat!(
            r#"<p><span class="math-inline" dir="ltr">$\undefined{x}$</span>"#,
            r#" then <span class="math-inline" dir="ltr"><span class="typeset">inline</span></span></p>"#
        )
    );
    assert_eq!(report.typeset, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, "$\\undefined{x}$");
    assert!(!report.is_clean());
}

#[test]
fn code_is_never_typeset() {
    let (container, recorder, report) = typeset("```\nprint($x$)\n```\n\nand `echo $HOME $PATH`");

    assert!(recorder.seen.borrow().is_empty());
    assert_eq!(report.typeset, 0);
    assert!(container.markup().contains("<code>print($x$)</code>"));
}

#[test]
fn each_change_triggers_a_fresh_pass() {
    let recorder = Recorder::default();
    let mut typesetter =
        Typesetter::with_renderer(Box::new(recorder.clone()), TypesetConfig::default());
    let mut container = Container::new();

    typesetter.replace_content(&mut container, compile("$a$"));
    typesetter.content_changed(&mut container);
    typesetter.replace_content(&mut container, compile("$b$ $c$"));

    let seen: Vec<String> = recorder.seen.borrow().iter().map(|(l, _)| l.clone()).collect();
    assert_eq!(seen, vec!["a", "b", "c"]);
    assert_eq!(typesetter.state(), TypesetState::Idle);
}

#[test]
fn default_backend_output() {
    let html = mathdown::render("Euler: $e^{i\\pi} + 1 = 0$");
    assert_eq!(
        html,
        concat!(
            r#"<p>Euler: <span class="math-inline" dir="ltr">"#,
            r#"<span class="typeset katex-inline">\(e^{i\pi} + 1 = 0\)</span></span></p>"#
        )
    );
}
