//! WebAssembly bindings for JavaScript/TypeScript.
//!
//! # Usage (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { compileMarkdown, renderMarkdown, headContent } from 'mathdown';
//!
//! await init();
//!
//! // Markup with math left for a client-side typesetter
//! container.innerHTML = compileMarkdown(source);
//!
//! // Markup with math already typeset
//! document.head.insertAdjacentHTML('beforeend', headContent('katex'));
//! container.innerHTML = renderMarkdown(source, 'katex');
//! ```

#![cfg(feature = "wasm")]

use crate::compiler::compile_opt;
use crate::config::TypesetConfig;
use crate::typeset::math::{create_renderer, MathBackend};
use crate::typeset::{Container, Typesetter};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn backend(name: Option<String>) -> MathBackend {
    name.as_deref()
        .map(MathBackend::from_name)
        .unwrap_or_default()
}

/// Compile Markdown to HTML. `null` and `undefined` compile as empty.
#[wasm_bindgen(js_name = compileMarkdown)]
pub fn compile_markdown(input: Option<String>) -> String {
    compile_opt(input.as_deref())
}

/// Compile Markdown and typeset its math with the named backend
/// (`"katex"`, `"mathjax"` or `"mathml"`; defaults to KaTeX).
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(input: Option<String>, backend_name: Option<String>) -> String {
    let config = TypesetConfig {
        backend: backend(backend_name),
        ..TypesetConfig::default()
    };
    let mut container = Container::with_markup(compile_opt(input.as_deref()));
    Typesetter::new(config).content_changed(&mut container);
    container.into_markup()
}

/// Scripts and styles the named backend needs in the page head.
#[wasm_bindgen(js_name = headContent)]
pub fn head_content(backend_name: Option<String>) -> String {
    create_renderer(backend(backend_name))
        .head_content()
        .unwrap_or_default()
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// TypeScript type definitions for documentation
/// ```typescript
/// // mathdown.d.ts
///
/// export function compileMarkdown(input?: string | null): string;
/// export function renderMarkdown(input?: string | null, backend?: "katex" | "mathjax" | "mathml"): string;
/// export function headContent(backend?: "katex" | "mathjax" | "mathml"): string;
/// export function getVersion(): string;
/// ```
const _: () = ();
