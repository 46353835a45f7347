//! C FFI layer for cross-language interoperability.
//!
//! Every returned string is owned by the caller and must be released with
//! [`mathdown_free_string`]. A null input pointer compiles as empty input.

use crate::compiler::compile;
use crate::config::TypesetConfig;
use crate::typeset::math::{create_renderer, MathBackend};
use crate::typeset::{Container, Typesetter};
use libc::{c_char, c_int};
use std::borrow::Cow;
use std::ffi::{CStr, CString};

/// Read a C string, treating null as empty and replacing invalid UTF-8.
unsafe fn input_str<'a>(input: *const c_char) -> Cow<'a, str> {
    if input.is_null() {
        Cow::Borrowed("")
    } else {
        CStr::from_ptr(input).to_string_lossy()
    }
}

fn into_c_string(s: String) -> *mut c_char {
    // Input arrives NUL-terminated, so output never holds an interior NUL.
    CString::new(s).unwrap_or_default().into_raw()
}

/// Math backend: 0 = KaTeX, 1 = MathJax, 2 = MathML. Unknown values mean KaTeX.
fn backend(code: c_int) -> MathBackend {
    match code {
        1 => MathBackend::MathJax,
        2 => MathBackend::MathML,
        _ => MathBackend::KaTeX,
    }
}

/// Compile Markdown to HTML.
///
/// # Safety
///
/// - `input` must be null or a valid null-terminated string.
/// - The returned string must be freed with `mathdown_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mathdown_compile(input: *const c_char) -> *mut c_char {
    into_c_string(compile(&input_str(input)))
}

/// Compile Markdown and typeset its math.
///
/// # Safety
///
/// - `input` must be null or a valid null-terminated string.
/// - The returned string must be freed with `mathdown_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mathdown_render(input: *const c_char, math_backend: c_int) -> *mut c_char {
    let config = TypesetConfig {
        backend: backend(math_backend),
        ..TypesetConfig::default()
    };
    let mut container = Container::with_markup(compile(&input_str(input)));
    Typesetter::new(config).content_changed(&mut container);
    into_c_string(container.into_markup())
}

/// Head assets (scripts, styles) for a math backend.
///
/// The returned string must be freed with `mathdown_free_string`.
#[no_mangle]
pub extern "C" fn mathdown_head_content(math_backend: c_int) -> *mut c_char {
    let head = create_renderer(backend(math_backend))
        .head_content()
        .unwrap_or_default();
    into_c_string(head)
}

/// Free a string returned by mathdown functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a mathdown function, or null.
#[no_mangle]
pub unsafe extern "C" fn mathdown_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get the library version.
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn mathdown_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

// Generate C header content for documentation
/// ```c
/// // mathdown.h
/// #ifndef MATHDOWN_H
/// #define MATHDOWN_H
///
/// // math_backend: 0 = KaTeX, 1 = MathJax, 2 = MathML
/// char* mathdown_compile(const char* input);
/// char* mathdown_render(const char* input, int math_backend);
/// char* mathdown_head_content(int math_backend);
/// void mathdown_free_string(char* s);
/// const char* mathdown_version(void);
///
/// #endif
/// ```
const _: () = ();
