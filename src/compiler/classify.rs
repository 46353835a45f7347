//! Code-versus-math classification.
//!
//! Authors paste LaTeX into code fences and backticks as often as real code.
//! There is no grammar to decide between the two, so this is a permissive
//! heuristic: anything with a backslash, a brace, a caret, an underscore or a
//! known macro name used as a bare word is treated as math.

use crate::config::HeuristicConfig;

/// Whether a code span's content should be typeset as math.
pub fn looks_like_latex(content: &str, heuristic: &HeuristicConfig) -> bool {
    if content.contains(['\\', '{', '}', '^', '_']) {
        return true;
    }

    content
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .any(|word| heuristic.macros.iter().any(|m| m == word))
}

/// Whether a fence's language word forces math.
pub fn is_math_language(lang: &str, heuristic: &HeuristicConfig) -> bool {
    !lang.is_empty()
        && heuristic
            .math_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(lang))
}
