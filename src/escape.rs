//! HTML entity escaping shared by the compiler and the typesetter.

use html_escape::{encode_double_quoted_attribute, encode_quoted_attribute, encode_text};

/// Escape the five HTML special characters.
pub fn escape_html(s: &str) -> String {
    encode_quoted_attribute(s).into_owned()
}

/// Escape only what would break out of a text node.
///
/// Used for LaTeX bodies, where quotes are common (`f''(x)`) and harmless.
pub fn escape_text(s: &str) -> String {
    encode_text(s).into_owned()
}

/// Escape an attribute value written between double quotes.
pub fn escape_attribute(s: &str) -> String {
    encode_double_quoted_attribute(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use html_escape::decode_html_entities;

    #[test]
    fn test_escape_html() {
        let escaped = escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#);
        assert!(escaped.starts_with("&lt;a href=&quot;x&quot;&gt;Tom &amp; "));
        assert!(!escaped.contains(&['<', '>', '"', '\''][..]));
        assert_eq!(decode_html_entities(&escaped), r#"<a href="x">Tom & 'Jerry'</a>"#);
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_text("f''(x) < 1 & y"), "f''(x) &lt; 1 &amp; y");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute(r#"say "hi" & go"#), "say &quot;hi&quot; &amp; go");
    }
}
