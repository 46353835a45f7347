//! Recognizers for the delimiters and line markers the compiler rewrites.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while, take_while_m_n},
    character::complete::{char, digit1, line_ending, not_line_ending, one_of, space0, space1},
    combinator::{eof, map, opt, recognize, verify},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered,
}

/// Parse display math (`$$...$$`), shortest body first.
pub fn display_math(input: &str) -> IResult<&str, &str> {
    delimited(
        tag("$$"),
        verify(take_until("$$"), |body: &str| !body.is_empty()),
        tag("$$"),
    )(input)
}

/// Parse inline math (`$...$`) confined to one line.
pub fn inline_math(input: &str) -> IResult<&str, &str> {
    delimited(char('$'), is_not("$\n"), char('$'))(input)
}

/// Parse a fenced code span, returning its language word and body.
pub fn fenced_code(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = tag("```")(input)?;
    let (input, lang) = opt(terminated(
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
        pair(space0, line_ending),
    ))(input)?;
    let (input, body) = take_until("```")(input)?;
    let (input, _) = tag("```")(input)?;
    Ok((input, (lang.unwrap_or(""), body)))
}

/// Parse inline code (`` `code` ``) confined to one line.
pub fn inline_code(input: &str) -> IResult<&str, &str> {
    delimited(char('`'), is_not("`\n"), char('`'))(input)
}

/// Parse a heading line (`#` to `####`).
pub fn heading(input: &str) -> IResult<&str, (usize, &str)> {
    let (input, hashes) = take_while_m_n(1, 4, |c: char| c == '#')(input)?;
    let (input, _) = space1(input)?;
    let (input, content) = not_line_ending(input)?;
    Ok((input, (hashes.len(), strip_closing_hashes(content))))
}

/// Drop an optional closing `#` run. It only counts when set off by a space,
/// so `C#` keeps its hash.
fn strip_closing_hashes(content: &str) -> &str {
    let content = content.trim_end();
    let stripped = content.trim_end_matches('#');
    if stripped.len() != content.len()
        && (stripped.is_empty() || stripped.ends_with(char::is_whitespace))
    {
        stripped.trim_end()
    } else {
        content
    }
}

/// Parse a list item marker followed by its content.
pub fn list_item(input: &str) -> IResult<&str, (ListMarker, &str)> {
    let (input, marker) = alt((
        map(terminated(one_of("-*+"), space1), |_| ListMarker::Bullet),
        map(
            tuple((digit1, alt((char('.'), char(')'))), space1)),
            |_| ListMarker::Ordered,
        ),
    ))(input)?;
    let (input, content) = not_line_ending(input)?;
    Ok((input, (marker, content)))
}

/// Parse a thematic break (`---`, `***`, `___`) filling the whole line.
pub fn thematic_break(input: &str) -> IResult<&str, ()> {
    let (input, _) = alt((
        recognize(tuple((tag("---"), many0(char('-'))))),
        recognize(tuple((tag("***"), many0(char('*'))))),
        recognize(tuple((tag("___"), many0(char('_'))))),
    ))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, ()))
}

/// Parse a link (`[text](url)`).
///
/// The URL may not contain whitespace, quotes, angle brackets or placeholder
/// sentinels, so protected math and code never land inside `href`.
pub fn link(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, text) = delimited(char('['), is_not("[]\n"), char(']'))(input)?;
    let (input, url) = delimited(
        char('('),
        is_not(") \t\n\"'<>\u{E000}\u{E001}"),
        char(')'),
    )(input)?;
    Ok((input, (text, url)))
}

/// Parse a span opened and closed by the same delimiter, shortest body first.
pub fn enclosed<'a>(input: &'a str, delim: &str) -> IResult<&'a str, &'a str> {
    delimited(tag(delim), take_until(delim), tag(delim))(input)
}

/// Parse a URL scheme (`https:`), returning the name.
pub fn url_scheme(input: &str) -> IResult<&str, &str> {
    terminated(
        recognize(pair(
            take_while_m_n(1, 1, |c: char| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        )),
        char(':'),
    )(input)
}

/// Rewrite every recognized span in `input`.
///
/// At each occurrence of `trigger`, `step` receives the preceding character
/// and the remaining input. Returning `Some((replacement, rest))` consumes
/// the span; `None` keeps the trigger character as text.
pub fn rewrite<'a, F>(input: &'a str, trigger: char, mut step: F) -> String
where
    F: FnMut(Option<char>, &'a str) -> Option<(String, &'a str)>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(trigger) {
        out.push_str(&rest[..pos]);
        let before = out.chars().next_back();
        let candidate = &rest[pos..];
        match step(before, candidate) {
            Some((replacement, after)) => {
                out.push_str(&replacement);
                rest = after;
            }
            None => {
                out.push(trigger);
                rest = &candidate[trigger.len_utf8()..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_math() {
        assert_eq!(
            display_math("$$\\int_0^1 x dx$$ rest"),
            Ok((" rest", "\\int_0^1 x dx"))
        );
        // Shortest match.
        assert_eq!(display_math("$$a$$ and $$b$$"), Ok((" and $$b$$", "a")));
        assert!(display_math("$$$$").is_err());
        assert!(display_math("$$unclosed").is_err());
    }

    #[test]
    fn test_inline_math() {
        assert_eq!(inline_math("$E = mc^2$ rest"), Ok((" rest", "E = mc^2")));
        assert!(inline_math("$a\nb$").is_err());
        assert!(inline_math("$$").is_err());
    }

    #[test]
    fn test_fenced_code() {
        assert_eq!(
            fenced_code("```rust\nfn main() {}\n```"),
            Ok(("", ("rust", "fn main() {}\n")))
        );
        // A language word only counts when the fence line ends after it.
        assert_eq!(fenced_code("```x^2```"), Ok(("", ("", "x^2"))));
        assert_eq!(fenced_code("```\n\\frac{1}{2}\n```"), Ok(("", ("", "\\frac{1}{2}\n"))));
    }

    #[test]
    fn test_heading() {
        assert_eq!(heading("# Hello World"), Ok(("", (1, "Hello World"))));
        assert_eq!(heading("### Level 3 ###"), Ok(("", (3, "Level 3"))));
        assert!(heading("##### Too deep").is_err());
        assert!(heading("#hashtag").is_err());
    }

    #[test]
    fn test_heading_keeps_trailing_hash_in_word() {
        assert_eq!(heading("# Learn C#"), Ok(("", (1, "Learn C#"))));
        assert_eq!(heading("## F# and C# ##"), Ok(("", (2, "F# and C#"))));
        assert_eq!(heading("# #"), Ok(("", (1, ""))));
    }

    #[test]
    fn test_list_item() {
        assert_eq!(list_item("- item"), Ok(("", (ListMarker::Bullet, "item"))));
        assert_eq!(list_item("12. item"), Ok(("", (ListMarker::Ordered, "item"))));
        assert!(list_item("-item").is_err());
    }

    #[test]
    fn test_thematic_break() {
        assert!(thematic_break("---").is_ok());
        assert!(thematic_break("*****  ").is_ok());
        assert!(thematic_break("--- x").is_err());
        assert!(thematic_break("--").is_err());
    }

    #[test]
    fn test_link() {
        assert_eq!(
            link("[docs](https://example.com) tail"),
            Ok((" tail", ("docs", "https://example.com")))
        );
        assert!(link("[a](has space)").is_err());
        assert!(link("[a](\u{E000}I0\u{E001})").is_err());
    }

    #[test]
    fn test_enclosed() {
        assert_eq!(enclosed("**a** **b**", "**"), Ok((" **b**", "a")));
        assert!(enclosed("**a", "**").is_err());
    }

    #[test]
    fn test_url_scheme() {
        assert_eq!(url_scheme("https://x"), Ok(("//x", "https")));
        assert!(url_scheme("/relative:path").is_err());
    }

    #[test]
    fn test_rewrite() {
        let out = rewrite("a $x$ b $y", '$', |_, input| {
            inline_math(input)
                .ok()
                .map(|(rest, body)| (format!("[{}]", body), rest))
        });
        assert_eq!(out, "a [x] b $y");
    }
}
