//! Protected regions and their placeholder tokens.
//!
//! A token is `U+E000`, a tag letter, a decimal index and `U+E001`. Repair
//! strips both sentinels from the source, so every token in the buffer was
//! written here. Restoration looks regions up by the embedded index and
//! never rescans their content.

use crate::escape::escape_text;
use nom::{
    character::complete::{char, digit1, one_of},
    combinator::map_res,
    sequence::{delimited, pair},
    IResult,
};

pub const TOKEN_OPEN: char = '\u{E000}';
pub const TOKEN_CLOSE: char = '\u{E001}';

/// Display style of a piece of math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    Block,
    Inline,
}

/// A span of LaTeX that bypasses every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: MathKind,
    /// Insertion order within its kind.
    pub index: usize,
    /// LaTeX body, trimmed for block regions.
    pub raw: String,
    /// The source text the region replaced.
    source: String,
}

/// Already-rendered code markup kept away from the markdown passes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CodeSpan {
    block: bool,
    markup: String,
    source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTag {
    BlockMath,
    InlineMath,
    CodeBlock,
    InlineCode,
}

impl TokenTag {
    fn letter(self) -> char {
        match self {
            TokenTag::BlockMath => 'B',
            TokenTag::InlineMath => 'I',
            TokenTag::CodeBlock => 'P',
            TokenTag::InlineCode => 'C',
        }
    }

    fn from_letter(c: char) -> Self {
        match c {
            'B' => TokenTag::BlockMath,
            'I' => TokenTag::InlineMath,
            'P' => TokenTag::CodeBlock,
            _ => TokenTag::InlineCode,
        }
    }

    /// Whether the restored markup is a block-level element.
    pub fn is_block(self) -> bool {
        matches!(self, TokenTag::BlockMath | TokenTag::CodeBlock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub tag: TokenTag,
    pub index: usize,
}

/// A piece of a buffer: plain text or a placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Token(Token, &'a str),
}

/// Recognize one placeholder token.
pub fn token(input: &str) -> IResult<&str, Token> {
    let (rest, (letter, index)) = delimited(
        char(TOKEN_OPEN),
        pair(
            one_of("BIPC"),
            map_res(digit1, |digits: &str| digits.parse::<usize>()),
        ),
        char(TOKEN_CLOSE),
    )(input)?;
    Ok((
        rest,
        Token {
            tag: TokenTag::from_letter(letter),
            index,
        },
    ))
}

/// Split a buffer into text runs and tokens.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = input;
    let mut text_start = 0;
    let mut offset = 0;

    while let Some(pos) = rest.find(TOKEN_OPEN) {
        let at = offset + pos;
        match token(&rest[pos..]) {
            Ok((after, tok)) => {
                if text_start < at {
                    out.push(Segment::Text(&input[text_start..at]));
                }
                let end = input.len() - after.len();
                out.push(Segment::Token(tok, &input[at..end]));
                text_start = end;
                offset = end;
                rest = after;
            }
            Err(_) => {
                let skip = pos + TOKEN_OPEN.len_utf8();
                offset += skip;
                rest = &rest[skip..];
            }
        }
    }
    if text_start < input.len() {
        out.push(Segment::Text(&input[text_start..]));
    }
    out
}

/// Whether `input` holds a placeholder that restores to block markup.
pub fn has_block_token(input: &str) -> bool {
    segments(input)
        .iter()
        .any(|segment| matches!(segment, Segment::Token(tok, _) if tok.tag.is_block()))
}

/// The two ordered math lists plus the literal code stash for one compile call.
#[derive(Debug, Default)]
pub struct ProtectedRegions {
    block: Vec<Region>,
    inline: Vec<Region>,
    code: Vec<CodeSpan>,
}

impl ProtectedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a math span and return its placeholder.
    ///
    /// Tokens captured inside the span fall back to their source text.
    pub fn protect_math(&mut self, kind: MathKind, body: &str, source: &str) -> String {
        let body = self.unprotect(body);
        let source = self.unprotect(source);
        let raw = match kind {
            MathKind::Block => body.trim().to_string(),
            MathKind::Inline => body,
        };
        let list = match kind {
            MathKind::Block => &mut self.block,
            MathKind::Inline => &mut self.inline,
        };
        let index = list.len();
        list.push(Region {
            kind,
            index,
            raw,
            source,
        });
        let tag = match kind {
            MathKind::Block => TokenTag::BlockMath,
            MathKind::Inline => TokenTag::InlineMath,
        };
        make_token(tag, index)
    }

    /// Store rendered code markup and return its placeholder.
    pub fn protect_code(&mut self, block: bool, markup: String, source: &str) -> String {
        let index = self.code.len();
        self.code.push(CodeSpan {
            block,
            markup,
            source: source.to_string(),
        });
        let tag = if block {
            TokenTag::CodeBlock
        } else {
            TokenTag::InlineCode
        };
        make_token(tag, index)
    }

    pub fn block(&self) -> &[Region] {
        &self.block
    }

    pub fn inline(&self) -> &[Region] {
        &self.inline
    }

    /// Put the original source text back in place of any tokens.
    ///
    /// Used when a span captured earlier turns out to sit inside code.
    pub fn unprotect(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in segments(text) {
            match segment {
                Segment::Text(t) => out.push_str(t),
                // Sources only hold tokens of earlier regions.
                Segment::Token(tok, literal) => match self.source_of(tok) {
                    Some(source) => out.push_str(&self.unprotect(source)),
                    None => out.push_str(literal),
                },
            }
        }
        out
    }

    /// Replace every token with its final markup.
    pub fn restore(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in segments(text) {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Token(tok, _) => {
                    if let Some(markup) = self.markup_of(tok) {
                        out.push_str(&markup);
                    }
                }
            }
        }
        out
    }

    fn source_of(&self, tok: Token) -> Option<&str> {
        match tok.tag {
            TokenTag::BlockMath => self.block.get(tok.index).map(|r| r.source.as_str()),
            TokenTag::InlineMath => self.inline.get(tok.index).map(|r| r.source.as_str()),
            TokenTag::CodeBlock | TokenTag::InlineCode => self
                .code
                .get(tok.index)
                .filter(|c| c.block == tok.tag.is_block())
                .map(|c| c.source.as_str()),
        }
    }

    /// Math bodies come back with `&`, `<` and `>` entity-escaped. They match
    /// the captured source byte for byte only once decoded, which is what the
    /// typesetter reads.
    fn markup_of(&self, tok: Token) -> Option<String> {
        match tok.tag {
            TokenTag::BlockMath => self.block.get(tok.index).map(|r| {
                format!(
                    r#"<div class="math-block" dir="ltr">$${}$$</div>"#,
                    escape_text(&r.raw)
                )
            }),
            TokenTag::InlineMath => self.inline.get(tok.index).map(|r| {
                format!(
                    r#"<span class="math-inline" dir="ltr">${}$</span>"#,
                    escape_text(&r.raw)
                )
            }),
            TokenTag::CodeBlock | TokenTag::InlineCode => self
                .code
                .get(tok.index)
                .filter(|c| c.block == tok.tag.is_block())
                .map(|c| c.markup.clone()),
        }
    }
}

fn make_token(tag: TokenTag, index: usize) -> String {
    format!("{}{}{}{}", TOKEN_OPEN, tag.letter(), index, TOKEN_CLOSE)
}
