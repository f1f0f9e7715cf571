//! CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Every token records the byte range it was read from, so later stages can
//! slice declaration values and whole at-rules straight out of the source
//! instead of re-serializing them.

use core::fmt;
use core::ops::Range;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// Token kinds. Numeric tokens keep only their value; the exact spelling is
/// available through the token span.
#[derive(Debug, Clone, PartialEq)]
pub enum CssToken {
    /// `<ident-token>`
    Ident(String),
    /// `<function-token>`; the value excludes the `(`.
    Function(String),
    /// `<at-keyword-token>`; the value excludes the `@`.
    AtKeyword(String),
    /// `<hash-token>`
    Hash {
        /// Code points after the `#`.
        value: String,
        /// "type flag set to 'id'" when the value would start an ident.
        is_id: bool,
    },
    /// `<string-token>`
    String(String),
    /// `<bad-string-token>`
    BadString,
    /// `<url-token>`
    Url(String),
    /// `<bad-url-token>`
    BadUrl,
    /// `<delim-token>`
    Delim(char),
    /// `<number-token>`
    Number(f64),
    /// `<percentage-token>`
    Percentage(f64),
    /// `<dimension-token>`
    Dimension {
        /// Numeric part.
        value: f64,
        /// Unit as written.
        unit: String,
    },
    /// `<whitespace-token>`
    Whitespace,
    /// `<CDO-token>` (`<!--`)
    Cdo,
    /// `<CDC-token>` (`-->`)
    Cdc,
    /// `<colon-token>`
    Colon,
    /// `<semicolon-token>`
    Semicolon,
    /// `<comma-token>`
    Comma,
    /// `<[-token>`
    LeftBracket,
    /// `<]-token>`
    RightBracket,
    /// `<(-token>`
    LeftParen,
    /// `<)-token>`
    RightParen,
    /// `<{-token>`
    LeftBrace,
    /// `<}-token>`
    RightBrace,
    /// End of input.
    Eof,
}

impl CssToken {
    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

impl fmt::Display for CssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, .. } => write!(f, "<hash:#{value}>"),
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Url(v) => write!(f, "<url:{v}>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number(v) => write!(f, "<number:{v}>"),
            Self::Percentage(v) => write!(f, "<percentage:{v}%>"),
            Self::Dimension { value, unit } => write!(f, "<dimension:{value}{unit}>"),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::Cdo => write!(f, "<CDO>"),
            Self::Cdc => write!(f, "<CDC>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A token plus the byte range of the source it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was read.
    pub kind: CssToken,
    /// Byte range in the source text.
    pub span: Range<usize>,
}

impl Token {
    /// The exact source text of this token.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.clone()).unwrap_or("")
    }
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
pub struct CssTokenizer<'a> {
    source: &'a str,
    chars: Vec<char>,
    /// Byte offset of each char, plus one trailing entry for end of input.
    offsets: Vec<usize>,
    position: usize,
}

impl<'a> CssTokenizer<'a> {
    /// Create a tokenizer over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut offsets = Vec::with_capacity(source.len() + 1);
        for (offset, c) in source.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(source.len());
        Self {
            source,
            chars,
            offsets,
            position: 0,
        }
    }

    /// The text being tokenized.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Tokenize the whole input. The last token is always [`CssToken::Eof`].
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.consume_comments();
            let start = self.byte_offset();
            let kind = self.consume_token();
            let end = self.byte_offset();
            let done = kind.is_eof();
            tokens.push(Token {
                kind,
                span: start..end,
            });
            if done {
                return tokens;
            }
        }
    }

    fn byte_offset(&self) -> usize {
        self.offsets
            .get(self.position)
            .copied()
            .unwrap_or(self.source.len())
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CssToken {
        let Some(c) = self.consume() else {
            return CssToken::Eof;
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CssToken::Whitespace
            }
            '"' | '\'' => self.consume_string_token(c),
            '#' => {
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    let is_id = self.would_start_ident_sequence();
                    let value = self.consume_ident_sequence();
                    CssToken::Hash { value, is_id }
                } else {
                    CssToken::Delim('#')
                }
            }
            '(' => CssToken::LeftParen,
            ')' => CssToken::RightParen,
            '+' | '.' => {
                self.reconsume();
                if self.would_start_number() {
                    self.consume_numeric_token()
                } else {
                    let _ = self.consume();
                    CssToken::Delim(c)
                }
            }
            ',' => CssToken::Comma,
            '-' => {
                self.reconsume();
                if self.would_start_number() {
                    self.consume_numeric_token()
                } else if self.peek_at(1) == Some('-') && self.peek_at(2) == Some('>') {
                    self.position += 3;
                    CssToken::Cdc
                } else if self.would_start_ident_sequence() {
                    self.consume_ident_like_token()
                } else {
                    let _ = self.consume();
                    CssToken::Delim('-')
                }
            }
            ':' => CssToken::Colon,
            ';' => CssToken::Semicolon,
            '<' => {
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.position += 3;
                    CssToken::Cdo
                } else {
                    CssToken::Delim('<')
                }
            }
            '@' => {
                if self.would_start_ident_sequence() {
                    CssToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CssToken::Delim('@')
                }
            }
            '[' => CssToken::LeftBracket,
            ']' => CssToken::RightBracket,
            '{' => CssToken::LeftBrace,
            '}' => CssToken::RightBrace,
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CssToken::Delim('\\')
                }
            }
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }
            c => CssToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending: char) -> CssToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == ending => return CssToken::String(value),
                None => return CssToken::String(value),
                Some('\n') => {
                    self.reconsume();
                    return CssToken::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => self.position += 1,
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CssToken {
        let value = self.consume_number();
        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            CssToken::Dimension { value, unit }
        } else if self.peek() == Some('%') {
            self.position += 1;
            CssToken::Percentage(value)
        } else {
            CssToken::Number(value)
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CssToken {
        let string = self.consume_ident_sequence();
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.position += 1;
            let mark = self.position;
            self.consume_whitespace();
            if matches!(self.peek(), Some('"' | '\'')) {
                // Quoted urls tokenize as a function so the string keeps its quotes.
                self.position = mark;
                CssToken::Function(string)
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            self.position += 1;
            CssToken::Function(string)
        } else {
            CssToken::Ident(string)
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CssToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(')') | None => return CssToken::Url(value),
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.position += 1;
                            CssToken::Url(value)
                        }
                        None => CssToken::Url(value),
                        Some(_) => {
                            self.consume_bad_url_remnants();
                            CssToken::BadUrl
                        }
                    };
                }
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return CssToken::BadUrl;
                }
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        self.consume_bad_url_remnants();
                        return CssToken::BadUrl;
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if is_ident_code_point(c) {
                result.push(c);
                self.position += 1;
            } else if c == '\\' && is_valid_escape(Some('\\'), self.peek_at(1)) {
                self.position += 1;
                result.push(self.consume_escaped_code_point());
            } else {
                break;
            }
        }
        result
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> f64 {
        let start = self.position;
        if matches!(self.peek(), Some('+' | '-')) {
            self.position += 1;
        }
        self.consume_digits();
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            self.consume_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.position += digit_at;
                self.consume_digits();
            }
        }
        let repr: String = self.chars[start..self.position].iter().collect();
        repr.parse().unwrap_or(0.0)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::from(c);
                while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    if let Some(next) = self.consume() {
                        hex.push(next);
                    }
                }
                if self.peek().is_some_and(is_whitespace) {
                    self.position += 1;
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&cp| cp != 0)
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}')
            }
            Some(c) => c,
            None => '\u{FFFD}',
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        match self.peek() {
            Some('-') => {
                let second = self.peek_at(1);
                second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || is_valid_escape(second, self.peek_at(2))
            }
            Some('\\') => is_valid_escape(Some('\\'), self.peek_at(1)),
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match self.peek() {
            Some('+' | '-') => {
                is_digit(self.peek_at(1))
                    || (self.peek_at(1) == Some('.') && is_digit(self.peek_at(2)))
            }
            Some('.') => is_digit(self.peek_at(1)),
            c => is_digit(c),
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.chars.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second.is_some_and(|c| c != '\n')
}

/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
pub(crate) const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
pub(crate) const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(css: &str) -> Vec<CssToken> {
        CssTokenizer::new(css)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_spans_cover_source_text() {
        let source = "width: 1.50em";
        let tokens = CssTokenizer::new(source).tokenize();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text(source)).collect();
        assert_eq!(texts, vec!["width", ":", " ", "1.50em", ""]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a/* x */b"),
            vec![
                CssToken::Ident("a".into()),
                CssToken::Ident("b".into()),
                CssToken::Eof
            ]
        );
    }

    #[test]
    fn test_quoted_url_is_function() {
        assert_eq!(kinds("url(\"a.png\")")[0], CssToken::Function("url".into()));
        assert_eq!(kinds("url( a.png )")[0], CssToken::Url("a.png".into()));
    }

    #[test]
    fn test_custom_property_name_is_ident() {
        assert_eq!(kinds("--main-color")[0], CssToken::Ident("--main-color".into()));
    }

    #[test]
    fn test_negative_dimension() {
        assert_eq!(
            kinds("-2px")[0],
            CssToken::Dimension {
                value: -2.0,
                unit: "px".into()
            }
        );
    }
}
