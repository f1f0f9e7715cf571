//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! Only what the converter consumes is built into structures: top-level
//! style rules (selector list plus declarations) and top-level at-rules. The
//! bodies of at-rules are validated for balance but kept as opaque source
//! text.

use core::ops::Range;

use crate::error::{CssError, MAX_NESTING_DEPTH};
use crate::tokenizer::{CssToken, CssTokenizer, Token};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, lowercased unless it is a custom property (`--x`).
    pub name: String,
    /// Value text with comments removed and whitespace collapsed.
    pub value: String,
    /// Whether the declaration ended in `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a normal (non-important) declaration.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            important: false,
        }
    }
}

/// A qualified rule whose prelude is a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Individual selectors of the comma-separated list.
    pub selectors: Vec<String>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Lowercase keyword without the `@`.
    pub name: String,
    /// Prelude text, e.g. the media query or keyframes name.
    pub prelude: String,
    /// The whole rule as written in the source.
    pub text: String,
    /// Whether the rule had a `{}` block (as opposed to ending in `;`).
    pub has_block: bool,
}

/// A top-level rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A style rule.
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level rules in source order.
    pub rules: Vec<Rule>,
}

/// Recursive-descent parser over a spanned token list.
pub struct CssParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl<'a> CssParser<'a> {
    /// Tokenize `source` and prepare to parse it.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: CssTokenizer::new(source).tokenize(),
            position: 0,
            depth: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// # Errors
    ///
    /// Returns [`CssError`] when blocks nest too deeply or the input ends
    /// inside an open `{` block.
    pub fn parse_stylesheet(mut self) -> Result<Stylesheet, CssError> {
        let mut rules = Vec::new();
        loop {
            match self.peek() {
                CssToken::Whitespace | CssToken::Cdo | CssToken::Cdc => self.advance(),
                CssToken::Eof => return Ok(Stylesheet { rules }),
                // A stray closing brace has no rule to close.
                CssToken::RightBrace => self.advance(),
                CssToken::AtKeyword(_) => rules.push(Rule::At(self.consume_at_rule()?)),
                _ => {
                    if let Some(rule) = self.consume_qualified_rule()? {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Used for `style=""` attributes. Never fails; malformed parts are dropped.
    #[must_use]
    pub fn parse_declaration_list(mut self) -> Vec<Declaration> {
        self.consume_declarations(false).unwrap_or_default()
    }

    fn consume_at_rule(&mut self) -> Result<AtRule, CssError> {
        let start = self.position;
        let name = match self.peek() {
            CssToken::AtKeyword(name) => name.to_ascii_lowercase(),
            _ => String::new(),
        };
        self.advance();

        let prelude_start = self.position;
        let mut has_block = false;
        let prelude_end;
        loop {
            match self.peek() {
                CssToken::Semicolon => {
                    prelude_end = self.position;
                    self.advance();
                    break;
                }
                CssToken::Eof => {
                    prelude_end = self.position;
                    break;
                }
                CssToken::LeftBrace => {
                    prelude_end = self.position;
                    has_block = true;
                    self.skip_component_value()?;
                    break;
                }
                _ => self.skip_component_value()?,
            }
        }

        Ok(AtRule {
            name,
            prelude: self.join_tokens(prelude_start..prelude_end),
            text: self.source_text(start..self.position).trim().to_string(),
            has_block,
        })
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Returns `None` for a prelude that reaches end of input without a block.
    fn consume_qualified_rule(&mut self) -> Result<Option<StyleRule>, CssError> {
        let prelude_start = self.position;
        loop {
            match self.peek() {
                CssToken::Eof => return Ok(None),
                CssToken::LeftBrace => break,
                _ => self.skip_component_value()?,
            }
        }
        let selectors = self.split_selector_list(prelude_start..self.position);

        self.enter_block()?;
        self.advance();
        let declarations = self.consume_declarations(true)?;
        self.depth -= 1;

        Ok(Some(StyleRule {
            selectors,
            declarations,
        }))
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// With `in_block`, stops after the closing `}` and treats end of input
    /// as an unbalanced block.
    fn consume_declarations(&mut self, in_block: bool) -> Result<Vec<Declaration>, CssError> {
        let mut declarations = Vec::new();
        loop {
            match self.peek() {
                CssToken::Whitespace | CssToken::Semicolon => self.advance(),
                CssToken::Eof => {
                    return if in_block {
                        Err(CssError::UnbalancedBlock)
                    } else {
                        Ok(declarations)
                    };
                }
                CssToken::RightBrace => {
                    self.advance();
                    if in_block {
                        return Ok(declarations);
                    }
                }
                CssToken::AtKeyword(_) => {
                    // Nested at-rules (e.g. @media inside a rule) are not walked.
                    let _ = self.consume_at_rule()?;
                }
                _ => {
                    let start = self.position;
                    let mut nested_rule = false;
                    loop {
                        match self.peek() {
                            CssToken::Semicolon | CssToken::RightBrace | CssToken::Eof => break,
                            CssToken::LeftBrace => {
                                self.skip_component_value()?;
                                nested_rule = true;
                                break;
                            }
                            _ => self.skip_component_value()?,
                        }
                    }
                    if !nested_rule {
                        if let Some(declaration) = self.build_declaration(start..self.position) {
                            declarations.push(declaration);
                        }
                    }
                }
            }
        }
    }

    /// Turn the tokens of one `name: value` chunk into a declaration.
    fn build_declaration(&self, range: Range<usize>) -> Option<Declaration> {
        let mut indices = range.clone().filter(|&i| !self.tokens[i].kind.is_whitespace());
        let name_index = indices.next()?;
        let CssToken::Ident(raw_name) = &self.tokens[name_index].kind else {
            return None;
        };
        let colon_index = indices.next()?;
        if self.tokens[colon_index].kind != CssToken::Colon {
            return None;
        }

        let mut value_end = range.end;
        let non_ws: Vec<usize> = (colon_index + 1..range.end)
            .filter(|&i| !self.tokens[i].kind.is_whitespace())
            .collect();
        let important = match non_ws.as_slice() {
            [.., bang, last]
                if self.tokens[*bang].kind == CssToken::Delim('!')
                    && matches!(&self.tokens[*last].kind,
                        CssToken::Ident(word) if word.eq_ignore_ascii_case("important")) =>
            {
                value_end = *bang;
                true
            }
            _ => false,
        };

        let name = if raw_name.starts_with("--") {
            raw_name.clone()
        } else {
            raw_name.to_ascii_lowercase()
        };
        Some(Declaration {
            name,
            value: self.join_tokens(colon_index + 1..value_end),
            important,
        })
    }

    /// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
    ///
    /// Splits on commas that are not inside a function or bracket.
    fn split_selector_list(&self, range: Range<usize>) -> Vec<String> {
        let mut selectors = Vec::new();
        let mut depth = 0usize;
        let mut part_start = range.start;
        for i in range.clone() {
            match self.tokens[i].kind {
                CssToken::Function(_) | CssToken::LeftParen | CssToken::LeftBracket => depth += 1,
                CssToken::RightParen | CssToken::RightBracket => depth = depth.saturating_sub(1),
                CssToken::Comma if depth == 0 => {
                    selectors.push(self.join_tokens(part_start..i));
                    part_start = i + 1;
                }
                _ => {}
            }
        }
        selectors.push(self.join_tokens(part_start..range.end));
        selectors.retain(|s| !s.is_empty());
        selectors
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    ///
    /// Skips one component value, descending into blocks and functions.
    fn skip_component_value(&mut self) -> Result<(), CssError> {
        let closing = match self.peek() {
            CssToken::LeftBrace => CssToken::RightBrace,
            CssToken::LeftBracket => CssToken::RightBracket,
            CssToken::LeftParen | CssToken::Function(_) => CssToken::RightParen,
            CssToken::Eof => return Ok(()),
            _ => {
                self.advance();
                return Ok(());
            }
        };
        let is_brace = closing == CssToken::RightBrace;

        self.enter_block()?;
        self.advance();
        loop {
            let token = self.peek();
            if *token == closing {
                self.advance();
                break;
            }
            if token.is_eof() {
                if is_brace {
                    return Err(CssError::UnbalancedBlock);
                }
                break;
            }
            self.skip_component_value()?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn enter_block(&mut self) -> Result<(), CssError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(CssError::NestingTooDeep { depth: self.depth });
        }
        Ok(())
    }

    /// Concatenate token source text, collapsing whitespace to single spaces.
    fn join_tokens(&self, range: Range<usize>) -> String {
        let mut out = String::new();
        for token in &self.tokens[range] {
            if token.kind.is_whitespace() {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            } else {
                out.push_str(token.text(self.source));
            }
        }
        out.trim_end().to_string()
    }

    fn source_text(&self, range: Range<usize>) -> &'a str {
        let start = self.tokens.get(range.start).map_or(0, |t| t.span.start);
        let end = range
            .end
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map_or(start, |t| t.span.end);
        self.source.get(start..end).unwrap_or("")
    }

    fn peek(&self) -> &CssToken {
        self.tokens
            .get(self.position)
            .map_or(&CssToken::Eof, |t| &t.kind)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parse a stylesheet from source text.
///
/// # Errors
///
/// See [`CssParser::parse_stylesheet`].
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, CssError> {
    CssParser::new(source).parse_stylesheet()
}

/// Parse the contents of a `style` attribute.
#[must_use]
pub fn parse_declaration_list(source: &str) -> Vec<Declaration> {
    CssParser::new(source).parse_declaration_list()
}
