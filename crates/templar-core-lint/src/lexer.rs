//! Script tokenizer.
//!
//! Produces a flat token stream with half-open character spans. The scanner
//! covers the script subset the lint rules need: identifiers and keywords
//! (keywords are plain identifier tokens; the parser matches on their text),
//! numeric/string/template/regex literals, comments, and the full
//! assignment and update operator families.
//!
//! Regex literals are disambiguated from division with the classic
//! previous-significant-token heuristic. Template literals are lexed as one
//! opaque token with `${}` depth tracking; interpolation contents are not
//! re-lexed.

use crate::parser::ParseError;

/// A half-open character span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Token classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword (the parser matches keyword text).
    Ident(String),
    /// Numeric literal.
    Number,
    /// String literal.
    Str,
    /// Template literal (opaque, interpolations included).
    Template,
    /// Regular-expression literal.
    Regex,
    /// Punctuation or operator, by its source text.
    Punct(&'static str),
    /// End of input.
    Eof,
}

/// One lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification.
    pub kind: TokenKind,
    /// Source span in character offsets.
    pub span: Span,
    /// Whether a line break occurred between this token and the previous one.
    pub newline_before: bool,
}

/// Multi-character operators, longest first so maximal munch works.
const OPERATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", ".", ":", "?", "=",
    "+", "-", "*", "/", "%", "<", ">", "!", "~", "&", "|", "^",
];

/// Tokenize `text` into a stream ending with an [`TokenKind::Eof`] token.
pub fn lex(text: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(text).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    newline_pending: bool,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            newline_pending: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.newline_pending = true;
                    self.pos += 1;
                }
                c if c.is_whitespace() => self.pos += 1,
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment()?,
                '/' if self.regex_allowed() => self.lex_regex()?,
                '\'' | '"' => self.lex_string(c)?,
                '`' => self.lex_template()?,
                c if c.is_ascii_digit() => self.lex_number(),
                c if is_ident_start(c) => self.lex_ident(),
                _ => self.lex_operator()?,
            }
        }

        let end = self.chars.len();
        self.push(TokenKind::Eof, end, end);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
            newline_before: std::mem::take(&mut self.newline_pending),
        });
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2;
        while let Some(c) = self.peek() {
            if c == '\n' {
                self.newline_pending = true;
            }
            if c == '*' && self.peek_at(1) == Some('/') {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(ParseError::new(start, "Unterminated comment"))
    }

    fn lex_string(&mut self, quote: char) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.pos += 2,
                '\n' => break,
                c if c == quote => {
                    self.pos += 1;
                    self.push(TokenKind::Str, start, self.pos);
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::new(start, "Unterminated string constant"))
    }

    fn lex_template(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        self.skip_template_body(start)?;
        self.push(TokenKind::Template, start, self.pos);
        Ok(())
    }

    /// Consume a template body up to and including its closing backtick.
    fn skip_template_body(&mut self, start: usize) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.pos += 2,
                '`' => {
                    self.pos += 1;
                    return Ok(());
                }
                '$' if self.peek_at(1) == Some('{') => {
                    self.pos += 2;
                    self.skip_interpolation(start)?;
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::new(start, "Unterminated template"))
    }

    /// Consume an interpolation up to and including its matching `}`.
    fn skip_interpolation(&mut self, start: usize) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '`' => {
                    self.pos += 1;
                    self.skip_template_body(start)?;
                }
                '\'' | '"' => {
                    let quote = c;
                    self.pos += 1;
                    while let Some(c2) = self.peek() {
                        self.pos += 1;
                        if c2 == '\\' {
                            self.pos += 1;
                        } else if c2 == quote {
                            break;
                        }
                    }
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::new(start, "Unterminated template"))
    }

    fn lex_regex(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut in_class = false;
        loop {
            let Some(c) = self.peek() else {
                return Err(ParseError::new(start, "Unterminated regular expression"));
            };
            match c {
                '\\' => self.pos += 2,
                '\n' => return Err(ParseError::new(start, "Unterminated regular expression")),
                '[' => {
                    in_class = true;
                    self.pos += 1;
                }
                ']' => {
                    in_class = false;
                    self.pos += 1;
                }
                '/' if !in_class => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        self.push(TokenKind::Regex, start, self.pos);
        Ok(())
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.pos += 1;
            }
        }
        self.push(TokenKind::Number, start, self.pos);
    }

    fn lex_ident(&mut self) {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Ident(name), start, self.pos);
    }

    fn lex_operator(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        for &op in OPERATORS {
            if self.matches_str(op) {
                self.pos += op.chars().count();
                self.push(TokenKind::Punct(op), start, self.pos);
                return Ok(());
            }
        }
        let c = self.chars[self.pos];
        Err(ParseError::new(
            start,
            format!("Unexpected character '{}'", c),
        ))
    }

    fn matches_str(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// Whether a `/` at the current position starts a regex literal rather
    /// than a division, judged by the previous significant token.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(token) => match &token.kind {
                TokenKind::Ident(name) => matches!(
                    name.as_str(),
                    "return" | "typeof" | "instanceof" | "in" | "of" | "new" | "delete" | "void"
                        | "throw" | "case" | "do" | "else" | "await" | "yield"
                ),
                TokenKind::Punct(p) => !matches!(*p, ")" | "]" | "++" | "--"),
                TokenKind::Number
                | TokenKind::Str
                | TokenKind::Template
                | TokenKind::Regex
                | TokenKind::Eof => false,
            },
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        lex(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_idents_numbers_operators() {
        assert_eq!(
            kinds("x += 12;"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Punct("+="),
                TokenKind::Number,
                TokenKind::Punct(";"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_are_char_offsets() {
        let tokens = lex("好 = 1").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(2, 3));
        assert_eq!(tokens[2].span, Span::new(4, 5));
    }

    #[test]
    fn test_comments_are_skipped_and_mark_newlines() {
        let tokens = lex("a // trailing\nb /* c\nd */ e").unwrap();
        let names: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Ident(n) => Some((n.clone(), t.newline_before)),
                _ => None,
            })
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), false),
                ("b".to_string(), true),
                ("e".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_template_with_nested_interpolation_is_one_token() {
        assert_eq!(
            kinds("`a ${ {b: `${c}`} } d`"),
            vec![TokenKind::Template, TokenKind::Eof]
        );
    }

    #[test]
    fn test_regex_vs_division() {
        assert_eq!(
            kinds("a / b"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Punct("/"),
                TokenKind::Ident("b".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("x = /ab[/]c/gi"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Punct("="),
                TokenKind::Regex,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_reports_opening_quote() {
        let err = lex("  'abc").unwrap_err();
        assert_eq!(err.pos, 2);
        assert_eq!(err.message, "Unterminated string constant");
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex("a @ b").unwrap_err();
        assert_eq!(err.pos, 2);
        assert!(err.message.contains('@'));
    }
}
