//! Recursive-descent parser for the script subset.
//!
//! Statements are parsed by dispatch on the leading keyword; expressions use
//! precedence climbing. The grammar is permissive where strictness would not
//! change lint results: semicolons are optional separators, object and class
//! constructs the walk does not inspect are consumed as balanced token runs,
//! and `await` is accepted at top level in both modes.
//!
//! Positions are character offsets into the parsed text; every error carries
//! one.

use crate::ast::{BindingKind, Declarator, Expr, Program, Stmt};
use crate::lexer::{Span, Token, TokenKind, lex};

/// A parse failure with the character offset it occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Character offset of the failure.
    pub pos: usize,
    /// Bare message, without position annotation.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(pos: usize, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// How top-level code is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Script snippet: top-level `return` allowed, `import`/`export` not.
    Script,
    /// Module: `import`/`export` allowed, top-level `return` not.
    Module,
}

/// Parse `text` as a standalone program.
pub fn parse(text: &str, mode: ParseMode) -> Result<Program, ParseError> {
    let tokens = lex(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        mode,
        fn_depth: 0,
        no_in: false,
    };
    parser.parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    mode: ParseMode,
    fn_depth: usize,
    /// Suppress the `in` operator (while parsing a `for` head).
    no_in: bool,
}

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

impl Parser {
    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.at_eof() {
            body.push(self.parse_stmt()?);
        }
        Ok(Program { body })
    }

    // ----- token helpers -----

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead)
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    fn at_punct(&self, p: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Punct(q) if *q == p)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        if self.at_punct(p) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<Span, ParseError> {
        if self.at_punct(p) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected())
        }
    }

    fn at_keyword(&self, kw: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == kw)
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> ParseError {
        ParseError::new(self.peek().span.start, "Unexpected token")
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    /// Skip a balanced `open ... close` token run, honoring nesting of all
    /// three bracket kinds. Returns the covered span.
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<Span, ParseError> {
        let start = self.expect_punct(open)?.start;
        let mut depth = 1usize;
        loop {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            let token = self.advance();
            if let TokenKind::Punct(p) = token.kind {
                if p == open {
                    depth += 1;
                } else if p == close {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Span::new(start, token.span.end));
                    }
                }
            }
        }
    }

    // ----- statements -----

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        if self.at_punct("{") {
            return Ok(Stmt::Block(self.parse_block()?));
        }
        if self.eat_punct(";") {
            return Ok(Stmt::Empty);
        }

        if let TokenKind::Ident(name) = &self.peek().kind {
            match name.as_str() {
                "const" | "let" | "var" => return self.parse_var_decl_stmt(),
                "function" => return self.parse_function_decl(),
                "async" if matches!(self.peek_at(1), Some(t) if matches!(&t.kind, TokenKind::Ident(n) if n == "function")) =>
                {
                    self.pos += 1;
                    return self.parse_function_decl();
                }
                "class" => return self.parse_class_decl(),
                "if" => return self.parse_if(),
                "for" => return self.parse_for(),
                "while" => return self.parse_while(),
                "do" => return self.parse_do_while(),
                "return" => return self.parse_return(),
                "throw" => {
                    self.pos += 1;
                    let arg = self.parse_expression()?;
                    self.eat_punct(";");
                    return Ok(Stmt::Throw(arg));
                }
                "try" => return self.parse_try(),
                "switch" => return self.parse_switch(),
                "break" => {
                    self.pos += 1;
                    self.eat_punct(";");
                    return Ok(Stmt::Break);
                }
                "continue" => {
                    self.pos += 1;
                    self.eat_punct(";");
                    return Ok(Stmt::Continue);
                }
                "import" => return self.parse_import(),
                "export" => return self.parse_export(),
                _ => {
                    // Labeled statement: `name: stmt`.
                    let is_label = matches!(self.peek_at(1), Some(t) if matches!(t.kind, TokenKind::Punct(":")));
                    if is_label {
                        self.pos += 2;
                        return self.parse_stmt();
                    }
                }
            }
        }

        let expr = self.parse_expression()?;
        self.eat_punct(";");
        Ok(Stmt::Expr(expr))
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.at_punct("}") {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            body.push(self.parse_stmt()?);
        }
        self.expect_punct("}")?;
        Ok(body)
    }

    fn parse_var_decl_stmt(&mut self) -> Result<Stmt, ParseError> {
        let stmt = self.parse_var_decl()?;
        self.eat_punct(";");
        Ok(stmt)
    }

    /// Parse a declaration without consuming a trailing semicolon (shared
    /// with `for` heads).
    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        let kind = match &keyword.kind {
            TokenKind::Ident(name) if name == "const" => BindingKind::Const,
            TokenKind::Ident(name) if name == "let" => BindingKind::Let,
            _ => BindingKind::Var,
        };

        let mut decls = Vec::new();
        loop {
            let (name, name_span) = self.parse_binding_pattern()?;
            let init = if self.eat_punct("=") {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            decls.push(Declarator {
                name,
                name_span,
                init,
            });
            if !self.eat_punct(",") {
                break;
            }
        }

        let end = decls
            .last()
            .map(|d| d.init.as_ref().map(|e| e.span().end).unwrap_or(d.name_span.end))
            .unwrap_or(keyword.span.end);
        Ok(Stmt::VarDecl {
            kind,
            decls,
            span: Span::new(keyword.span.start, end),
        })
    }

    /// A binding: a plain identifier, or a destructuring pattern consumed as
    /// a balanced run (destructured names are not tracked).
    fn parse_binding_pattern(&mut self) -> Result<(Option<String>, Span), ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok((Some(name), span))
            }
            TokenKind::Punct("{") => Ok((None, self.skip_balanced("{", "}")?)),
            TokenKind::Punct("[") => Ok((None, self.skip_balanced("[", "]")?)),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1; // `function`
        self.eat_punct("*"); // generator marker
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.pos += 1;
                Some(name)
            }
            _ => None,
        };
        self.skip_balanced("(", ")")?;
        let body = self.parse_function_body()?;
        Ok(Stmt::Function { name, body })
    }

    fn parse_function_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.fn_depth += 1;
        let body = self.parse_block();
        self.fn_depth -= 1;
        body
    }

    fn parse_class_decl(&mut self) -> Result<Stmt, ParseError> {
        self.skip_class()?;
        Ok(Stmt::Class)
    }

    /// Consume a class declaration/expression; the body is opaque to the
    /// lint walk.
    fn skip_class(&mut self) -> Result<Span, ParseError> {
        let start = self.advance().span.start; // `class`
        while !self.at_punct("{") {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            self.pos += 1;
        }
        let body = self.skip_balanced("{", "}")?;
        Ok(Span::new(start, body.end))
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let cons = Box::new(self.parse_stmt()?);
        let alt = if self.eat_keyword("else") {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If { test, cons, alt })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1;
        self.expect_punct("(")?;

        let init = if self.at_punct(";") {
            None
        } else {
            self.no_in = true;
            let head = if self.at_keyword("const") || self.at_keyword("let") || self.at_keyword("var")
            {
                self.parse_var_decl()
            } else {
                self.parse_expression().map(Stmt::Expr)
            };
            self.no_in = false;
            Some(Box::new(head?))
        };

        if self.at_keyword("in") || self.at_keyword("of") {
            self.pos += 1;
            let right = self.parse_expression()?;
            self.expect_punct(")")?;
            let body = Box::new(self.parse_stmt()?);
            let left = init.ok_or_else(|| self.unexpected())?;
            return Ok(Stmt::ForEach { left, right, body });
        }

        self.expect_punct(";")?;
        let test = if self.at_punct(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(";")?;
        let update = if self.at_punct(")") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(")")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { test, body })
    }

    fn parse_do_while(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1;
        let body = Box::new(self.parse_stmt()?);
        if !self.eat_keyword("while") {
            return Err(self.unexpected());
        }
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        self.eat_punct(";");
        Ok(Stmt::DoWhile { body, test })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        if self.mode == ParseMode::Module && self.fn_depth == 0 {
            return Err(ParseError::new(
                keyword.span.start,
                "'return' outside of function",
            ));
        }
        let arg = if self.at_punct(";")
            || self.at_punct("}")
            || self.at_eof()
            || self.peek().newline_before
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat_punct(";");
        Ok(Stmt::Return(arg))
    }

    fn parse_try(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1;
        let block = self.parse_block()?;
        let handler = if self.eat_keyword("catch") {
            if self.at_punct("(") {
                self.skip_balanced("(", ")")?;
            }
            Some(self.parse_block()?)
        } else {
            None
        };
        let finalizer = if self.eat_keyword("finally") {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected());
        }
        Ok(Stmt::Try {
            block,
            handler,
            finalizer,
        })
    }

    fn parse_switch(&mut self) -> Result<Stmt, ParseError> {
        self.pos += 1;
        self.expect_punct("(")?;
        let disc = self.parse_expression()?;
        self.expect_punct(")")?;
        self.expect_punct("{")?;

        let mut cases = Vec::new();
        while !self.at_punct("}") {
            let test = if self.eat_keyword("case") {
                let test = self.parse_expression()?;
                Some(test)
            } else if self.eat_keyword("default") {
                None
            } else {
                return Err(self.unexpected());
            };
            self.expect_punct(":")?;

            let mut body = Vec::new();
            while !self.at_punct("}") && !self.at_keyword("case") && !self.at_keyword("default") {
                if self.at_eof() {
                    return Err(self.unexpected());
                }
                body.push(self.parse_stmt()?);
            }
            cases.push((test, body));
        }
        self.expect_punct("}")?;
        Ok(Stmt::Switch { disc, cases })
    }

    fn module_only(&self, keyword: &Token) -> Result<(), ParseError> {
        if self.mode == ParseMode::Script {
            return Err(ParseError::new(
                keyword.span.start,
                "'import' and 'export' may appear only with 'sourceType: module'",
            ));
        }
        Ok(())
    }

    fn parse_import(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        // `import(...)` / `import.meta` are expressions, not declarations.
        if self.at_punct("(") || self.at_punct(".") {
            self.pos -= 1;
            let expr = self.parse_expression()?;
            self.eat_punct(";");
            return Ok(Stmt::Expr(expr));
        }
        self.module_only(&keyword)?;

        // Consume the clause loosely, up to a semicolon or line end.
        while !self.at_eof() && !self.at_punct(";") && !self.peek().newline_before {
            self.pos += 1;
        }
        self.eat_punct(";");
        Ok(Stmt::Import)
    }

    fn parse_export(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        self.module_only(&keyword)?;

        if self.eat_keyword("default") {
            if self.at_keyword("function") || self.at_keyword("async") {
                let decl = self.parse_stmt()?;
                return Ok(Stmt::Export {
                    decl: Some(Box::new(decl)),
                    value: None,
                });
            }
            let value = self.parse_assignment()?;
            self.eat_punct(";");
            return Ok(Stmt::Export {
                decl: None,
                value: Some(value),
            });
        }

        if self.at_punct("{") {
            self.skip_balanced("{", "}")?;
            if self.eat_keyword("from") {
                self.advance(); // module specifier
            }
            self.eat_punct(";");
            return Ok(Stmt::Export {
                decl: None,
                value: None,
            });
        }
        if self.eat_punct("*") {
            while !self.at_eof() && !self.at_punct(";") && !self.peek().newline_before {
                self.pos += 1;
            }
            self.eat_punct(";");
            return Ok(Stmt::Export {
                decl: None,
                value: None,
            });
        }

        let decl = self.parse_stmt()?;
        Ok(Stmt::Export {
            decl: Some(Box::new(decl)),
            value: None,
        })
    }

    // ----- expressions -----

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_assignment()?;
        if !self.at_punct(",") {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat_punct(",") {
            exprs.push(self.parse_assignment()?);
        }
        Ok(Expr::Sequence(exprs))
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        if let Some(arrow) = self.try_parse_arrow()? {
            return Ok(arrow);
        }

        let target = self.parse_conditional()?;
        let is_assign = matches!(&self.peek().kind, TokenKind::Punct(p) if ASSIGN_OPS.contains(p));
        if !is_assign {
            return Ok(target);
        }
        self.advance();
        let value = self.parse_assignment()?;
        let span = Span::new(target.span().start, value.span().end);
        Ok(Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }

    /// Detect and parse an arrow function at the current position.
    fn try_parse_arrow(&mut self) -> Result<Option<Expr>, ParseError> {
        let start = self.pos;

        // Optional `async` prefix on the same line.
        if self.at_keyword("async")
            && matches!(self.peek_at(1), Some(t) if !t.newline_before
                && matches!(&t.kind, TokenKind::Ident(_) | TokenKind::Punct("(")))
            && !matches!(self.peek_at(1), Some(t) if matches!(&t.kind, TokenKind::Ident(n) if n == "function"))
        {
            self.pos += 1;
            match self.try_parse_arrow()? {
                Some(arrow) => return Ok(Some(arrow)),
                None => {
                    self.pos = start;
                    return Ok(None);
                }
            }
        }

        // `ident =>` form.
        if matches!(&self.peek().kind, TokenKind::Ident(_))
            && matches!(self.peek_at(1), Some(t) if matches!(t.kind, TokenKind::Punct("=>")))
        {
            self.pos += 1;
            return Ok(Some(self.parse_arrow_tail()?));
        }

        // `( params ) =>` form: scan ahead to the matching paren.
        if self.at_punct("(") {
            if let Some(after) = self.find_matching_paren() {
                if matches!(
                    self.tokens.get(after + 1).map(|t| &t.kind),
                    Some(TokenKind::Punct("=>"))
                ) {
                    self.skip_balanced("(", ")")?;
                    return Ok(Some(self.parse_arrow_tail()?));
                }
            }
        }

        Ok(None)
    }

    /// Index of the token closing the paren run starting at the current
    /// token, or `None` if unbalanced.
    fn find_matching_paren(&self) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens[self.pos..].iter().enumerate() {
            match token.kind {
                TokenKind::Punct("(") => depth += 1,
                TokenKind::Punct(")") => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(self.pos + i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    fn parse_arrow_tail(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("=>")?;
        if self.at_punct("{") {
            let start = self.peek().span.start;
            let body = self.parse_function_body()?;
            let span = Span::new(start, self.prev_end());
            Ok(Expr::Function { body, span })
        } else {
            let body = self.parse_assignment()?;
            Ok(Expr::ArrowValue(Box::new(body)))
        }
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_binary(1)?;
        if !self.eat_punct("?") {
            return Ok(test);
        }
        let cons = self.parse_assignment()?;
        self.expect_punct(":")?;
        let alt = self.parse_assignment()?;
        Ok(Expr::Cond(Box::new(test), Box::new(cons), Box::new(alt)))
    }

    fn binary_prec(&self) -> Option<u8> {
        match &self.peek().kind {
            TokenKind::Punct(p) => match *p {
                "??" => Some(1),
                "||" => Some(2),
                "&&" => Some(3),
                "|" => Some(4),
                "^" => Some(5),
                "&" => Some(6),
                "==" | "!=" | "===" | "!==" => Some(7),
                "<" | ">" | "<=" | ">=" => Some(8),
                "<<" | ">>" | ">>>" => Some(9),
                "+" | "-" => Some(10),
                "*" | "/" | "%" => Some(11),
                "**" => Some(12),
                _ => None,
            },
            TokenKind::Ident(name) if name == "instanceof" => Some(8),
            TokenKind::Ident(name) if name == "in" && !self.no_in => Some(8),
            _ => None,
        }
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(prec) = self.binary_prec() {
            if prec < min_prec {
                break;
            }
            let right_assoc = self.at_punct("**");
            self.advance();
            let right = self.parse_binary(if right_assoc { prec } else { prec + 1 })?;
            left = Expr::Binary(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let TokenKind::Punct(p) = &self.peek().kind {
            match *p {
                "!" | "~" | "+" | "-" => {
                    self.advance();
                    return Ok(Expr::Unary(Box::new(self.parse_unary()?)));
                }
                "++" | "--" => {
                    let op = self.advance();
                    let arg = self.parse_unary()?;
                    let span = Span::new(op.span.start, arg.span().end);
                    return Ok(Expr::Update {
                        arg: Box::new(arg),
                        span,
                    });
                }
                "..." => {
                    self.advance();
                    return Ok(Expr::Unary(Box::new(self.parse_assignment()?)));
                }
                _ => {}
            }
        }
        if let TokenKind::Ident(name) = &self.peek().kind {
            if matches!(name.as_str(), "typeof" | "void" | "delete" | "await" | "new" | "yield") {
                self.advance();
                return Ok(Expr::Unary(Box::new(self.parse_unary()?)));
            }
        }

        let expr = self.parse_call_chain()?;
        if (self.at_punct("++") || self.at_punct("--")) && !self.peek().newline_before {
            let op = self.advance();
            let span = Span::new(expr.span().start, op.span.end);
            return Ok(Expr::Update {
                arg: Box::new(expr),
                span,
            });
        }
        Ok(expr)
    }

    fn parse_call_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.peek().kind {
                TokenKind::Punct(".") | TokenKind::Punct("?.") => {
                    self.advance();
                    if self.at_punct("(") {
                        // `a?.(args)`
                        expr = self.parse_call_args(expr)?;
                        continue;
                    }
                    if self.at_punct("[") {
                        // `a?.[k]`
                        self.advance();
                        let property = self.parse_expression()?;
                        self.expect_punct("]")?;
                        expr = Expr::Member {
                            object: Box::new(expr),
                            property: Some(Box::new(property)),
                        };
                        continue;
                    }
                    match &self.peek().kind {
                        TokenKind::Ident(_) => {
                            self.advance();
                            expr = Expr::Member {
                                object: Box::new(expr),
                                property: None,
                            };
                        }
                        _ => return Err(self.unexpected()),
                    }
                }
                TokenKind::Punct("[") => {
                    self.advance();
                    let property = self.parse_expression()?;
                    self.expect_punct("]")?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: Some(Box::new(property)),
                    };
                }
                TokenKind::Punct("(") => {
                    expr = self.parse_call_args(expr)?;
                }
                TokenKind::Template => {
                    // Tagged template.
                    let token = self.advance();
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args: vec![Expr::Literal(token.span)],
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_call_args(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        while !self.at_punct(")") {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            args.push(self.parse_assignment()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.peek().kind {
            TokenKind::Number | TokenKind::Str | TokenKind::Template | TokenKind::Regex => {
                let token = self.advance();
                Ok(Expr::Literal(token.span))
            }
            TokenKind::Punct("(") => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_punct(")")?;
                Ok(expr)
            }
            TokenKind::Punct("[") => self.parse_array(),
            TokenKind::Punct("{") => self.parse_object(),
            TokenKind::Ident(name) => match name.as_str() {
                "function" => {
                    let start = self.advance().span.start;
                    self.eat_punct("*"); // generator marker
                    if matches!(&self.peek().kind, TokenKind::Ident(_)) {
                        self.advance();
                    }
                    self.skip_balanced("(", ")")?;
                    let body = self.parse_function_body()?;
                    let span = Span::new(start, self.prev_end());
                    Ok(Expr::Function { body, span })
                }
                "async"
                    if matches!(self.peek_at(1), Some(t) if matches!(&t.kind, TokenKind::Ident(n) if n == "function")) =>
                {
                    self.advance();
                    self.parse_primary()
                }
                "class" => {
                    let span = self.skip_class()?;
                    Ok(Expr::Opaque(span))
                }
                "true" | "false" | "null" | "undefined" | "this" | "super" => {
                    let token = self.advance();
                    Ok(Expr::Literal(token.span))
                }
                _ => {
                    let name = name.clone();
                    let token = self.advance();
                    Ok(Expr::Ident {
                        name,
                        span: token.span,
                    })
                }
            },
            _ => Err(self.unexpected()),
        }
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("[")?;
        let mut items = Vec::new();
        while !self.at_punct("]") {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            if self.eat_punct(",") {
                continue; // elision
            }
            items.push(self.parse_assignment()?);
            if !self.at_punct("]") && !self.eat_punct(",") {
                return Err(self.unexpected());
            }
        }
        self.expect_punct("]")?;
        Ok(Expr::Array(items))
    }

    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        self.expect_punct("{")?;
        let mut values = Vec::new();
        while !self.at_punct("}") {
            if self.at_eof() {
                return Err(self.unexpected());
            }
            if self.eat_punct("...") {
                values.push(self.parse_assignment()?);
            } else {
                if let Some(value) = self.parse_object_member()? {
                    values.push(value);
                }
            }
            if !self.at_punct("}") && !self.eat_punct(",") {
                return Err(self.unexpected());
            }
        }
        self.expect_punct("}")?;
        Ok(Expr::Object(values))
    }

    /// One object-literal member; returns the walkable child expression, if
    /// any.
    fn parse_object_member(&mut self) -> Result<Option<Expr>, ParseError> {
        // `async` method prefix followed by another key or a generator
        // marker.
        if self.at_keyword("async")
            && matches!(self.peek_at(1), Some(t)
                if matches!(&t.kind, TokenKind::Ident(_) | TokenKind::Str | TokenKind::Number
                    | TokenKind::Punct("[") | TokenKind::Punct("*")))
        {
            self.pos += 1;
        }
        // Generator method marker.
        self.eat_punct("*");

        // `get`/`set` accessor prefix followed by another key.
        if (self.at_keyword("get") || self.at_keyword("set"))
            && matches!(self.peek_at(1), Some(t)
                if matches!(&t.kind, TokenKind::Ident(_) | TokenKind::Str | TokenKind::Number | TokenKind::Punct("[")))
        {
            self.pos += 1;
        }

        let mut computed_key = None;
        match &self.peek().kind {
            TokenKind::Ident(_) | TokenKind::Str | TokenKind::Number => {
                self.advance();
            }
            TokenKind::Punct("[") => {
                self.advance();
                computed_key = Some(self.parse_assignment()?);
                self.expect_punct("]")?;
            }
            _ => return Err(self.unexpected()),
        }

        if self.at_punct("(") {
            // Method shorthand.
            let start = self.skip_balanced("(", ")")?.start;
            let body = self.parse_function_body()?;
            let span = Span::new(start, self.prev_end());
            let method = Expr::Function { body, span };
            return Ok(Some(match computed_key {
                Some(key) => Expr::Sequence(vec![key, method]),
                None => method,
            }));
        }
        if self.eat_punct(":") {
            let value = self.parse_assignment()?;
            return Ok(Some(match computed_key {
                Some(key) => Expr::Sequence(vec![key, value]),
                None => value,
            }));
        }
        // Shorthand property (possibly with a default in destructuring
        // position); the key itself is not walkable.
        if self.eat_punct("=") {
            return Ok(Some(self.parse_assignment()?));
        }
        Ok(computed_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> Program {
        parse(text, ParseMode::Module).unwrap()
    }

    #[test]
    fn test_const_declaration() {
        let program = parse_ok("const x = 1, y = 2;");
        let Stmt::VarDecl { kind, decls, .. } = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(*kind, BindingKind::Const);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name.as_deref(), Some("x"));
        assert_eq!(decls[1].name.as_deref(), Some("y"));
    }

    #[test]
    fn test_assignment_spans() {
        let program = parse_ok("x = 2;");
        let Stmt::Expr(Expr::Assign { target, span, .. }) = &program.body[0] else {
            panic!("expected assignment");
        };
        let Expr::Ident { name, span: target_span } = target.as_ref() else {
            panic!("expected identifier target");
        };
        assert_eq!(name, "x");
        assert_eq!(*target_span, Span::new(0, 1));
        assert_eq!(*span, Span::new(0, 5));
    }

    #[test]
    fn test_update_expression_span() {
        let program = parse_ok("x++;");
        let Stmt::Expr(Expr::Update { span, .. }) = &program.body[0] else {
            panic!("expected update expression");
        };
        assert_eq!(*span, Span::new(0, 3));
    }

    #[test]
    fn test_control_flow_and_calls() {
        parse_ok("if (a < 2) { f(a, ...rest); } else while (true) g?.(1)[2].h;");
        parse_ok("for (let i = 0; i < 10; i++) total += i;");
        parse_ok("for (const k in obj) {} for (const v of list) {}");
        parse_ok("try { risky(); } catch (e) { log(e); } finally { done(); }");
        parse_ok("switch (x) { case 1: break; default: y = 2; }");
    }

    #[test]
    fn test_arrow_functions() {
        parse_ok("const f = (a, b = 1) => a + b;");
        parse_ok("const g = x => { return x * 2; };");
        parse_ok("list.map(async (item) => item.id);");
    }

    #[test]
    fn test_top_level_return_mode_gate() {
        assert!(parse("return 1;", ParseMode::Script).is_ok());
        let err = parse("return 1;", ParseMode::Module).unwrap_err();
        assert_eq!(err.pos, 0);
        assert!(err.message.contains("outside of function"));
        // Inside a function it is fine in both modes.
        assert!(parse("function f() { return 1; }", ParseMode::Module).is_ok());
    }

    #[test]
    fn test_import_export_mode_gate() {
        assert!(parse("import a from 'b';", ParseMode::Module).is_ok());
        let err = parse("import a from 'b';", ParseMode::Script).unwrap_err();
        assert!(err.message.contains("sourceType: module"));
        assert!(parse("export const x = 1;", ParseMode::Module).is_ok());
        assert!(parse("export default function () {}", ParseMode::Module).is_ok());
    }

    #[test]
    fn test_top_level_await_in_both_modes() {
        assert!(parse("const x = await fetchThing();", ParseMode::Script).is_ok());
        assert!(parse("const x = await fetchThing();", ParseMode::Module).is_ok());
    }

    #[test]
    fn test_error_position_points_at_offender() {
        let err = parse("const = 1;", ParseMode::Module).unwrap_err();
        assert_eq!(err.pos, 6);
        let err = parse("f(;", ParseMode::Module).unwrap_err();
        assert_eq!(err.pos, 2);
    }

    #[test]
    fn test_generator_and_async_method_forms() {
        parse_ok("function* g() { yield 1; }");
        parse_ok("async function* h() { await p; }");
        parse_ok("const o = { async f() { return 1; }, *gen() { yield 1; }, async *both() {} };");
    }

    #[test]
    fn test_optional_chained_indexing() {
        parse_ok("const v = list?.[0];");
        parse_ok("a?.b?.[c + 1]?.();");
    }

    #[test]
    fn test_function_expression_span_covers_body() {
        let program = parse_ok("x = function () { return 1; };");
        let Stmt::Expr(Expr::Assign { span, .. }) = &program.body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(*span, Span::new(0, 29));
    }

    #[test]
    fn test_object_literals() {
        parse_ok("const o = { a: 1, b, [k]: v, m() { return 1; }, get p() { return 2; }, ...rest };");
    }
}
