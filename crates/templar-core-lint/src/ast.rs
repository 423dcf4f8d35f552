//! Spanned syntax tree for the script subset.
//!
//! The tree is deliberately narrow: it keeps exactly the shape the lint walk
//! needs (binding declarations, assignment targets, update expressions) and
//! collapses everything else into generic containers that still carry their
//! child expressions, so a full-tree walk reaches every assignment.

use crate::lexer::Span;

/// A parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements.
    pub body: Vec<Stmt>,
}

/// Variable binding semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Non-reassignable binding.
    Const,
    /// Block-scoped reassignable binding.
    Let,
    /// Function-scoped reassignable binding.
    Var,
}

/// One declarator in a variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// Bound identifier name; `None` for destructuring patterns.
    pub name: Option<String>,
    /// Span of the binding pattern.
    pub name_span: Span,
    /// Initializer expression.
    pub init: Option<Expr>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `const`/`let`/`var` declaration.
    VarDecl {
        /// Binding semantics.
        kind: BindingKind,
        /// Declarators, in source order.
        decls: Vec<Declarator>,
        /// Statement span.
        span: Span,
    },
    /// Expression statement.
    Expr(Expr),
    /// `{ ... }` block.
    Block(Vec<Stmt>),
    /// `if`/`else`.
    If {
        /// Condition.
        test: Expr,
        /// Then-branch.
        cons: Box<Stmt>,
        /// Else-branch.
        alt: Option<Box<Stmt>>,
    },
    /// Classic three-part `for`.
    For {
        /// Initializer (declaration or expression statement).
        init: Option<Box<Stmt>>,
        /// Loop condition.
        test: Option<Expr>,
        /// Per-iteration update.
        update: Option<Expr>,
        /// Loop body.
        body: Box<Stmt>,
    },
    /// `for (... in ...)` / `for (... of ...)`.
    ForEach {
        /// Left-hand binding or target.
        left: Box<Stmt>,
        /// Iterated expression.
        right: Expr,
        /// Loop body.
        body: Box<Stmt>,
    },
    /// `while` loop.
    While {
        /// Condition.
        test: Expr,
        /// Body.
        body: Box<Stmt>,
    },
    /// `do ... while`.
    DoWhile {
        /// Body.
        body: Box<Stmt>,
        /// Condition.
        test: Expr,
    },
    /// `return`, with optional argument.
    Return(Option<Expr>),
    /// `throw`.
    Throw(Expr),
    /// `try`/`catch`/`finally`.
    Try {
        /// Protected block.
        block: Vec<Stmt>,
        /// Catch body, if present.
        handler: Option<Vec<Stmt>>,
        /// Finally body, if present.
        finalizer: Option<Vec<Stmt>>,
    },
    /// `switch` with its cases (a `None` test is `default`).
    Switch {
        /// Discriminant.
        disc: Expr,
        /// `(test, body)` per case.
        cases: Vec<(Option<Expr>, Vec<Stmt>)>,
    },
    /// Function declaration.
    Function {
        /// Function name (`None` inside `export default`).
        name: Option<String>,
        /// Body statements.
        body: Vec<Stmt>,
    },
    /// Class declaration (body treated as opaque).
    Class,
    /// `import ...` (opaque; module mode only).
    Import,
    /// `export ...` wrapping a declaration or expression.
    Export {
        /// Exported declaration, if any.
        decl: Option<Box<Stmt>>,
        /// Exported expression (`export default <expr>`), if any.
        value: Option<Expr>,
    },
    /// `break`.
    Break,
    /// `continue`.
    Continue,
    /// Empty statement.
    Empty,
}

/// An expression with a source span.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier reference.
    Ident {
        /// Identifier text.
        name: String,
        /// Source span.
        span: Span,
    },
    /// Number/string/template/regex/keyword literal (opaque).
    Literal(Span),
    /// Assignment (`=` or any compound operator).
    Assign {
        /// Assignment target.
        target: Box<Expr>,
        /// Assigned value.
        value: Box<Expr>,
        /// Full-expression span.
        span: Span,
    },
    /// `++`/`--`, prefix or postfix.
    Update {
        /// Operand.
        arg: Box<Expr>,
        /// Full-expression span.
        span: Span,
    },
    /// Unary operator application (incl. `await`, `typeof`, `delete`).
    Unary(Box<Expr>),
    /// Binary or logical operator application.
    Binary(Box<Expr>, Box<Expr>),
    /// Ternary conditional.
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    /// Call or `new` with arguments.
    Call {
        /// Callee.
        callee: Box<Expr>,
        /// Arguments.
        args: Vec<Expr>,
    },
    /// Member access; `Some` property means computed (`a[b]`).
    Member {
        /// Receiver.
        object: Box<Expr>,
        /// Computed property expression.
        property: Option<Box<Expr>>,
    },
    /// Array literal.
    Array(Vec<Expr>),
    /// Object literal: property values and computed-key expressions.
    Object(Vec<Expr>),
    /// Function or arrow expression with a block body.
    Function {
        /// Body statements.
        body: Vec<Stmt>,
        /// Span from the expression's opening token to the body's closing
        /// brace.
        span: Span,
    },
    /// Arrow expression with an expression body.
    ArrowValue(Box<Expr>),
    /// Comma sequence.
    Sequence(Vec<Expr>),
    /// A region the parser skipped as opaque (class bodies, arrow params).
    Opaque(Span),
}

impl Expr {
    /// Source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident { span, .. } => *span,
            Expr::Literal(span) => *span,
            Expr::Assign { span, .. } => *span,
            Expr::Update { span, .. } => *span,
            Expr::Unary(arg) => arg.span(),
            Expr::Binary(left, right) => Span::new(left.span().start, right.span().end),
            Expr::Cond(test, _, alt) => Span::new(test.span().start, alt.span().end),
            Expr::Call { callee, args } => {
                let end = args
                    .last()
                    .map(|a| a.span().end)
                    .unwrap_or(callee.span().end);
                Span::new(callee.span().start, end)
            }
            Expr::Member { object, property } => {
                let end = property
                    .as_ref()
                    .map(|p| p.span().end)
                    .unwrap_or(object.span().end);
                Span::new(object.span().start, end)
            }
            Expr::Array(items) | Expr::Object(items) | Expr::Sequence(items) => {
                let start = items.first().map(|e| e.span().start).unwrap_or(0);
                let end = items.last().map(|e| e.span().end).unwrap_or(start);
                Span::new(start, end)
            }
            Expr::Function { span, .. } => *span,
            Expr::ArrowValue(body) => body.span(),
            Expr::Opaque(span) => *span,
        }
    }
}
