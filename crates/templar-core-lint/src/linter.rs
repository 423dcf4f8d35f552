//! Best-effort hybrid linter.
//!
//! The linter understands that template-dialect sigils can be embedded in
//! otherwise ordinary script: any text containing one of the marker sigils
//! is skipped entirely rather than risk flagging valid template syntax as
//! broken (false negatives are preferred over false positives). Parse
//! failures never propagate; they degrade to a single one-character
//! diagnostic at the failure position.

use regex::Regex;
use templar_core::processing::{DocumentProcessor, ProcessingEdit};
use templar_core::{Diagnostic, Dialect, EditorSession};

use crate::ast::{BindingKind, Expr, Program, Stmt};
use crate::parser::{ParseMode, parse};

use std::collections::HashSet;

/// Callback mirroring each pass's diagnostics outside the editor.
pub type DiagnosticsObserver = Box<dyn FnMut(&[Diagnostic]) + Send>;

/// Dialect-aware const-reassignment linter.
pub struct HybridLinter {
    dialect: Dialect,
    script_block: Regex,
    observer: Option<DiagnosticsObserver>,
}

impl HybridLinter {
    /// Create a linter for one dialect.
    pub fn new(dialect: Dialect) -> Result<Self, regex::Error> {
        Ok(Self {
            dialect,
            // First opening/closing script tag pair; inner content may span
            // lines.
            script_block: Regex::new(r"(?s)<script[^>]*>(.*?)</script>")?,
            observer: None,
        })
    }

    /// Attach an observer invoked exactly once per lint pass with the full
    /// diagnostics list, even when the pass exits early with no findings.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&[Diagnostic]) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Run one lint pass over the full document text.
    pub fn lint(&mut self, text: &str) -> Vec<Diagnostic> {
        let diagnostics = self.run(text);
        if let Some(observer) = &mut self.observer {
            observer(&diagnostics);
        }
        diagnostics
    }

    fn run(&self, text: &str) -> Vec<Diagnostic> {
        // Unsupported dialects are a deliberate no-op, not an error.
        if !self.dialect.lintable() {
            return Vec::new();
        }

        let (code, base_offset) = if self.dialect == Dialect::MarkupWithScript {
            let inner = self
                .script_block
                .captures(text)
                .and_then(|caps| caps.get(1));
            match inner {
                Some(m) => (m.as_str(), text[..m.start()].chars().count()),
                None => return Vec::new(),
            }
        } else {
            (text, 0)
        };

        // Template-dialect sigils mean the general-purpose grammar cannot
        // safely analyze this text.
        if code.contains(['@', '#', '%']) {
            return Vec::new();
        }

        let mode = if self.dialect == Dialect::PlainScript {
            ParseMode::Script
        } else {
            ParseMode::Module
        };

        match parse(code, mode) {
            Ok(program) => check_const_reassignments(&program, base_offset),
            Err(err) => {
                let pos = base_offset + err.pos;
                vec![Diagnostic::error(pos, pos + 1, err.message)]
            }
        }
    }
}

impl DocumentProcessor for HybridLinter {
    type Error = std::convert::Infallible;

    fn process(&mut self, session: &EditorSession) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let diagnostics = self.lint(&session.document().get_text());
        Ok(vec![ProcessingEdit::ReplaceDiagnostics { diagnostics }])
    }
}

/// Flag every assignment or update targeting a const-bound identifier.
///
/// Two full-tree walks: the first collects every identifier declared with
/// non-reassignable binding semantics, the second flags offending
/// assignments and updates. The binding set is scope-blind on purpose: the
/// rule matches the original editor's behavior, and scope tracking belongs
/// to a real language server, not a best-effort in-editor lint.
fn check_const_reassignments(program: &Program, base_offset: usize) -> Vec<Diagnostic> {
    let mut consts = HashSet::new();
    for stmt in &program.body {
        collect_stmt(stmt, &mut consts);
    }

    let mut diagnostics = Vec::new();
    for stmt in &program.body {
        check_stmt(stmt, &consts, base_offset, &mut diagnostics);
    }
    diagnostics
}

fn collect_stmt(stmt: &Stmt, consts: &mut HashSet<String>) {
    match stmt {
        Stmt::VarDecl { kind, decls, .. } => {
            for decl in decls {
                if *kind == BindingKind::Const {
                    if let Some(name) = &decl.name {
                        consts.insert(name.clone());
                    }
                }
                if let Some(init) = &decl.init {
                    collect_expr(init, consts);
                }
            }
        }
        Stmt::Expr(expr) | Stmt::Throw(expr) => collect_expr(expr, consts),
        Stmt::Block(body) | Stmt::Function { body, .. } => {
            for stmt in body {
                collect_stmt(stmt, consts);
            }
        }
        Stmt::If { test, cons, alt } => {
            collect_expr(test, consts);
            collect_stmt(cons, consts);
            if let Some(alt) = alt {
                collect_stmt(alt, consts);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                collect_stmt(init, consts);
            }
            if let Some(test) = test {
                collect_expr(test, consts);
            }
            if let Some(update) = update {
                collect_expr(update, consts);
            }
            collect_stmt(body, consts);
        }
        Stmt::ForEach { left, right, body } => {
            collect_stmt(left, consts);
            collect_expr(right, consts);
            collect_stmt(body, consts);
        }
        Stmt::While { test, body } => {
            collect_expr(test, consts);
            collect_stmt(body, consts);
        }
        Stmt::DoWhile { body, test } => {
            collect_stmt(body, consts);
            collect_expr(test, consts);
        }
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                collect_expr(arg, consts);
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            for stmt in block {
                collect_stmt(stmt, consts);
            }
            for body in [handler, finalizer].into_iter().flatten() {
                for stmt in body {
                    collect_stmt(stmt, consts);
                }
            }
        }
        Stmt::Switch { disc, cases } => {
            collect_expr(disc, consts);
            for (test, body) in cases {
                if let Some(test) = test {
                    collect_expr(test, consts);
                }
                for stmt in body {
                    collect_stmt(stmt, consts);
                }
            }
        }
        Stmt::Export { decl, value } => {
            if let Some(decl) = decl {
                collect_stmt(decl, consts);
            }
            if let Some(value) = value {
                collect_expr(value, consts);
            }
        }
        Stmt::Class | Stmt::Import | Stmt::Break | Stmt::Continue | Stmt::Empty => {}
    }
}

fn collect_expr(expr: &Expr, consts: &mut HashSet<String>) {
    let (exprs, stmts) = children(expr);
    for child in exprs {
        collect_expr(child, consts);
    }
    for stmt in stmts {
        collect_stmt(stmt, consts);
    }
}

fn check_stmt(
    stmt: &Stmt,
    consts: &HashSet<String>,
    base: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match stmt {
        Stmt::VarDecl { decls, .. } => {
            for decl in decls {
                if let Some(init) = &decl.init {
                    check_expr(init, consts, base, diagnostics);
                }
            }
        }
        Stmt::Expr(expr) | Stmt::Throw(expr) => check_expr(expr, consts, base, diagnostics),
        Stmt::Block(body) | Stmt::Function { body, .. } => {
            for stmt in body {
                check_stmt(stmt, consts, base, diagnostics);
            }
        }
        Stmt::If { test, cons, alt } => {
            check_expr(test, consts, base, diagnostics);
            check_stmt(cons, consts, base, diagnostics);
            if let Some(alt) = alt {
                check_stmt(alt, consts, base, diagnostics);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                check_stmt(init, consts, base, diagnostics);
            }
            if let Some(test) = test {
                check_expr(test, consts, base, diagnostics);
            }
            if let Some(update) = update {
                check_expr(update, consts, base, diagnostics);
            }
            check_stmt(body, consts, base, diagnostics);
        }
        Stmt::ForEach { left, right, body } => {
            check_stmt(left, consts, base, diagnostics);
            check_expr(right, consts, base, diagnostics);
            check_stmt(body, consts, base, diagnostics);
        }
        Stmt::While { test, body } => {
            check_expr(test, consts, base, diagnostics);
            check_stmt(body, consts, base, diagnostics);
        }
        Stmt::DoWhile { body, test } => {
            check_stmt(body, consts, base, diagnostics);
            check_expr(test, consts, base, diagnostics);
        }
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                check_expr(arg, consts, base, diagnostics);
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
        } => {
            for stmt in block {
                check_stmt(stmt, consts, base, diagnostics);
            }
            for body in [handler, finalizer].into_iter().flatten() {
                for stmt in body {
                    check_stmt(stmt, consts, base, diagnostics);
                }
            }
        }
        Stmt::Switch { disc, cases } => {
            check_expr(disc, consts, base, diagnostics);
            for (test, body) in cases {
                if let Some(test) = test {
                    check_expr(test, consts, base, diagnostics);
                }
                for stmt in body {
                    check_stmt(stmt, consts, base, diagnostics);
                }
            }
        }
        Stmt::Export { decl, value } => {
            if let Some(decl) = decl {
                check_stmt(decl, consts, base, diagnostics);
            }
            if let Some(value) = value {
                check_expr(value, consts, base, diagnostics);
            }
        }
        Stmt::Class | Stmt::Import | Stmt::Break | Stmt::Continue | Stmt::Empty => {}
    }
}

fn check_expr(
    expr: &Expr,
    consts: &HashSet<String>,
    base: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match expr {
        Expr::Assign { target, .. } => {
            if let Expr::Ident { name, span } = target.as_ref() {
                if consts.contains(name) {
                    diagnostics.push(Diagnostic::error(
                        base + span.start,
                        base + span.end,
                        format!("Cannot assign to const variable '{}'", name),
                    ));
                }
            }
        }
        Expr::Update { arg, span } => {
            if let Expr::Ident { name, .. } = arg.as_ref() {
                if consts.contains(name) {
                    diagnostics.push(Diagnostic::error(
                        base + span.start,
                        base + span.end,
                        format!("Cannot update const variable '{}'", name),
                    ));
                }
            }
        }
        _ => {}
    }
    let (exprs, stmts) = children(expr);
    for child in exprs {
        check_expr(child, consts, base, diagnostics);
    }
    for stmt in stmts {
        check_stmt(stmt, consts, base, diagnostics);
    }
}

/// Direct child expressions and statements of an expression.
fn children(expr: &Expr) -> (Vec<&Expr>, Vec<&Stmt>) {
    match expr {
        Expr::Ident { .. } | Expr::Literal(_) | Expr::Opaque(_) => (Vec::new(), Vec::new()),
        Expr::Assign { target, value, .. } => (vec![target.as_ref(), value.as_ref()], Vec::new()),
        Expr::Update { arg, .. } | Expr::Unary(arg) | Expr::ArrowValue(arg) => {
            (vec![arg.as_ref()], Vec::new())
        }
        Expr::Binary(left, right) => (vec![left.as_ref(), right.as_ref()], Vec::new()),
        Expr::Cond(test, cons, alt) => {
            (vec![test.as_ref(), cons.as_ref(), alt.as_ref()], Vec::new())
        }
        Expr::Call { callee, args } => {
            let mut exprs: Vec<&Expr> = vec![callee.as_ref()];
            exprs.extend(args.iter());
            (exprs, Vec::new())
        }
        Expr::Member { object, property } => {
            let mut exprs: Vec<&Expr> = vec![object.as_ref()];
            if let Some(property) = property {
                exprs.push(property.as_ref());
            }
            (exprs, Vec::new())
        }
        Expr::Array(items) | Expr::Object(items) | Expr::Sequence(items) => {
            (items.iter().collect(), Vec::new())
        }
        Expr::Function { body, .. } => (Vec::new(), body.iter().collect()),
    }
}
