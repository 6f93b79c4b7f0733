// SPDX: CC0-1.0

//! Compiled single-variable expressions, `y = f(x)`.
//!
//! An [`Expression`] is the only way the rest of the crate evaluates user
//! input. Evaluation has three outcomes: compilation fails ([`ExprError`]),
//! the value is `NaN` (undefined at that `x`), or it is a number which may be
//! infinite.

use crate::{
    eval::{self, EvalErr, Idents, Program},
    lex::{Lexer, SubStr},
    parse::{self, ParseErr},
    stdlib::{self, X},
    Number,
};
use core::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExprError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseErr),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalErr),
}

impl ExprError {
    /// The part of the source the error points at.
    pub fn loc(&self, src: &Arc<String>) -> SubStr {
        match self {
            Self::Parse(err) => err.loc.clone(),
            Self::Eval(err) => err
                .op
                .as_ref()
                .map(|op| op.loc.clone())
                .unwrap_or_else(|| SubStr::end_of(Arc::clone(src))),
        }
    }
}

pub struct Expression {
    src: Arc<String>,
    prog: Program,
    idents: Idents,
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("src", &self.src)
            .field("ops", &self.prog.ops().len())
            .finish()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.src)
    }
}

impl Expression {
    /// Lexes and parses `src` against the standard identifiers.
    ///
    /// This only checks the syntax; use [`Expression::compile_checked`] to
    /// also reject programs that can never produce a value.
    pub fn compile(src: impl Into<String>) -> Result<Self, ExprError> {
        let src = Arc::new(src.into().trim().to_string());
        let idents = stdlib::standard_idents();
        let prog = parse::parse(Lexer::new(&src), &idents)?;
        Ok(Self { src, prog, idents })
    }

    /// Compiles `src` and runs a trial evaluation at `x = 0`.
    ///
    /// Evaluation errors do not depend on the value of `x`, so one trial is
    /// enough to tell a well-formed program from a broken one.
    pub fn compile_checked(src: impl Into<String>) -> Result<Self, ExprError> {
        let expr = Self::compile(src)?;
        expr.try_eval(0.0)?;
        Ok(expr)
    }

    pub fn src(&self) -> &Arc<String> {
        &self.src
    }

    pub fn program(&self) -> &Program {
        &self.prog
    }

    pub fn idents(&self) -> &Idents {
        &self.idents
    }

    pub fn try_eval(&self, x: Number) -> Result<Number, EvalErr> {
        self.try_eval_with(x, &mut Vec::new())
    }

    /// Like [`Expression::try_eval`] but reuses `stack` between calls.
    pub fn try_eval_with(&self, x: Number, stack: &mut Vec<Number>) -> Result<Number, EvalErr> {
        eval::eval(&self.prog, &self.idents, &[(X, x)], stack)
    }

    /// `f(x)`, with evaluation errors folded into `NaN`.
    pub fn eval(&self, x: Number) -> Number {
        self.try_eval(x).unwrap_or(Number::NAN)
    }

    pub fn eval_with(&self, x: Number, stack: &mut Vec<Number>) -> Number {
        self.try_eval_with(x, stack).unwrap_or(Number::NAN)
    }
}
