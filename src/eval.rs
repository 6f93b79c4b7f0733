// SPDX: CC0-1.0

use crate::{lex::SubStr, stdlib, Number};
use core::fmt;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorTyp {
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl OperatorTyp {
    pub const fn precedence(&self) -> i8 {
        match self {
            Self::Add => 2,
            Self::Sub => 2,
            Self::Mul => 3,
            Self::Div => 3,
            Self::Neg => 4,
            Self::Pow => 5,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        use Associativity::{Left, Right};
        match self {
            Self::Neg => Right,
            Self::Add => Left,
            Self::Sub => Left,
            Self::Mul => Left,
            Self::Div => Left,
            Self::Pow => Right,
        }
    }

    pub const fn is_prefix(&self) -> bool {
        matches!(self, Self::Neg)
    }

    pub const fn fun(&self) -> (&'static str, Fun) {
        match self {
            Self::Neg => ("neg", Fun::new(1, stdlib::neg)),
            Self::Add => ("add", Fun::new(2, stdlib::add)),
            Self::Sub => ("sub", Fun::new(2, stdlib::sub)),
            Self::Mul => ("mul", Fun::new(2, stdlib::mul)),
            Self::Div => ("div", Fun::new(2, stdlib::div)),
            Self::Pow => ("pow", Fun::new(2, stdlib::pow)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum OperationTyp {
    Operator(OperatorTyp),
    Val(Number),
    Ident,
    /// Function applied to a parenthesized argument list.
    Call { args: usize },
}

#[derive(Clone, Debug)]
pub struct Operation {
    pub typ: OperationTyp,
    pub loc: SubStr,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.typ {
            OperationTyp::Val(val) => write!(f, "push {val}"),
            OperationTyp::Operator(typ) => write!(f, "call '{}'", typ.fun().0),
            OperationTyp::Ident => write!(f, "call '{}'", self.loc.get()),
            OperationTyp::Call { args } => write!(
                f,
                "call '{}' with {args} argument{s}",
                self.loc.get(),
                s = if args == 1 { "" } else { "s" }
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvalErrTyp {
    #[error("cannot evaluate empty program")]
    Empty,

    #[error(
        "function '{name}' requires {arity} argument{s}, but found {found}",
        s = if *arity == 1 { "" } else { "s" }
    )]
    MissingArgs {
        name: IdentKey,
        arity: usize,
        found: usize,
    },

    #[error(
        "function '{name}' takes {}, but was given {found}",
        arity_text(*min, *max)
    )]
    ArgCount {
        name: IdentKey,
        min: usize,
        max: usize,
        found: usize,
    },

    #[error(
        "expected {expected} operation{s} on the stack but found {found}",
        s = if *expected == 1 { "" } else { "s" }
    )]
    StackMismatch { expected: usize, found: usize },

    #[error("undefined identifier '{text}'")]
    UndefinedIdent { text: SubStr },

    #[error("variable '{text}' is declared but its value is not defined")]
    NullVar { text: SubStr },
}

fn arity_text(min: usize, max: usize) -> String {
    match (min, max) {
        (1, 1) => String::from("1 argument"),
        (min, max) if min == max => format!("{min} arguments"),
        (min, max) => format!("{min} to {max} arguments"),
    }
}

#[derive(Debug, Error)]
#[error("{typ}")]
pub struct EvalErr {
    pub typ: EvalErrTyp,
    pub op: Option<Operation>, // if none, associated with end-of-program checking
}

#[derive(Debug)]
pub struct Fun {
    pub min_arity: usize,
    pub max_arity: usize,
    pub fun: fn(&[Number]) -> Number,
}

impl Fun {
    pub const fn new(arity: usize, fun: fn(&[Number]) -> Number) -> Self {
        Self::with_arity(arity, arity, fun)
    }

    /// Function taking between `min_arity` and `max_arity` arguments.
    pub const fn with_arity(
        min_arity: usize,
        max_arity: usize,
        fun: fn(&[Number]) -> Number,
    ) -> Self {
        Self {
            min_arity,
            max_arity,
            fun,
        }
    }

    pub const fn accepts(&self, args: usize) -> bool {
        self.min_arity <= args && args <= self.max_arity
    }
}

#[derive(Debug)]
pub enum Ident {
    /// Free variable, bound per evaluation.
    Var,
    Const(Number),
    Fun(Fun),
}

impl Ident {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Var => "variable",
            Self::Const(_) => "constant",
            Self::Fun(_) => "function",
        }
    }
}

#[derive(Clone, Debug, Eq)]
pub enum IdentKey {
    Arc(SubStr),
    Static(&'static str),
}

impl PartialEq for IdentKey {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl core::hash::Hash for IdentKey {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.get().hash(state)
    }
}

impl IdentKey {
    pub fn get(&self) -> &str {
        match self {
            Self::Arc(s) => s.get(),
            Self::Static(s) => s,
        }
    }
}

impl fmt::Display for IdentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

impl From<SubStr> for IdentKey {
    fn from(s: SubStr) -> Self {
        Self::Arc(s)
    }
}

impl From<&'static str> for IdentKey {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

pub type Idents = HashMap<IdentKey, Ident>;

/// Values for the free variables of a program, by name.
pub type Bindings<'a> = &'a [(&'a str, Number)];

#[derive(Debug)]
pub struct Program {
    pub(crate) ops: Vec<Operation>,
}

impl Program {
    #[inline]
    pub const fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    #[inline]
    pub fn ops(&self) -> core::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

pub fn eval(
    prog: &Program,
    idents: &Idents,
    vars: Bindings<'_>,
    stack: &mut Vec<Number>,
) -> Result<Number, EvalErr> {
    fn eval_fun(
        stack: &mut Vec<Number>,
        op: &Operation,
        name: impl Into<IdentKey>,
        fun: &Fun,
        args: Option<usize>,
    ) -> Result<Number, EvalErr> {
        // without an argument list, take as few operands as possible
        let arity = args.unwrap_or(fun.min_arity);
        if !fun.accepts(arity) {
            return Err(EvalErr {
                typ: EvalErrTyp::ArgCount {
                    name: name.into(),
                    min: fun.min_arity,
                    max: fun.max_arity,
                    found: arity,
                },
                op: Some(op.clone()),
            });
        }

        let len = stack.len();
        if len < arity {
            return Err(EvalErr {
                typ: EvalErrTyp::MissingArgs {
                    arity,
                    found: len,
                    name: name.into(),
                },
                op: Some(op.clone()),
            });
        }
        // stack: ...a, b, c, d
        //                 ^^^^ args if arity is 2
        let val = (fun.fun)(&stack[len - arity..]);
        stack.truncate(len - arity);
        Ok(val)
    }

    if prog.is_empty() {
        return Err(EvalErr {
            typ: EvalErrTyp::Empty,
            op: None,
        });
    }

    stack.clear();

    for op in prog.ops() {
        let val = match op.typ {
            OperationTyp::Operator(typ) => {
                let (name, fun) = typ.fun();
                eval_fun(stack, op, name, &fun, None)?
            }

            OperationTyp::Val(num) => num,

            OperationTyp::Call { args } => {
                let sym = op.loc.clone();
                match idents.get(&sym.clone().into()) {
                    Some(Ident::Fun(fun)) => eval_fun(stack, op, sym, fun, Some(args))?,
                    _ => {
                        return Err(EvalErr {
                            typ: EvalErrTyp::UndefinedIdent { text: sym },
                            op: Some(op.clone()),
                        });
                    }
                }
            }

            OperationTyp::Ident => {
                let sym = op.loc.clone();
                match idents.get(&sym.clone().into()) {
                    Some(Ident::Var) => vars
                        .iter()
                        .find_map(|(name, val)| (*name == sym.get()).then_some(*val))
                        .ok_or_else(|| EvalErr {
                            typ: EvalErrTyp::NullVar { text: sym.clone() },
                            op: Some(op.clone()),
                        })?,
                    Some(Ident::Const(val)) => *val,
                    Some(Ident::Fun(fun)) => eval_fun(stack, op, sym, fun, None)?,
                    None => {
                        return Err(EvalErr {
                            typ: EvalErrTyp::UndefinedIdent { text: sym },
                            op: Some(op.clone()),
                        });
                    }
                }
            }
        };
        stack.push(val);
    }

    match stack.as_slice() {
        [val] => Ok(*val),
        _ => Err(EvalErr {
            typ: EvalErrTyp::StackMismatch {
                expected: 1,
                found: stack.len(),
            },
            op: None,
        }),
    }
}
