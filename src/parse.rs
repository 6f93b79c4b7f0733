// SPDX: CC0-1.0

// implementation of shunting yard algorithm by dijkstra (see https://en.wikipedia.org/wiki/Shunting_yard_algorithm)

use crate::{
    eval::{Associativity, Ident, Idents, Operation, OperationTyp, OperatorTyp, Program},
    lex::{LexErr, LexErrTyp, Lexer, SubStr, Tok, TokTyp},
    Number,
};
use core::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseErrTyp {
    #[error("{0}")]
    LexErr(LexErrTyp),
    #[error("invalid number: {0}")]
    ParseNum(ParseFloatError),
    #[error("mismatched parentheses")]
    ParenMismatch,
}

#[derive(Debug, Error)]
#[error("{typ}")]
pub struct ParseErr {
    pub typ: ParseErrTyp,
    pub loc: SubStr,
}

impl From<LexErr> for ParseErr {
    fn from(err: LexErr) -> Self {
        Self {
            typ: ParseErrTyp::LexErr(err.typ),
            loc: err.loc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShuntOpTyp {
    Operator(OperatorTyp),
    /// `args` is known once the argument list is closed.
    Fun { args: Option<usize> },
    OpenParen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ShuntOp {
    typ: ShuntOpTyp,
    loc: SubStr,
}

impl ShuntOp {
    // functions applied without parentheses bind tighter than any operator
    const FUN_PRECEDENCE: i8 = 6;

    fn precedence(&self) -> Option<i8> {
        match self.typ {
            ShuntOpTyp::Operator(op) => Some(op.precedence()),
            ShuntOpTyp::Fun { .. } => Some(Self::FUN_PRECEDENCE),
            ShuntOpTyp::OpenParen => None,
        }
    }

    fn into_output(self) -> Option<Operation> {
        let typ = match self.typ {
            ShuntOpTyp::Operator(typ) => OperationTyp::Operator(typ),
            ShuntOpTyp::Fun { args: None } => OperationTyp::Ident,
            ShuntOpTyp::Fun { args: Some(args) } => OperationTyp::Call { args },
            ShuntOpTyp::OpenParen => return None,
        };
        Some(Operation { typ, loc: self.loc })
    }
}

/// What the previous token left the parser expecting. Used to detect
/// implicit multiplication such as `2x` or `(x+1)(x-1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Last {
    Start,
    Operand,
    Fun,
    OpenParen,
    Other,
}

/// Moves operators from `ops` to `out` while `pred` holds for the top of the
/// operator stack.
fn pop_while<P>(ops: &mut Vec<ShuntOp>, out: &mut Vec<Operation>, pred: P)
where
    P: Fn(&ShuntOp) -> bool,
{
    while ops.last().is_some_and(&pred) {
        if let Some(op) = ops.pop().and_then(ShuntOp::into_output) {
            out.push(op);
        }
    }
}

fn push_operator(ops: &mut Vec<ShuntOp>, out: &mut Vec<Operation>, o1: OperatorTyp, loc: SubStr) {
    if !o1.is_prefix() {
        pop_while(ops, out, |o2| match o2.precedence() {
            Some(p2) => {
                p2 > o1.precedence()
                    || (p2 == o1.precedence() && o1.associativity() == Associativity::Left)
            }
            None => false,
        });
    }
    ops.push(ShuntOp {
        typ: ShuntOpTyp::Operator(o1),
        loc,
    });
}

fn starts_operand(tok: &Tok) -> bool {
    matches!(
        tok.typ,
        TokTyp::Number | TokTyp::Ident | TokTyp::OpenParen
    )
}

pub fn parse(lex: Lexer<'_>, idents: &Idents) -> Result<Program, ParseErr> {
    let mut out: Vec<Operation> = Vec::new(); // output
    let mut ops: Vec<ShuntOp> = Vec::new(); // operator stack
    let mut last = Last::Start;
    // one entry per open paren, counting commas if it starts an argument list
    let mut parens: Vec<Option<usize>> = Vec::new();

    for tok in lex {
        let tok = tok?;

        if last == Last::Operand && starts_operand(&tok) {
            let loc = SubStr::new(tok.loc.src(), tok.loc.start(), 0);
            push_operator(&mut ops, &mut out, OperatorTyp::Mul, loc);
        }

        last = match tok.typ {
            TokTyp::Number => {
                let num: Number = tok.loc.get().parse().map_err(|err| ParseErr {
                    typ: ParseErrTyp::ParseNum(err),
                    loc: tok.loc.clone(),
                })?;
                out.push(Operation {
                    typ: OperationTyp::Val(num),
                    loc: tok.loc,
                });
                Last::Operand
            }

            TokTyp::Ident => {
                if let Some(Ident::Fun(_)) = idents.get(&tok.loc.clone().into()) {
                    ops.push(ShuntOp {
                        typ: ShuntOpTyp::Fun { args: None },
                        loc: tok.loc,
                    });
                    Last::Fun
                } else {
                    // unknown identifiers are reported when evaluating
                    out.push(Operation {
                        typ: OperationTyp::Ident,
                        loc: tok.loc,
                    });
                    Last::Operand
                }
            }

            TokTyp::Op(o1) => {
                push_operator(&mut ops, &mut out, o1, tok.loc);
                Last::Other
            }

            TokTyp::Comma => {
                pop_while(&mut ops, &mut out, |op| op.typ != ShuntOpTyp::OpenParen);
                if let Some(Some(commas)) = parens.last_mut() {
                    *commas += 1;
                }
                Last::Other
            }

            TokTyp::OpenParen => {
                parens.push((last == Last::Fun).then_some(0));
                ops.push(ShuntOp {
                    typ: ShuntOpTyp::OpenParen,
                    loc: tok.loc,
                });
                Last::OpenParen
            }

            TokTyp::CloseParen => {
                pop_while(&mut ops, &mut out, |op| op.typ != ShuntOpTyp::OpenParen);

                if ops.pop().is_none() {
                    return Err(ParseErr {
                        typ: ParseErrTyp::ParenMismatch,
                        loc: tok.loc,
                    });
                }

                if let Some(Some(commas)) = parens.pop() {
                    let args = if last == Last::OpenParen { 0 } else { commas + 1 };
                    if let Some(ShuntOp {
                        typ: ShuntOpTyp::Fun { args: called },
                        ..
                    }) = ops.last_mut()
                    {
                        *called = Some(args);
                    }
                }

                // handle functions
                pop_while(&mut ops, &mut out, |op| {
                    matches!(op.typ, ShuntOpTyp::Fun { .. })
                });
                Last::Operand
            }

            TokTyp::XGreater
            | TokTyp::XLess
            | TokTyp::XEqual
            | TokTyp::XPipe
            | TokTyp::XOpenSquareBracket
            | TokTyp::XCloseSquareBracket
            | TokTyp::XOpenCurly
            | TokTyp::XCloseCurly => {
                return Err(ParseErr {
                    typ: ParseErrTyp::LexErr(LexErrTyp::Unsupported(tok.typ)),
                    loc: tok.loc,
                })
            }
        };
    }

    while let Some(op) = ops.pop() {
        if op.typ == ShuntOpTyp::OpenParen {
            return Err(ParseErr {
                typ: ParseErrTyp::ParenMismatch,
                loc: op.loc,
            });
        }
        out.extend(op.into_output());
    }

    Ok(Program::new(out))
}
