// SPDX: CC0-1.0

use crate::{
    eval::{EvalErrTyp, Idents, Program},
    expr::ExprError,
    lex::{LexErrTyp, SubStr, TokTyp},
    parse::ParseErrTyp,
};
use anyhow::Context;
use core::fmt;
use std::{
    io::{self, stdin, BufRead, Write},
    sync::Arc,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    SetExpr,
    SetWin,
    SetAxes2,
    Scenario,
    Points,
    Speed,
    Run,
    Hover,
    PrintProg,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::SetExpr,
            Self::SetWin,
            Self::SetAxes2,
            Self::Scenario,
            Self::Points,
            Self::Speed,
            Self::Run,
            Self::Hover,
            Self::PrintProg,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command and the expression syntax",
            Self::Quit => "quit the shell",
            Self::SetExpr => "set the function f(x) to animate",
            Self::SetWin => "set the x and y ranges of the function chart",
            Self::SetAxes2 => "set or clear the y range of the second chart",
            Self::Scenario => "choose the animation",
            Self::Points => "set x0 and x of the difference quotient",
            Self::Speed => "set the speed of the improper integral (a=-b or a=-b^2)",
            Self::Run => "run the animation and write one svg per layer",
            Self::Hover => "move the pointer to a pixel column once the animation is over",
            Self::PrintProg => "print program compiled from the expression (for debugging)",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::SetExpr => "set",
            Self::SetWin => "window",
            Self::SetAxes2 => "axes2",
            Self::Scenario => "scenario",
            Self::Points => "points",
            Self::Speed => "speed",
            Self::Run => "run",
            Self::Hover => "hover",
            Self::PrintProg => "prog",
        }
    }
}

impl core::str::FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or(())
    }
}

pub const SYNTAX_HELP: &str = "\
expressions are in x, e.g. 'x^2 - 3x + sin(2x)':
  numbers: 2, 0.5, 1e-3
  operators: + - * / ^ and unary minus, '^' is right associative
  implicit multiplication: 2x, 3(x+1), (x-1)(x+1)
  functions: abs sign sqrt cbrt exp ln log10 log2 floor ceil round
             log(x) is ln(x), log(x, base) takes any base
             min(a, b) max(a, b) sin cos tan asin acos atan sinh cosh tanh
  constants: pi tau e";

/// Candidate from `candidates` closest to `text`, if it is similar enough to
/// be worth suggesting.
pub fn most_similar<'a>(
    text: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let text = text.to_ascii_lowercase();
    candidates
        .into_iter()
        .map(|c| {
            (
                strsim::normalized_damerau_levenshtein(&text, &c.to_ascii_lowercase()),
                c,
            )
        })
        .reduce(|acc, elem| if elem.0 > acc.0 { elem } else { acc })
        .filter(|(sim, _)| *sim > 0.3)
        .map(|(_, c)| c)
}

pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<String> {
    fn inner<W: Write>(mut out: W, prompt: impl fmt::Display) -> io::Result<String> {
        write!(out, "{prompt}")?;
        out.flush()?;
        let mut stdin = stdin().lock();
        let mut s = String::new();
        stdin.read_line(&mut s)?;
        Ok(s.trim().to_string())
    }

    let s = inner(out, prompt).context("read from standard input failed")?;
    Ok(s)
}

pub fn read_fromstr<W: Write, T: core::str::FromStr>(
    mut out: W,
    prompt: impl fmt::Display,
    ignore_empty: bool,
) -> anyhow::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    let input = Arc::new(input(&mut out, prompt)?);
    if ignore_empty && input.is_empty() {
        return Ok(Ok(None));
    }
    match input.parse::<T>() {
        Ok(new) => Ok(Ok(Some(new))),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, &SubStr::all(input))?;
            writeln!(out, "parse error: {err}")?;
            Ok(Err(err))
        }
    }
}

pub fn underline<W: Write>(mut out: W, span: &SubStr) -> io::Result<()> {
    writeln!(out, "{}", span.src())?;
    writeln!(
        out,
        "{}{}",
        " ".repeat(span.start()),
        "^".repeat(span.len().max(1))
    )?;
    Ok(())
}

pub fn dump_program<W: Write>(
    mut out: W,
    prog: &Program,
    title: core::fmt::Arguments,
) -> io::Result<()> {
    writeln!(out, "{title}: ")?;
    if prog.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for op in prog.ops() {
        writeln!(out, "  {op}")?;
    }
    Ok(())
}

/// Points at the offending part of `src` and adds a note where one helps.
pub fn report_expr_error<W: Write>(
    mut out: W,
    src: &Arc<String>,
    err: &ExprError,
    idents: &Idents,
) -> io::Result<()> {
    underline(&mut out, &err.loc(src))?;
    writeln!(out, "{err}")?;

    match err {
        ExprError::Parse(err) => match &err.typ {
            ParseErrTyp::LexErr(LexErrTyp::InvalidChar) => writeln!(
                out,
                "note: available tokens are numbers, alphanumeric identifiers, and symbols +-*/^,()"
            )?,
            ParseErrTyp::LexErr(LexErrTyp::Unsupported(typ)) => match typ {
                TokTyp::XGreater | TokTyp::XLess => {
                    writeln!(out, "note: expected an expression but found an inequality")?
                }
                TokTyp::XEqual => writeln!(
                    out,
                    "note: expected an expression but found an equation, enter only the right hand side of y = f(x)"
                )?,
                TokTyp::XPipe => writeln!(
                    out,
                    "note: use the 'abs' function to compute absolute value"
                )?,
                TokTyp::XOpenSquareBracket
                | TokTyp::XCloseSquareBracket
                | TokTyp::XOpenCurly
                | TokTyp::XCloseCurly => writeln!(out, "note: only round parentheses group")?,
                _ => {}
            },
            ParseErrTyp::ParseNum(_) => writeln!(out, "note: parsing as floating point number")?,
            ParseErrTyp::ParenMismatch => {}
        },

        ExprError::Eval(err) => match &err.typ {
            EvalErrTyp::MissingArgs { .. } => {
                writeln!(out, "note: an operator or function is missing an operand")?
            }
            EvalErrTyp::ArgCount { .. } => {
                writeln!(out, r#"note: try "help" to list the functions"#)?
            }
            EvalErrTyp::StackMismatch { .. } => writeln!(
                out,
                "note: exactly 1 final value is expected after evaluation"
            )?,
            EvalErrTyp::UndefinedIdent { text } => {
                let similar = most_similar(text.get(), idents.keys().map(|k| k.get()))
                    .and_then(|name| idents.iter().find(|(k, _)| k.get() == name));
                if let Some((key, ident)) = similar {
                    writeln!(out, "note: {} '{key}' has a similar name", ident.kind())?;
                }
            }
            EvalErrTyp::Empty | EvalErrTyp::NullVar { .. } => {}
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expr::Expression, stdlib};

    #[test]
    fn every_command_parses_from_its_name() {
        for c in Command::exhaustive() {
            assert_eq!(c.name().parse::<Command>(), Ok(*c));
        }
        assert!("plot".parse::<Command>().is_err());
    }

    #[test]
    fn suggests_close_names_only() {
        let names = Command::exhaustive().iter().map(Command::name);
        assert_eq!(most_similar("hlep", names.clone()), Some("help"));
        assert_eq!(most_similar("scenari", names.clone()), Some("scenario"));
        assert_eq!(most_similar("zzzzzzzzzz", names), None);
    }

    #[test]
    fn undefined_identifier_gets_a_hint() {
        let src = "sqrtt(x)";
        let Err(err) = Expression::compile_checked(src) else {
            panic!("'{src}' compiled");
        };
        let mut out = Vec::new();
        report_expr_error(&mut out, &Arc::new(src.to_string()), &err, &stdlib::standard_idents())
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("undefined identifier 'sqrtt'"), "{out}");
        assert!(out.contains("function 'sqrt' has a similar name"), "{out}");
    }
}
