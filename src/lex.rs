// SPDX: CC0-1.0

use crate::eval::OperatorTyp;
use core::{fmt, iter::Peekable, str::CharIndices};
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubStr {
    // yes, silly, but atomic operations are cheap for this use case
    src: Arc<String>,
    start: usize,
    len: usize,
}

impl SubStr {
    #[inline]
    pub const fn new(src: Arc<String>, start: usize, len: usize) -> Self {
        Self { src, start, len }
    }

    #[inline]
    pub fn all(src: Arc<String>) -> Self {
        let len = src.len();
        Self::new(src, 0, len)
    }

    /// Zero-width span just past the end of the source, used for errors
    /// that belong to the whole expression.
    #[inline]
    pub fn end_of(src: Arc<String>) -> Self {
        let len = src.len();
        Self::new(src, len, 1)
    }

    pub fn src(&self) -> Arc<String> {
        Arc::clone(&self.src)
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self) -> &str {
        let end = (self.start + self.len).min(self.src.len());
        self.src.get(self.start.min(end)..end).unwrap_or_default()
    }

    pub fn shift_right(&mut self, by: usize) {
        self.len += by;
    }
}

impl fmt::Display for SubStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokTyp {
    Ident,
    Number,
    Op(OperatorTyp),
    Comma,
    OpenParen,
    CloseParen,

    // unsupported tokens
    XGreater,
    XLess,
    XEqual,
    XPipe,
    XOpenSquareBracket,
    XCloseSquareBracket,
    XOpenCurly,
    XCloseCurly,
}

impl TokTyp {
    pub const fn is_unsupported(&self) -> bool {
        match self {
            Self::Ident
            | Self::Number
            | Self::Op(_)
            | Self::Comma
            | Self::OpenParen
            | Self::CloseParen => false,

            Self::XGreater
            | Self::XLess
            | Self::XEqual
            | Self::XPipe
            | Self::XOpenSquareBracket
            | Self::XCloseSquareBracket
            | Self::XOpenCurly
            | Self::XCloseCurly => true,
        }
    }

    /// Whether a `-` following this token is a prefix negation rather than
    /// a subtraction.
    const fn expects_operand(prev: Option<Self>) -> bool {
        match prev {
            None => true,
            Some(Self::Op(_) | Self::Comma | Self::OpenParen) => true,
            Some(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tok {
    pub typ: TokTyp,
    pub loc: SubStr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum LexErrTyp {
    #[error("invalid character")]
    InvalidChar,
    #[error("unsupported character")]
    Unsupported(TokTyp),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("{typ}")]
pub struct LexErr {
    pub typ: LexErrTyp,
    pub loc: SubStr,
}

#[derive(Debug)]
pub struct Lexer<'src> {
    src: &'src Arc<String>,
    cur: Peekable<CharIndices<'src>>,
    prev: Option<TokTyp>,
    has_errored: bool, // tells iter to yield None after error
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src Arc<String>) -> Self {
        Self {
            src,
            cur: src.char_indices().peekable(),
            prev: None,
            has_errored: false,
        }
    }

    pub fn trim_whitespace(&mut self) {
        while self.cur.next_if(|(_, chr)| chr.is_whitespace()).is_some() {}
    }

    fn span(&self, start: usize, len: usize) -> SubStr {
        SubStr::new(Arc::clone(self.src), start, len)
    }

    pub fn consume_unambiguous(&mut self) -> Option<Tok> {
        let (idx, chr) = self.cur.peek().copied()?;
        let typ = match chr {
            '+' => TokTyp::Op(OperatorTyp::Add),
            '*' => TokTyp::Op(OperatorTyp::Mul),
            '/' => TokTyp::Op(OperatorTyp::Div),
            '^' => TokTyp::Op(OperatorTyp::Pow),
            '-' if TokTyp::expects_operand(self.prev) => TokTyp::Op(OperatorTyp::Neg),
            '-' => TokTyp::Op(OperatorTyp::Sub),
            ',' => TokTyp::Comma,
            '(' => TokTyp::OpenParen,
            ')' => TokTyp::CloseParen,

            '>' => TokTyp::XGreater,
            '<' => TokTyp::XLess,
            '=' => TokTyp::XEqual,
            '|' => TokTyp::XPipe,
            '[' => TokTyp::XOpenSquareBracket,
            ']' => TokTyp::XCloseSquareBracket,
            '{' => TokTyp::XOpenCurly,
            '}' => TokTyp::XCloseCurly,
            _ => return None,
        };
        self.cur.next();
        Some(Tok {
            typ,
            loc: self.span(idx, chr.len_utf8()),
        })
    }

    /// Consumes the longest run of characters matching `predicate` starting
    /// at `next_idx`. Returns `None` if not even one character matched.
    pub fn consume_by<P>(&mut self, next_idx: usize, typ: TokTyp, predicate: P) -> Option<Tok>
    where
        P: Fn(char) -> bool,
    {
        let mut tok = Tok {
            typ,
            loc: self.span(next_idx, 0),
        };
        while let Some((_, chr)) = self.cur.next_if(|(_, chr)| predicate(*chr)) {
            tok.loc.shift_right(chr.len_utf8());
        }
        if tok.loc.is_empty() {
            None
        } else {
            Some(tok)
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Tok, LexErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_errored {
            return None;
        }

        self.trim_whitespace();

        let (next_idx, next_chr) = self.cur.peek().copied()?;
        let tok = if let Some(tok) = self.consume_unambiguous() {
            Some(tok)
        } else if next_chr.is_ascii_alphabetic() {
            // identifiers may carry digits after the first letter, e.g. log10
            self.consume_by(next_idx, TokTyp::Ident, |chr| chr.is_ascii_alphanumeric())
        } else {
            self.consume_by(next_idx, TokTyp::Number, |chr| {
                chr.is_ascii_digit() || chr == '.'
            })
        };

        let ret = match tok {
            Some(tok) if tok.typ.is_unsupported() => Err(LexErr {
                typ: LexErrTyp::Unsupported(tok.typ),
                loc: tok.loc,
            }),
            Some(tok) => Ok(tok),
            None => Err(LexErr {
                typ: LexErrTyp::InvalidChar,
                loc: self.span(next_idx, next_chr.len_utf8()),
            }),
        };
        match ret {
            Ok(ref tok) => self.prev = Some(tok.typ),
            Err(_) => self.has_errored = true,
        }
        Some(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typs(src: &str) -> Vec<TokTyp> {
        let src = Arc::new(src.to_string());
        Lexer::new(&src)
            .map(|tok| tok.map(|tok| tok.typ))
            .collect::<Result<_, _>>()
            .expect("lexes")
    }

    #[test]
    fn minus_depends_on_context() {
        use OperatorTyp::{Neg, Sub};
        assert_eq!(
            typs("-x-1"),
            [
                TokTyp::Op(Neg),
                TokTyp::Ident,
                TokTyp::Op(Sub),
                TokTyp::Number
            ]
        );
        assert_eq!(
            typs("2*(-x)"),
            [
                TokTyp::Number,
                TokTyp::Op(OperatorTyp::Mul),
                TokTyp::OpenParen,
                TokTyp::Op(Neg),
                TokTyp::Ident,
                TokTyp::CloseParen
            ]
        );
    }

    #[test]
    fn identifiers_keep_trailing_digits() {
        let src = Arc::new(String::from("log10(x)"));
        let first = Lexer::new(&src).next().expect("token").expect("lexes");
        assert_eq!(first.typ, TokTyp::Ident);
        assert_eq!(first.loc.get(), "log10");
    }

    #[test]
    fn stops_after_first_error() {
        let src = Arc::new(String::from("x = 1"));
        let toks: Vec<_> = Lexer::new(&src).collect();
        assert_eq!(toks.len(), 2);
        assert!(matches!(
            toks[1],
            Err(LexErr {
                typ: LexErrTyp::Unsupported(TokTyp::XEqual),
                ..
            })
        ));
    }
}
