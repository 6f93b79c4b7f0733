// SPDX: CC0-1.0

//! Sampling and coordinate mapping for calculus animations: a function is
//! sampled once per pixel column into a [`chart::Chart`], and scenario
//! controllers animate difference quotients, tangents and areas on top of it.

pub mod anim;
pub mod axis;
pub mod canvas;
pub mod chart;
pub mod config;
pub mod eval;
pub mod expr;
pub mod lex;
pub mod parse;
pub mod render;
pub mod sample;
pub mod scenario;
pub mod shell;
pub mod stdlib;

pub use chart::{Chart, ChartError, Interval, Resolution};
pub use expr::{ExprError, Expression};
pub use sample::{Sampling, Speed};

pub type Number = f64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}
