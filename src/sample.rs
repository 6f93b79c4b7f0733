// SPDX: CC0-1.0

//! Sampling strategies: how a chart turns an expression into one point per
//! pixel column.

use crate::{expr::Expression, Number, Point};
use core::{fmt, ops::Range, str::FromStr};
use thiserror::Error;

/// Speed policy of the improper-integral animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Speed {
    /// `a = -b`: the lower bound mirrors the upper one.
    #[default]
    Linear,
    /// `a = -b^2`: the lower bound runs away quadratically, so an infinite
    /// tail fits the visible window.
    Quadratic,
}

impl Speed {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "a=-b",
            Self::Quadratic => "a=-b^2",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown speed '{0}', expected 'a=-b' or 'a=-b^2'")]
pub struct UnknownSpeed(pub String);

impl FromStr for Speed {
    type Err = UnknownSpeed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match s.as_str() {
            "a=-b" | "linear" => Ok(Self::Linear),
            "a=-b^2" | "quadratic" => Ok(Self::Quadratic),
            _ => Err(UnknownSpeed(s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sampling {
    /// `y = f(x)`
    #[default]
    Function,
    /// Forward difference quotient of `f`.
    Derivative,
    /// Left Riemann sum of `f` from the start of the range.
    Integral,
    /// Symmetric accumulation from the middle of the range outward.
    ImproperIntegral(Speed),
}

/// Data-space x of pixel column `px` over `range` split into `width` columns.
#[inline]
pub(crate) fn column_x(px: Number, range: &Range<Number>, width: u32) -> Number {
    px * (range.end - range.start) / Number::from(width) + range.start
}

impl Sampling {
    /// Produces `width + 1` points, one per pixel column.
    pub fn sample(
        &self,
        expr: &Expression,
        range: &Range<Number>,
        width: u32,
    ) -> Vec<Point<Number>> {
        let mut stack = Vec::new();
        let mut f = |x: Number| expr.eval_with(x, &mut stack);
        let x_of = |px: u32| column_x(Number::from(px), range, width);
        // width of one column in data space
        let dx = (range.end - range.start) / Number::from(width);

        match self {
            Self::Function => (0..=width)
                .map(|px| {
                    let x = x_of(px);
                    Point { x, y: f(x) }
                })
                .collect(),

            Self::Derivative => {
                // https://en.wikipedia.org/wiki/Difference_quotient
                let eps = (range.end - range.start) * 1e-10;
                (0..=width)
                    .map(|px| {
                        let x = x_of(px);
                        Point {
                            x,
                            y: (f(x + eps) - f(x)) / eps,
                        }
                    })
                    .collect()
            }

            Self::Integral => {
                let mut area = 0.0;
                (0..=width)
                    .map(|px| {
                        let x = x_of(px);
                        // https://en.wikipedia.org/wiki/Riemann_sum
                        let term = dx * f(x);
                        if term.is_finite() {
                            area += term;
                        }
                        Point { x, y: area }
                    })
                    .collect()
            }

            Self::ImproperIntegral(speed) => {
                let mid = width / 2;
                let mut points: Vec<Point<Number>> = (0..mid)
                    .map(|px| Point {
                        x: x_of(px),
                        y: Number::NAN,
                    })
                    .collect();
                points.reserve(usize::try_from(width - mid + 1).unwrap_or_default());

                let mut area = 0.0;
                for px in mid..=width {
                    let x = x_of(px);
                    let forward = dx * f(x);
                    if forward.is_finite() {
                        area += forward;
                    }

                    let backward = match speed {
                        Speed::Linear => dx * f(-x),
                        Speed::Quadratic => {
                            // https://en.wikipedia.org/wiki/Trapezoidal_rule
                            let next = x_of(px + 1);
                            let (a, b) = (x.powi(2), next.powi(2));
                            (a - b).abs() / 2.0 * (f(-b) + f(-a))
                        }
                    };
                    if backward.is_finite() {
                        area += backward;
                    }

                    points.push(Point { x, y: area });
                }
                points
            }
        }
    }
}
