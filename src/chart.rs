// SPDX: CC0-1.0

//! The chart model: a function sampled once per pixel column, together with
//! the mapping between data space and pixel space.

use crate::{
    expr::Expression,
    render::Surface,
    sample::{column_x, Sampling},
    Number, Point,
};
use core::{fmt, num::NonZeroU32, ops::Range};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("chart resolution {chart} must be equal to surface resolution {surface}")]
    ResolutionMismatch {
        chart: Resolution,
        surface: Resolution,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl Resolution {
    pub const fn new(width: NonZeroU32, height: NonZeroU32) -> Self {
        Self { width, height }
    }

    /// Returns `None` if either side is zero.
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        Some(Self::new(NonZeroU32::new(width)?, NonZeroU32::new(height)?))
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width.get()
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height.get()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Contiguous piece of the plotted domain, in data space, both ends
/// inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub from: Number,
    pub to: Number,
}

impl Interval {
    pub fn contains(&self, x: Number) -> bool {
        self.from <= x && x <= self.to
    }
}

#[derive(Debug)]
pub struct Chart {
    expr: Arc<Expression>,
    sampling: Sampling,
    resolution: Resolution,
    x_range: Range<Number>,
    y_range: Range<Number>,
    y_extent: Range<Number>,
    points: Vec<Point<Number>>,
    domain: Vec<Interval>,
    is_limited: bool,
}

impl Chart {
    /// Samples `expr` over `x_range` with the given strategy.
    ///
    /// Without an explicit `y_range` the vertical window is fitted to the
    /// finite samples, padded by half their span (or by 0.5 if the span is
    /// zero). Callers are expected to pass `x_range.start < x_range.end`.
    pub fn new(
        expr: Arc<Expression>,
        resolution: Resolution,
        x_range: Range<Number>,
        y_range: Option<Range<Number>>,
        sampling: Sampling,
    ) -> Self {
        let points = sampling.sample(&expr, &x_range, resolution.width());
        let is_limited = points.iter().all(|p| p.y.is_nan() || p.y.is_finite());
        let domain = domain_of(&points);
        let y_extent = extent_of(&points);
        let y_range = y_range.unwrap_or_else(|| {
            let span = y_extent.end - y_extent.start;
            let padding = (if span > 0.0 { span } else { 1.0 }) / 2.0;
            (y_extent.start - padding)..(y_extent.end + padding)
        });

        debug!(
            expr = %expr,
            ?sampling,
            %resolution,
            samples = points.len(),
            is_limited,
            domain_pieces = domain.len(),
            "sampled chart"
        );

        Self {
            expr,
            sampling,
            resolution,
            x_range,
            y_range,
            y_extent,
            points,
            domain,
            is_limited,
        }
    }

    pub fn expression(&self) -> &Arc<Expression> {
        &self.expr
    }

    pub const fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn x_range(&self) -> Range<Number> {
        self.x_range.clone()
    }

    pub fn y_range(&self) -> Range<Number> {
        self.y_range.clone()
    }

    /// Smallest and largest finite sample.
    pub fn y_extent(&self) -> Range<Number> {
        self.y_extent.clone()
    }

    pub fn x_interval(&self) -> Number {
        self.x_range.end - self.x_range.start
    }

    pub fn y_interval(&self) -> Number {
        self.y_range.end - self.y_range.start
    }

    pub fn points(&self) -> &[Point<Number>] {
        &self.points
    }

    pub fn domain(&self) -> &[Interval] {
        &self.domain
    }

    /// No sample is infinite.
    pub const fn is_limited(&self) -> bool {
        self.is_limited
    }

    pub fn point_at_px(&self, px: i64) -> Option<Point<Number>> {
        usize::try_from(px)
            .ok()
            .and_then(|idx| self.points.get(idx))
            .copied()
    }

    pub fn x_to_px(&self, x: Number) -> Number {
        (x - self.x_range.start) / self.x_interval() * Number::from(self.resolution.width())
    }

    pub fn x_from_px(&self, x_px: Number) -> Number {
        column_x(x_px, &self.x_range, self.resolution.width())
    }

    /// Pixel rows grow downwards, so larger `y` maps to smaller rows.
    pub fn y_to_px(&self, y: Number) -> Number {
        (self.y_range.end - y) / self.y_interval() * Number::from(self.resolution.height())
    }

    pub fn y_from_px(&self, y_px: Number) -> Number {
        self.y_range.end - y_px * self.y_interval() / Number::from(self.resolution.height())
    }

    /// Pixel column of `x = 0`, if it lies strictly inside the x range.
    pub fn x0_px(&self) -> Option<Number> {
        (self.x_range.start < 0.0 && self.x_range.end > 0.0).then(|| self.x_to_px(0.0))
    }

    /// Pixel row of `y = 0`, if it lies strictly inside the y range.
    pub fn y0_px(&self) -> Option<Number> {
        (self.y_range.start < 0.0 && self.y_range.end > 0.0).then(|| self.y_to_px(0.0))
    }

    pub fn check_surface<S: Surface + ?Sized>(&self, surface: &S) -> Result<(), ChartError> {
        let surface = surface.resolution();
        if surface == self.resolution {
            Ok(())
        } else {
            Err(ChartError::ResolutionMismatch {
                chart: self.resolution,
                surface,
            })
        }
    }
}

/// Runs of finite samples. Any non-finite sample closes the current run.
fn domain_of(points: &[Point<Number>]) -> Vec<Interval> {
    let mut domain: Vec<Interval> = Vec::new();
    let mut open = false;
    for p in points {
        if !p.y.is_finite() {
            open = false;
            continue;
        }
        match domain.last_mut() {
            Some(last) if open => last.to = p.x,
            _ => domain.push(Interval { from: p.x, to: p.x }),
        }
        open = true;
    }
    domain
}

fn extent_of(points: &[Point<Number>]) -> Range<Number> {
    let (min, max) = points
        .iter()
        .map(|p| p.y)
        .filter(|y| y.is_finite())
        .fold((Number::INFINITY, Number::NEG_INFINITY), |(min, max), y| {
            (min.min(y), max.max(y))
        });
    if min <= max {
        min..max
    } else {
        // nothing finite to fit: behave like a constant zero function
        0.0..0.0
    }
}
