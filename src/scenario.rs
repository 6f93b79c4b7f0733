// SPDX: CC0-1.0

//! Scenario controllers: validate the inputs of one of the animations, build
//! its charts, draw the static layers and then one frame per tick.

use crate::{
    anim::{DoubleBuffer, Phase, Ticker, TimerHandle},
    chart::{Chart, ChartError},
    config::{self, Style},
    expr::{ExprError, Expression},
    render::{self, Color, Surface},
    sample::{Sampling, Speed},
    Number, Point,
};
use core::{fmt, ops::Range, time::Duration};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const UNDEFINED: Point<Number> = Point {
    x: Number::NAN,
    y: Number::NAN,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    IncrementalRatio,
    Derivative,
    Sign,
    Integral,
    ImproperIntegral,
}

impl ScenarioKind {
    pub const fn exhaustive() -> &'static [ScenarioKind] {
        &[
            Self::IncrementalRatio,
            Self::Derivative,
            Self::Sign,
            Self::Integral,
            Self::ImproperIntegral,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::IncrementalRatio => "ratio",
            Self::Derivative => "derivative",
            Self::Sign => "sign",
            Self::Integral => "integral",
            Self::ImproperIntegral => "improper",
        }
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::IncrementalRatio => {
                "secant through x0 and x while x slides towards x0 (difference quotient)"
            }
            Self::Derivative => "tangent sliding along f while f' is traced",
            Self::Sign => "tangent colored by the sign of f', f' traced in the same colors",
            Self::Integral => "area under f accumulated left to right, integral traced",
            Self::ImproperIntegral => {
                "area under f accumulated outward from the middle of a symmetric range"
            }
        }
    }

    pub const fn tick_period(&self) -> Duration {
        match self {
            Self::Sign => config::SLOW_TICK_PERIOD,
            _ => config::TICK_PERIOD,
        }
    }

    /// Whether hovering or clicking redraws the overlay once the animation
    /// is over.
    pub const fn is_interactive(&self) -> bool {
        matches!(
            self,
            Self::IncrementalRatio | Self::Derivative | Self::Sign
        )
    }

    /// Integrals of unbounded functions are refused.
    pub const fn needs_limited(&self) -> bool {
        matches!(self, Self::Integral | Self::ImproperIntegral)
    }

    pub const fn derived_sampling(&self, speed: Speed) -> Option<Sampling> {
        match self {
            Self::IncrementalRatio => None,
            Self::Derivative | Self::Sign => Some(Sampling::Derivative),
            Self::Integral => Some(Sampling::Integral),
            Self::ImproperIntegral => Some(Sampling::ImproperIntegral(speed)),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for ScenarioKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .find(|k| k.name() == s)
            .copied()
            .ok_or(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Inputs {
    pub expr: String,
    pub x_min: Number,
    pub x_max: Number,
    pub y_min: Number,
    pub y_max: Number,
    /// Manual y range of the second chart; fitted to the data when `None`.
    pub y2: Option<Range<Number>>,
    /// `x0` of the difference quotient.
    pub x_fixed: Number,
    /// Starting `x` of the difference quotient.
    pub x_moving: Number,
    pub speed: Speed,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            expr: String::from("x^2"),
            x_min: -5.0,
            x_max: 5.0,
            y_min: -5.0,
            y_max: 5.0,
            y2: None,
            x_fixed: 1.0,
            x_moving: 4.0,
            speed: Speed::Linear,
        }
    }
}

impl Inputs {
    pub fn x_range(&self) -> Range<Number> {
        self.x_min..self.x_max
    }

    pub fn y_range(&self) -> Range<Number> {
        self.y_min..self.y_max
    }

    pub fn y2_range(&self) -> Option<Range<Number>> {
        self.y2
            .clone()
            .filter(|r| r.start.is_finite() && r.end.is_finite() && r.start < r.end)
    }
}

#[derive(Debug, Error)]
pub enum Rejection {
    #[error("X/Y minimum and/or maximum exceed the -1000/+1000 limits")]
    MinMax,
    #[error("Xmin and Xmax differ in absolute value: the X range must be symmetric")]
    XRangeNotSymmetric,
    #[error("X minimum and maximum are wrong")]
    Axes,
    #[error("x0 and/or x are outside the Xmin-Xmax range")]
    FixedMovingOutOfRange,
    #[error("the function is syntactically incorrect, type 'help' to see the supported syntax")]
    Function(#[source] ExprError),
    #[error("the function is not limited")]
    Unlimited,
}

impl Rejection {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MinMax => "min_max",
            Self::XRangeNotSymmetric => "x-range-not-symmetric",
            Self::Axes => "axes",
            Self::FixedMovingOutOfRange => "xfis_xmob",
            Self::Function(_) => "function",
            Self::Unlimited => "unlimited",
        }
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Checks `inputs` for `kind` and compiles the expression.
///
/// The checks run in a fixed order and the first failure is reported.
pub fn validate(kind: ScenarioKind, inputs: &Inputs) -> Result<Arc<Expression>, Rejection> {
    let limits = -config::INPUT_LIMIT..=config::INPUT_LIMIT;
    if [inputs.x_min, inputs.x_max, inputs.y_min, inputs.y_max]
        .iter()
        .any(|v| !limits.contains(v))
    {
        return Err(Rejection::MinMax);
    }

    if kind == ScenarioKind::ImproperIntegral && inputs.x_max.abs() != inputs.x_min.abs() {
        return Err(Rejection::XRangeNotSymmetric);
    }

    if inputs.x_max - inputs.x_min <= 0.0 {
        return Err(Rejection::Axes);
    }

    let x_range = inputs.x_min..=inputs.x_max;
    if kind == ScenarioKind::IncrementalRatio
        && !(x_range.contains(&inputs.x_fixed) && x_range.contains(&inputs.x_moving))
    {
        return Err(Rejection::FixedMovingOutOfRange);
    }

    Expression::compile_checked(inputs.expr.as_str())
        .map(Arc::new)
        .map_err(Rejection::Function)
}

#[derive(Debug)]
pub struct Layers<S> {
    /// Axes and graph of `f`.
    pub fx: S,
    pub fx_overlay: DoubleBuffer<S>,
    /// Axes and trace of the derived chart.
    pub fx2: S,
    pub fx2_overlay: S,
}

impl<S: Surface> Layers<S> {
    pub fn with(mut make: impl FnMut() -> S) -> Self {
        Self {
            fx: make(),
            fx_overlay: DoubleBuffer::new(make(), make()),
            fx2: make(),
            fx2_overlay: make(),
        }
    }

    pub fn clear(&mut self) {
        self.fx.clear();
        self.fx_overlay.iter_mut().for_each(|s| s.clear());
        self.fx2.clear();
        self.fx2_overlay.clear();
    }

    pub fn visible(&self) -> [(&'static str, &S); 4] {
        [
            ("fx", &self.fx),
            ("fx-overlay", self.fx_overlay.front()),
            ("fx2", &self.fx2),
            ("fx2-overlay", &self.fx2_overlay),
        ]
    }
}

/// Pixel columns of the first and last sample of the domain.
fn domain_px(chart: &Chart) -> Option<(i64, i64)> {
    let first = chart.domain().first()?;
    let last = chart.domain().last()?;
    Some((
        chart.x_to_px(first.from).round() as i64,
        chart.x_to_px(last.to).round() as i64,
    ))
}

fn sign_color(slope: Number, style: &Style) -> Color {
    if slope >= 0.0 {
        style.positive_color
    } else {
        style.negative_color
    }
}

#[derive(Debug)]
pub struct AnimationSession {
    kind: ScenarioKind,
    fx: Chart,
    fx2: Option<Chart>,
    x_fixed: Number,
    x_moving: Number,
    speed: Speed,
    frame: u32,
    timer: TimerHandle,
    phase: Phase,
}

impl AnimationSession {
    pub const fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn fx(&self) -> &Chart {
        &self.fx
    }

    pub fn fx2(&self) -> Option<&Chart> {
        self.fx2.as_ref()
    }

    pub const fn frame(&self) -> u32 {
        self.frame
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn timer(&self) -> TimerHandle {
        self.timer
    }

    /// Draws frame `self.frame`. Returns `false` without drawing once the
    /// animation is over.
    fn draw_frame<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        style: &Style,
    ) -> Result<bool, ChartError> {
        match self.kind {
            ScenarioKind::IncrementalRatio => self.ratio_frame(layers, style),
            ScenarioKind::Derivative => self.tangent_frame(layers, style, false),
            ScenarioKind::Sign => self.tangent_frame(layers, style, true),
            ScenarioKind::Integral => self.integral_frame(layers, style),
            ScenarioKind::ImproperIntegral => self.improper_frame(layers, style),
        }
    }

    /// Redraws the overlay for the pointer at column `x_px`. Returns whether
    /// anything was drawn.
    fn draw_interaction<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        style: &Style,
        x_px: Number,
    ) -> Result<bool, ChartError> {
        match self.kind {
            ScenarioKind::IncrementalRatio => {
                let x_moving = self.fx.x_from_px(x_px);
                let interval = (self.x_fixed - x_moving).abs();
                let color = Color::progress(1.0 - interval / (self.fx.x_interval() / 2.0));
                let surface = layers.fx_overlay.back_mut();
                surface.clear();
                self.draw_secant(surface, x_moving, color, style)?;
                layers.fx_overlay.swap();
                Ok(true)
            }
            ScenarioKind::Derivative | ScenarioKind::Sign => {
                let col = x_px.round() as i64;
                let Some((p, d)) = self.tangent_at(col) else {
                    return Ok(false);
                };
                let color = if self.kind == ScenarioKind::Sign {
                    sign_color(d.y, style)
                } else {
                    Color::progress(x_px / Number::from(self.fx.resolution().width()))
                };
                self.draw_tangent_overlay(layers, p, d.y, color, style)?;

                let Some(fx2) = self.fx2.as_ref() else {
                    return Ok(true);
                };
                layers.fx2_overlay.clear();
                render::draw_point(
                    &mut layers.fx2_overlay,
                    fx2,
                    d,
                    color,
                    style.large_point_radius,
                )?;
                Ok(true)
            }
            ScenarioKind::Integral | ScenarioKind::ImproperIntegral => Ok(false),
        }
    }

    fn draw_secant<S: Surface>(
        &self,
        surface: &mut S,
        x_moving: Number,
        color: Color,
        style: &Style,
    ) -> Result<(), ChartError> {
        let expr = self.fx.expression();
        let fixed = Point {
            x: self.x_fixed,
            y: expr.eval(self.x_fixed),
        };
        let moving = Point {
            x: x_moving,
            y: expr.eval(x_moving),
        };
        render::draw_secant(surface, &self.fx, fixed, moving, color, style.line_thickness)?;
        render::draw_point(surface, &self.fx, moving, style.fx_color, style.point_radius)?;
        render::draw_point(surface, &self.fx, fixed, style.fx_color, style.point_radius)
    }

    fn ratio_frame<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        style: &Style,
    ) -> Result<bool, ChartError> {
        // pixels per unit of x
        let factor = Number::from(self.fx.resolution().width()) / self.fx.x_interval();
        let frame = Number::from(self.frame);
        if frame >= (self.x_fixed - self.x_moving).abs() * factor {
            return Ok(false);
        }

        let shift = frame / factor;
        let x_moving = if self.x_fixed < self.x_moving {
            self.x_moving - shift
        } else {
            self.x_moving + shift
        };
        let color = Color::progress(frame / ((self.x_fixed - x_moving).abs() * factor));

        let surface = layers.fx_overlay.back_mut();
        surface.clear();
        self.draw_secant(surface, x_moving, color, style)?;
        layers.fx_overlay.swap();
        Ok(true)
    }

    fn tangent_at(&self, col: i64) -> Option<(Point<Number>, Point<Number>)> {
        let p = self.fx.point_at_px(col)?;
        let d = self.fx2.as_ref()?.point_at_px(col)?;
        Some((p, d))
    }

    fn draw_tangent_overlay<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        p: Point<Number>,
        slope: Number,
        color: Color,
        style: &Style,
    ) -> Result<(), ChartError> {
        let surface = layers.fx_overlay.back_mut();
        surface.clear();
        render::draw_tangent(surface, &self.fx, p, slope, color, style.line_thickness)?;
        render::draw_point(surface, &self.fx, p, style.fx_color, style.large_point_radius)?;
        layers.fx_overlay.swap();
        Ok(())
    }

    fn tangent_frame<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        style: &Style,
        by_sign: bool,
    ) -> Result<bool, ChartError> {
        let (Some(fx2), Some((start, end))) = (self.fx2.as_ref(), domain_px(&self.fx)) else {
            return Ok(false);
        };
        let col = start + i64::from(self.frame);
        if col >= end {
            return Ok(false);
        }
        let Some((p, d)) = self.tangent_at(col) else {
            return Ok(false);
        };

        let color = if by_sign {
            sign_color(d.y, style)
        } else {
            Color::progress(col as Number / Number::from(self.fx.resolution().width()))
        };
        self.draw_tangent_overlay(layers, p, d.y, color, style)?;

        if by_sign {
            let prev = col
                .checked_sub(1)
                .and_then(|c| fx2.point_at_px(c))
                .unwrap_or(UNDEFINED);
            render::draw_segment(&mut layers.fx2, fx2, prev, d, color, style.fx_thickness)?;
        } else {
            render::draw_point(&mut layers.fx2, fx2, d, color, style.trace_radius)?;
        }
        Ok(true)
    }

    fn integral_frame<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        style: &Style,
    ) -> Result<bool, ChartError> {
        let (Some(fx2), Some((start, end))) = (self.fx2.as_ref(), domain_px(&self.fx)) else {
            return Ok(false);
        };
        let col = start + i64::from(self.frame);
        if col >= end {
            return Ok(false);
        }
        let Some(p) = self.fx.point_at_px(col) else {
            return Ok(false);
        };

        // bars accumulate, so they go straight to the visible surface
        render::draw_area_bar(
            layers.fx_overlay.front_mut(),
            &self.fx,
            col as Number,
            p.y,
            style.area_color,
        )?;
        if let Some(area) = fx2.point_at_px(col) {
            render::draw_point(&mut layers.fx2, fx2, area, style.area_color, style.trace_radius)?;
        }
        Ok(true)
    }

    fn improper_frame<S: Surface>(
        &self,
        layers: &mut Layers<S>,
        style: &Style,
    ) -> Result<bool, ChartError> {
        let (Some(fx2), Some((start, end))) = (self.fx2.as_ref(), domain_px(&self.fx)) else {
            return Ok(false);
        };
        let col = start + i64::from(self.frame);
        if col * 2 >= end {
            return Ok(false);
        }

        let fx = &self.fx;
        let mid = i64::from(fx.resolution().width() / 2);
        let forward = mid + col;
        let surface = layers.fx_overlay.front_mut();
        let mut bar = |px: i64| match fx.point_at_px(px) {
            Some(p) => {
                render::draw_area_bar(&mut *surface, fx, px as Number, p.y, style.area_color)
            }
            None => Ok(()),
        };

        bar(forward)?;
        match self.speed {
            Speed::Linear => bar(mid - col)?,
            Speed::Quadratic => {
                // every column between -x^2 and -x'^2 is covered by this step
                let from = -fx.x_from_px(forward as Number).powi(2);
                let to = -fx.x_from_px((forward + 1) as Number).powi(2);
                let from_px = fx.x_to_px(from).round() as i64;
                let to_px = fx.x_to_px(to).round() as i64;
                if to_px >= 0 {
                    for px in (to_px..=from_px).rev() {
                        bar(px)?;
                    }
                }
            }
        }

        if let Some(area) = fx2.point_at_px(forward) {
            let prev = fx2.point_at_px(forward - 1).unwrap_or(UNDEFINED);
            render::draw_segment(
                &mut layers.fx2,
                fx2,
                prev,
                area,
                style.area_color,
                style.fx_thickness,
            )?;
        }
        Ok(true)
    }
}

/// Drives one scenario: owns its surfaces, its timer and the current
/// session.
#[derive(Debug)]
pub struct Controller<S> {
    kind: ScenarioKind,
    style: Style,
    layers: Layers<S>,
    ticker: Ticker,
    session: Option<AnimationSession>,
}

impl<S: Surface> Controller<S> {
    pub fn new(kind: ScenarioKind, layers: Layers<S>) -> Self {
        Self::with_style(kind, layers, Style::default())
    }

    pub fn with_style(kind: ScenarioKind, layers: Layers<S>, style: Style) -> Self {
        Self {
            kind,
            style,
            layers,
            ticker: Ticker::new(),
            session: None,
        }
    }

    pub const fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ScenarioKind) {
        if kind != self.kind {
            self.stop();
            self.layers.clear();
            self.kind = kind;
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn layers(&self) -> &Layers<S> {
        &self.layers
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(AnimationSession::phase)
            .unwrap_or_default()
    }

    pub fn stop(&mut self) {
        self.ticker.cancel_all();
        self.session = None;
    }

    /// Validates `inputs`, builds the charts, draws the static layers and
    /// starts the animation timer. Any previous animation is cancelled first,
    /// whether or not the inputs are accepted.
    pub fn run(&mut self, inputs: &Inputs) -> Result<(), ScenarioError> {
        self.stop();

        let kind = self.kind;
        let expr = validate(kind, inputs).map_err(|rejection| {
            warn!(code = rejection.code(), %rejection, "rejected inputs");
            rejection
        })?;

        let resolution = self.layers.fx.resolution();
        let fx = Chart::new(
            Arc::clone(&expr),
            resolution,
            inputs.x_range(),
            Some(inputs.y_range()),
            Sampling::Function,
        );
        if kind.needs_limited() && !fx.is_limited() {
            let rejection = Rejection::Unlimited;
            warn!(code = rejection.code(), %rejection, "rejected inputs");
            return Err(rejection.into());
        }
        let fx2 = kind.derived_sampling(inputs.speed).map(|sampling| {
            Chart::new(
                Arc::clone(&expr),
                resolution,
                inputs.x_range(),
                inputs.y2_range(),
                sampling,
            )
        });

        let style = &self.style;
        self.layers.clear();
        render::draw_axes(&mut self.layers.fx, &fx, style)?;
        render::draw_function(&mut self.layers.fx, &fx, style)?;
        if kind == ScenarioKind::IncrementalRatio {
            render::draw_x_marker(&mut self.layers.fx, &fx, inputs.x_fixed, "x0", style)?;
        }
        if let Some(fx2) = fx2.as_ref() {
            render::draw_axes(&mut self.layers.fx2, fx2, style)?;
        }

        let timer = self.ticker.start(kind.tick_period());
        info!(scenario = %kind, expr = %expr, "animation started");
        self.session = Some(AnimationSession {
            kind,
            fx,
            fx2,
            x_fixed: inputs.x_fixed,
            x_moving: inputs.x_moving,
            speed: inputs.speed,
            frame: 0,
            timer,
            phase: Phase::Animating,
        });
        Ok(())
    }

    /// Handles one timer tick: draws the next frame, or ends the animation
    /// when there is nothing left to draw. Ticks of a cancelled timer are
    /// ignored.
    pub fn tick(&mut self) -> Result<Phase, ChartError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Phase::Idle);
        };
        if session.phase != Phase::Animating || !self.ticker.is_active(session.timer) {
            return Ok(session.phase);
        }

        if session.draw_frame(&mut self.layers, &self.style)? {
            session.frame += 1;
        } else {
            self.ticker.cancel(session.timer);
            session.phase = if session.kind.is_interactive() {
                Phase::Interactive
            } else {
                Phase::Idle
            };
            info!(scenario = %session.kind, frames = session.frame, "animation finished");
        }
        Ok(session.phase)
    }

    /// Ticks until the animation is over, without waiting between frames.
    /// Returns the number of frames drawn.
    pub fn finish(&mut self) -> Result<u32, ChartError> {
        while self.tick()? == Phase::Animating {}
        Ok(self.session.as_ref().map_or(0, AnimationSession::frame))
    }

    /// Pointer moved over the function chart at column `x_px`. Only has an
    /// effect once the animation is over; the frame counter is untouched.
    pub fn hover(&mut self, x_px: Number) -> Result<bool, ChartError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(false);
        };
        if session.phase != Phase::Interactive {
            return Ok(false);
        }
        debug!(x_px, "interaction");
        session.draw_interaction(&mut self.layers, &self.style, x_px)
    }

    pub fn click(&mut self, x_px: Number) -> Result<bool, ChartError> {
        self.hover(x_px)
    }
}
