// SPDX: CC0-1.0

//! Rendering helpers. They read a [`Chart`] and issue draw calls on a
//! [`Surface`]; none of them mutate the chart.

use crate::{
    axis,
    chart::{Chart, ChartError, Resolution},
    config::Style,
    Number, Point,
};
use core::fmt;

/// Color with 8-bit channels and a fractional alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Progress color of the animations: `rgb(r, 10, 100)` with `r` scaled
    /// from `t` in `[0, 1]`, clamped.
    pub fn progress(t: Number) -> Self {
        let red = if t.is_nan() {
            0
        } else {
            (t * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Self::rgb(red, 10, 100)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            red,
            green,
            blue,
            alpha,
        } = *self;
        if alpha >= 1.0 {
            write!(f, "rgb({red}, {green}, {blue})")
        } else {
            write!(f, "rgba({red}, {green}, {blue}, {alpha})")
        }
    }
}

/// Immediate-mode 2D drawing surface.
///
/// Coordinates are in pixels with the origin at the top left corner.
pub trait Surface {
    fn resolution(&self) -> Resolution;

    fn width(&self) -> u32 {
        self.resolution().width()
    }

    fn height(&self) -> u32 {
        self.resolution().height()
    }

    fn clear(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: Number, y: Number);
    fn line_to(&mut self, x: Number, y: Number);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: Number, y: Number, width: Number, height: Number);
    fn fill_circle(&mut self, x: Number, y: Number, radius: Number);
    fn fill_text(&mut self, text: &str, x: Number, y: Number);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: Number);
    fn set_font(&mut self, font: &str);
}

fn stroke_line<S: Surface + ?Sized>(surface: &mut S, from: Point<Number>, to: Point<Number>) {
    surface.move_to(from.x, from.y);
    surface.line_to(to.x, to.y);
    surface.stroke();
}

fn all_finite(values: &[Number]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Draws both axes with their ticks and labels.
///
/// An axis whose origin is outside the window is pinned to the border.
pub fn draw_axes<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    style: &Style,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    let width = Number::from(surface.width());
    let height = Number::from(surface.height());

    surface.begin_path();
    surface.set_fill_color(style.axis_color);
    surface.set_stroke_color(style.axis_color);
    surface.set_font(style.font);
    surface.set_line_width(style.axis_thickness);

    let orig_y = chart.y0_px().unwrap_or(height - 2.0);
    stroke_line(
        surface,
        Point { x: 0.0, y: orig_y },
        Point { x: width, y: orig_y },
    );

    let orig_x = chart.x0_px().unwrap_or(2.0);
    stroke_line(
        surface,
        Point { x: orig_x, y: 0.0 },
        Point {
            x: orig_x,
            y: height,
        },
    );

    let x_step = axis::tick_step(chart.x_interval());
    for tick in axis::ticks(chart.x_range(), x_step) {
        let px = chart.x_to_px(tick);
        stroke_line(
            surface,
            Point {
                x: px,
                y: orig_y + 2.0,
            },
            Point {
                x: px,
                y: orig_y - 2.0,
            },
        );
        surface.fill_text(&axis::tick_label(tick), px - 4.0, orig_y - 5.0);
    }

    let y_step = axis::tick_step(chart.y_interval());
    for tick in axis::ticks(chart.y_range(), y_step) {
        let px = chart.y_to_px(tick);
        stroke_line(
            surface,
            Point {
                x: orig_x - 2.0,
                y: px,
            },
            Point {
                x: orig_x + 2.0,
                y: px,
            },
        );
        surface.fill_text(&axis::tick_label(tick), orig_x + 5.0, px - 4.0);
    }

    Ok(())
}

/// Draws the sampled function as a polyline. Columns where the function is
/// undefined get a translucent full-height bar.
pub fn draw_function<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    style: &Style,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    let height = Number::from(surface.height());
    let points = chart.points();
    for (i, p) in points.iter().enumerate() {
        if p.y.is_nan() {
            surface.begin_path();
            surface.set_fill_color(style.not_defined_color);
            surface.fill_rect(chart.x_to_px(p.x), 0.0, 1.0, height);
            continue;
        }
        if let Some(prev) = i.checked_sub(1).and_then(|j| points.get(j)) {
            draw_segment(surface, chart, *prev, *p, style.fx_color, style.fx_thickness)?;
        }
    }
    Ok(())
}

/// Segment between two data-space points. Skipped if either end is not a
/// finite number.
pub fn draw_segment<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    p0: Point<Number>,
    p1: Point<Number>,
    color: Color,
    line_width: Number,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    if !all_finite(&[p0.x, p0.y, p1.x, p1.y]) {
        return Ok(());
    }
    surface.begin_path();
    surface.set_stroke_color(color);
    surface.set_line_width(line_width);
    stroke_line(
        surface,
        Point {
            x: chart.x_to_px(p0.x),
            y: chart.y_to_px(p0.y),
        },
        Point {
            x: chart.x_to_px(p1.x),
            y: chart.y_to_px(p1.y),
        },
    );
    Ok(())
}

pub fn draw_point<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    p: Point<Number>,
    color: Color,
    radius: Number,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    if !all_finite(&[p.x, p.y]) {
        return Ok(());
    }
    surface.begin_path();
    surface.set_fill_color(color);
    surface.fill_circle(chart.x_to_px(p.x), chart.y_to_px(p.y), radius);
    Ok(())
}

/// Line with the given `slope` through `p`, clipped to the chart window.
pub fn draw_tangent<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    p: Point<Number>,
    slope: Number,
    color: Color,
    line_width: Number,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    if !all_finite(&[p.x, p.y, slope]) {
        return Ok(());
    }
    let width = Number::from(surface.width());
    let height = Number::from(surface.height());
    let (from, to) = if slope == 0.0 {
        let y = chart.y_to_px(p.y);
        (Point { x: 0.0, y }, Point { x: width, y })
    } else {
        // y = m x + q, crossing the bottom and top borders of the window
        let q = p.y - slope * p.x;
        let y_range = chart.y_range();
        (
            Point {
                x: chart.x_to_px((y_range.start - q) / slope),
                y: height,
            },
            Point {
                x: chart.x_to_px((y_range.end - q) / slope),
                y: 0.0,
            },
        )
    };
    if !all_finite(&[from.x, to.x]) {
        return Ok(());
    }
    surface.begin_path();
    surface.set_stroke_color(color);
    surface.set_line_width(line_width);
    stroke_line(surface, from, to);
    Ok(())
}

/// Line through `p0` and `p1`, extended across the whole x range.
pub fn draw_secant<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    p0: Point<Number>,
    p1: Point<Number>,
    color: Color,
    line_width: Number,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    let line = |x: Number| (x - p0.x) / (p1.x - p0.x) * (p1.y - p0.y) + p0.y;
    let x_range = chart.x_range();
    let (y_start, y_end) = (line(x_range.start), line(x_range.end));
    if !all_finite(&[y_start, y_end]) {
        return Ok(());
    }
    surface.begin_path();
    surface.set_stroke_color(color);
    surface.set_line_width(line_width);
    stroke_line(
        surface,
        Point {
            x: 0.0,
            y: chart.y_to_px(y_start),
        },
        Point {
            x: Number::from(surface.width()),
            y: chart.y_to_px(y_end),
        },
    );
    Ok(())
}

/// Two pixel wide bar from the x axis to `y` at pixel column `x_px`.
pub fn draw_area_bar<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    x_px: Number,
    y: Number,
    color: Color,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    if !all_finite(&[x_px, y]) {
        return Ok(());
    }
    let height = Number::from(surface.height());
    let orig_y = chart.y0_px().unwrap_or(height);
    let bar = y * height / chart.y_interval();
    // bars above the axis grow upwards
    let (top, len) = if bar >= 0.0 {
        (orig_y - bar, bar)
    } else {
        (orig_y, -bar)
    };
    surface.begin_path();
    surface.set_fill_color(color);
    surface.fill_rect(x_px, top, 2.0, len);
    Ok(())
}

/// Small tick on the x axis at `x` with a text label under it.
pub fn draw_x_marker<S: Surface + ?Sized>(
    surface: &mut S,
    chart: &Chart,
    x: Number,
    label: &str,
    style: &Style,
) -> Result<(), ChartError> {
    chart.check_surface(&*surface)?;

    let height = Number::from(surface.height());
    let px = chart.x_to_px(x);
    let orig_y = chart.y0_px().unwrap_or(height - 2.0);

    surface.begin_path();
    surface.set_stroke_color(style.axis_color);
    surface.set_fill_color(style.axis_color);
    surface.set_line_width(style.axis_thickness);
    surface.set_font(style.marker_font);
    stroke_line(
        surface,
        Point {
            x: px,
            y: orig_y + 2.0,
        },
        Point {
            x: px,
            y: orig_y - 2.0,
        },
    );
    surface.fill_text(label, px - 5.0, orig_y + 15.0);
    Ok(())
}
