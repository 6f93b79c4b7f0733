// SPDX: CC0-1.0

//! Defaults shared by the library and the shell.

use crate::{chart::Resolution, render::Color, Number};
use core::{num::NonZeroU32, time::Duration};

pub const DEFAULT_RESOLUTION: Resolution = Resolution::new(
    match NonZeroU32::new(800) {
        Some(w) => w,
        None => unreachable!(),
    },
    match NonZeroU32::new(400) {
        Some(h) => h,
        None => unreachable!(),
    },
);

/// Inputs must lie in `[-INPUT_LIMIT, INPUT_LIMIT]`.
pub const INPUT_LIMIT: Number = 1000.0;

/// Tick period of most animations.
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Tick period of the sign animation.
pub const SLOW_TICK_PERIOD: Duration = Duration::from_millis(20);

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub font: &'static str,
    pub marker_font: &'static str,
    pub axis_color: Color,
    pub axis_thickness: Number,
    pub fx_color: Color,
    pub fx_thickness: Number,
    pub not_defined_color: Color,
    pub positive_color: Color,
    pub negative_color: Color,
    pub area_color: Color,
    pub line_thickness: Number,
    pub point_radius: Number,
    pub large_point_radius: Number,
    pub trace_radius: Number,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font: "10px Georgia",
            marker_font: "12px Georgia",
            axis_color: Color::BLACK,
            axis_thickness: 1.0,
            fx_color: Color::BLACK,
            fx_thickness: 1.0,
            not_defined_color: Color::rgba(11, 13, 15, 0.3),
            positive_color: Color::rgb(0, 128, 255),
            negative_color: Color::rgb(255, 51, 51),
            area_color: Color::rgb(0, 128, 255),
            line_thickness: 2.0,
            point_radius: 5.0,
            large_point_radius: 6.0,
            trace_radius: 2.0,
        }
    }
}
