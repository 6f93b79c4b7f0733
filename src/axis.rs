// SPDX: CC0-1.0

//! Tick placement for chart axes.

use crate::Number;
use core::ops::Range;

/// Distance between two ticks for an axis spanning `interval`, aiming at
/// roughly ten ticks per axis.
pub fn tick_step(interval: Number) -> Number {
    let order_of_magnitude = interval.log10().floor();
    if order_of_magnitude > 0.0 {
        (interval / (10.0 * order_of_magnitude)).ceil()
    } else {
        let scale = Number::powf(10.0, -order_of_magnitude);
        (interval / 10.0 * scale).ceil() / scale
    }
}

/// Multiples of `step` strictly inside `range`, in ascending order.
///
/// See https://math.stackexchange.com/a/3854112
pub fn ticks(range: Range<Number>, step: Number) -> impl Iterator<Item = Number> {
    let valid = step.is_finite() && step > 0.0 && range.start.is_finite() && range.end.is_finite();
    let first = step * ((range.start / step).floor() + 1.0);
    let end = range.end;
    let mut n: u32 = 0;
    core::iter::from_fn(move || {
        if !valid {
            return None;
        }
        // multiply instead of accumulating so the error does not grow
        let cur = first + step * Number::from(n);
        n += 1;
        (cur < end).then_some(cur)
    })
}

/// Tick label, rounded to two decimals.
pub fn tick_label(value: Number) -> String {
    // adding zero turns -0 into 0
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{rounded}")
}
