use calculus_anim::{Chart, Expression, Resolution, Sampling};
use proptest::prelude::*;
use std::sync::Arc;

const EXPRESSIONS: &[&str] = &[
    "x^2",
    "1/x",
    "sqrt(x)",
    "ln(x)",
    "tan(x)",
    "sqrt(x^2 - 1)",
    "sin(x)/x",
    "3",
];

fn chart(src: &str, width: u32, x_min: f64, span: f64, sampling: Sampling) -> Chart {
    let expr = Arc::new(Expression::compile_checked(src).expect("valid expression"));
    let resolution = Resolution::try_new(width, 300).expect("nonzero resolution");
    Chart::new(expr, resolution, x_min..x_min + span, None, sampling)
}

proptest! {
    #[test]
    fn pixel_mapping_inverts_data_mapping(
        x_min in -1_000.0f64..1_000.0,
        span in 0.01f64..1_000.0,
        y_min in -1_000.0f64..1_000.0,
        y_span in 0.01f64..1_000.0,
        width in 1u32..2_000,
        t in 0.0f64..=1.0,
    ) {
        let expr = Arc::new(Expression::compile("x").expect("valid expression"));
        let resolution = Resolution::try_new(width, 300).expect("nonzero resolution");
        let chart = Chart::new(
            expr,
            resolution,
            x_min..x_min + span,
            Some(y_min..y_min + y_span),
            Sampling::Function,
        );

        let x = x_min + t * span;
        let tolerance = 1e-9 * (1.0 + x.abs() + span);
        prop_assert!((chart.x_from_px(chart.x_to_px(x)) - x).abs() <= tolerance);

        let y = y_min + t * y_span;
        let tolerance = 1e-9 * (1.0 + y.abs() + y_span);
        prop_assert!((chart.y_from_px(chart.y_to_px(y)) - y).abs() <= tolerance);
    }

    #[test]
    fn sample_count_is_width_plus_one(
        src in prop::sample::select(EXPRESSIONS),
        width in 1u32..1_500,
        x_min in -100.0f64..100.0,
        span in 0.1f64..200.0,
    ) {
        let chart = chart(src, width, x_min, span, Sampling::Function);
        prop_assert_eq!(chart.points().len(), width as usize + 1);
        prop_assert_eq!(chart.points()[0].x, x_min);
    }

    #[test]
    fn domain_covers_exactly_the_finite_runs(
        src in prop::sample::select(EXPRESSIONS),
        width in 1u32..600,
        x_min in -20.0f64..20.0,
        span in 0.1f64..40.0,
    ) {
        let chart = chart(src, width, x_min, span, Sampling::Function);
        let points = chart.points();
        let domain = chart.domain();

        // ordered, non-empty and separated by at least one non-finite sample
        for interval in domain {
            prop_assert!(interval.from <= interval.to);
        }
        for pair in domain.windows(2) {
            prop_assert!(pair[0].to < pair[1].from);
            let gap = points
                .iter()
                .filter(|p| p.x > pair[0].to && p.x < pair[1].from);
            prop_assert!(gap.clone().count() > 0);
            prop_assert!(gap.clone().all(|p| !p.y.is_finite()));
        }

        // a sample is finite exactly when it lies in the domain
        for p in points {
            let inside = domain.iter().any(|i| i.contains(p.x));
            prop_assert_eq!(inside, p.y.is_finite(), "x = {}", p.x);
        }
    }

    #[test]
    fn limited_means_no_infinite_sample(
        src in prop::sample::select(EXPRESSIONS),
        width in 1u32..600,
        x_min in -20.0f64..20.0,
        span in 0.1f64..40.0,
    ) {
        let chart = chart(src, width, x_min, span, Sampling::Function);
        let has_infinite = chart.points().iter().any(|p| p.y.is_infinite());
        prop_assert_eq!(chart.is_limited(), !has_infinite);
    }
}
