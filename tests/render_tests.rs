use approx::assert_abs_diff_eq;
use calculus_anim::{
    canvas::{Canvas, Shape},
    config::Style,
    render::{self, Color, Surface},
    Chart, ChartError, Expression, Number, Point, Resolution, Sampling,
};
use std::sync::Arc;

fn resolution(width: u32, height: u32) -> Resolution {
    Resolution::try_new(width, height).expect("nonzero resolution")
}

fn square_chart() -> Chart {
    let expr = Arc::new(Expression::compile_checked("x^2").expect("valid expression"));
    Chart::new(
        expr,
        resolution(200, 100),
        -5.0..5.0,
        Some(-5.0..5.0),
        Sampling::Function,
    )
}

fn point(x: Number, y: Number) -> Point<Number> {
    Point { x, y }
}

#[test]
fn mismatched_surface_is_rejected() {
    let chart = square_chart();
    let style = Style::default();
    for other in [resolution(201, 100), resolution(200, 99)] {
        let mut canvas = Canvas::new(other);
        let err = render::draw_axes(&mut canvas, &chart, &style).unwrap_err();
        assert_eq!(
            err,
            ChartError::ResolutionMismatch {
                chart: resolution(200, 100),
                surface: other,
            }
        );
        assert!(canvas.is_empty());
    }
}

#[test]
fn axes_cross_at_the_origin_with_labelled_ticks() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    render::draw_axes(&mut canvas, &chart, &Style::default()).expect("draw axes");

    let lines: Vec<_> = canvas.lines().collect();
    assert!(lines.contains(&&Shape::Line {
        from: point(0.0, 50.0),
        to: point(200.0, 50.0),
        color: Color::BLACK,
        width: 1.0,
    }));
    assert!(lines.contains(&&Shape::Line {
        from: point(100.0, 0.0),
        to: point(100.0, 100.0),
        color: Color::BLACK,
        width: 1.0,
    }));

    let labels: Vec<_> = canvas.texts().collect();
    for label in ["-4", "-1", "1", "4"] {
        assert!(labels.contains(&label), "missing tick {label} in {labels:?}");
    }
    assert!(!labels.contains(&"-5"));
    assert!(!labels.contains(&"5"));
}

#[test]
fn axes_outside_the_window_are_pinned_to_the_border() {
    let expr = Arc::new(Expression::compile_checked("x").expect("valid expression"));
    let chart = Chart::new(
        expr,
        resolution(200, 100),
        1.0..3.0,
        Some(1.0..3.0),
        Sampling::Function,
    );
    let mut canvas = Canvas::new(chart.resolution());
    render::draw_axes(&mut canvas, &chart, &Style::default()).expect("draw axes");

    let mut lines = canvas.lines();
    assert!(matches!(
        lines.next(),
        Some(Shape::Line { from, .. }) if *from == point(0.0, 98.0)
    ));
    assert!(matches!(
        lines.next(),
        Some(Shape::Line { from, .. }) if *from == point(2.0, 0.0)
    ));
}

#[test]
fn undefined_columns_are_shaded() {
    let expr = Arc::new(Expression::compile_checked("sqrt(x)").expect("valid expression"));
    let chart = Chart::new(
        expr,
        resolution(100, 50),
        -1.0..1.0,
        None,
        Sampling::Function,
    );
    let style = Style::default();
    let mut canvas = Canvas::new(chart.resolution());
    render::draw_function(&mut canvas, &chart, &style).expect("draw function");

    // x < 0 on columns 0..50
    assert_eq!(canvas.rects().count(), 50);
    for rect in canvas.rects() {
        let Shape::Rect {
            width,
            height,
            color,
            ..
        } = rect
        else {
            unreachable!()
        };
        assert_abs_diff_eq!(*width, 1.0);
        assert_abs_diff_eq!(*height, 50.0);
        assert_eq!(*color, style.not_defined_color);
    }
    // segments only between defined neighbours
    assert_eq!(canvas.lines().count(), 50);
}

#[test]
fn non_finite_points_draw_nothing() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    let nan = point(Number::NAN, 1.0);
    render::draw_point(&mut canvas, &chart, nan, Color::BLACK, 5.0).expect("draw point");
    render::draw_segment(&mut canvas, &chart, nan, point(1.0, 1.0), Color::BLACK, 1.0)
        .expect("draw segment");
    render::draw_tangent(
        &mut canvas,
        &chart,
        point(1.0, 1.0),
        Number::INFINITY,
        Color::BLACK,
        1.0,
    )
    .expect("draw tangent");
    render::draw_area_bar(&mut canvas, &chart, 10.0, Number::NAN, Color::BLACK)
        .expect("draw bar");
    assert!(canvas.is_empty());
}

#[test]
fn flat_tangent_is_horizontal() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    let red = Color::rgb(255, 0, 0);
    render::draw_tangent(&mut canvas, &chart, point(0.0, 0.0), 0.0, red, 2.0)
        .expect("draw tangent");
    assert_eq!(
        canvas.shapes(),
        &[Shape::Line {
            from: point(0.0, 50.0),
            to: point(200.0, 50.0),
            color: red,
            width: 2.0,
        }]
    );
}

#[test]
fn tangent_spans_the_window_vertically() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    // y = 2x - 1 through (1, 1)
    render::draw_tangent(&mut canvas, &chart, point(1.0, 1.0), 2.0, Color::BLACK, 1.0)
        .expect("draw tangent");
    let Some(Shape::Line { from, to, .. }) = canvas.lines().next() else {
        panic!("no tangent drawn");
    };
    // y = -5 at x = -2, y = 5 at x = 3
    assert_abs_diff_eq!(from.x, chart.x_to_px(-2.0));
    assert_abs_diff_eq!(from.y, 100.0);
    assert_abs_diff_eq!(to.x, chart.x_to_px(3.0));
    assert_abs_diff_eq!(to.y, 0.0);
}

#[test]
fn secant_is_extended_across_the_range() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    // through (1, 1) and (2, 4): y = 3x - 2
    render::draw_secant(
        &mut canvas,
        &chart,
        point(1.0, 1.0),
        point(2.0, 4.0),
        Color::BLACK,
        1.0,
    )
    .expect("draw secant");
    let Some(Shape::Line { from, to, .. }) = canvas.lines().next() else {
        panic!("no secant drawn");
    };
    assert_abs_diff_eq!(from.x, 0.0);
    assert_abs_diff_eq!(from.y, chart.y_to_px(-17.0), epsilon = 1e-9);
    assert_abs_diff_eq!(to.x, 200.0);
    assert_abs_diff_eq!(to.y, chart.y_to_px(13.0), epsilon = 1e-9);
}

#[test]
fn area_bars_grow_away_from_the_axis() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    render::draw_area_bar(&mut canvas, &chart, 10.0, 2.5, Color::BLACK).expect("draw bar");
    render::draw_area_bar(&mut canvas, &chart, 20.0, -2.5, Color::BLACK).expect("draw bar");
    assert_eq!(
        canvas.shapes(),
        &[
            Shape::Rect {
                at: point(10.0, 25.0),
                width: 2.0,
                height: 25.0,
                color: Color::BLACK,
            },
            Shape::Rect {
                at: point(20.0, 50.0),
                width: 2.0,
                height: 25.0,
                color: Color::BLACK,
            },
        ]
    );
}

#[test]
fn marker_has_a_label() {
    let chart = square_chart();
    let mut canvas = Canvas::new(chart.resolution());
    render::draw_x_marker(&mut canvas, &chart, 1.0, "x0", &Style::default()).expect("marker");
    assert_eq!(canvas.texts().collect::<Vec<_>>(), ["x0"]);
    assert_eq!(canvas.lines().count(), 1);
}

#[test]
fn svg_output_escapes_text_and_lists_shapes() {
    let mut canvas = Canvas::new(resolution(10, 10));
    canvas.set_fill_color(Color::rgba(1, 2, 3, 0.5));
    canvas.fill_text("a<b", 1.0, 2.0);
    canvas.fill_circle(5.0, 5.0, 2.0);
    canvas.begin_path();
    canvas.line_to(1.0, 1.0);
    canvas.line_to(9.0, 9.0);
    canvas.stroke();

    let svg = canvas.to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("a&lt;b"));
    assert!(svg.contains(r#"fill="rgba(1, 2, 3, 0.5)""#));
    assert!(svg.contains(r#"<circle cx="5" cy="5" r="2""#));
    assert!(svg.contains(r#"<line x1="1" y1="1" x2="9" y2="9""#));
    assert!(svg.trim_end().ends_with("</svg>"));

    canvas.clear();
    assert!(canvas.is_empty());
}
