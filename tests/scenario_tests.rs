use calculus_anim::{
    anim::Phase,
    canvas::{Canvas, Shape},
    config::{self, Style},
    render::Color,
    scenario::{validate, Controller, Inputs, Layers, Rejection, ScenarioError, ScenarioKind},
    Resolution, Speed,
};
use std::time::Duration;

fn controller(kind: ScenarioKind) -> Controller<Canvas> {
    let resolution = Resolution::try_new(100, 50).expect("nonzero resolution");
    Controller::new(kind, Layers::with(|| Canvas::new(resolution)))
}

fn rejection(kind: ScenarioKind, inputs: &Inputs) -> &'static str {
    match controller(kind).run(inputs) {
        Err(ScenarioError::Rejected(rejection)) => rejection.code(),
        other => panic!("expected a rejection, got {other:?}"),
    }
}

fn lines_colored(canvas: &Canvas, style: Style) -> (usize, usize) {
    let count = |c: Color| {
        canvas
            .lines()
            .filter(|s| matches!(s, Shape::Line { color, .. } if *color == c))
            .count()
    };
    (count(style.negative_color), count(style.positive_color))
}

#[test]
fn scenario_names_round_trip() {
    for kind in ScenarioKind::exhaustive() {
        assert_eq!(kind.name().parse::<ScenarioKind>(), Ok(*kind));
    }
    assert!("tangent".parse::<ScenarioKind>().is_err());
}

#[test]
fn reversed_x_range_is_rejected() {
    let inputs = Inputs {
        x_min: 5.0,
        x_max: -5.0,
        ..Inputs::default()
    };
    assert_eq!(rejection(ScenarioKind::Derivative, &inputs), "axes");

    let empty = Inputs {
        x_min: 1.0,
        x_max: 1.0,
        ..Inputs::default()
    };
    assert_eq!(rejection(ScenarioKind::Integral, &empty), "axes");
}

#[test]
fn out_of_limit_inputs_are_rejected_first() {
    for inputs in [
        Inputs {
            x_max: 2000.0,
            ..Inputs::default()
        },
        Inputs {
            x_min: -2000.0,
            ..Inputs::default()
        },
        Inputs {
            y_min: -1000.5,
            ..Inputs::default()
        },
        Inputs {
            y_max: f64::NAN,
            ..Inputs::default()
        },
        // also reversed, but the limit is checked first
        Inputs {
            x_min: 2000.0,
            x_max: -2000.0,
            ..Inputs::default()
        },
    ] {
        assert_eq!(rejection(ScenarioKind::Derivative, &inputs), "min_max");
    }

    let on_the_limit = Inputs {
        x_min: -1000.0,
        x_max: 1000.0,
        ..Inputs::default()
    };
    assert!(validate(ScenarioKind::Derivative, &on_the_limit).is_ok());
}

#[test]
fn malformed_function_is_rejected() {
    for expr in ["x +* 1", "(x + 1", "", "x > 1", "y^2"] {
        let inputs = Inputs {
            expr: expr.to_string(),
            ..Inputs::default()
        };
        assert_eq!(rejection(ScenarioKind::Sign, &inputs), "function", "{expr:?}");
    }
}

#[test]
fn improper_integral_needs_a_symmetric_range() {
    let inputs = Inputs {
        x_min: -3.0,
        x_max: 5.0,
        ..Inputs::default()
    };
    assert_eq!(
        rejection(ScenarioKind::ImproperIntegral, &inputs),
        "x-range-not-symmetric"
    );
    // other scenarios do not care
    assert!(validate(ScenarioKind::Integral, &inputs).is_ok());
}

#[test]
fn quotient_points_must_lie_in_the_range() {
    for (x_fixed, x_moving) in [(10.0, 4.0), (1.0, -6.0)] {
        let inputs = Inputs {
            x_fixed,
            x_moving,
            ..Inputs::default()
        };
        assert_eq!(rejection(ScenarioKind::IncrementalRatio, &inputs), "xfis_xmob");
        assert!(validate(ScenarioKind::Derivative, &inputs).is_ok());
    }
}

#[test]
fn integrals_of_unbounded_functions_are_rejected() {
    let inputs = Inputs {
        expr: String::from("1/x"),
        ..Inputs::default()
    };
    assert!(validate(ScenarioKind::Integral, &inputs).is_ok());
    assert_eq!(rejection(ScenarioKind::Integral, &inputs), "unlimited");
    assert_eq!(rejection(ScenarioKind::ImproperIntegral, &inputs), "unlimited");

    // only integrals need a bounded function
    let mut ctl = controller(ScenarioKind::Derivative);
    assert!(ctl.run(&inputs).is_ok());
}

#[test]
fn function_rejection_keeps_the_compile_error() {
    let inputs = Inputs {
        expr: String::from("x +* 1"),
        ..Inputs::default()
    };
    let Err(Rejection::Function(err)) = validate(ScenarioKind::Derivative, &inputs) else {
        panic!("expected a function rejection");
    };
    assert!(err.to_string().contains("requires 2 arguments"), "{err}");
}

#[test]
fn incremental_ratio_animates_then_becomes_interactive() {
    let mut ctl = controller(ScenarioKind::IncrementalRatio);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.tick(), Ok(Phase::Idle));

    ctl.run(&Inputs::default()).expect("accepted");
    assert_eq!(ctl.phase(), Phase::Animating);
    assert_eq!(ctl.ticker().period(), Some(config::TICK_PERIOD));
    // the fixed point is marked on the function layer
    assert_eq!(ctl.layers().fx.texts().last(), Some("x0"));

    assert_eq!(ctl.tick(), Ok(Phase::Animating));
    let overlay = ctl.layers().fx_overlay.front();
    assert_eq!(overlay.lines().count(), 1);
    assert_eq!(overlay.circles().count(), 2);
    // hovering does nothing while animating
    assert_eq!(ctl.hover(30.0), Ok(false));

    // 100 px over 10 units, x moves from 4 to 1
    assert_eq!(ctl.finish(), Ok(30));
    assert_eq!(ctl.phase(), Phase::Interactive);
    assert_eq!(ctl.ticker().period(), None);

    // frames are replaced, not accumulated
    let overlay = ctl.layers().fx_overlay.front();
    assert_eq!(overlay.lines().count(), 1);
    assert_eq!(overlay.circles().count(), 2);

    assert_eq!(ctl.hover(30.0), Ok(true));
    assert_eq!(ctl.click(80.0), Ok(true));
    assert_eq!(ctl.session().map(|s| s.frame()), Some(30));
    assert_eq!(ctl.layers().fx_overlay.front().circles().count(), 2);
}

#[test]
fn rerun_cancels_the_previous_animation() {
    let mut ctl = controller(ScenarioKind::Derivative);
    ctl.run(&Inputs::default()).expect("accepted");
    for _ in 0..3 {
        ctl.tick().expect("frame");
    }
    let first = ctl.session().expect("session");
    assert_eq!(first.frame(), 3);
    let old_timer = first.timer();

    ctl.run(&Inputs::default()).expect("accepted");
    assert!(!ctl.ticker().is_active(old_timer));
    let second = ctl.session().expect("session");
    assert_eq!(second.frame(), 0);
    assert!(ctl.ticker().is_active(second.timer()));

    // a rejected run drops the session as well
    let broken = Inputs {
        expr: String::from("x +* 1"),
        ..Inputs::default()
    };
    assert!(ctl.run(&broken).is_err());
    assert!(ctl.session().is_none());
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.ticker().period(), None);
    assert_eq!(ctl.tick(), Ok(Phase::Idle));
}

#[test]
fn derivative_traces_one_point_per_column() {
    let mut ctl = controller(ScenarioKind::Derivative);
    ctl.run(&Inputs::default()).expect("accepted");
    assert!(ctl.layers().fx2.circles().next().is_none());

    assert_eq!(ctl.finish(), Ok(100));
    assert_eq!(ctl.phase(), Phase::Interactive);
    assert_eq!(ctl.layers().fx2.circles().count(), 100);

    // tangent and the point of tangency
    let overlay = ctl.layers().fx_overlay.front();
    assert_eq!(overlay.lines().count(), 1);
    assert_eq!(overlay.circles().count(), 1);

    assert!(ctl.layers().fx2_overlay.is_empty());
    assert_eq!(ctl.hover(25.0), Ok(true));
    assert_eq!(ctl.layers().fx2_overlay.circles().count(), 1);
    // outside the chart
    assert_eq!(ctl.hover(-10.0), Ok(false));
}

#[test]
fn sign_colors_the_derivative_trace() {
    let mut ctl = controller(ScenarioKind::Sign);
    ctl.run(&Inputs::default()).expect("accepted");
    assert_eq!(ctl.ticker().period(), Some(Duration::from_millis(20)));
    assert_eq!(ctl.finish(), Ok(100));

    // f'(x) = 2x: negative left of the middle column
    let (negative, positive) = lines_colored(&ctl.layers().fx2, Style::default());
    assert_eq!(negative, 49);
    assert_eq!(positive, 50);
}

#[test]
fn integral_accumulates_bars_and_ends_idle() {
    let mut ctl = controller(ScenarioKind::Integral);
    let inputs = Inputs {
        expr: String::from("1"),
        x_min: 0.0,
        x_max: 10.0,
        ..Inputs::default()
    };
    ctl.run(&inputs).expect("accepted");
    assert_eq!(ctl.finish(), Ok(100));
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.layers().fx_overlay.front().rects().count(), 100);
    assert_eq!(ctl.layers().fx2.circles().count(), 100);

    // no interaction once the area is drawn
    assert_eq!(ctl.hover(50.0), Ok(false));
}

#[test]
fn improper_integral_grows_from_the_middle() {
    let inputs = Inputs {
        expr: String::from("1"),
        ..Inputs::default()
    };

    let mut linear = controller(ScenarioKind::ImproperIntegral);
    linear.run(&inputs).expect("accepted");
    assert_eq!(linear.finish(), Ok(50));
    assert_eq!(linear.phase(), Phase::Idle);
    // one bar each side per frame
    assert_eq!(linear.layers().fx_overlay.front().rects().count(), 100);

    let mut quadratic = controller(ScenarioKind::ImproperIntegral);
    let inputs = Inputs {
        speed: Speed::Quadratic,
        ..inputs
    };
    quadratic.run(&inputs).expect("accepted");
    assert_eq!(quadratic.finish(), Ok(50));
    assert!(quadratic.layers().fx_overlay.front().rects().count() > 50);
}

#[test]
fn switching_scenario_clears_everything() {
    let mut ctl = controller(ScenarioKind::Derivative);
    ctl.run(&Inputs::default()).expect("accepted");
    ctl.tick().expect("frame");
    assert!(!ctl.layers().fx.is_empty());

    ctl.set_kind(ScenarioKind::Integral);
    assert_eq!(ctl.kind(), ScenarioKind::Integral);
    assert!(ctl.session().is_none());
    assert!(ctl.layers().visible().iter().all(|(_, c)| c.is_empty()));
}

#[test]
fn natural_log_runs_in_every_scenario() {
    let inputs = Inputs {
        expr: String::from("log(x)"),
        x_min: 0.5,
        x_max: 5.0,
        ..Inputs::default()
    };
    for kind in ScenarioKind::exhaustive() {
        if *kind == ScenarioKind::ImproperIntegral {
            // needs a symmetric range
            continue;
        }
        assert!(validate(*kind, &inputs).is_ok(), "{kind}");
    }

    let mut ctl = controller(ScenarioKind::Derivative);
    ctl.run(&inputs).expect("accepted");
    assert_eq!(ctl.finish(), Ok(100));
    assert_eq!(ctl.phase(), Phase::Interactive);

    let mut ctl = controller(ScenarioKind::Integral);
    ctl.run(&inputs).expect("accepted");
    assert_eq!(ctl.finish(), Ok(100));

    let base_two = Inputs {
        expr: String::from("log(x, 2)"),
        ..inputs
    };
    assert!(validate(ScenarioKind::Sign, &base_two).is_ok());
}
