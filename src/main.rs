// SPDX: CC0-1.0

use anyhow::Context;
use calculus_anim::{
    anim::Phase,
    canvas::Canvas,
    config,
    eval::Idents,
    expr::Expression,
    scenario::{Controller, Inputs, Layers, Rejection, ScenarioError, ScenarioKind},
    shell::{self, Command},
    stdlib, Number, Speed,
};
use chrono::{DateTime, Local};
use std::{
    fs::OpenOptions,
    io::{self, stdout, BufWriter, Write},
    process::ExitCode,
    sync::Arc,
    thread,
};
use tracing_subscriber::EnvFilter;

fn output_svg_filename(now: DateTime<Local>, kind: ScenarioKind, layer: &str) -> String {
    format!(
        "{}_{kind}-{}-{layer}.{}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S%.3f"),
        "svg"
    )
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct State {
    inputs: Inputs,
    idents: Idents,
    controller: Controller<Canvas>,
}

fn try_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let mut state = State {
        inputs: Inputs::default(),
        idents: stdlib::standard_idents(),
        controller: Controller::new(
            ScenarioKind::IncrementalRatio,
            Layers::with(|| Canvas::new(config::DEFAULT_RESOLUTION)),
        ),
    };

    let mut stdout = BufWriter::new(stdout());
    loop {
        writeln!(
            stdout,
            "{kind}: f(x) = {expr}",
            kind = state.controller.kind(),
            expr = state.inputs.expr
        )?;

        let mut line = shell::input(&mut stdout, "> ")?;
        line.make_ascii_lowercase();
        writeln!(stdout)?;

        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        if let Ok(cmd) = name.parse::<Command>() {
            match cmd {
                Command::Help => {
                    for c in Command::exhaustive() {
                        writeln!(stdout, "{name}: {help}", name = c.name(), help = c.help())?;
                    }
                    writeln!(stdout)?;
                    writeln!(stdout, "{}", shell::SYNTAX_HELP)?;
                }

                Command::Quit => break,

                Command::SetExpr => set_expr(&mut stdout, &mut state)?,

                Command::SetWin => set_win(&mut stdout, &mut state)?,

                Command::SetAxes2 => set_axes2(&mut stdout, &mut state)?,

                Command::Scenario => set_scenario(&mut stdout, &mut state)?,

                Command::Points => set_points(&mut stdout, &mut state)?,

                Command::Speed => {
                    if let Ok(Some(speed)) = shell::read_fromstr::<_, Speed>(
                        &mut stdout,
                        format_args!("?speed (is {}) = ", state.inputs.speed),
                        true,
                    )? {
                        state.inputs.speed = speed;
                    }
                }

                Command::Run => run(&mut stdout, &mut state)?,

                Command::Hover => hover(&mut stdout, &mut state, &args)?,

                Command::PrintProg => {
                    let src = Arc::new(state.inputs.expr.clone());
                    match Expression::compile(src.as_str()) {
                        Ok(expr) => shell::dump_program(
                            &mut stdout,
                            expr.program(),
                            format_args!("program"),
                        )?,
                        Err(err) => {
                            shell::report_expr_error(&mut stdout, &src, &err, &state.idents)?
                        }
                    }
                }
            }
        } else {
            writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
            let names = Command::exhaustive().iter().map(Command::name);
            if let Some(similar) = shell::most_similar(name, names) {
                writeln!(stdout, "note: command '{similar}' has a similar name")?;
            }
        }

        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn set_expr<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let input = shell::input(&mut out, "f(x) = ")?;
    if input.is_empty() {
        return Ok(());
    }

    // kept even if broken, so that 'run' reports the rejection
    let src = Arc::new(input);
    if let Err(err) = Expression::compile_checked(src.as_str()) {
        writeln!(out)?;
        shell::report_expr_error(&mut out, &src, &err, &state.idents)?;
    }
    state.inputs.expr = src.to_string();
    Ok(())
}

fn read_numbers<W: Write>(
    mut out: W,
    fields: [(&str, &mut Number); 2],
) -> anyhow::Result<bool> {
    for (name, dst) in fields {
        match shell::read_fromstr::<_, Number>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", cur = *dst),
            true,
        )? {
            Ok(Some(new)) => *dst = new,
            Ok(None) => {}
            Err(_) => return Ok(false),
        }
    }
    Ok(true)
}

fn set_win<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "note: leave blank to skip")?;
    let inputs = &mut state.inputs;
    if read_numbers(
        &mut out,
        [("x min", &mut inputs.x_min), ("x max", &mut inputs.x_max)],
    )? {
        read_numbers(
            &mut out,
            [("y min", &mut inputs.y_min), ("y max", &mut inputs.y_max)],
        )?;
    }
    Ok(())
}

fn set_axes2<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    match &state.inputs.y2 {
        Some(range) => writeln!(out, "y range of the second chart is {range:?}")?,
        None => writeln!(out, "y range of the second chart is fitted to the data")?,
    }
    writeln!(out, "note: leave y2 min blank to fit the range to the data")?;

    let start = match shell::read_fromstr::<_, Number>(&mut out, "?y2 min = ", true)? {
        Ok(Some(start)) => start,
        Ok(None) => {
            state.inputs.y2 = None;
            return Ok(());
        }
        Err(_) => return Ok(()),
    };
    if let Ok(Some(end)) = shell::read_fromstr::<_, Number>(&mut out, "?y2 max = ", false)? {
        state.inputs.y2 = Some(start..end);
        if state.inputs.y2_range().is_none() {
            writeln!(out, "note: empty range, the second chart will be fitted to the data")?;
        }
    }
    Ok(())
}

fn set_scenario<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    for kind in ScenarioKind::exhaustive() {
        writeln!(out, "{name}: {help}", name = kind.name(), help = kind.help())?;
    }
    let mut input = shell::input(&mut out, "?scenario = ")?;
    input.make_ascii_lowercase();
    if input.is_empty() {
        return Ok(());
    }
    match input.parse::<ScenarioKind>() {
        Ok(kind) => state.controller.set_kind(kind),
        Err(()) => {
            writeln!(out, "error: unknown scenario '{input}'")?;
            let names = ScenarioKind::exhaustive().iter().map(ScenarioKind::name);
            if let Some(similar) = shell::most_similar(&input, names) {
                writeln!(out, "note: scenario '{similar}' has a similar name")?;
            }
        }
    }
    Ok(())
}

fn set_points<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "note: leave blank to skip")?;
    let inputs = &mut state.inputs;
    read_numbers(
        &mut out,
        [("x0", &mut inputs.x_fixed), ("x", &mut inputs.x_moving)],
    )?;
    Ok(())
}

fn run<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    match state.controller.run(&state.inputs) {
        Ok(()) => {}
        Err(ScenarioError::Rejected(rejection)) => {
            writeln!(out, "rejected ({}): {rejection}", rejection.code())?;
            if let Rejection::Function(err) = &rejection {
                let src = Arc::new(state.inputs.expr.clone());
                shell::report_expr_error(&mut out, &src, err, &state.idents)?;
            }
            return Ok(());
        }
        Err(err) => return Err(err).context("failed to start the animation"),
    }

    writeln!(out, "animating...")?;
    out.flush()?;
    while let Some(period) = state.controller.ticker().period() {
        thread::sleep(period);
        state
            .controller
            .tick()
            .context("failed to draw an animation frame")?;
    }

    let frames = state.controller.session().map_or(0, |s| s.frame());
    writeln!(out, "done after {frames} frames")?;
    if state.controller.phase() == Phase::Interactive {
        writeln!(out, "note: use 'hover <px>' to move the pointer")?;
    }
    write_layers(&mut out, &state.controller)
}

fn hover<W: Write>(mut out: W, state: &mut State, args: &[&str]) -> anyhow::Result<()> {
    let [px] = args else {
        writeln!(out, "error: expected one pixel column, e.g. 'hover 120'")?;
        return Ok(());
    };
    let px: Number = match px.parse() {
        Ok(px) => px,
        Err(err) => {
            writeln!(out, "parse error: {err}")?;
            return Ok(());
        }
    };

    let drawn = state
        .controller
        .hover(px)
        .context("failed to draw the pointer overlay")?;
    if drawn {
        write_layers(&mut out, &state.controller)
    } else {
        writeln!(
            out,
            "nothing to draw, the '{}' animation is not interactive now",
            state.controller.kind()
        )?;
        Ok(())
    }
}

fn write_layers<W: Write>(mut out: W, controller: &Controller<Canvas>) -> anyhow::Result<()> {
    let now = Local::now();
    for (layer, canvas) in controller.layers().visible() {
        if canvas.is_empty() {
            continue;
        }
        let path = output_svg_filename(now, controller.kind(), layer);
        let mut file = BufWriter::new(
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .with_context(|| format!("failed to open output file '{path}'"))?,
        );
        file.write_all(canvas.to_svg().as_bytes())
            .with_context(|| format!("failed to write to output file '{path}'"))?;
        file.flush()?;
        writeln!(out, "wrote {path}")?;
    }
    Ok(())
}
