use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use jogo::{Builtins, Config, Interpreter};
use jogo_host::{Canvas, CanvasConfig};

/// Draw a turtle program to an SVG file.
#[derive(Parser, Debug)]
struct Args {
    input: PathBuf,

    #[arg(short, long, default_value = "out.svg")]
    output: PathBuf,

    #[arg(long, default_value_t = 10.0)]
    margin: f64,

    #[arg(long, default_value_t = 1.0)]
    stroke_width: f64,

    #[arg(long, default_value_t = Config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let source = std::fs::read_to_string(&args.input)
        .map_err(|e| anyhow!("failed to read {}: {e}", args.input.display()))?;
    let interp = Interpreter::new(
        Builtins::default(),
        Config {
            max_depth: args.max_depth,
        },
    );
    let prog = interp.parse(&source)?;

    let mut canvas = Canvas::new();
    let res = interp.exec(&mut canvas, &prog);
    // Whatever was drawn before an evaluation error still gets saved.
    let config = CanvasConfig {
        margin: args.margin,
        stroke_width: args.stroke_width,
    };
    canvas.save(&args.output, &config)?;
    log::info!(
        "wrote {} strokes to {}",
        canvas.strokes().len(),
        args.output.display()
    );

    res?;
    Ok(())
}
