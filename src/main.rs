//! Command-line front end.
//!
//! Usage: `lsys <input> [--output FILE] [--format svg|json] [--seed N]`

use clap::{Parser, ValueEnum};
use lsys_turtle::{
    RenderConfig, RewriteConfig, Rewriter, Specification, SvgConfig, TurtleRenderer,
    format_symbols, parse, write_svg,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lsys")]
#[command(about = "Rewrite and render a stochastic L-System description")]
struct Args {
    /// Path to the L-System source file
    input: PathBuf,

    /// Output file; defaults to the input path with the format's extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Seed for rule selection and `random()`; omitted means a fresh OS seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pixels per drawing unit in SVG output
    #[arg(long, default_value_t = 50.0)]
    scale: f64,

    /// Longest L-string a generation may produce
    #[arg(long)]
    max_symbols: Option<usize>,

    /// Print the final L-string to stdout
    #[arg(long)]
    print_lstring: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn timed<T>(stage: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    info!("{} finished in {:.2?}", stage, start.elapsed());
    out
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(&args.input)
        .map_err(|e| format!("Failed to read {}: {}", args.input.display(), e))?;

    info!("Parsing '{}'...", args.input.display());
    let root = timed("parsing", || parse(&source))?;
    let spec = timed("specification", || Specification::build(&root))?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut ctx = spec.create_context(rng);

    let mut rewrite_config = RewriteConfig::default();
    if let Some(max_symbols) = args.max_symbols {
        rewrite_config.max_symbols = max_symbols;
    }
    let mut rewriter = Rewriter::new(&spec, rewrite_config);
    timed("rewriting", || rewriter.iterate(&mut ctx).map(|_| ()))?;
    info!(
        "L-string after {} generation(s): {} symbols",
        rewriter.generations(),
        rewriter.lstring().len()
    );
    if args.print_lstring {
        println!("{}", format_symbols(rewriter.lstring()));
    }

    let renderer = TurtleRenderer::new(RenderConfig::default());
    let drawing = timed("rendering", || renderer.render(&spec, rewriter.lstring(), &ctx))?;
    info!(
        "Rendered {} segment(s), complexity rating {}",
        drawing.segments.len(),
        drawing.complexity_rating
    );

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension(args.format.extension()));
    let contents = timed("serialization", || match args.format {
        Format::Svg => Ok(write_svg(
            &drawing,
            &SvgConfig {
                scale: args.scale,
                ..SvgConfig::default()
            },
        )),
        Format::Json => serde_json::to_string_pretty(&drawing),
    })?;
    fs::write(&output_path, contents)
        .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;
    info!("Wrote {}", output_path.display());
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
