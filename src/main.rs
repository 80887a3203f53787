use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossword_csp::{
    find_fill, parse_structure, parse_word_list, render_grid, FillFailure, FillOptions, GridConfig,
    WordList,
};

/// Fill a crossword structure with words from a list, using each word at most once.
#[derive(Debug, Parser)]
#[command(name = "crossword-csp", version)]
struct Opt {
    /// File with one line per grid row: `_` or `.` for a fillable cell, anything else for a block
    structure: PathBuf,

    /// File with one candidate word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,

    /// Only check consistency of each choice instead of re-running arc consistency after it
    #[arg(long)]
    no_inference: bool,

    /// Give up after this many seconds
    #[arg(long, env = "CROSSWORD_TIMEOUT", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Print search statistics after the grid
    #[arg(long)]
    stats: bool,

    /// Make output more verbose, can be specified more than once
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_timeout(arg: &str) -> Result<Duration, String> {
    let secs: f64 = arg.parse().map_err(|err| format!("{err}"))?;
    Duration::try_from_secs_f64(secs).map_err(|err| format!("{err}"))
}

fn configure_logging(verbosity: u8) {
    use tracing_subscriber::layer::SubscriberExt;

    let mut directives = match verbosity {
        0 => "crossword_csp=warn",
        1 => "crossword_csp=info",
        2 => "crossword_csp=debug",
        _ => "crossword_csp=trace",
    }
    .to_string();
    // RUST_LOG wins outright, for debugging
    if let Ok(overrides) = std::env::var("RUST_LOG") {
        directives = overrides;
    }

    let env_filter = tracing_subscriber::filter::EnvFilter::new(directives);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbosity > 2);
    let sub = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(fmt_layer);
    if let Err(err) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set default logger: {err}");
    }
}

fn run(opt: &Opt) -> crossword_csp::Result<ExitCode> {
    let grid = parse_structure(&fs::read_to_string(&opt.structure)?)?;
    let words = parse_word_list(&fs::read_to_string(&opt.words)?);
    tracing::info!(
        height = grid.height(),
        width = grid.width(),
        words = words.len(),
        "loaded puzzle"
    );

    let config = GridConfig::new(grid, WordList::new(&words));
    let options = FillOptions {
        inference: !opt.no_inference,
        deadline: opt.timeout,
    };

    match find_fill(&config, &options) {
        Ok(success) => {
            let rendered = render_grid(&config.grid, &success.assignment(&config));
            println!("{rendered}");
            if opt.stats {
                println!("{:?}", success.statistics);
            }
            if let Some(output) = &opt.output {
                fs::write(output, format!("{rendered}\n"))?;
                tracing::info!(path = %output.display(), "wrote filled grid");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(FillFailure::Unsatisfiable) => {
            println!("No solution.");
            Ok(ExitCode::FAILURE)
        }
        Err(FillFailure::DeadlineExceeded) => {
            println!("Timed out before finding a solution.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    configure_logging(opt.verbose);

    match run(&opt) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(2)
        }
    }
}
