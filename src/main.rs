use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, Log};

use relex::prelude::{compile, parse};
use relex::render_lexer;

/// relex - generate a DFA-driven lexer from a declarative specification
#[derive(Parser, Debug)]
#[command(name = "relex", version, about)]
struct Args {
    /// Specification file to compile
    #[arg(short = 'f', value_name = "SPEC")]
    file: PathBuf,

    /// Path of the generated lexer source
    #[arg(short = 'o', value_name = "OUT")]
    output: PathBuf,

    /// Print pipeline diagnostics; repeat for per-stage tables
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    Logger::init(args.verbose);

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let spec = parse(&source)?;
    debug!("parsed {} rules", spec.rules.len());

    let dfa = compile(&spec.rules)?;
    debug!("compiled recognizer with {} states", dfa.len());

    let rendered = render_lexer(&spec, &dfa)?;
    fs::write(&args.output, rendered)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}

/// The simplest possible logger: straight to stderr, filtered only by the
/// global max level set from the verbosity flag.
#[derive(Debug)]
struct Logger(());

static LOGGER: Logger = Logger(());

impl Logger {
    fn init(verbosity: u8) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(match verbosity {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            });
        }
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("{}|{}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}
