use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use synthium::{
    display_error, errors::errors::Error, module::graph::ModuleGraph, parse_module,
    parser::stmt::MODULE_EXTENSION, type_checker::type_checker::TypeChecker,
};
use tracing_subscriber::{
    fmt::{format::FmtSpan, time::FormatTime},
    EnvFilter,
};

/// Log lines without a timestamp prefix
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(&self, _w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        Ok(())
    }
}

/// Synthium front end: parses and type checks a set of modules
#[derive(Parser)]
#[command(name = "synthium")]
#[command(version)]
#[command(about = "Type checks Synthium source files", long_about = None)]
struct Cli {
    /// Modules to check; imports must name one of them
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Directory whose modules are checked along with FILE
    /// [default: $SYNTHIUM_HOME/stdlib]
    #[arg(long, value_name = "DIR")]
    stdlib: Option<PathBuf>,

    /// Do not report structs that never resolve
    #[arg(long)]
    no_sweep: bool,
}

fn main() -> ExitCode {
    // Initialize tracing if SYNTHIUM_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("SYNTHIUM_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_timer(NoTimestamp)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();

    let mut paths = cli
        .stdlib
        .or_else(default_stdlib)
        .map(|dir| stdlib_files(&dir))
        .unwrap_or_default();
    paths.extend(cli.files);

    let mut sources = HashMap::new();
    let mut graph = ModuleGraph::with_capacity(paths.len());
    let mut parse_errors = vec![];

    for path in paths {
        let (path, source) = match read_source(&path) {
            Ok(read) => read,
            Err(error) => {
                println!("[error] could not open file '{}': {}", path.display(), error);
                return ExitCode::from(2);
            }
        };

        let (module, errors) = parse_module(path.clone(), &source);
        module.debug();

        parse_errors.extend(errors);
        sources.insert(path.to_string_lossy().into_owned(), source);
        graph.add(module);
    }

    report(&parse_errors, &sources, "parse");

    let mut checker = TypeChecker::new(graph).with_sweep(!cli.no_sweep);
    checker.check();
    let type_errors = checker.into_errors();

    report(&type_errors, &sources, "type");

    let total = parse_errors.len() + type_errors.len();
    ExitCode::from(total.min(u8::MAX as usize) as u8)
}

fn default_stdlib() -> Option<PathBuf> {
    std::env::var_os("SYNTHIUM_HOME").map(|home| PathBuf::from(home).join("stdlib"))
}

/// Every module directly inside `dir`, sorted by path.
fn stdlib_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(dir = %dir.display(), %error, "stdlib not loaded");
            return vec![];
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == MODULE_EXTENSION)
        })
        .collect();
    files.sort();
    files
}

fn read_source(path: &Path) -> std::io::Result<(PathBuf, String)> {
    let path = path.canonicalize()?;
    let source = fs::read_to_string(&path)?;
    Ok((path, source))
}

fn report(errors: &[Error], sources: &HashMap<String, String>, stage: &str) {
    if errors.is_empty() {
        return;
    }

    for error in errors {
        let file = error.get_position().1.as_str();
        let source = sources.get(file).map(String::as_str).unwrap_or_default();
        display_error(error, source);
        println!();
    }

    println!("{} {} errors found", errors.len(), stage);
}
