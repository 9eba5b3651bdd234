pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod source;

use std::io::{self, BufWriter, Write};

pub use cli::{Cli, ColorMode, RunSettings, cli_parse};
pub use config::{ConfigError, FilterConfig, load_config};
pub use error::AppError;
pub use filter::{FilterExpression, FilterParseError, FilterSyntax, UnknownFieldsError};
pub use output::{UniqueLines, project};
pub use source::{Dataset, Record, SourceError, load_dataset};

/// Counts from one pass over the dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub matched: usize,
    pub printed: usize,
}

fn init_logging(level: log::LevelFilter) {
    // RUST_LOG, when set, wins over -v/-q
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn write_line<W: Write>(out: &mut W, line: &str) -> Result<(), AppError> {
    writeln!(out, "{}", line).map_err(AppError::Output)
}

/// Load the source, apply the filter and write the projected lines to `out`.
///
/// Validation failures and parse errors are returned before anything is
/// written.
pub fn execute<W: Write>(settings: &RunSettings, out: &mut W) -> Result<RunSummary, AppError> {
    let dataset = load_dataset(&settings.file, settings.delimiter)?;
    log::info!(
        "Loaded {} record(s) with {} field(s) from {}",
        dataset.records().len(),
        dataset.header().len(),
        settings.file.display()
    );

    if settings.list_fields {
        for field in dataset.header() {
            write_line(out, field)?;
        }
        out.flush().map_err(AppError::Output)?;
        return Ok(RunSummary::default());
    }

    let expr = FilterExpression::parse(&settings.filter, settings.syntax)?;
    log::debug!("Parsed filter ({:?}): {:?}", settings.syntax, expr);

    let selection: &[String] = if settings.select_fields.is_empty() {
        dataset.header()
    } else {
        &settings.select_fields
    };

    if settings.validate_fields {
        filter::validate_fields(&expr, selection, dataset.header())?;
    } else {
        for field in filter::unknown_fields(&expr, selection, dataset.header()) {
            log::warn!("Field '{}' does not exist in the file header", field);
        }
    }

    let mut summary = RunSummary {
        total: dataset.records().len(),
        ..RunSummary::default()
    };
    let mut printed_lines = UniqueLines::new();

    for record in filter::filter_records(dataset.records(), &expr) {
        summary.matched += 1;
        let line = project(record, selection);
        if settings.unique && !printed_lines.admit(&line) {
            continue;
        }
        write_line(out, &line)?;
        summary.printed += 1;
    }
    out.flush().map_err(AppError::Output)?;

    log::info!(
        "{} of {} record(s) matched, {} line(s) printed",
        summary.matched,
        summary.total,
        summary.printed
    );
    Ok(summary)
}

pub fn run() -> Result<(), AppError> {
    let cli = cli_parse()?;
    cli.color.apply();
    init_logging(cli.log_level());

    let config = load_config(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        log::info!("Using config file {}", path.display());
    }
    let settings = cli.settings(&config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match execute(&settings, &mut out) {
        Ok(_) => Ok(()),
        Err(AppError::Output(err)) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err),
    }
}
