mod color;

use crate::config::{ConfigError, FilterConfig, delimiter_byte};
use crate::filter::FilterSyntax;
use clap::Parser;
pub use color::ColorMode;
use std::path::PathBuf;

/// Print selected fields of the rows in a delimited file that match a filter
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the delimited source file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Filter expression, e.g. "Company,Kalle;or(City,Boras;City,Lund)"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub filter: String,

    /// Comma-separated list of fields to print (defaults to all fields)
    #[arg(short, long, value_delimiter = ',')]
    pub select_fields: Vec<String>,

    /// Print each output line only once
    #[arg(short, long)]
    pub unique: bool,

    /// Print the field names from the header and exit
    #[arg(long)]
    pub list_fields: bool,

    /// Filter expression syntax
    #[arg(long, value_enum)]
    pub syntax: Option<FilterSyntax>,

    /// Field delimiter of the source file
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Do not check that filtered and selected fields exist in the header
    #[arg(long)]
    pub no_validate: bool,

    /// TOML file with default settings
    #[arg(long, env = "CSV_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to color diagnostics
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Settings for one run after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub file: PathBuf,
    pub filter: String,
    pub list_fields: bool,
    pub delimiter: u8,
    pub syntax: FilterSyntax,
    pub validate_fields: bool,
    pub unique: bool,
    /// Explicit selection; empty means every header field
    pub select_fields: Vec<String>,
}

impl Cli {
    pub fn settings(&self, config: &FilterConfig) -> Result<RunSettings, ConfigError> {
        let delimiter = match self.delimiter {
            Some(delimiter) => delimiter_byte(delimiter)?,
            None => config.delimiter_byte()?,
        };

        Ok(RunSettings {
            file: self.file.clone(),
            filter: self.filter.clone(),
            list_fields: self.list_fields,
            delimiter,
            syntax: self.syntax.unwrap_or(config.syntax),
            validate_fields: config.validate_fields && !self.no_validate,
            unique: self.unique || config.unique,
            select_fields: self
                .select_fields
                .iter()
                .map(|field| field.trim())
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Log level implied by -v/-q
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

pub fn cli_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
