//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use propmatrix_cli::commands::{FilterArg, parse_filter, parse_sort};
use propmatrix_model::SortKey;

#[derive(Parser)]
#[command(
    name = "propmatrix",
    version,
    about = "Preview every prop combination of a component schema",
    long_about = "Inspect a component's prop schema and preview the matrix of prop combinations.\n\n\
                  Schemas are JSON dumps of a Zod object schema (v3 `_def` or v4 `_zod` layout)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Matrix configuration file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the controls a schema yields and which of them are dimensions.
    Inspect(InspectArgs),

    /// Generate, filter and sort the combination matrix.
    Matrix(MatrixArgs),

    /// Compute grid geometry and the visible row window.
    Layout(LayoutArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the schema JSON dump.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Parser)]
pub struct MatrixArgs {
    /// Path to the schema JSON dump.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Maximum number of combinations to generate (overrides the config file).
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Keep only combinations where DIM has VALUE. Repeat to allow several values.
    #[arg(long = "filter", value_name = "DIM=VALUE", value_parser = parse_filter)]
    pub filters: Vec<FilterArg>,

    /// Sort by FIELD, highest priority first. Direction defaults to asc.
    #[arg(long = "sort", value_name = "FIELD[:asc|desc]", value_parser = parse_sort)]
    pub sorts: Vec<SortKey>,

    /// Emit JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Render every combination without virtualization. Remembered for later runs.
    #[arg(long = "full-render", overrides_with = "no_full_render")]
    pub full_render: bool,

    /// Switch a remembered full-render mode off again.
    #[arg(long = "no-full-render", overrides_with = "full_render")]
    pub no_full_render: bool,

    /// Preferences file (defaults to the platform config folder).
    #[arg(long = "preferences", value_name = "PATH")]
    pub preferences: Option<PathBuf>,
}

impl MatrixArgs {
    /// Full-render change requested on the command line, if any.
    pub fn full_render_override(&self) -> Option<bool> {
        if self.full_render {
            Some(true)
        } else if self.no_full_render {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Parser)]
pub struct LayoutArgs {
    /// Container width in pixels.
    #[arg(long = "width")]
    pub width: f64,

    /// Number of visible combinations.
    #[arg(long = "items")]
    pub items: usize,

    /// Cell width in pixels (default from config).
    #[arg(long = "cell-width")]
    pub cell_width: Option<f64>,

    /// Cell height in pixels (default from config).
    #[arg(long = "cell-height")]
    pub cell_height: Option<f64>,

    /// Gap between cells in pixels (default from config).
    #[arg(long = "gap")]
    pub gap: Option<f64>,

    /// Scroll offset in pixels.
    #[arg(long = "scroll", default_value_t = 0.0)]
    pub scroll: f64,

    /// Viewport height in pixels.
    #[arg(long = "viewport", default_value_t = 600.0)]
    pub viewport: f64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
