//! Prop-combination matrix CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use propmatrix_cli::commands::{
    LayoutInput, inspect, layout, load_config, load_schema, matrix, story_title,
};
use propmatrix_cli::logging::{LogConfig, LogFormat, init_logging};
use propmatrix_cli::preferences::open_preferences;
use propmatrix_cli::summary::{print_inspect, print_layout, print_matrix};
use propmatrix_core::CellSize;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Inspect(args) => {
            let schema = load_schema(&args.schema)?;
            print_inspect(&inspect(&schema)?);
        }
        Command::Matrix(args) => {
            if let Some(limit) = args.limit {
                config.limit = limit;
            }
            let schema = load_schema(&args.schema)?;
            let title = story_title(&args.schema);
            let report = matrix(
                &title,
                schema,
                &config,
                &args.filters,
                &args.sorts,
                open_preferences(args.preferences.as_deref()),
                args.full_render_override(),
            )?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_matrix(&report);
            }
        }
        Command::Layout(args) => {
            let mut input = LayoutInput::from_config(args.width, args.items, &config);
            input.cell = CellSize::new(
                args.cell_width.unwrap_or(input.cell.width),
                args.cell_height.unwrap_or(input.cell.height),
            );
            input.gap = args.gap.unwrap_or(input.gap);
            input.scroll = args.scroll;
            input.viewport = args.viewport;
            print_layout(&layout(&input));
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default().with_level_filter(cli.verbosity.tracing_level_filter());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
