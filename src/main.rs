mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pwmeter::GenerationConfig;
use std::io;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, Registry, prelude::*};

#[derive(Parser)]
#[command(
    name = "pwmeter",
    version,
    author,
    about = "Check password strength and generate strong passwords"
)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "check")]
    mode: Mode,

    /// Read the password from standard input instead of prompting
    #[arg(long)]
    stdin: bool,

    /// Echo the entered password back
    #[arg(long)]
    show: bool,

    /// Length of the generated password
    #[arg(short, long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(8..=32))]
    length: u8,

    #[arg(long)]
    no_symbols: bool,

    #[arg(long)]
    no_numbers: bool,

    /// Print only the result
    #[arg(short, long)]
    quiet: bool,

    #[arg(long, value_enum, env = "PWMETER_LOG_FORMAT", default_value = "compact")]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Mode {
    Check,
    Generate,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum LogFormat {
    Compact,
    Pretty,
    Json,
}

fn init_logging(format: LogFormat) -> Result<()> {
    let logger = match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .boxed(),
    };

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;

    let collector = Registry::default().with(logger).with(env_filter);
    tracing::subscriber::set_global_default(collector)?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format)?;

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    match cli.mode {
        Mode::Check => {
            let password = if cli.stdin {
                ui::read_password_line(io::stdin().lock())?
            } else {
                ui::prompt_password()?
            };

            let evaluation = pwmeter::evaluate(&password);
            info!(score = evaluation.score, "password evaluated");

            ui::display_evaluation(&password, &evaluation, cli.show, &options);
        }
        Mode::Generate => {
            let config = GenerationConfig {
                length: usize::from(cli.length),
                include_symbols: !cli.no_symbols,
                include_numbers: !cli.no_numbers,
            };
            debug!(?config, "generation requested");

            let (password, elapsed) =
                ui::show_progress(options.unicode_support, "Generating password...", || {
                    Ok(pwmeter::generate(&config)?)
                })?;
            info!(elapsed_ms = elapsed.as_millis() as u64, "password generated");

            ui::display_generated(&password, &config, elapsed, &options);
        }
    }

    Ok(())
}
