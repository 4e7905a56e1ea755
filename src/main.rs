use anyhow::Context;
use clap::{Parser, Subcommand};
use convset::download::{self, DownloadOptions};
use convset::inspect;
use convset_core::config::Config;
use convset_sources::Sources;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convset", about = "Download, normalize and inspect conversational datasets")]
struct Cli {
    /// Config file layered over the built-in defaults
    /// (default: ~/.config/convset/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory datasets are written to and inspected in (overrides `output.dir`).
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log at debug level to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the configured datasets into the output directory.
    Download {
        /// Only download the named catalog entries (repeatable).
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,
        /// Cap every dataset at N records, overriding `max_records`.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Summarize every dataset document in the output directory.
    Inspect,
    /// Print the configured dataset catalog.
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load config file, using defaults");
            Config::defaults()
        }),
    };
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }

    match cli.command {
        Command::Download { only, limit } => {
            let specs = config
                .select(&only)
                .map_err(|unknown| anyhow::anyhow!("unknown dataset(s): {}", unknown.join(", ")))?;
            let options = DownloadOptions {
                output_dir: config.output.dir.clone(),
                indent: config.output.indent,
                limit,
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("starting async runtime")?;
            let report = runtime.block_on(async {
                let sources = Sources::new(&config.hub)?;
                anyhow::Ok(download::run(&sources, &specs, &options).await)
            })?;
            print!("{report}");
        }
        Command::Inspect => {
            let report = inspect::run(&config.output.dir);
            print!("{report}");
        }
        Command::List => print_catalog(&config),
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn print_catalog(config: &Config) {
    println!("Output directory: {}", config.output.dir.display());
    println!();
    println!("{:<32} {:<44} {:<10} {:>8}", "NAME", "ID", "SPLIT", "MAX");
    for spec in &config.datasets {
        let max = spec
            .max_records
            .map_or_else(|| "all".to_string(), |n| n.to_string());
        let streaming = if spec.streaming { " (streaming)" } else { "" };
        println!(
            "{:<32} {:<44} {:<10} {:>8}{streaming}",
            spec.name, spec.id, spec.split, max
        );
        if let Some(description) = &spec.description {
            println!("    {description}");
        }
    }
}
