use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcdf_proto::{modapi, plugin};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "mcdf")]
#[command(about = "DiamondFire protocol bindings toolkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered messages
    List {
        /// Use the legacy plugin message set
        #[arg(long)]
        plugin: bool,
    },
    /// Generate the markdown API reference
    Docs {
        /// Output file (defaults to MCDF_DOCS_PATH or docs/api/proto.md)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Decode a JSON packet from a file or stdin
    Decode {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Use the legacy plugin message set
        #[arg(long)]
        plugin: bool,
    },
    /// Print a JSON packet with default field values
    Template {
        /// Packet identifier, e.g. s2c_plot_info
        packet_id: String,
        /// Use the legacy plugin message set
        #[arg(long)]
        plugin: bool,
    },
    /// Show the published artifact coordinates
    Info,
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Entry point for the `mcdf` command line tool.
///
/// # Environment Variables
/// - `MCDF_DOCS_PATH`: default output path of `mcdf docs` (default: "docs/api/proto.md")
/// - `MCDF_LOG`: tracing filter directives (default: "mcdf=info,mcdf_proto=info")
///
/// A `.env` file in the working directory is loaded first when present.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = CliConfig::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(config.log_filter())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Some(Commands::List { plugin: false }) => commands::list(modapi::registry(), &mut stdout)?,
        Some(Commands::List { plugin: true }) => commands::list(plugin::registry(), &mut stdout)?,
        Some(Commands::Docs { stdout: true, .. }) => commands::print_docs(&mut stdout)?,
        Some(Commands::Docs { out, .. }) => {
            let path = out.unwrap_or_else(|| config.docs_path().to_path_buf());
            commands::write_docs(&path, &mut stdout)?;
        }
        Some(Commands::Decode { file, plugin: legacy }) => {
            let json = read_input(file)?;
            if legacy {
                commands::decode(plugin::registry(), &json, &mut stdout)?;
            } else {
                commands::decode(modapi::registry(), &json, &mut stdout)?;
            }
        }
        Some(Commands::Template {
            packet_id,
            plugin: legacy,
        }) => {
            if legacy {
                commands::template(plugin::registry(), &packet_id, &mut stdout)?;
            } else {
                commands::template(modapi::registry(), &packet_id, &mut stdout)?;
            }
        }
        Some(Commands::Info) => commands::info(&mut stdout)?,
        None => {
            writeln!(stdout, "Use 'mcdf --help' for commands")?;
        }
    }

    Ok(())
}
