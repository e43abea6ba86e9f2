mod generate;
mod inspect;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as emit_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pg-replay")]
#[command(version)]
#[command(about = "Convert PostgreSQL COPY dumps into replayable INSERT scripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an import script from a dump file
    Generate {
        /// Input dump file
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// Output SQL file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rows per INSERT statement
        #[arg(long, default_value_t = 100)]
        batch_size: usize,

        /// YAML file overriding the truncate/insert table orders
        #[arg(long)]
        order_config: Option<PathBuf>,

        /// Leave these tables out of the script entirely (comma-separated)
        #[arg(long)]
        skip_tables: Option<String>,

        /// Show progress while parsing
        #[arg(short, long)]
        progress: bool,

        /// Parse and report without writing output (dry run)
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse a dump and report per-table row counts
    Inspect {
        /// Input dump file
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// Output results as JSON instead of human-readable text
        #[arg(long)]
        json: bool,

        /// Show progress while parsing
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            file,
            output,
            batch_size,
            order_config,
            skip_tables,
            progress,
            dry_run,
        } => generate::run(
            file,
            output,
            batch_size,
            order_config,
            skip_tables,
            progress,
            dry_run,
        ),
        Commands::Inspect {
            file,
            json,
            progress,
        } => inspect::run(file, json, progress),
        Commands::Completions { shell } => {
            emit_completions(shell, &mut Cli::command(), "pg-replay", &mut io::stdout());
            Ok(())
        }
    }
}
