use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use commands::IdentityArgs;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "hapregion")]
#[command(about = "hapregion - region BEDs and plotting-ready gene tracks from haplotype alignments")]
#[command(version)]
#[command(long_about = "
hapregion turns the alignments of a region of interest against a haplotype
assembly into a single region BED, then re-projects gene annotations into
that region's local coordinates for plotting.

Examples:
  hapregion resolve --paf rgn1_HG002_h1.paf --index rgn1.fa.fai \\
      --region rgn1 --sample HG002 --hap h1 --out rgn1_HG002_h1.bed
  hapregion project --loc-bed rgn1_HG002_h1.bed --gene-bed rgn1_HG002_h1.genes.bed \\
      --region rgn1 --sample HG002 --hap h1 --out rgn1_HG002_h1.plot.bed
  hapregion config --example
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge a region's alignments into one BED interval, or a Fail: line
    Resolve {
        /// Alignments of the region against one haplotype (PAF, optionally .gz)
        #[arg(long, required = true)]
        paf: PathBuf,

        /// Number of alignments the region must produce
        #[arg(long, conflicts_with = "index")]
        expected: Option<usize>,

        /// Sequence index of the region; its record count is the expected alignment count
        #[arg(long)]
        index: Option<PathBuf>,

        #[command(flatten)]
        identity: IdentityArgs,

        /// Output BED file
        #[arg(short, long, required = true)]
        out: PathBuf,

        /// Also print the resolution as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Re-project gene coordinates into a resolved region's local space
    Project {
        /// Location BED written by `hapregion resolve`
        #[arg(long, required = true)]
        loc_bed: PathBuf,

        /// Gene features overlapping the region (BED6 or wider)
        #[arg(long, required = true)]
        gene_bed: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,

        /// Output BED file
        #[arg(short, long, required = true)]
        out: PathBuf,
    },

    /// Show or write the configuration
    Config {
        /// Print the default configuration as TOML
        #[arg(long)]
        example: bool,

        /// Write the default configuration to this file instead of stdout
        #[arg(short, long, requires = "example")]
        out: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    match cli.command {
        Commands::Resolve {
            paf,
            expected,
            index,
            identity,
            out,
            json,
        } => {
            commands::resolve::execute(&config, paf, expected, index, identity, out, json)?;
        }

        Commands::Project {
            loc_bed,
            gene_bed,
            identity,
            out,
        } => {
            commands::project::execute(&config, loc_bed, gene_bed, identity, out)?;
        }

        Commands::Config { example, out } => {
            commands::show_config(&config, example, out)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
