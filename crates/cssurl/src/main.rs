//! cssurl - Main entry point

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cssurl_core::JoinName;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cssurl")]
#[command(version)]
#[command(about = "Rewrite url() references in compiled CSS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the urls of a CSS file
    Rewrite {
        #[command(flatten)]
        common: CommonArgs,

        /// Write output to FILE (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Write a source map for the output to OUTPUT.map
        #[arg(long)]
        source_map: bool,

        /// Do not print warnings
        #[arg(long)]
        silent: bool,
    },

    /// Show where each url would be resolved from, without writing anything
    Inspect {
        #[command(flatten)]
        common: CommonArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Arguments shared by every command
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input CSS file
    pub input: String,

    /// Source map for the input (default: the map referenced from the CSS)
    #[arg(long)]
    pub map: Option<String>,

    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<String>,

    /// Directory relative output is expressed against (default: the input's directory)
    #[arg(long)]
    pub context: Option<String>,

    /// Base directory for root-relative urls
    #[arg(long)]
    pub root: Option<String>,

    /// Emit absolute paths
    #[arg(long)]
    pub absolute: bool,

    /// Keep ?query and #hash suffixes
    #[arg(long)]
    pub keep_query: bool,

    /// Join strategy
    #[arg(long, value_enum)]
    pub join: Option<JoinArg>,

    /// Ancestor directories tried by the search join
    #[arg(long)]
    pub search_depth: Option<usize>,

    /// Log the directories tried for every url
    #[arg(long)]
    pub debug: bool,

    /// Fail when the input has no source map
    #[arg(long)]
    pub require_source_map: bool,

    /// Convert CRLF line endings to LF
    #[arg(long)]
    pub remove_cr: bool,
}

/// Join strategies selectable on the command line
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum JoinArg {
    /// Join and normalize
    Default,
    /// Also try ancestor directories
    Search,
}

impl JoinArg {
    pub fn as_join_name(self) -> JoinName {
        match self {
            JoinArg::Default => JoinName::Default,
            JoinArg::Search => JoinName::Search,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cssurl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rewrite {
            common,
            output,
            source_map,
            silent,
        } => commands::rewrite::execute(commands::rewrite::RewriteArgs {
            common,
            output,
            source_map,
            silent,
        }),
        Commands::Inspect { common, json } => {
            commands::inspect::execute(commands::inspect::InspectArgs { common, json })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_values_parsed_by_clap() {
        let cli = Cli::try_parse_from(["cssurl", "rewrite", "main.css", "--join", "search"]).unwrap();
        let Commands::Rewrite { common, .. } = cli.command else {
            panic!("expected rewrite");
        };
        assert_eq!(common.join, Some(JoinArg::Search));
        assert_eq!(JoinArg::Search.as_join_name(), JoinName::Search);
    }

    #[test]
    fn test_unknown_join_is_rejected() {
        let err = Cli::try_parse_from(["cssurl", "inspect", "main.css", "--join", "nearest"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
