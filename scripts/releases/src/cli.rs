use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use relnotes::types::ReleaseVersion;

#[derive(Parser)]
#[command(about = "Queries and checks the release-notes database.")]
pub struct Cli {
    /// Directory holding the `<version>.cue` release files
    #[arg(short, long, default_value = "releases")]
    pub dir: PathBuf,

    /// TOML file with `[decoder]`, `[validation]` and `bots` settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Load and validate every release file.
    Check,
    Show {
        version: ReleaseVersion,
        #[arg(short, long, default_value = "markdown")]
        format: Format,
    },
    List,
    Stats {
        version: ReleaseVersion,
    },
    /// Rewrite release files in canonical form.
    Fmt {
        /// Only report files that are not formatted.
        #[arg(long, action)]
        check: bool,
    },
    Search {
        #[arg(long, conflicts_with_all = ["contributor", "breaking"])]
        scope: Option<String>,
        #[arg(long, conflicts_with = "breaking")]
        contributor: Option<String>,
        #[arg(long, action)]
        breaking: bool,
        /// Only releases newer than this one.
        #[arg(long)]
        since: Option<ReleaseVersion>,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum, PartialEq)]
pub enum Format {
    Markdown,
    Json,
    Cue,
    Commits,
}
