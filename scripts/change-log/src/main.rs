use std::{fs, path::PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use relnotes_core::{config::Config, fragments::load_fragments, types::ReleaseVersion};
use tracing_subscriber::EnvFilter;

use change_log::{
    adapters::{file_release_writer::FileReleaseWriter, octocrab::OctocrabAdapter},
    domain::{
        generate::generate,
        models::{BuildOptions, GenerateRequest},
        vrl::latest_vrl_section,
    },
};

#[derive(Parser)]
#[command(about = "Generates the release record for a new version from the commits since the last release.")]
struct Cli {
    /// Version being released, e.g. `0.20.0`
    version: ReleaseVersion,

    /// Ref to compare from. Defaults to the latest published release tag.
    #[arg(long)]
    base: Option<String>,

    #[arg(long, default_value = "master")]
    head: String,

    /// Release date, defaults to today (UTC).
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, default_value = "releases")]
    releases_dir: PathBuf,

    /// Directory of `<pr>_<slug>.<kind>.md` changelog fragments.
    #[arg(long)]
    fragments_dir: Option<PathBuf>,

    /// Also write the rendered notes to this file.
    #[arg(long)]
    markdown: Option<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    codename: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// VRL `CHANGELOG.md` to take the newest section from.
    #[arg(long, conflicts_with = "vrl_repo")]
    vrl_changelog: Option<PathBuf>,

    /// Fetch the VRL changelog from the latest tag of this `owner/repo`,
    /// e.g. `vectordotdev/vrl`.
    #[arg(long, value_parser = parse_repo)]
    vrl_repo: Option<(String, String)>,

    #[arg(long, env = "GITHUB_REPOSITORY_OWNER")]
    owner: String,

    #[arg(long, env = "GITHUB_REPOSITORY_NAME")]
    repo: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,
}

fn parse_repo(text: &str) -> Result<(String, String), String> {
    match text.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(format!("`{text}` is not of the form `owner/repo`")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let fragments = match &cli.fragments_dir {
        Some(dir) => load_fragments(dir)
            .with_context(|| format!("loading fragments from {}", dir.display()))?,
        None => vec![],
    };

    let vrl_changelog = match &cli.vrl_changelog {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some(latest_vrl_section(&text)?)
        }
        None => None,
    };

    let options = BuildOptions {
        codename: cli.codename.unwrap_or_default(),
        description: cli.description.unwrap_or_default(),
        vrl_changelog,
        bots: config.bots,
    };

    let request = GenerateRequest {
        owner: cli.owner,
        repo: cli.repo,
        version: cli.version,
        date: cli.date.unwrap_or_else(|| Utc::now().date_naive()),
        base: cli.base,
        head: cli.head,
        vrl_repo: cli.vrl_repo,
    };

    let github = OctocrabAdapter::new(&cli.token)?;
    let mut writer = FileReleaseWriter::new(cli.releases_dir);
    if let Some(markdown) = cli.markdown {
        writer = writer.with_markdown(markdown);
    }

    generate(&github, &writer, &request, fragments, &options).await?;

    Ok(())
}
