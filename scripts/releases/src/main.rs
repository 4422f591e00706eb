use std::process::ExitCode;

use clap::Parser;
use relnotes::prelude::Config;
use releases::{
    check,
    cli::{Cli, Command},
    fmt, list, load_catalog, release_stats, report_errors, report_warnings, search, show,
    SearchQuery,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Check => {
            let report = check(&cli.dir, &config)?;
            report_warnings(&report.warnings);
            report_errors(&report.errors);

            if !report.is_ok() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Show { version, format } => {
            let catalog = load_catalog(&cli.dir, &config)?;
            println!("{}", show(&catalog, &version, format)?);
        }
        Command::List => {
            let catalog = load_catalog(&cli.dir, &config)?;
            println!("{}", list(&catalog));
        }
        Command::Stats { version } => {
            let catalog = load_catalog(&cli.dir, &config)?;
            println!("{}", release_stats(&catalog, &version, &config)?);
        }
        Command::Fmt { check } => {
            let changed = fmt(&cli.dir, &config.decoder, check)?;
            for path in &changed {
                println!("{}", path.display());
            }

            if check && !changed.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Search {
            scope,
            contributor,
            breaking,
            since,
        } => {
            let query = match (scope, contributor, breaking) {
                (Some(scope), _, _) => SearchQuery::Scope(scope),
                (None, Some(name), _) => SearchQuery::Contributor(name),
                (None, None, true) => SearchQuery::Breaking,
                (None, None, false) => {
                    anyhow::bail!("one of --scope, --contributor or --breaking is required")
                }
            };

            let catalog = load_catalog(&cli.dir, &config)?;
            for line in search(&catalog, &query, since.as_ref()) {
                println!("{line}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
