pub mod cli;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use itertools::Itertools;
use relnotes::{
    core::{
        catalog::{release_files, write_atomic},
        codec::{decode_releases, CueDecoder, DecoderConfig, PACKAGE_NAME},
        validation::Issue,
    },
    prelude::*,
};

use crate::cli::Format;

pub fn report_errors(errors: &[Issue]) {
    if !errors.is_empty() {
        eprintln!("\nInvalid release files detected!\n");
        for error in errors {
            eprintln!("{error}\n")
        }
    }
}

pub fn report_warnings(warnings: &[Issue]) {
    if !warnings.is_empty() {
        eprintln!("\nWarnings detected!\n");
        for warning in warnings {
            eprintln!("{warning}\n")
        }
    }
}

pub fn load_catalog(dir: &Path, config: &Config) -> anyhow::Result<Catalog> {
    Catalog::load_dir(dir, &config.decoder)
        .with_context(|| format!("loading releases from {}", dir.display()))
}

pub fn check(dir: &Path, config: &Config) -> anyhow::Result<Report> {
    let catalog = load_catalog(dir, config)?;
    tracing::info!(releases = catalog.len(), "checking releases");

    Ok(Validator::new(config.validation.clone()).validate_catalog(&catalog))
}

fn get<'a>(catalog: &'a Catalog, version: &ReleaseVersion) -> anyhow::Result<&'a Release> {
    catalog
        .get(version)
        .ok_or_else(|| anyhow!("no release {version} in the catalog"))
}

pub fn show(catalog: &Catalog, version: &ReleaseVersion, format: Format) -> anyhow::Result<String> {
    let release = get(catalog, version)?;

    let rendered = match format {
        Format::Markdown => render_markdown(release),
        Format::Json => render_json(release)?,
        Format::Cue => CueEncoder::encode_release(release),
        Format::Commits => render_commit_table(release),
    };

    Ok(rendered)
}

/// One line per release, newest first.
pub fn list(catalog: &Catalog) -> String {
    catalog
        .iter()
        .rev()
        .map(|release| {
            format!(
                "{}\t{}\t{} commits",
                release.version,
                release.date,
                release.commits.len()
            )
        })
        .join("\n")
}

pub fn release_stats(
    catalog: &Catalog,
    version: &ReleaseVersion,
    config: &Config,
) -> anyhow::Result<String> {
    let release = get(catalog, version)?;

    Ok(relnotes::core::render::render_stats(&stats(
        release,
        &config.bots,
    )))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Scope(String),
    Contributor(String),
    Breaking,
}

pub fn search(
    catalog: &Catalog,
    query: &SearchQuery,
    since: Option<&ReleaseVersion>,
) -> Vec<String> {
    let found = match query {
        SearchQuery::Scope(scope) => catalog.by_scope(scope),
        SearchQuery::Contributor(name) => catalog.by_contributor(name),
        SearchQuery::Breaking => catalog.breaking_changes(since, None),
    };

    found
        .into_iter()
        .filter(|(version, _)| since.map_or(true, |since| *version > since))
        .map(|(version, entry)| {
            let scopes = if entry.scopes.is_empty() {
                String::new()
            } else {
                format!("({})", entry.scopes.join(", "))
            };
            format!(
                "{version}\t{}{scopes}: {}",
                entry.change_type,
                entry.description.lines().next().unwrap_or_default()
            )
        })
        .collect()
}

/// The canonical text of one release file.
pub fn canonical_text(text: &str, decoder: &CueDecoder) -> anyhow::Result<String> {
    let mut releases = decode_releases(text, decoder)?;

    let canonical = match (releases.pop(), releases.is_empty()) {
        (Some(release), true) => CueEncoder::encode_release(&release),
        _ => format!(
            "package {PACKAGE_NAME}\n\n{}",
            CueEncoder::encode_value(&decoder.decode_document(text)?)
        ),
    };

    Ok(canonical)
}

/// Returns the files that are not in canonical form. Unless `check_only` is
/// set they are rewritten.
pub fn fmt(dir: &Path, decoder: &DecoderConfig, check_only: bool) -> anyhow::Result<Vec<PathBuf>> {
    let decoder = CueDecoder::new(*decoder);
    let mut changed = vec![];

    for path in release_files(dir)? {
        let text = fs::read_to_string(&path)?;
        let canonical = canonical_text(&text, &decoder)
            .with_context(|| format!("formatting {}", path.display()))?;

        if canonical != text {
            if !check_only {
                write_atomic(&path, &canonical)?;
                tracing::info!(path = %path.display(), "reformatted");
            }
            changed.push(path);
        }
    }

    Ok(changed)
}
