use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    types::{ChangelogEntry, CommitRecord, CommitSha, Release, ReleaseVersion},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Scopes changelog entries may use. Empty means anything goes.
    pub known_scopes: Vec<String>,
    pub require_commits: bool,
    /// How far past the release date a commit may be dated.
    pub max_commit_lag_days: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            known_scopes: vec![],
            require_commits: false,
            max_commit_lag_days: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub location: String,
    pub message: String,
}

impl Issue {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn extend(&mut self, other: Report) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.errors.push(Issue::new(location, message));
    }

    fn warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Issue::new(location, message));
    }
}

/// Content checks that go beyond what decoding already enforces.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_release(&self, release: &Release) -> Report {
        let mut report = Report::default();

        for (idx, entry) in release.changelog.iter().enumerate() {
            let location = format!("{} changelog[{idx}]", release.version);
            self.check_entry(&mut report, &location, entry);
        }

        let mut seen = HashSet::new();
        for (idx, commit) in release.commits.iter().enumerate() {
            let location = format!("{} commits[{idx}] ({})", release.version, commit.sha.short());
            if !seen.insert(commit.sha) {
                report.error(&location, format!("commit {} is listed twice", commit.sha));
            }
            self.check_commit(&mut report, &location, release, commit);
        }

        let location = release.version.to_string();
        if self.config.require_commits && release.commits.is_empty() {
            report.warning(&location, "release has no commits");
        }

        let has_breaking_commit = release.commits.iter().any(|commit| commit.breaking_change);
        let has_breaking_entry = release.changelog.iter().any(|entry| entry.breaking);
        if has_breaking_commit && !has_breaking_entry {
            report.warning(
                &location,
                "release has breaking commits but no breaking changelog entry",
            );
        }

        report
    }

    pub fn validate_catalog(&self, catalog: &Catalog) -> Report {
        let mut report = Report::default();

        for release in catalog.iter() {
            report.extend(self.validate_release(release));
            check_origin(&mut report, catalog, &release.version);
        }

        let mut first_seen: BTreeMap<CommitSha, &ReleaseVersion> = BTreeMap::new();
        for release in catalog.iter() {
            for commit in &release.commits {
                match first_seen.get(&commit.sha) {
                    Some(earlier) if **earlier != release.version => report.warning(
                        release.version.to_string(),
                        format!("commit {} was already released in {earlier}", commit.sha),
                    ),
                    Some(_) => {}
                    None => {
                        first_seen.insert(commit.sha, &release.version);
                    }
                }
            }
        }

        let ordered: Vec<&Release> = catalog.iter().collect();
        for pair in ordered.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if current.date < previous.date {
                report.warning(
                    current.version.to_string(),
                    format!(
                        "released on {} which is before {} ({})",
                        current.date, previous.version, previous.date
                    ),
                );
            }
        }

        report
    }

    fn check_entry(&self, report: &mut Report, location: &str, entry: &ChangelogEntry) {
        if entry.description.trim().is_empty() {
            report.error(location, "description is empty");
        }
        if entry.pr_numbers.contains(&0) {
            report.error(location, "PR number 0 is not valid");
        }
        if entry.contributors.iter().any(|c| c.trim().is_empty()) {
            report.error(location, "contributor names must not be empty");
        }

        for scope in &entry.scopes {
            if scope.trim().is_empty() {
                report.error(location, "scopes must not be empty");
            } else if !self.config.known_scopes.is_empty()
                && !self.config.known_scopes.contains(scope)
            {
                report.error(location, format!("unknown scope `{scope}`"));
            }
        }
    }

    fn check_commit(
        &self,
        report: &mut Report,
        location: &str,
        release: &Release,
        commit: &CommitRecord,
    ) {
        if commit.description.trim().is_empty() {
            report.error(location, "description is empty");
        }
        if commit.author.trim().is_empty() {
            report.error(location, "author is empty");
        }
        if commit.pr_number == Some(0) {
            report.error(location, "PR number 0 is not valid");
        }
        if commit.scopes.iter().any(|s| s.trim().is_empty()) {
            report.error(location, "scopes must not be empty");
        }
        if commit.files_count == 0 && commit.lines_changed() > 0 {
            report.error(
                location,
                format!(
                    "{} lines changed across 0 files",
                    commit.lines_changed()
                ),
            );
        }

        // A lag too large to represent means commits are never late.
        let latest = Duration::try_days(self.config.max_commit_lag_days.max(0))
            .and_then(|lag| release.date.checked_add_signed(lag));
        if latest.is_some_and(|latest| commit.date.date_naive() > latest) {
            report.warning(
                location,
                format!(
                    "committed on {} which is after the release date {}",
                    commit.date, release.date
                ),
            );
        }
    }
}

fn check_origin(report: &mut Report, catalog: &Catalog, version: &ReleaseVersion) {
    for origin in catalog.origins(version) {
        let stem = origin
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        if stem != version.to_string() {
            report.error(
                version.to_string(),
                format!(
                    "defined in {} but release files must be named `{version}.cue`",
                    origin.display()
                ),
            );
        }
    }
}
