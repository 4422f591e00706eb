use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::{ChangeType, Release, ReleaseVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseStats {
    pub version: ReleaseVersion,
    pub commits: usize,
    /// Distinct commit authors, bots excluded.
    pub contributors: usize,
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,
    /// Commits per change type.
    pub by_type: BTreeMap<ChangeType, usize>,
    pub breaking: usize,
}

pub fn is_bot(author: &str, bots: &[String]) -> bool {
    bots.iter().any(|bot| bot.eq_ignore_ascii_case(author))
}

pub fn stats(release: &Release, bots: &[String]) -> ReleaseStats {
    let contributors: BTreeSet<&str> = release
        .commits
        .iter()
        .map(|commit| commit.author.as_str())
        .filter(|author| !is_bot(author, bots))
        .collect();

    let mut by_type = BTreeMap::new();
    for commit in &release.commits {
        *by_type.entry(commit.change_type).or_insert(0) += 1;
    }

    ReleaseStats {
        version: release.version.clone(),
        commits: release.commits.len(),
        contributors: contributors.len(),
        files: saturating_sum(release.commits.iter().map(|c| c.files_count)),
        insertions: saturating_sum(release.commits.iter().map(|c| c.insertions_count)),
        deletions: saturating_sum(release.commits.iter().map(|c| c.deletions_count)),
        by_type,
        breaking: release.commits.iter().filter(|c| c.breaking_change).count(),
    }
}

fn saturating_sum(counts: impl Iterator<Item = u64>) -> u64 {
    counts.fold(0, u64::saturating_add)
}
