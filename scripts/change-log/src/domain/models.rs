use chrono::{DateTime, NaiveDate, Utc};
use relnotes_core::types::ReleaseVersion;

/// A commit as reported by the hosting API, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub sha: String,
    pub message: String,
    /// Git author name, as recorded on commit records.
    pub author_name: String,
    /// GitHub account of the author, used for changelog contributors.
    pub login: Option<String>,
    pub date: DateTime<Utc>,
    pub pr_number: Option<u64>,
    pub files: u64,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub codename: String,
    pub description: String,
    pub vrl_changelog: Option<String>,
    /// Authors left out of changelog contributor lists.
    pub bots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub owner: String,
    pub repo: String,
    pub version: ReleaseVersion,
    pub date: NaiveDate,
    /// Defaults to the latest published release tag.
    pub base: Option<String>,
    pub head: String,
    /// `owner/repo` to take the VRL changelog section from. Ignored when
    /// the options already carry one.
    pub vrl_repo: Option<(String, String)>,
}
