//! `changelog.d` fragments: one Markdown file per user-facing change, named
//! `<pr_number>_<slug>.<kind>.md`.

use std::{fmt, fs, path::Path, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{
    errors::{error, Error, Result},
    ChangeType, ChangelogEntry,
};

static FILE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<pr>\d+)_(?P<slug>[A-Za-z0-9_-]+)\.(?P<kind>[a-z]+)\.md$").unwrap()
});

const AUTHORS_PREFIX: &str = "authors:";
const IGNORED_FILES: [&str; 1] = ["README.md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Feature,
    Enhancement,
    Fix,
    Security,
    Deprecation,
    Breaking,
}

impl FragmentKind {
    const ALL: [FragmentKind; 6] = [
        FragmentKind::Feature,
        FragmentKind::Enhancement,
        FragmentKind::Fix,
        FragmentKind::Security,
        FragmentKind::Deprecation,
        FragmentKind::Breaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Feature => "feature",
            FragmentKind::Enhancement => "enhancement",
            FragmentKind::Fix => "fix",
            FragmentKind::Security => "security",
            FragmentKind::Deprecation => "deprecation",
            FragmentKind::Breaking => "breaking",
        }
    }
}

impl FromStr for FragmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FragmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                error!(
                    InvalidType,
                    "unknown fragment kind `{}`, expected one of: {}",
                    s,
                    FragmentKind::ALL.map(|kind| kind.as_str()).join(", ")
                )
            })
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub pr_number: u64,
    pub slug: String,
    pub kind: FragmentKind,
    pub description: String,
    pub authors: Vec<String>,
}

impl Fragment {
    pub fn parse(file_name: &str, contents: &str) -> Result<Self> {
        let captures = FILE_NAME_REGEX.captures(file_name).ok_or_else(|| {
            error!(
                InvalidData,
                "fragment name `{}` does not match `<pr_number>_<slug>.<kind>.md`", file_name
            )
        })?;

        let pr_number = captures["pr"].parse::<u64>()?;
        let kind = captures["kind"].parse()?;
        let (description, authors) = split_authors(contents.trim());
        if description.is_empty() {
            return Err(error!(InvalidData, "fragment `{}` is empty", file_name));
        }

        Ok(Self {
            pr_number,
            slug: captures["slug"].to_string(),
            kind,
            description,
            authors,
        })
    }

    pub fn into_entry(self) -> ChangelogEntry {
        let entry = match self.kind {
            FragmentKind::Feature => ChangelogEntry::new(ChangeType::Feat, self.description),
            FragmentKind::Enhancement => {
                ChangelogEntry::new(ChangeType::Enhancement, self.description)
            }
            FragmentKind::Fix => ChangelogEntry::new(ChangeType::Fix, self.description),
            FragmentKind::Security => {
                ChangelogEntry::new(ChangeType::Fix, self.description).with_scopes(["security"])
            }
            FragmentKind::Deprecation => ChangelogEntry::new(ChangeType::Chore, self.description)
                .with_scopes(["deprecations"]),
            FragmentKind::Breaking => {
                ChangelogEntry::new(ChangeType::Chore, self.description).breaking()
            }
        };

        entry
            .with_contributors(self.authors)
            .with_pr_numbers([self.pr_number])
    }
}

fn split_authors(contents: &str) -> (String, Vec<String>) {
    let (body, last_line) = match contents.rsplit_once('\n') {
        Some((body, last_line)) => (body, last_line),
        None => ("", contents),
    };

    match last_line.trim().strip_prefix(AUTHORS_PREFIX) {
        Some(authors) => {
            let authors = authors
                .split_whitespace()
                .map(|author| author.trim_start_matches('@').to_string())
                .collect();
            (body.trim().to_string(), authors)
        }
        None => (contents.to_string(), vec![]),
    }
}

/// Reads every fragment in `dir`, ordered by file name.
pub fn load_fragments(dir: impl AsRef<Path>) -> Result<Vec<Fragment>> {
    let dir = dir.as_ref();
    let mut paths = fs::read_dir(dir)
        .map_err(|e| Error::from(e).in_file(dir))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    paths
        .into_iter()
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let file_name = path.file_name()?.to_str()?.to_string();
            let is_fragment = file_name.ends_with(".md") && !IGNORED_FILES.contains(&file_name.as_str());

            is_fragment.then_some((path, file_name))
        })
        .map(|(path, file_name)| {
            let contents = fs::read_to_string(&path).map_err(|e| Error::from(e).in_file(&path))?;
            Fragment::parse(&file_name, &contents).map_err(|e| e.in_file(&path))
        })
        .collect()
}
