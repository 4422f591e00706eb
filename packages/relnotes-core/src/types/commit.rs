use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    traits::{CueConvertible, FieldReader},
    types::{
        errors::{Error, Result},
        ChangeType, CommitSha, Fields, Value,
    },
};

pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Commit timestamp, always stored and written in UTC as `YYYY-MM-DD HH:MM:SS UTC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitDate(DateTime<Utc>);

impl CommitDate {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn date_naive(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

impl FromStr for CommitDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let naive = s.strip_suffix(" UTC").ok_or_else(|| {
            crate::error!(InvalidData, "commit date `{}` must end in ` UTC`", s)
        })?;
        let naive = NaiveDateTime::parse_from_str(naive, COMMIT_DATE_FORMAT)?;

        Ok(Self(naive.and_utc()))
    }
}

impl fmt::Display for CommitDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} UTC", self.0.format(COMMIT_DATE_FORMAT))
    }
}

impl Serialize for CommitDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CommitDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl CueConvertible for CommitDate {
    fn from_value(value: Value) -> Result<Self> {
        String::from_value(value)?.parse()
    }

    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

/// Metadata of one version-control commit as captured for release notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: CommitSha,
    pub date: CommitDate,
    pub description: String,
    pub pr_number: Option<u64>,
    pub scopes: Vec<String>,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub breaking_change: bool,
    pub author: String,
    pub files_count: u64,
    pub insertions_count: u64,
    pub deletions_count: u64,
}

impl CommitRecord {
    pub fn lines_changed(&self) -> u64 {
        self.insertions_count + self.deletions_count
    }
}

impl CueConvertible for CommitRecord {
    fn from_value(value: Value) -> Result<Self> {
        let mut reader = FieldReader::new(value)?;

        let commit = CommitRecord {
            sha: reader.required("sha")?,
            date: reader.required("date")?,
            description: reader.required("description")?,
            pr_number: reader.or_default("pr_number")?,
            scopes: reader.or_default("scopes")?,
            change_type: reader.required("type")?,
            breaking_change: reader.or_default("breaking_change")?,
            author: reader.required("author")?,
            files_count: reader.required("files_count")?,
            insertions_count: reader.required("insertions_count")?,
            deletions_count: reader.required("deletions_count")?,
        };
        reader.finish()?;

        Ok(commit)
    }

    fn into_value(self) -> Value {
        Fields::new()
            .with("sha", self.sha.into_value())
            .with("date", self.date.into_value())
            .with("description", self.description.into_value())
            .with("pr_number", self.pr_number.into_value())
            .with("scopes", self.scopes.into_value())
            .with("type", self.change_type.into_value())
            .with("breaking_change", self.breaking_change.into_value())
            .with("author", self.author.into_value())
            .with("files_count", self.files_count.into_value())
            .with("insertions_count", self.insertions_count.into_value())
            .with("deletions_count", self.deletions_count.into_value())
            .into()
    }
}
