use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    traits::{CueConvertible, FieldReader},
    types::{
        errors::Result, ChangeType, ChangelogEntry, CommitRecord, Fields, ReleaseVersion, Value,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsNext {
    pub title: String,
    pub description: String,
}

impl CueConvertible for WhatsNext {
    fn from_value(value: Value) -> Result<Self> {
        let mut reader = FieldReader::new(value)?;

        let item = WhatsNext {
            title: reader.required("title")?,
            description: reader.required("description")?,
        };
        reader.finish()?;

        Ok(item)
    }

    fn into_value(self) -> Value {
        Fields::new()
            .with("title", self.title.into_value())
            .with("description", self.description.into_value())
            .into()
    }
}

/// The aggregate of changelog entries and commits for one published version.
///
/// The version is not part of the record body: in release files it is the key
/// under `releases`, so it is handed in separately when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: ReleaseVersion,
    pub date: NaiveDate,
    pub codename: String,
    pub whats_next: Vec<WhatsNext>,
    pub description: String,
    pub known_issues: Vec<String>,
    pub changelog: Vec<ChangelogEntry>,
    pub vrl_changelog: Option<String>,
    pub commits: Vec<CommitRecord>,
}

impl Release {
    pub fn new(version: ReleaseVersion, date: NaiveDate) -> Self {
        Self {
            version,
            date,
            codename: String::new(),
            whats_next: vec![],
            description: String::new(),
            known_issues: vec![],
            changelog: vec![],
            vrl_changelog: None,
            commits: vec![],
        }
    }

    pub fn from_value(version: ReleaseVersion, value: Value) -> Result<Self> {
        let mut reader = FieldReader::new(value)?;

        let release = Release {
            version,
            date: reader.required("date")?,
            codename: reader.or_default("codename")?,
            whats_next: reader.or_default("whats_next")?,
            description: reader.or_default("description")?,
            known_issues: reader.or_default("known_issues")?,
            changelog: reader.or_default("changelog")?,
            vrl_changelog: reader.or_default("vrl_changelog")?,
            commits: reader.or_default("commits")?,
        };
        reader.finish()?;

        Ok(release)
    }

    /// The record body, without the version key.
    pub fn into_value(self) -> Value {
        let mut fields = Fields::new()
            .with("date", self.date.into_value())
            .with("codename", self.codename.into_value());
        if !self.whats_next.is_empty() {
            fields.insert("whats_next", self.whats_next.into_value());
        }
        fields.insert("description", self.description.into_value());
        if !self.known_issues.is_empty() {
            fields.insert("known_issues", self.known_issues.into_value());
        }
        fields.insert("changelog", self.changelog.into_value());
        if let Some(vrl_changelog) = self.vrl_changelog {
            fields.insert("vrl_changelog", vrl_changelog.into_value());
        }
        fields.insert("commits", self.commits.into_value());

        fields.into()
    }

    pub fn entries_of(&self, change_type: ChangeType) -> impl Iterator<Item = &ChangelogEntry> {
        self.changelog
            .iter()
            .filter(move |entry| entry.change_type == change_type)
    }

    pub fn breaking_entries(&self) -> impl Iterator<Item = &ChangelogEntry> {
        self.changelog.iter().filter(|entry| entry.breaking)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn release_body() -> Fields {
        Fields::new()
            .with("date", "2022-02-08".into())
            .with("codename", "".into())
            .with("description", "Maintenance release.".into())
            .with(
                "changelog",
                Value::List(vec![Fields::new()
                    .with("type", "fix".into())
                    .with("description", "Fixed a crash.".into())
                    .into()]),
            )
            .with("commits", Value::List(vec![]))
    }

    #[test]
    fn decodes_a_minimal_release() -> Result<()> {
        // given
        let version = ReleaseVersion::new(0, 20, 0);

        // when
        let release = Release::from_value(version.clone(), release_body().into())?;

        // then
        assert_eq!(release.version, version);
        assert_eq!(release.date, NaiveDate::from_ymd_opt(2022, 2, 8).unwrap());
        assert_eq!(release.changelog.len(), 1);
        assert!(release.whats_next.is_empty());
        assert_eq!(release.vrl_changelog, None);

        Ok(())
    }

    #[test]
    fn body_round_trips() -> Result<()> {
        let original: Value = release_body().into();

        let encoded = Release::from_value(ReleaseVersion::new(0, 20, 0), original.clone())?
            .into_value();

        assert_eq!(encoded, original);

        Ok(())
    }

    #[test]
    fn date_is_required() {
        let mut body = release_body();
        body.take("date");

        let err = Release::from_value(ReleaseVersion::new(0, 20, 0), body.into()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Decode error at `date`: missing required field"
        );
    }

    #[test]
    fn nested_errors_carry_the_full_path() {
        let body = release_body().with(
            "changelog",
            Value::List(vec![Fields::new()
                .with("type", "fix".into())
                .with("description", Value::Int(3))
                .into()]),
        );

        let err = Release::from_value(ReleaseVersion::new(0, 20, 0), body.into()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Decode error at `changelog[0].description`: expected a string, got int 3"
        );
    }
}
