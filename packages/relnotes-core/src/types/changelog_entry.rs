use serde::{Deserialize, Serialize};

use crate::{
    traits::{CueConvertible, FieldReader},
    types::{errors::Result, ChangeType, Fields, Value},
};

/// A single user-facing description of a behavior change in a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub breaking: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pr_numbers: Vec<u64>,
}

impl ChangelogEntry {
    pub fn new(change_type: ChangeType, description: impl Into<String>) -> Self {
        Self {
            change_type,
            scopes: vec![],
            breaking: false,
            description: description.into(),
            contributors: vec![],
            pr_numbers: vec![],
        }
    }

    pub fn with_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contributors<S: Into<String>>(
        mut self,
        contributors: impl IntoIterator<Item = S>,
    ) -> Self {
        self.contributors = contributors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pr_numbers(mut self, pr_numbers: impl IntoIterator<Item = u64>) -> Self {
        self.pr_numbers = pr_numbers.into_iter().collect();
        self
    }

    pub fn breaking(mut self) -> Self {
        self.breaking = true;
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

impl CueConvertible for ChangelogEntry {
    fn from_value(value: Value) -> Result<Self> {
        let mut reader = FieldReader::new(value)?;

        let entry = ChangelogEntry {
            change_type: reader.required("type")?,
            scopes: reader.or_default("scopes")?,
            breaking: reader.or_default("breaking")?,
            description: reader.required("description")?,
            contributors: reader.or_default("contributors")?,
            pr_numbers: reader.or_default("pr_numbers")?,
        };
        reader.finish()?;

        Ok(entry)
    }

    fn into_value(self) -> Value {
        let mut fields = Fields::new().with("type", self.change_type.into_value());
        if !self.scopes.is_empty() {
            fields.insert("scopes", self.scopes.into_value());
        }
        if self.breaking {
            fields.insert("breaking", Value::Bool(true));
        }
        fields.insert("description", self.description.into_value());
        if !self.contributors.is_empty() {
            fields.insert("contributors", self.contributors.into_value());
        }
        if !self.pr_numbers.is_empty() {
            fields.insert("pr_numbers", self.pr_numbers.into_value());
        }

        fields.into()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn optional_fields_default_when_absent() -> Result<()> {
        // given
        let value: Value = Fields::new()
            .with("type", "fix".into())
            .with("description", "Fixed a crash.".into())
            .into();

        // when
        let entry = ChangelogEntry::from_value(value)?;

        // then
        assert_eq!(entry, ChangelogEntry::new(ChangeType::Fix, "Fixed a crash."));

        Ok(())
    }

    #[test]
    fn empty_optional_fields_are_not_written() {
        let value = ChangelogEntry::new(ChangeType::Feat, "New sink.").into_value();

        let labels: Vec<_> = value.as_struct().unwrap().labels().collect();

        assert_eq!(labels, vec!["type", "description"]);
    }

    #[test]
    fn populated_entries_keep_their_field_order() {
        let entry = ChangelogEntry::new(ChangeType::Enhancement, "Faster parsing.")
            .with_scopes(["codecs"])
            .with_contributors(["jszwedko"])
            .with_pr_numbers([1234])
            .breaking();

        let value = entry.into_value();
        let labels: Vec<_> = value.as_struct().unwrap().labels().collect();

        assert_eq!(
            labels,
            vec!["type", "scopes", "breaking", "description", "contributors", "pr_numbers"]
        );
    }

    #[test]
    fn unknown_types_carry_their_path() {
        let value: Value = Fields::new()
            .with("type", "feature".into())
            .with("description", "x".into())
            .into();

        let err = ChangelogEntry::from_value(value).unwrap_err();

        assert!(err.to_string().starts_with("Decode error at `type`"));
    }
}
