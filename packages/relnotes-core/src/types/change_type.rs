use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error,
    types::errors::{Error, Result},
};

/// The conventional-commit type tag carried by changelog entries and commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Chore,
    Docs,
    Enhancement,
    Feat,
    Fix,
    Perf,
    Revert,
}

impl ChangeType {
    pub const ALL: [ChangeType; 7] = [
        ChangeType::Chore,
        ChangeType::Docs,
        ChangeType::Enhancement,
        ChangeType::Feat,
        ChangeType::Fix,
        ChangeType::Perf,
        ChangeType::Revert,
    ];

    /// Order in which sections appear in rendered notes.
    pub const RENDER_ORDER: [ChangeType; 7] = [
        ChangeType::Feat,
        ChangeType::Enhancement,
        ChangeType::Perf,
        ChangeType::Fix,
        ChangeType::Docs,
        ChangeType::Revert,
        ChangeType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Chore => "chore",
            ChangeType::Docs => "docs",
            ChangeType::Enhancement => "enhancement",
            ChangeType::Feat => "feat",
            ChangeType::Fix => "fix",
            ChangeType::Perf => "perf",
            ChangeType::Revert => "revert",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChangeType::Chore => "Chores",
            ChangeType::Docs => "Documentation",
            ChangeType::Enhancement => "Enhancements",
            ChangeType::Feat => "Features",
            ChangeType::Fix => "Fixes",
            ChangeType::Perf => "Performance",
            ChangeType::Revert => "Reverts",
        }
    }

    /// Whether changes of this type belong in the user-facing changelog.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ChangeType::Feat | ChangeType::Enhancement | ChangeType::Fix | ChangeType::Perf
        )
    }
}

impl FromStr for ChangeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ChangeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                error!(
                    InvalidType,
                    "unknown change type `{}`, expected one of: {}",
                    s,
                    ChangeType::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
