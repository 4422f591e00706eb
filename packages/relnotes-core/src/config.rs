use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    codec::DecoderConfig,
    types::errors::{error, Error, Result},
    validation::ValidationConfig,
};

/// Settings shared by the release tools, usually read from `relnotes.toml`:
///
/// ```toml
/// bots = ["dependabot[bot]", "github-actions[bot]"]
///
/// [decoder]
/// max_depth = 32
///
/// [validation]
/// known_scopes = ["kafka sink", "config"]
/// require_commits = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub decoder: DecoderConfig,
    pub validation: ValidationConfig,
    /// Commit authors that are not counted as contributors.
    pub bots: Vec<String>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.validation.max_commit_lag_days < 0 {
            return Err(error!(
                Validation,
                "`max_commit_lag_days` must not be negative, got {}",
                config.validation.max_commit_lag_days
            ));
        }

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|text| Self::from_toml(&text))
            .map_err(|e| e.in_file(path))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_sections_use_defaults() -> Result<()> {
        // given
        let text = r#"
bots = ["dependabot[bot]"]

[validation]
require_commits = true
"#;

        // when
        let config = Config::from_toml(text)?;

        // then
        assert_eq!(config.bots, vec!["dependabot[bot]"]);
        assert!(config.validation.require_commits);
        assert_eq!(config.validation.max_commit_lag_days, 1);
        assert_eq!(config.decoder, DecoderConfig::default());

        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("bot = []").unwrap_err();

        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn negative_commit_lag_is_rejected() {
        let err = Config::from_toml("[validation]\nmax_commit_lag_days = -3\n").unwrap_err();

        assert!(matches!(err, Error::Validation(_)), "{err}");
    }

    #[test]
    fn load_names_the_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("relnotes.toml");
        fs::write(&path, "[decoder]\nmax_depth = 4\n")?;

        let config = Config::load(&path)?;
        let missing = Config::load(dir.path().join("missing.toml")).unwrap_err();

        assert_eq!(config.decoder.max_depth, 4);
        assert!(missing.to_string().contains("missing.toml"));

        Ok(())
    }
}
