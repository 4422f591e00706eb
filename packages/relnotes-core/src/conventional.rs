//! Parsing of conventional-commit subjects such as
//! `feat(sinks, codecs)!: add zstd compression (#11010)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{
    errors::{error, Result},
    ChangeType,
};

static SUBJECT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<type>[a-z]+)(?:\((?P<scopes>[^)]*)\))?(?P<breaking>!)?:(?P<description>.*)$")
        .unwrap()
});

static PR_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(#(?P<pr>\d+)\)$").unwrap());

static BREAKING_FOOTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^BREAKING[ -]CHANGE:").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalSubject {
    pub change_type: ChangeType,
    pub scopes: Vec<String>,
    pub breaking: bool,
    pub description: String,
    pub pr_number: Option<u64>,
}

pub fn parse_subject(subject: &str) -> Result<ConventionalSubject> {
    let subject = subject.trim();
    let captures = SUBJECT_REGEX.captures(subject).ok_or_else(|| {
        error!(
            InvalidData,
            "`{}` is not a conventional commit subject", subject
        )
    })?;

    let change_type: ChangeType = captures["type"].parse()?;
    let scopes = captures
        .name("scopes")
        .map(|scopes| {
            scopes
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|scope| !scope.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let breaking = captures.name("breaking").is_some();

    let (description, pr_number) = split_pr_suffix(captures["description"].trim())?;
    if description.is_empty() {
        return Err(error!(
            InvalidData,
            "`{}` has an empty description", subject
        ));
    }

    Ok(ConventionalSubject {
        change_type,
        scopes,
        breaking,
        description,
        pr_number,
    })
}

/// Parses the first line of a full commit message. A `BREAKING CHANGE:`
/// footer in the body also marks the commit as breaking.
pub fn parse_message(message: &str) -> Result<ConventionalSubject> {
    let (subject, body) = split_message(message);
    let mut parsed = parse_subject(subject)?;
    parsed.breaking |= is_breaking_body(body);

    Ok(parsed)
}

pub fn split_message(message: &str) -> (&str, &str) {
    let message = message.trim_start();
    match message.split_once('\n') {
        Some((subject, body)) => (subject.trim_end(), body),
        None => (message.trim_end(), ""),
    }
}

pub fn is_breaking_body(body: &str) -> bool {
    BREAKING_FOOTER_REGEX.is_match(body)
}

/// Removes a trailing `(#1234)` and returns the number it held.
pub fn split_pr_suffix(text: &str) -> Result<(String, Option<u64>)> {
    match PR_SUFFIX_REGEX.captures(text) {
        Some(captures) => {
            let pr_number = captures["pr"].parse::<u64>()?;
            let start = captures.get(0).map_or(text.len(), |m| m.start());

            Ok((text[..start].trim().to_string(), Some(pr_number)))
        }
        None => Ok((text.trim().to_string(), None)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test]
    fn parses_a_full_subject() -> Result<()> {
        let parsed = parse_subject("feat(sinks, codecs)!: add zstd compression (#11010)")?;

        assert_eq!(
            parsed,
            ConventionalSubject {
                change_type: ChangeType::Feat,
                scopes: vec!["sinks".to_string(), "codecs".to_string()],
                breaking: true,
                description: "add zstd compression".to_string(),
                pr_number: Some(11010),
            }
        );

        Ok(())
    }

    #[test]
    fn scopes_and_pr_are_optional() -> Result<()> {
        let parsed = parse_subject("docs: fix typo")?;

        assert_eq!(parsed.change_type, ChangeType::Docs);
        assert!(parsed.scopes.is_empty());
        assert!(!parsed.breaking);
        assert_eq!(parsed.description, "fix typo");
        assert_eq!(parsed.pr_number, None);

        Ok(())
    }

    #[test]
    fn empty_scopes_are_dropped() -> Result<()> {
        let parsed = parse_subject("chore(deps, ,ci): bump tokio")?;

        assert_eq!(parsed.scopes, vec!["deps", "ci"]);

        Ok(())
    }

    #[test_case("Merge branch 'master'"; "no type")]
    #[test_case("Revert \"feat: thing\""; "revert commit")]
    #[test_case("feature: add thing"; "unknown type")]
    #[test_case("fix(api): (#12)"; "empty description")]
    #[test_case("Fix: capitalised type"; "capitalised")]
    fn malformed_subjects_are_rejected(subject: &str) {
        assert!(parse_subject(subject).is_err());
    }

    #[test]
    fn breaking_footer_marks_the_message() -> Result<()> {
        // given
        let message = "fix(config): rename option\n\nBREAKING CHANGE: `old` is now `new`\n";

        // when
        let parsed = parse_message(message)?;

        // then
        assert!(parsed.breaking);
        assert_eq!(parsed.description, "rename option");

        Ok(())
    }

    #[test]
    fn split_message_separates_subject_and_body() {
        assert_eq!(split_message("feat: x\r\n\nbody"), ("feat: x", "\nbody"));
        assert_eq!(split_message("feat: x"), ("feat: x", ""));
    }

    #[test]
    fn pr_suffix_only_counts_at_the_end() -> Result<()> {
        assert_eq!(
            split_pr_suffix("see (#1) for details")?,
            ("see (#1) for details".to_string(), None)
        );

        Ok(())
    }
}
