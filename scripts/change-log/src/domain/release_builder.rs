use chrono::NaiveDate;
use relnotes_core::{
    conventional::{parse_message, split_message, ConventionalSubject},
    fragments::Fragment,
    render::capitalize,
    stats::is_bot,
    types::{ChangeType, ChangelogEntry, CommitDate, CommitRecord, Release, ReleaseVersion},
};

use crate::domain::models::{BuildOptions, RawCommit};

/// Assemble a release record out of the commits between two refs.
///
/// When `fragments` is not empty the changelog is taken from them verbatim,
/// otherwise it is derived from the user-facing and breaking commits.
pub fn build_release(
    version: ReleaseVersion,
    date: NaiveDate,
    commits: Vec<RawCommit>,
    fragments: Vec<Fragment>,
    options: &BuildOptions,
) -> anyhow::Result<Release> {
    let commits = commits
        .into_iter()
        .map(into_record)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let changelog = if fragments.is_empty() {
        entries_from_commits(&commits, &options.bots)
    } else {
        fragments.into_iter().map(Fragment::into_entry).collect()
    };

    let mut release = Release::new(version, date);
    release.codename = options.codename.clone();
    release.description = options.description.clone();
    release.vrl_changelog = options.vrl_changelog.clone();
    release.changelog = changelog;
    release.commits = commits.into_iter().map(|(record, _)| record).collect();

    Ok(release)
}

/// The record plus the name the author is credited under in the changelog.
fn into_record(raw: RawCommit) -> anyhow::Result<(CommitRecord, String)> {
    let subject = parse_message(&raw.message).unwrap_or_else(|e| {
        let (subject, _) = split_message(&raw.message);
        tracing::warn!(sha = %raw.sha, "treating commit as chore: {e}");
        ConventionalSubject {
            change_type: ChangeType::Chore,
            scopes: vec![],
            breaking: false,
            description: subject.to_string(),
            pr_number: None,
        }
    });

    let contributor = raw.login.unwrap_or_else(|| raw.author_name.clone());
    let record = CommitRecord {
        sha: raw.sha.parse()?,
        date: CommitDate::new(raw.date),
        description: subject.description,
        pr_number: subject.pr_number.or(raw.pr_number),
        scopes: subject.scopes,
        change_type: subject.change_type,
        breaking_change: subject.breaking,
        author: raw.author_name,
        files_count: raw.files,
        insertions_count: raw.additions,
        deletions_count: raw.deletions,
    };

    Ok((record, contributor))
}

/// One entry per pull request; commits without a PR get an entry each.
fn entries_from_commits(
    commits: &[(CommitRecord, String)],
    bots: &[String],
) -> Vec<ChangelogEntry> {
    let mut entries: Vec<ChangelogEntry> = vec![];

    for (commit, contributor) in commits
        .iter()
        .filter(|(c, _)| c.change_type.is_user_facing() || c.breaking_change)
    {
        let existing = commit.pr_number.and_then(|pr| {
            entries
                .iter_mut()
                .find(|entry| entry.pr_numbers.contains(&pr))
        });

        match existing {
            Some(entry) => {
                merge_into(entry, commit, contributor, bots);
            }
            None => {
                let mut entry = ChangelogEntry::new(
                    commit.change_type,
                    capitalize(&commit.description),
                )
                .with_pr_numbers(commit.pr_number);
                merge_into(&mut entry, commit, contributor, bots);
                entries.push(entry);
            }
        }
    }

    entries
}

fn merge_into(
    entry: &mut ChangelogEntry,
    commit: &CommitRecord,
    contributor: &str,
    bots: &[String],
) {
    entry.breaking |= commit.breaking_change;

    for scope in &commit.scopes {
        if !entry.has_scope(scope) {
            entry.scopes.push(scope.clone());
        }
    }

    let is_bot = is_bot(contributor, bots) || is_bot(&commit.author, bots);
    if !is_bot && !entry.contributors.iter().any(|c| c == contributor) {
        entry.contributors.push(contributor.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw(sha_digit: char, message: &str, login: &str) -> RawCommit {
        RawCommit {
            sha: sha_digit.to_string().repeat(40),
            message: message.to_string(),
            author_name: format!("{login} (name)"),
            login: Some(login.to_string()),
            date: Utc.with_ymd_and_hms(2022, 2, 7, 10, 0, 0).unwrap(),
            pr_number: None,
            files: 2,
            additions: 10,
            deletions: 3,
        }
    }

    fn version() -> ReleaseVersion {
        "0.20.0".parse().unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 2, 8).unwrap()
    }

    #[test]
    fn commits_of_one_pr_share_an_entry() -> anyhow::Result<()> {
        // given
        let commits = vec![
            raw('a', "feat(sinks): add zstd compression (#11010)", "alice"),
            raw('b', "feat(codecs): zstd levels (#11010)", "bob"),
            raw('c', "chore(deps): bump serde (#11011)", "dependabot[bot]"),
        ];
        let options = BuildOptions {
            bots: vec!["dependabot[bot]".to_string()],
            ..Default::default()
        };

        // when
        let release = build_release(version(), date(), commits, vec![], &options)?;

        // then
        let expected = ChangelogEntry::new(ChangeType::Feat, "Add zstd compression")
            .with_scopes(["sinks", "codecs"])
            .with_contributors(["alice", "bob"])
            .with_pr_numbers([11010]);
        assert_eq!(release.changelog, vec![expected]);
        assert_eq!(release.commits.len(), 3);

        Ok(())
    }

    #[test]
    fn commits_keep_the_git_name_and_entries_the_login() -> anyhow::Result<()> {
        // given
        let mut linked = raw('a', "feat(exec source): add `exec` source (#10617)", "spencergilbert");
        linked.author_name = "Spencer Gilbert".to_string();
        let mut unlinked = raw('b', "fix(file source): fix a crash", "unused");
        unlinked.author_name = "Bruce Guenter".to_string();
        unlinked.login = None;

        // when
        let release = build_release(
            version(),
            date(),
            vec![linked, unlinked],
            vec![],
            &BuildOptions::default(),
        )?;

        // then
        let authors: Vec<&str> = release.commits.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, vec!["Spencer Gilbert", "Bruce Guenter"]);
        assert_eq!(release.changelog[0].contributors, vec!["spencergilbert"]);
        assert_eq!(release.changelog[1].contributors, vec!["Bruce Guenter"]);

        Ok(())
    }

    #[test]
    fn breaking_chores_are_listed() -> anyhow::Result<()> {
        // given
        let commits = vec![raw(
            'a',
            "chore: drop legacy config\n\nBREAKING CHANGE: `legacy` is gone",
            "alice",
        )];

        // when
        let release = build_release(
            version(),
            date(),
            commits,
            vec![],
            &BuildOptions::default(),
        )?;

        // then
        assert_eq!(release.changelog.len(), 1);
        assert!(release.changelog[0].breaking);
        assert!(release.commits[0].breaking_change);

        Ok(())
    }

    #[test]
    fn unparseable_subject_becomes_a_chore() -> anyhow::Result<()> {
        // given
        let mut commit = raw('a', "Merge branch 'master' into release", "alice");
        commit.pr_number = Some(42);

        // when
        let release = build_release(
            version(),
            date(),
            vec![commit],
            vec![],
            &BuildOptions::default(),
        )?;

        // then
        let record = &release.commits[0];
        assert_eq!(record.change_type, ChangeType::Chore);
        assert_eq!(record.description, "Merge branch 'master' into release");
        assert_eq!(record.pr_number, Some(42));
        assert!(release.changelog.is_empty());

        Ok(())
    }

    #[test]
    fn fragments_replace_derived_entries() -> anyhow::Result<()> {
        // given
        let commits = vec![raw('a', "feat: something (#7)", "alice")];
        let fragment = Fragment::parse(
            "7_new_sink.feature.md",
            "Added a new sink.\n\nauthors: alice",
        )?;

        // when
        let release = build_release(
            version(),
            date(),
            commits,
            vec![fragment],
            &BuildOptions::default(),
        )?;

        // then
        assert_eq!(release.changelog.len(), 1);
        assert_eq!(release.changelog[0].description, "Added a new sink.");
        assert_eq!(release.changelog[0].pr_numbers, vec![7]);

        Ok(())
    }

    #[test]
    fn invalid_sha_is_rejected() {
        // given
        let mut commit = raw('a', "fix: x", "alice");
        commit.sha = "nope".to_string();

        // when
        let result = build_release(
            version(),
            date(),
            vec![commit],
            vec![],
            &BuildOptions::default(),
        );

        // then
        assert!(result.is_err());
    }
}
