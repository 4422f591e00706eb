use std::{cell::RefCell, collections::HashMap};

use anyhow::anyhow;
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use relnotes_core::types::{ChangeType, ChangelogEntry, Release};

use change_log::{
    domain::{
        generate::generate,
        models::{BuildOptions, GenerateRequest, RawCommit},
    },
    ports::{github::GitHubPort, release_writer::ReleaseWriter},
};

struct FakeGitHub {
    latest_tag: String,
    commits: Vec<RawCommit>,
    prs: HashMap<String, u64>,
    compared: RefCell<Option<(String, String)>>,
    files: HashMap<(String, String), String>,
}

impl GitHubPort for FakeGitHub {
    async fn get_latest_release_tag(&self, _owner: &str, _repo: &str) -> anyhow::Result<String> {
        Ok(self.latest_tag.clone())
    }

    async fn compare_commits(
        &self,
        _owner: &str,
        _repo: &str,
        base: &str,
        head: &str,
    ) -> anyhow::Result<Vec<RawCommit>> {
        *self.compared.borrow_mut() = Some((base.to_string(), head.to_string()));
        Ok(self.commits.clone())
    }

    async fn pr_number_for_commit(
        &self,
        _owner: &str,
        _repo: &str,
        sha: &str,
    ) -> anyhow::Result<Option<u64>> {
        if sha.starts_with('f') {
            return Err(anyhow!("rate limited"));
        }
        Ok(self.prs.get(sha).copied())
    }

    async fn get_latest_tag(&self, owner: &str, repo: &str) -> anyhow::Result<String> {
        match (owner, repo) {
            ("vectordotdev", "vrl") => Ok("v0.9.0".to_string()),
            _ => Err(anyhow!("{owner}/{repo} has no tags")),
        }
    }

    async fn get_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        reference: &str,
    ) -> anyhow::Result<String> {
        self.files
            .get(&(path.to_string(), reference.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("{path} not found at {reference}"))
    }
}

#[derive(Default)]
struct MemoryWriter {
    written: RefCell<Vec<Release>>,
}

impl ReleaseWriter for MemoryWriter {
    fn write_release(&self, release: &Release) -> anyhow::Result<()> {
        self.written.borrow_mut().push(release.clone());
        Ok(())
    }
}

fn commit(sha_digit: char, message: &str, login: &str) -> RawCommit {
    RawCommit {
        sha: sha_digit.to_string().repeat(40),
        message: message.to_string(),
        author_name: format!("{login} (name)"),
        login: Some(login.to_string()),
        date: Utc.with_ymd_and_hms(2022, 2, 7, 15, 4, 23).unwrap(),
        pr_number: None,
        files: 4,
        additions: 120,
        deletions: 8,
    }
}

fn fake_github() -> FakeGitHub {
    FakeGitHub {
        latest_tag: "v0.19.0".to_string(),
        commits: vec![
            commit('a', "feat(kafka sink): support headers (#10976)", "alice"),
            commit('b', "fix(config): reload on SIGHUP", "bob"),
            commit('c', "chore(deps): bump tokio", "dependabot[bot]"),
            commit('f', "docs: typo", "carol"),
        ],
        prs: HashMap::from([("b".repeat(40), 10990)]),
        compared: RefCell::new(None),
        files: HashMap::from([(
            ("CHANGELOG.md".to_string(), "v0.9.0".to_string()),
            "# Changelog\n\n## [0.9.0]\n\n### New features\n\n- `parse_cef` function\n\n## [0.8.1]\n\n- old\n"
                .to_string(),
        )]),
    }
}

fn request(base: Option<&str>) -> GenerateRequest {
    GenerateRequest {
        owner: "vectordotdev".to_string(),
        repo: "vector".to_string(),
        version: "0.20.0".parse().unwrap(),
        date: NaiveDate::from_ymd_opt(2022, 2, 8).unwrap(),
        base: base.map(str::to_string),
        head: "master".to_string(),
        vrl_repo: None,
    }
}

#[tokio::test]
async fn generates_release_since_latest_tag() -> anyhow::Result<()> {
    // given
    let github = fake_github();
    let writer = MemoryWriter::default();
    let options = BuildOptions {
        codename: "Kubernetes".to_string(),
        bots: vec!["dependabot[bot]".to_string()],
        ..Default::default()
    };

    // when
    let release = generate(&github, &writer, &request(None), vec![], &options).await?;

    // then
    assert_eq!(
        *github.compared.borrow(),
        Some(("v0.19.0".to_string(), "master".to_string()))
    );
    assert_eq!(release.codename, "Kubernetes");
    assert_eq!(
        release.changelog,
        vec![
            ChangelogEntry::new(ChangeType::Feat, "Support headers")
                .with_scopes(["kafka sink"])
                .with_contributors(["alice"])
                .with_pr_numbers([10976]),
            ChangelogEntry::new(ChangeType::Fix, "Reload on SIGHUP")
                .with_scopes(["config"])
                .with_contributors(["bob"])
                .with_pr_numbers([10990]),
        ]
    );
    assert_eq!(writer.written.borrow().as_slice(), &[release.clone()]);

    Ok(())
}

#[tokio::test]
async fn failed_pr_lookup_is_not_fatal() -> anyhow::Result<()> {
    // given
    let github = fake_github();
    let writer = MemoryWriter::default();

    // when
    let release = generate(
        &github,
        &writer,
        &request(Some("v0.18.0")),
        vec![],
        &BuildOptions::default(),
    )
    .await?;

    // then
    assert_eq!(
        github.compared.borrow().as_ref().map(|(base, _)| base.as_str()),
        Some("v0.18.0")
    );
    let docs = release
        .commits
        .iter()
        .find(|c| c.change_type == ChangeType::Docs)
        .expect("docs commit is kept");
    assert_eq!(docs.pr_number, None);
    assert_eq!(release.commits.len(), 4);

    Ok(())
}

#[tokio::test]
async fn commits_keep_git_names_and_entries_keep_logins() -> anyhow::Result<()> {
    // given
    let mut github = fake_github();
    github.commits.push(RawCommit {
        login: None,
        ..commit('d', "fix(api): handle empty body (#11001)", "dave")
    });
    let writer = MemoryWriter::default();

    // when
    let release = generate(
        &github,
        &writer,
        &request(None),
        vec![],
        &BuildOptions::default(),
    )
    .await?;

    // then
    let authors = release
        .commits
        .iter()
        .map(|c| c.author.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        authors,
        vec![
            "alice (name)",
            "bob (name)",
            "dependabot[bot] (name)",
            "carol (name)",
            "dave (name)"
        ]
    );
    let contributors = release
        .changelog
        .iter()
        .flat_map(|entry| entry.contributors.iter().map(String::as_str))
        .collect::<Vec<_>>();
    assert_eq!(contributors, vec!["alice", "bob", "dave (name)"]);

    Ok(())
}

#[tokio::test]
async fn includes_the_latest_vrl_changelog() -> anyhow::Result<()> {
    // given
    let github = fake_github();
    let writer = MemoryWriter::default();
    let request = GenerateRequest {
        vrl_repo: Some(("vectordotdev".to_string(), "vrl".to_string())),
        ..request(None)
    };

    // when
    let release = generate(&github, &writer, &request, vec![], &BuildOptions::default()).await?;

    // then
    assert_eq!(
        release.vrl_changelog.as_deref(),
        Some("### [0.9.0]\n\n#### New features\n\n- `parse_cef` function")
    );

    Ok(())
}

#[tokio::test]
async fn given_vrl_changelog_is_not_fetched() -> anyhow::Result<()> {
    // given
    let github = fake_github();
    let writer = MemoryWriter::default();
    let request = GenerateRequest {
        vrl_repo: Some(("vectordotdev".to_string(), "missing".to_string())),
        ..request(None)
    };
    let options = BuildOptions {
        vrl_changelog: Some("### [0.9.1]".to_string()),
        ..Default::default()
    };

    // when
    let release = generate(&github, &writer, &request, vec![], &options).await?;

    // then
    assert_eq!(release.vrl_changelog.as_deref(), Some("### [0.9.1]"));

    Ok(())
}
