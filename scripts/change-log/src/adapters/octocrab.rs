use anyhow::Context;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{de::IgnoredAny, Deserialize};

use crate::{domain::models::RawCommit, ports::github::GitHubPort};

const PER_PAGE: usize = 100;

pub struct OctocrabAdapter {
    client: Octocrab,
}

impl OctocrabAdapter {
    pub fn new(token: &str) -> anyhow::Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("building GitHub client")?;

        Ok(Self { client })
    }

    /// Retrieve the diff stats of a single commit. The compare endpoint
    /// leaves them out.
    async fn commit_detail(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> anyhow::Result<CommitDetail> {
        let route = format!("/repos/{owner}/{repo}/commits/{sha}");
        let detail = self
            .client
            .get::<CommitDetail, _, _>(route, None::<&()>)
            .await
            .with_context(|| format!("fetching commit {sha}"))?;

        Ok(detail)
    }
}

#[derive(Debug, Deserialize)]
struct Comparison {
    commits: Vec<ComparedCommit>,
}

#[derive(Debug, Deserialize)]
struct ComparedCommit {
    sha: String,
    commit: GitCommit,
    author: Option<GitHubUser>,
}

#[derive(Debug, Deserialize)]
struct GitCommit {
    message: String,
    author: Option<GitSignature>,
}

#[derive(Debug, Deserialize)]
struct GitSignature {
    name: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Default, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    stats: CommitStats,
    #[serde(default)]
    files: Vec<IgnoredAny>,
}

#[derive(Debug, Default, Deserialize)]
struct CommitStats {
    additions: u64,
    deletions: u64,
}

impl GitHubPort for OctocrabAdapter {
    async fn get_latest_release_tag(&self, owner: &str, repo: &str) -> anyhow::Result<String> {
        let latest_release = self
            .client
            .repos(owner, repo)
            .releases()
            .get_latest()
            .await
            .context("fetching latest release")?;

        Ok(latest_release.tag_name)
    }

    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> anyhow::Result<Vec<RawCommit>> {
        let mut compared = vec![];
        for page in 1.. {
            let route = format!(
                "/repos/{owner}/{repo}/compare/{base}...{head}?per_page={PER_PAGE}&page={page}"
            );
            let comparison = self
                .client
                .get::<Comparison, _, _>(route, None::<&()>)
                .await
                .with_context(|| format!("comparing {base}...{head}"))?;

            let fetched = comparison.commits.len();
            compared.extend(comparison.commits);
            if fetched < PER_PAGE {
                break;
            }
        }

        let mut commits = Vec::with_capacity(compared.len());
        for ComparedCommit {
            sha,
            commit,
            author,
        } in compared
        {
            let detail = self.commit_detail(owner, repo, &sha).await?;
            let signature = commit
                .author
                .with_context(|| format!("commit {sha} has no author"))?;

            commits.push(RawCommit {
                author_name: signature.name,
                login: author.map(|user| user.login),
                date: signature.date,
                message: commit.message,
                pr_number: None,
                files: detail.files.len() as u64,
                additions: detail.stats.additions,
                deletions: detail.stats.deletions,
                sha,
            });
        }

        Ok(commits)
    }

    async fn pr_number_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> anyhow::Result<Option<u64>> {
        let pulls = self
            .client
            .repos(owner, repo)
            .list_pulls(sha.to_string())
            .send()
            .await
            .with_context(|| format!("listing pull requests of {sha}"))?;

        Ok(pulls.items.first().map(|pr| pr.number))
    }

    async fn get_latest_tag(&self, owner: &str, repo: &str) -> anyhow::Result<String> {
        let tags = self
            .client
            .repos(owner, repo)
            .list_tags()
            .per_page(1)
            .send()
            .await
            .with_context(|| format!("listing tags of {owner}/{repo}"))?;

        tags.items
            .into_iter()
            .next()
            .map(|tag| tag.name)
            .with_context(|| format!("{owner}/{repo} has no tags"))
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> anyhow::Result<String> {
        let contents = self
            .client
            .repos(owner, repo)
            .get_content()
            .path(path)
            .r#ref(reference)
            .send()
            .await
            .with_context(|| format!("fetching {path} of {owner}/{repo}@{reference}"))?;

        contents
            .items
            .first()
            .and_then(|item| item.decoded_content())
            .with_context(|| format!("{path} of {owner}/{repo}@{reference} is not a file"))
    }
}
