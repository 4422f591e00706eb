use relnotes_core::{fragments::Fragment, types::Release};

use crate::{
    domain::{
        models::{BuildOptions, GenerateRequest},
        release_builder::build_release,
        vrl::latest_vrl_section,
    },
    ports::{github::GitHubPort, release_writer::ReleaseWriter},
};

const VRL_CHANGELOG_PATH: &str = "CHANGELOG.md";

/// Fetch the commits of the requested range, build the release and hand it
/// to `writer`.
pub async fn generate<G: GitHubPort, W: ReleaseWriter>(
    github: &G,
    writer: &W,
    request: &GenerateRequest,
    fragments: Vec<Fragment>,
    options: &BuildOptions,
) -> anyhow::Result<Release> {
    let base = match &request.base {
        Some(base) => base.clone(),
        None => {
            github
                .get_latest_release_tag(&request.owner, &request.repo)
                .await?
        }
    };
    tracing::info!(%base, head = %request.head, "comparing commits");

    let mut commits = github
        .compare_commits(&request.owner, &request.repo, &base, &request.head)
        .await?;

    for commit in commits.iter_mut().filter(|c| c.pr_number.is_none()) {
        match github
            .pr_number_for_commit(&request.owner, &request.repo, &commit.sha)
            .await
        {
            Ok(pr_number) => commit.pr_number = pr_number,
            Err(e) => tracing::warn!(sha = %commit.sha, "could not look up pull request: {e}"),
        }
    }

    let mut options = options.clone();
    let vrl_repo = request
        .vrl_repo
        .as_ref()
        .filter(|_| options.vrl_changelog.is_none());
    if let Some((owner, repo)) = vrl_repo {
        let tag = github.get_latest_tag(owner, repo).await?;
        let changelog = github
            .get_file(owner, repo, VRL_CHANGELOG_PATH, &tag)
            .await?;
        tracing::info!(%tag, "including VRL changelog");
        options.vrl_changelog = Some(latest_vrl_section(&changelog)?);
    }

    let release = build_release(
        request.version.clone(),
        request.date,
        commits,
        fragments,
        &options,
    )?;
    tracing::info!(
        version = %release.version,
        commits = release.commits.len(),
        entries = release.changelog.len(),
        "built release"
    );

    writer.write_release(&release)?;

    Ok(release)
}
