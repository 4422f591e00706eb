use crate::domain::models::RawCommit;

#[allow(async_fn_in_trait)]
pub trait GitHubPort {
    /// Retrieve the latest release tag for the given repository.
    async fn get_latest_release_tag(&self, owner: &str, repo: &str) -> anyhow::Result<String>;

    /// Retrieve the commits reachable from `head` but not from `base`, oldest first.
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> anyhow::Result<Vec<RawCommit>>;

    /// Retrieve the number of the pull request a commit was merged through.
    async fn pr_number_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> anyhow::Result<Option<u64>>;

    /// Retrieve the most recent tag of the repository.
    async fn get_latest_tag(&self, owner: &str, repo: &str) -> anyhow::Result<String>;

    /// Retrieve the contents of a file at the given ref.
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> anyhow::Result<String>;
}
