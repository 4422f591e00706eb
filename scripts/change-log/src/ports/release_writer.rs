use relnotes_core::types::Release;

/// This port abstracts where a generated release ends up.
pub trait ReleaseWriter {
    /// Persist the release record. For example, this could write a `.cue` file.
    fn write_release(&self, release: &Release) -> anyhow::Result<()>;
}
