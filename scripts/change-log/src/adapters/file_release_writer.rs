use std::{fs, path::PathBuf};

use relnotes_core::{catalog::Catalog, render::render_markdown, types::Release};

use crate::ports::release_writer::ReleaseWriter;

/// Writes `<version>.cue` into the releases directory and, optionally, the
/// rendered notes as markdown.
pub struct FileReleaseWriter {
    pub dir: PathBuf,
    pub markdown_path: Option<PathBuf>,
}

impl FileReleaseWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            markdown_path: None,
        }
    }

    pub fn with_markdown(mut self, path: impl Into<PathBuf>) -> Self {
        self.markdown_path = Some(path.into());
        self
    }
}

impl ReleaseWriter for FileReleaseWriter {
    fn write_release(&self, release: &Release) -> anyhow::Result<()> {
        let path = Catalog::write_release(&self.dir, release)?;
        tracing::info!(path = %path.display(), "release written");

        if let Some(markdown_path) = &self.markdown_path {
            fs::write(markdown_path, render_markdown(release))?;
            tracing::info!(path = %markdown_path.display(), "notes written");
        }

        Ok(())
    }
}
