use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    ops::Bound,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    codec::{releases_from_document, unify, CueDecoder, CueEncoder, DecoderConfig, RELEASES_LABEL},
    types::{
        errors::{error, Error, Result},
        ChangelogEntry, CommitRecord, Release, ReleaseVersion, Value,
    },
};

pub const RELEASE_FILE_EXTENSION: &str = "cue";

/// Every known release, ordered by semver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    releases: BTreeMap<ReleaseVersion, Release>,
    origins: BTreeMap<ReleaseVersion, Vec<PathBuf>>,
}

impl Catalog {
    pub fn from_releases(releases: impl IntoIterator<Item = Release>) -> Result<Self> {
        let mut catalog = Catalog::default();
        for release in releases {
            catalog.insert(release)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, release: Release) -> Result<()> {
        if self.releases.contains_key(&release.version) {
            return Err(error!(
                Catalog,
                "release {} is defined more than once", release.version
            ));
        }
        self.releases.insert(release.version.clone(), release);

        Ok(())
    }

    /// Reads every `*.cue` file directly inside `dir`.
    ///
    /// The files are unified into one document before the releases are
    /// extracted, so a release may be spread over several files as long as
    /// they agree.
    pub fn load_dir(dir: impl AsRef<Path>, config: &DecoderConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let decoder = CueDecoder::new(*config);

        let mut document: Option<Value> = None;
        let mut origins: BTreeMap<ReleaseVersion, Vec<PathBuf>> = BTreeMap::new();
        for path in release_files(dir)? {
            debug!("decoding {}", path.display());

            let text = fs::read_to_string(&path).map_err(|e| Error::from(e).in_file(&path))?;
            let file_document = decoder
                .decode_document(&text)
                .map_err(|e| e.in_file(&path))?;

            for version in declared_versions(&file_document) {
                origins.entry(version).or_default().push(path.clone());
            }

            document = Some(match document {
                Some(merged) => unify(merged, file_document).map_err(|e| e.in_file(&path))?,
                None => file_document,
            });
        }

        let Some(document) = document else {
            return Ok(Catalog::default());
        };

        let mut catalog = Catalog::from_releases(releases_from_document(document)?)?;
        catalog.origins = origins;

        Ok(catalog)
    }

    /// Writes `<version>.cue` into `dir`, replacing any previous file atomically.
    pub fn write_release(dir: impl AsRef<Path>, release: &Release) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let path = dir.join(release_file_name(&release.version));

        write_atomic(&path, &CueEncoder::encode_release(release))?;

        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn get(&self, version: &ReleaseVersion) -> Option<&Release> {
        self.releases.get(version)
    }

    pub fn latest(&self) -> Option<&Release> {
        self.releases.values().next_back()
    }

    /// Ascending.
    pub fn versions(&self) -> impl Iterator<Item = &ReleaseVersion> {
        self.releases.keys()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Release> {
        self.releases.values()
    }

    /// Every file that declares `version`, in load order. Empty for releases
    /// that did not come from disk.
    pub fn origins(&self, version: &ReleaseVersion) -> &[PathBuf] {
        self.origins.get(version).map_or(&[], Vec::as_slice)
    }

    /// Releases newer than `after` up to and including `up_to`.
    pub fn range(
        &self,
        after: Option<&ReleaseVersion>,
        up_to: Option<&ReleaseVersion>,
    ) -> impl Iterator<Item = &Release> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        let upper = up_to.map_or(Bound::Unbounded, Bound::Included);

        // `BTreeMap::range` panics on inverted bounds.
        let inverted = matches!((after, up_to), (Some(after), Some(up_to)) if after > up_to);
        (!inverted)
            .then(|| self.releases.range::<ReleaseVersion, _>((lower, upper)))
            .into_iter()
            .flatten()
            .map(|(_, release)| release)
    }

    pub fn by_scope(&self, scope: &str) -> Vec<(&ReleaseVersion, &ChangelogEntry)> {
        self.entries_where(|entry| entry.has_scope(scope))
    }

    pub fn by_contributor(&self, name: &str) -> Vec<(&ReleaseVersion, &ChangelogEntry)> {
        self.entries_where(|entry| {
            entry
                .contributors
                .iter()
                .any(|contributor| contributor.eq_ignore_ascii_case(name))
        })
    }

    pub fn breaking_changes(
        &self,
        after: Option<&ReleaseVersion>,
        up_to: Option<&ReleaseVersion>,
    ) -> Vec<(&ReleaseVersion, &ChangelogEntry)> {
        self.range(after, up_to)
            .flat_map(|release| {
                release
                    .breaking_entries()
                    .map(move |entry| (&release.version, entry))
            })
            .collect()
    }

    pub fn find_commit(&self, sha_prefix: &str) -> Vec<(&ReleaseVersion, &CommitRecord)> {
        self.releases
            .values()
            .flat_map(|release| {
                release
                    .commits
                    .iter()
                    .filter(move |commit| commit.sha.matches_prefix(sha_prefix))
                    .map(move |commit| (&release.version, commit))
            })
            .collect()
    }

    fn entries_where(
        &self,
        predicate: impl Fn(&ChangelogEntry) -> bool,
    ) -> Vec<(&ReleaseVersion, &ChangelogEntry)> {
        self.releases
            .values()
            .flat_map(|release| {
                release
                    .changelog
                    .iter()
                    .map(move |entry| (&release.version, entry))
            })
            .filter(|(_, entry)| predicate(entry))
            .collect()
    }
}

pub fn release_file_name(version: &ReleaseVersion) -> String {
    format!("{version}.{RELEASE_FILE_EXTENSION}")
}

/// `*.cue` files directly inside `dir`, sorted by path.
pub fn release_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut paths = fs::read_dir(dir)
        .map_err(|e| Error::from(e).in_file(dir))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.retain(|path| {
        path.is_file()
            && path
                .extension()
                .is_some_and(|extension| extension == RELEASE_FILE_EXTENSION)
    });
    paths.sort();

    Ok(paths)
}

/// Replace the contents of `path` through a temporary file in the same
/// directory, so readers never observe a partial write.
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::from(e).in_file(dir))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| Error::from(e).in_file(path))?;
    file.persist(path)
        .map_err(|e| Error::from(e.error).in_file(path))?;

    Ok(())
}

fn declared_versions(document: &Value) -> Vec<ReleaseVersion> {
    document
        .as_struct()
        .and_then(|root| root.get(RELEASES_LABEL))
        .and_then(Value::as_struct)
        .map(|releases| {
            releases
                .labels()
                .filter_map(|label| label.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}
