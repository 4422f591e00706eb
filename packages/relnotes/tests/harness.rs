use std::fs;

use pretty_assertions::assert_eq;
use relnotes::prelude::*;

const RELEASE_0_20_0: &str = r#"package metadata

releases: "0.20.0": {
	date:     "2022-02-10"
	codename: ""

	whats_next: [
		{
			title: "Removal of deprecated transforms"
			description: """
				We will remove the `geoip` transform in 0.21.0.
				"""
		},
	]

	description: """
		The Vector team is pleased to announce version 0.20.0!

		This release includes a new `exec` source.
		"""

	known_issues: [
		"The `elasticsearch` sink panics on empty batches.",
	]

	changelog: [
		{
			type: "feat"
			scopes: ["exec source"]
			description: """
				A new `exec` source runs commands and collects their output.
				"""
			contributors: ["spencergilbert"]
			pr_numbers: [10617]
		},
		{
			type: "chore"
			breaking: true
			scopes: ["config"]
			description: "The `geoip` transform is now deprecated."
			pr_numbers: [10655]
		},
		{
			type: "fix"
			description: "Fixed a crash in the `file` source."
		},
	]

	commits: [
		{sha: "1d2a4b6c8e0f1d2a4b6c8e0f1d2a4b6c8e0f1d2a", date: "2022-01-05 00:04:41 UTC", description: "bump tokio from 1.15.0 to 1.16.1", pr_number: 10690, scopes: ["deps"], type: "chore", breaking_change: false, author: "dependabot[bot]", files_count: 3, insertions_count: 7, deletions_count: 7},
		{sha: "aa2a4b6c8e0f1d2a4b6c8e0f1d2a4b6c8e0f1d2b", date: "2022-01-06 13:21:00 UTC", description: "add `exec` source", pr_number: 10617, scopes: ["exec source"], type: "feat", breaking_change: false, author: "Spencer Gilbert", files_count: 12, insertions_count: 840, deletions_count: 3},
	]
}
"#;

const RELEASE_0_19_0: &str = r#"package metadata

releases: "0.19.0": {
	date:     "2021-12-28"
	codename: ""

	description: "Maintenance release."

	changelog: []

	commits: [
		{sha: "bb2a4b6c8e0f1d2a4b6c8e0f1d2a4b6c8e0f1d2c", date: "2021-12-20 09:00:00 UTC", description: "fix typo", pr_number: null, scopes: [], type: "docs", breaking_change: false, author: "Bruce Guenter", files_count: 1, insertions_count: 1, deletions_count: 1},
	]
}
"#;

fn releases_dir() -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("0.20.0.cue"), RELEASE_0_20_0)?;
    fs::write(dir.path().join("0.19.0.cue"), RELEASE_0_19_0)?;

    Ok(dir)
}

#[test]
fn loads_and_validates_a_releases_directory() -> Result<()> {
    // given
    let dir = releases_dir()?;

    // when
    let catalog = Catalog::load_dir(dir.path(), &DecoderConfig::default())?;
    let report = Validator::default().validate_catalog(&catalog);

    // then
    let versions: Vec<String> = catalog.versions().map(ToString::to_string).collect();
    assert_eq!(versions, vec!["0.19.0", "0.20.0"]);
    assert!(report.is_clean(), "{report:?}");

    let latest = catalog.latest().expect("catalog is not empty");
    assert_eq!(latest.whats_next.len(), 1);
    assert_eq!(latest.changelog.len(), 3);
    assert_eq!(latest.commits[1].author, "Spencer Gilbert");
    assert_eq!(
        latest.description,
        "The Vector team is pleased to announce version 0.20.0!\n\nThis release includes a new `exec` source."
    );

    Ok(())
}

#[test]
fn canonical_encoding_is_stable() -> Result<()> {
    // given
    let dir = releases_dir()?;
    let catalog = Catalog::load_dir(dir.path(), &DecoderConfig::default())?;
    let latest = catalog.latest().expect("catalog is not empty");

    // when
    let encoded = CueEncoder::encode_release(latest);
    let decoded = relnotes::core::codec::decode_releases(&encoded, &CueDecoder::default())?;

    // then
    assert_eq!(decoded, vec![latest.clone()]);
    assert_eq!(CueEncoder::encode_release(&decoded[0]), encoded);

    Ok(())
}

#[test]
fn renders_the_latest_release() -> Result<()> {
    let dir = releases_dir()?;
    let catalog = Catalog::load_dir(dir.path(), &DecoderConfig::default())?;

    let markdown = render_markdown(catalog.latest().expect("catalog is not empty"));

    let expected = "\
# 0.20.0 (2022-02-10)

The Vector team is pleased to announce version 0.20.0!

This release includes a new `exec` source.

# Breaking

- Chores
\t- [config] The `geoip` transform is now deprecated. (#10655)

# Features

- [exec source] A new `exec` source runs commands and collects their output. (#10617), by @spencergilbert

# Fixes

- Fixed a crash in the `file` source.

# Known issues

- The `elasticsearch` sink panics on empty batches.";
    assert_eq!(markdown, expected);

    Ok(())
}

#[test]
fn stats_exclude_bots() -> Result<()> {
    let dir = releases_dir()?;
    let catalog = Catalog::load_dir(dir.path(), &DecoderConfig::default())?;
    let latest = catalog.latest().expect("catalog is not empty");

    let stats = stats(latest, &["dependabot[bot]".to_string()]);

    assert_eq!(stats.commits, 2);
    assert_eq!(stats.contributors, 1);
    assert_eq!(stats.insertions, 847);

    Ok(())
}
