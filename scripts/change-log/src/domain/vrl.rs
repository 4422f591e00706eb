/// The newest release section of a VRL `CHANGELOG.md`: everything from the
/// first `## ` heading up to the next one.
///
/// Headings are demoted one level so they nest under the release's own
/// headings when rendered.
pub fn latest_vrl_section(changelog: &str) -> anyhow::Result<String> {
    let mut lines = changelog
        .lines()
        .skip_while(|line| !line.starts_with("## "));

    let heading = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("no `## ` heading found in the VRL changelog"))?;

    let section = std::iter::once(heading)
        .chain(lines.take_while(|line| !line.starts_with("## ")))
        .map(|line| {
            let line = line.trim_end();
            if line.starts_with('#') {
                format!("#{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>();

    Ok(section.join("\n").trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn takes_the_first_release_section() -> anyhow::Result<()> {
        // given
        let changelog = "\
# Changelog

<!-- changelog start -->

## [0.20.0 (2024-11-27)]

### Breaking Changes & Upgrade Guide

- Fixed `parse_aws_vpc_flow_log` behavior.

### New Features

- Added `parse_influxdb`.

## [0.19.0 (2024-09-30)]

- Older things.
";

        // when
        let section = latest_vrl_section(changelog)?;

        // then
        assert_eq!(
            section,
            "\
### [0.20.0 (2024-11-27)]

#### Breaking Changes & Upgrade Guide

- Fixed `parse_aws_vpc_flow_log` behavior.

#### New Features

- Added `parse_influxdb`."
        );

        Ok(())
    }

    #[test]
    fn a_changelog_without_releases_is_an_error() {
        let result = latest_vrl_section("# Changelog\n\nNothing yet.\n");

        assert!(result.is_err());
    }
}
