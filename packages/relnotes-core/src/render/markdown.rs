use itertools::Itertools;

use crate::{
    stats::ReleaseStats,
    types::{ChangeType, ChangelogEntry, Release},
};

/// Release notes for one version.
///
/// Sections without entries are left out. Breaking entries are listed once,
/// under `# Breaking`, grouped by type.
pub fn render_markdown(release: &Release) -> String {
    let mut content = String::new();

    content.push_str(&format!("# {}", release.version));
    if !release.codename.is_empty() {
        content.push_str(&format!(" \"{}\"", release.codename));
    }
    content.push_str(&format!(" ({})\n\n", release.date));

    if !release.description.trim().is_empty() {
        content.push_str(&format!("{}\n\n", release.description.trim()));
    }

    if release.breaking_entries().next().is_some() {
        content.push_str("# Breaking\n\n");
        for change_type in ChangeType::RENDER_ORDER {
            let items: Vec<String> = release
                .breaking_entries()
                .filter(|entry| entry.change_type == change_type)
                .map(|entry| format!("\t{}", bullet(entry, "\t  ")))
                .collect();
            if !items.is_empty() {
                content.push_str(&format!("- {}\n{}\n\n", change_type.title(), items.join("\n")));
            }
        }
    }

    let mut write_section = |title: &str, items: &[String]| {
        if !items.is_empty() {
            content.push_str(&format!("# {title}\n\n"));
            content.push_str(&format!("{}\n\n", items.join("\n")));
        }
    };

    for change_type in ChangeType::RENDER_ORDER
        .into_iter()
        .filter(ChangeType::is_user_facing)
    {
        let items: Vec<String> = release
            .entries_of(change_type)
            .filter(|entry| !entry.breaking)
            .map(|entry| bullet(entry, "  "))
            .collect();
        write_section(change_type.title(), &items);
    }

    let known_issues: Vec<String> = release
        .known_issues
        .iter()
        .map(|issue| format!("- {}", indent_continuation(issue.trim(), "  ")))
        .collect();
    write_section("Known issues", &known_issues);

    if let Some(vrl_changelog) = release
        .vrl_changelog
        .as_deref()
        .filter(|block| !block.trim().is_empty())
    {
        write_section("VRL changelog", &[vrl_changelog.trim().to_string()]);
    }

    content.trim().to_string()
}

fn bullet(entry: &ChangelogEntry, continuation: &str) -> String {
    let mut line = String::from("- ");
    if !entry.scopes.is_empty() {
        line.push_str(&format!("[{}] ", entry.scopes.join(", ")));
    }
    line.push_str(&indent_continuation(entry.description.trim(), continuation));

    if !entry.pr_numbers.is_empty() {
        let prs = entry.pr_numbers.iter().map(|pr| format!("#{pr}")).join(", ");
        line.push_str(&format!(" ({prs})"));
    }
    if !entry.contributors.is_empty() {
        let authors = entry
            .contributors
            .iter()
            .map(|author| format!("@{author}"))
            .join(", ");
        line.push_str(&format!(", by {authors}"));
    }

    line
}

fn indent_continuation(text: &str, prefix: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .join("\n")
}

/// Markdown table with one row per commit.
pub fn render_commit_table(release: &Release) -> String {
    let mut content = String::from(
        "| sha | type | scopes | description | author | +/- |\n|---|---|---|---|---|---|\n",
    );

    for commit in &release.commits {
        let change_type = if commit.breaking_change {
            format!("{}!", commit.change_type)
        } else {
            commit.change_type.to_string()
        };
        let description = match commit.pr_number {
            Some(pr) => format!("{} (#{pr})", commit.description),
            None => commit.description.clone(),
        };

        content.push_str(&format!(
            "| {} | {} | {} | {} | {} | +{}/-{} |\n",
            commit.sha.short(),
            change_type,
            table_cell(&commit.scopes.join(", ")),
            table_cell(&description),
            table_cell(&commit.author),
            commit.insertions_count,
            commit.deletions_count
        ));
    }

    content
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn render_stats(stats: &ReleaseStats) -> String {
    let mut content = format!(
        "{}: {} commits by {} contributors, {} files changed, +{}/-{}",
        stats.version, stats.commits, stats.contributors, stats.files, stats.insertions, stats.deletions
    );
    if stats.breaking > 0 {
        content.push_str(&format!(", {} breaking", stats.breaking));
    }
    for (change_type, count) in &stats.by_type {
        content.push_str(&format!("\n  {change_type}: {count}"));
    }

    content
}

/// Utility function to capitalize a string.
pub fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}
