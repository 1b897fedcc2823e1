//! Row assembly and the render entry points.
//!
//! `render_statusline` is the whole pipeline for one invocation: parse the
//! session JSON, gather a [`Snapshot`] (git state, project size, host facts),
//! then lay it out. `render_snapshot` is the pure layout half, so a fixed
//! snapshot, config and clock always produce the same bytes.

use owo_colors::{AnsiColors, OwoColorize};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::StatuslineConfig;
use crate::error::Result;
use crate::git::{extract_git_info, project_size, ChangeCounts, GitInfo, ProjectSize};
use crate::grid::{render_grid, Row};
use crate::host::{current_user, host_tool_version, hostname, shorten_path};
use crate::runner::CommandRunner;
use crate::session::SessionInput;
use crate::time::format_last_commit;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything one render needs, collected before any layout happens.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub cwd: PathBuf,
    #[serde(skip)]
    pub home: Option<PathBuf>,
    pub model: String,
    pub user: String,
    pub host: Option<String>,
    pub tool_version: Option<String>,
    pub project: Option<ProjectSize>,
    pub git: Option<GitInfo>,
}

impl Snapshot {
    /// Query git and the host. Subprocesses run one after another; each
    /// failure only blanks its own field.
    pub fn gather(
        session: &SessionInput,
        config: &StatuslineConfig,
        runner: &dyn CommandRunner,
    ) -> Self {
        let cwd = session.working_dir();

        let git = extract_git_info(runner, &cwd);
        let project = git
            .as_ref()
            .and_then(|g| project_size(runner, g.root.as_deref().unwrap_or(&cwd)));

        // Host queries do not depend on the session directory existing.
        let run_dir = if cwd.is_dir() {
            cwd.clone()
        } else {
            std::env::temp_dir()
        };
        let host = if config.show_host {
            hostname(runner, &run_dir)
        } else {
            None
        };
        let tool_version = config
            .host_tool()
            .and_then(|tool| host_tool_version(runner, tool, &run_dir));

        Snapshot {
            cwd,
            home: home::home_dir(),
            model: session.model_name().to_string(),
            user: current_user(),
            host,
            tool_version,
            project,
            git,
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

fn counter(text: String, active: bool, color: AnsiColors) -> String {
    if active {
        text.color(color).to_string()
    } else {
        text.dimmed().to_string()
    }
}

fn summary_row(snapshot: &Snapshot, config: &StatuslineConfig) -> Vec<String> {
    let path = shorten_path(&snapshot.cwd, snapshot.home.as_deref(), config.path_segments);
    let user = match &snapshot.host {
        Some(host) => format!("{}@{host}", snapshot.user),
        None => snapshot.user.clone(),
    };
    let size = snapshot
        .project
        .map(|p| p.human())
        .unwrap_or_else(|| "-".to_string());
    let version = snapshot.tool_version.as_deref().unwrap_or("?");

    vec![
        format!("📁 {}", path.cyan().bold()),
        format!("👤 {}", user.blue()),
        format!("📦 {size}"),
        format!("⚙ v{version}"),
        format!("🤖 {}", snapshot.model.magenta().bold()),
    ]
}

fn git_row(git: &GitInfo, now: i64) -> Vec<String> {
    let branch = match &git.repo_name {
        Some(repo) => format!("{repo}:{}", git.branch),
        None => git.branch.clone(),
    };
    vec![
        format!("⎇ {}", branch.green().bold()),
        counter(format!("↑ {}", git.unpushed), git.unpushed > 0, AnsiColors::Yellow),
        counter(format!("⚑ {}", git.stash), git.stash > 0, AnsiColors::Cyan),
        counter(format!("⚠ {}", git.conflict), git.conflict > 0, AnsiColors::Red),
        format!("⏱ {}", format_last_commit(git.last_commit, now)),
    ]
}

fn no_git_row() -> Vec<String> {
    vec!["∅ no git repository".dimmed().to_string()]
}

fn change_row(label: &str, color: AnsiColors, counts: &ChangeCounts) -> Vec<String> {
    let deleted = counter(format!("-{}", counts.deleted), counts.deleted > 0, AnsiColors::Red);
    let renamed = counter(format!("»{}", counts.renamed), counts.renamed > 0, AnsiColors::Cyan);
    let lines_added = counter(
        format!("+{}", counts.lines_added),
        counts.lines_added > 0,
        AnsiColors::Green,
    );
    let lines_removed = counter(
        format!("-{}", counts.lines_removed),
        counts.lines_removed > 0,
        AnsiColors::Red,
    );

    vec![
        label.color(color).bold().to_string(),
        counter(format!("~{}", counts.modified), counts.modified > 0, AnsiColors::Yellow),
        counter(format!("+{}", counts.added), counts.added > 0, AnsiColors::Green),
        format!("{deleted} {renamed}"),
        format!("{lines_added} {lines_removed}"),
    ]
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Lay out a gathered snapshot. Pure: no subprocesses, no clock.
pub fn render_snapshot(snapshot: &Snapshot, config: &StatuslineConfig, now: i64) -> String {
    let rows: Vec<Row> = vec![
        Some(summary_row(snapshot, config)),
        Some(match &snapshot.git {
            Some(git) => git_row(git, now),
            None => no_git_row(),
        }),
        snapshot
            .git
            .as_ref()
            .map(|g| change_row("unstaged", AnsiColors::Yellow, &g.unstaged)),
        snapshot
            .git
            .as_ref()
            .map(|g| change_row("staged", AnsiColors::Green, &g.staged)),
    ];
    render_grid(&rows, config.emoji_width)
}

/// Parse `input`, gather state through `runner`, and render.
pub fn render_statusline(
    input: &str,
    config: &StatuslineConfig,
    runner: &dyn CommandRunner,
    now: i64,
) -> Result<String> {
    config.validate()?;
    let session = SessionInput::parse(input)?;
    let snapshot = Snapshot::gather(&session, config, runner);
    tracing::debug!(
        cwd = %snapshot.cwd.display(),
        git = snapshot.git.is_some(),
        "rendering statusline"
    );
    Ok(render_snapshot(&snapshot, config, now))
}

/// Gather without rendering, for `--json` output.
pub fn gather_snapshot(
    input: &str,
    config: &StatuslineConfig,
    runner: &dyn CommandRunner,
) -> Result<Snapshot> {
    config.validate()?;
    let session = SessionInput::parse(input)?;
    Ok(Snapshot::gather(&session, config, runner))
}
