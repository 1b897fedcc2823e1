//! Git working-tree state, read by shelling out to `git` and parsing its
//! porcelain/numstat/log output.
//!
//! Only the branch query decides whether there is a repository at all. Every
//! other query degrades on its own to a zero/empty/`None` field.

use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::runner::CommandRunner;

/// Untracked files are only opened for line counting up to this many.
pub const UNTRACKED_LINE_COUNT_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// ChangeCounts / GitInfo
// ---------------------------------------------------------------------------

/// File and line counts for one side of the index (working tree or staged).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
    pub renamed: usize,
    pub lines_added: u64,
    pub lines_removed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitInfo {
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    /// Repository top level, when `git rev-parse --show-toplevel` answered.
    #[serde(skip)]
    pub root: Option<PathBuf>,
    pub unstaged: ChangeCounts,
    pub staged: ChangeCounts,
    pub conflict: usize,
    pub stash: usize,
    pub unpushed: usize,
    pub last_commit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Output parsers
// ---------------------------------------------------------------------------

/// Classify every `git status --porcelain` line into `info`.
///
/// Returns the number of untracked entries, which also becomes
/// `info.unstaged.added`.
pub fn apply_porcelain(info: &mut GitInfo, porcelain: &str) -> usize {
    let mut untracked = 0;

    for line in porcelain.lines() {
        let mut chars = line.chars();
        let (Some(index), Some(worktree)) = (chars.next(), chars.next()) else {
            continue;
        };

        let conflicted = index == 'U'
            || worktree == 'U'
            || (index == 'D' && worktree == 'D')
            || (index == 'A' && worktree == 'A');
        if conflicted {
            info.conflict += 1;
            continue;
        }
        if index == '?' && worktree == '?' {
            untracked += 1;
            continue;
        }

        match worktree {
            'M' => info.unstaged.modified += 1,
            'D' => info.unstaged.deleted += 1,
            _ => {}
        }
        match index {
            'M' => info.staged.modified += 1,
            // Copies are counted as additions.
            'A' | 'C' => info.staged.added += 1,
            'D' => info.staged.deleted += 1,
            'R' => info.staged.renamed += 1,
            _ => {}
        }
    }

    info.unstaged.added = untracked;
    untracked
}

/// Sum the added/removed columns of `git diff --numstat` output.
///
/// Binary files report `-` instead of a number; those tokens are skipped.
pub fn sum_numstat(output: &str) -> (u64, u64) {
    let mut added = 0;
    let mut removed = 0;
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let mut tokens = line.split_whitespace();
        if let Some(n) = tokens.next().and_then(|t| t.parse::<u64>().ok()) {
            added += n;
        }
        if let Some(n) = tokens.next().and_then(|t| t.parse::<u64>().ok()) {
            removed += n;
        }
    }
    (added, removed)
}

/// Line count of a text file. Unreadable or non-UTF-8 files count 0; the
/// read stops at the first invalid line.
fn count_lines(path: &Path) -> u64 {
    let Ok(file) = std::fs::File::open(path) else {
        return 0;
    };
    BufReader::new(file)
        .lines()
        .try_fold(0u64, |n, line| line.map(|_| n + 1))
        .unwrap_or(0)
}

fn non_empty_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(str::trim).filter(|l| !l.is_empty())
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Branch name, or `None` when `cwd` is not inside a git working tree.
fn resolve_branch(runner: &dyn CommandRunner, cwd: &Path) -> Option<String> {
    let out = runner.run("git", &["branch", "--show-current"], cwd)?;
    let name = out.trim();
    if !name.is_empty() {
        return Some(name.to_string());
    }

    // Detached HEAD prints nothing.
    let short = runner
        .run("git", &["rev-parse", "--short", "HEAD"], cwd)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Some(match short {
        Some(sha) => format!("@{sha}"),
        None => "HEAD".to_string(),
    })
}

/// Read the working tree at `cwd`. Returns `None` outside a repository.
pub fn extract_git_info(runner: &dyn CommandRunner, cwd: &Path) -> Option<GitInfo> {
    let git = |args: &[&str]| runner.run("git", args, cwd);

    let branch = resolve_branch(runner, cwd)?;

    let root = git(&["rev-parse", "--show-toplevel"])
        .map(|s| PathBuf::from(s.trim()))
        .filter(|p| !p.as_os_str().is_empty());
    let repo_name = root
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned());

    let mut info = GitInfo {
        branch,
        repo_name,
        root,
        ..GitInfo::default()
    };

    let untracked = git(&["status", "--porcelain"])
        .map(|out| apply_porcelain(&mut info, &out))
        .unwrap_or(0);

    if let Some(out) = git(&["diff", "--numstat"]) {
        let (added, removed) = sum_numstat(&out);
        info.unstaged.lines_added += added;
        info.unstaged.lines_removed += removed;
    }
    if let Some(out) = git(&["diff", "--cached", "--numstat"]) {
        let (added, removed) = sum_numstat(&out);
        info.staged.lines_added += added;
        info.staged.lines_removed += removed;
    }

    // Porcelain collapses an untracked directory into one entry, so the
    // limit is checked again against the expanded file list.
    if untracked > 0 && untracked <= UNTRACKED_LINE_COUNT_LIMIT {
        let base = info.root.clone().unwrap_or_else(|| cwd.to_path_buf());
        if let Some(list) = runner.run("git", &["ls-files", "--others", "--exclude-standard"], &base)
        {
            let files: Vec<&str> = non_empty_lines(&list).collect();
            if files.len() <= UNTRACKED_LINE_COUNT_LIMIT {
                info.unstaged.lines_added +=
                    files.iter().map(|f| count_lines(&base.join(f))).sum::<u64>();
            }
        }
    }

    info.unpushed = match git(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"]) {
        Some(_) => git(&["rev-list", "--count", "@{u}..HEAD"])
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0),
        None => 0,
    };

    info.stash = git(&["stash", "list"])
        .map(|out| non_empty_lines(&out).count())
        .unwrap_or(0);

    info.last_commit = git(&["log", "-1", "--format=%ct"]).and_then(|s| s.trim().parse().ok());

    tracing::debug!(
        branch = %info.branch,
        conflict = info.conflict,
        untracked,
        "git state extracted"
    );
    Some(info)
}

// ---------------------------------------------------------------------------
// ProjectSize
// ---------------------------------------------------------------------------

/// Number and total size of the tracked and untracked (non-ignored) files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSize {
    pub files: usize,
    pub bytes: u64,
}

impl ProjectSize {
    pub fn human(&self) -> String {
        format!("{} files · {}", self.files, human_bytes(self.bytes))
    }
}

pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "K", "M", "G"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}

/// Size of the repository rooted at `root`. `None` when the tracked file list
/// is unavailable.
pub fn project_size(runner: &dyn CommandRunner, root: &Path) -> Option<ProjectSize> {
    let tracked = runner.run("git", &["ls-files"], root)?;
    let untracked = runner
        .run("git", &["ls-files", "--others", "--exclude-standard"], root)
        .unwrap_or_default();

    let mut size = ProjectSize::default();
    for file in non_empty_lines(&tracked).chain(non_empty_lines(&untracked)) {
        // Deleted-but-tracked files have no metadata.
        if let Ok(meta) = std::fs::metadata(root.join(file)) {
            size.files += 1;
            size.bytes += meta.len();
        }
    }
    Some(size)
}
