//! Facts about the machine and the tool hosting the statusline: user,
//! hostname, host-tool version, and the displayed form of the working
//! directory.

use std::path::{Component, Path};

use crate::runner::CommandRunner;

/// Login name from `USER` (or `USERNAME` on Windows).
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Short hostname (domain part dropped).
pub fn hostname(runner: &dyn CommandRunner, cwd: &Path) -> Option<String> {
    let out = runner.run("hostname", &[], cwd)?;
    let short = out.trim().split('.').next().unwrap_or_default();
    if short.is_empty() {
        None
    } else {
        Some(short.to_string())
    }
}

/// Version reported by `{tool} --version`, e.g. `"1.0.35 (Tool)"` → `"1.0.35"`.
pub fn host_tool_version(runner: &dyn CommandRunner, tool: &str, cwd: &Path) -> Option<String> {
    let out = runner.run(tool, &["--version"], cwd)?;
    parse_version(&out)
}

fn parse_version(out: &str) -> Option<String> {
    let token = out.lines().next()?.split_whitespace().next()?;
    let token = token.strip_prefix('v').unwrap_or(token);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Display form of `path`: the home prefix becomes `~`, and when more than
/// `segments` components remain only the last `segments` are kept behind
/// `…/`. `segments == 0` keeps everything.
pub fn shorten_path(path: &Path, home: Option<&Path>, segments: usize) -> String {
    let (under_home, rest) = match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rel) => (true, rel),
        None => (false, path),
    };

    let mut prefix = String::new();
    let mut parts: Vec<String> = Vec::new();
    for component in rest.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().into_owned(),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
        }
    }

    if segments > 0 && parts.len() > segments {
        return format!("…/{}", parts[parts.len() - segments..].join("/"));
    }

    if under_home {
        return if parts.is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", parts.join("/"))
        };
    }

    // Relative paths stay relative.
    let root = if rest.has_root() { "/" } else { "" };
    let shown = format!("{prefix}{root}{}", parts.join("/"));
    if shown.is_empty() {
        ".".to_string()
    } else {
        shown
    }
}
