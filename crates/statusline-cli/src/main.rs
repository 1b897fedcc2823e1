mod output;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use statusline_core::{gather_snapshot, render_statusline, ProcessRunner, StatuslineConfig};
use std::io::Read;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "statusline",
    about = "Render a box-drawn git statusline from session JSON on stdin",
    version
)]
struct Cli {
    /// YAML config file (keys: path_segments, show_host, emoji_width, host_tool, timeout_ms)
    #[arg(long, env = "STATUSLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Trailing path components shown for the working directory (0 = all)
    #[arg(long)]
    path_segments: Option<usize>,

    /// Show `user@host` in the user cell
    #[arg(long, overrides_with = "hide_host")]
    show_host: bool,

    /// Show only the user name
    #[arg(long, overrides_with = "show_host")]
    hide_host: bool,

    /// Columns per emoji/symbol: 1 or 2
    #[arg(long)]
    emoji_width: Option<usize>,

    /// Command whose `--version` fills the version cell
    #[arg(long, conflicts_with = "no_host_tool")]
    host_tool: Option<String>,

    /// Skip the host-tool version query
    #[arg(long)]
    no_host_tool: bool,

    /// Per-subprocess timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the gathered state as JSON instead of the statusline
    #[arg(long, short = 'j')]
    json: bool,
}

impl Cli {
    fn host_override(&self) -> Option<bool> {
        if self.show_host {
            Some(true)
        } else if self.hide_host {
            Some(false)
        } else {
            None
        }
    }
}

/// Config file (if any), then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<StatuslineConfig> {
    let mut config = match &cli.config {
        Some(path) => StatuslineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StatuslineConfig::default(),
    };

    if let Some(segments) = cli.path_segments {
        config.path_segments = segments;
    }
    if let Some(show) = cli.host_override() {
        config.show_host = show;
    }
    if let Some(width) = cli.emoji_width {
        config.emoji_width = width;
    }
    if let Some(tool) = &cli.host_tool {
        config.host_tool = Some(tool.clone());
    }
    if cli.no_host_tool {
        config.host_tool = None;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = resolve_config(cli)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let runner = ProcessRunner::new(config.command_timeout())
        .context("failed to start subprocess runtime")?;
    tracing::debug!(timeout = ?runner.timeout(), "subprocess runner ready");

    if cli.json {
        let snapshot = gather_snapshot(&input, &config, &runner)?;
        return output::to_json(&snapshot);
    }

    let now = chrono::Utc::now().timestamp();
    Ok(render_statusline(&input, &config, &runner, now)?)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let text = e.to_string();
            let first = text.lines().next().unwrap_or_default();
            output::emit(&output::error_line(first.trim_start_matches("error: ")));
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Panics are reported through the error line, not as a backtrace.
    std::panic::set_hook(Box::new(|info| tracing::debug!("panic: {info}")));

    let text = match std::panic::catch_unwind(AssertUnwindSafe(|| run(&cli))) {
        Ok(Ok(block)) => block,
        Ok(Err(e)) => output::error_line(&format!("{e:#}")),
        Err(payload) => output::error_line(&panic_message(payload)),
    };
    output::emit(&text);
}
