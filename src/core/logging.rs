//! Terminal Logging Module
//!
//! Provides:
//! - Structured logging to a daily-rolling JSON file plus stderr (tracing)
//! - `log` crate bridging so dependencies' records land in the same sinks
//! - miette error reports tuned to the terminal
//! - Styled console output for command results (console)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use console::{style, Term};
use flate2::write::GzEncoder;
use flate2::Compression;
use supports_color::Stream;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "guildkeep.log";

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

/// What the attached terminal can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub color: bool,
    pub unicode: bool,
    pub interactive: bool,
    pub width: u16,
}

impl TerminalCapabilities {
    /// Probe stdout and the locale environment.
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        Self::from_env(
            supports_color::on(Stream::Stdout).is_some_and(|level| level.has_basic),
            io::stdout().is_terminal(),
            Term::stdout().size().1,
            std::env::var("TERM").ok().as_deref(),
            std::env::var("LANG").ok().as_deref(),
        )
    }

    /// Unset `TERM`/`LANG` count as unicode-capable; `dumb` or a non-UTF-8
    /// locale does not.
    fn from_env(color: bool, interactive: bool, width: u16, term: Option<&str>, lang: Option<&str>) -> Self {
        let term_ok = term.map_or(true, |t| !t.contains("dumb"));
        let lang_ok = lang.map_or(true, |l| {
            let l = l.to_ascii_lowercase();
            l.contains("utf-8") || l.contains("utf8")
        });
        Self {
            color: color && interactive,
            unicode: term_ok && lang_ok,
            interactive,
            width,
        }
    }

    /// Plain ASCII, no color, 80 columns.
    pub const fn plain() -> Self {
        Self {
            color: false,
            unicode: false,
            interactive: false,
            width: 80,
        }
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Log directory under the data directory.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Initialize the logging system.
///
/// This sets up:
/// 1. A file logger (JSON formatted, daily rolling) in `<data_dir>/logs`.
/// 2. A stderr logger (human readable) so stdout stays free for results.
/// 3. Redirects standard `log` crate events to `tracing`.
/// 4. Configures miette for error reports.
///
/// `RUST_LOG` overrides the default `info` filter. Returns a `WorkerGuard`
/// which must be kept alive so buffered logs are flushed on shutdown.
pub fn init(data_dir: &Path) -> WorkerGuard {
    let log_dir = log_dir(data_dir);

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // File Layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter.clone());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .with_filter(env_filter);

    // try_init so a second call (tests) is harmless
    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("LogTracer already installed: {}", e);
    }

    init_miette();

    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    tracing::debug!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// Whether a file in the log directory should be compressed.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    name.starts_with(&format!("{LOG_FILE_PREFIX}."))
        && !name.ends_with(today_suffix)
        && !name.ends_with(".gz")
}

/// Compress log files from previous days
fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => tracing::debug!("Compressed old log: {:?}", path),
            Err(e) => tracing::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

/// Gzip `path` next to itself and remove the original. An existing `.gz`
/// leaves both files alone.
fn compress_file(path: &Path) -> io::Result<()> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("log path has no file name"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);
    if gz_path.exists() {
        return Ok(());
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(path)
}

/// Initialize miette error reporting
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(caps.unicode)
                .context_lines(2)
                .color(caps.color)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Console Output
// ============================================================================

/// Kind of one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
}

impl Status {
    fn marker(self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Status::Success, true) => "✔",
            (Status::Error, true) => "✘",
            (Status::Info, true) => "ℹ",
            (Status::Success, false) => "[ok]",
            (Status::Error, false) => "[error]",
            (Status::Info, false) => "[info]",
        }
    }

    fn paint(self, text: &str) -> console::StyledObject<&str> {
        match self {
            Status::Success => style(text).green(),
            Status::Error => style(text).red().bold(),
            Status::Info => style(text).blue(),
        }
    }
}

/// Status line as printed, with styling only when the terminal takes it.
pub fn render_status(status: Status, message: &str, caps: &TerminalCapabilities) -> String {
    let line = format!("{} {}", status.marker(caps.unicode), message);
    if caps.color {
        status.paint(&line).to_string()
    } else {
        line
    }
}

/// Boxed block with the title in the top border. Width is clamped to 20..=80.
pub fn render_panel(title: &str, content: &str, caps: &TerminalCapabilities) -> String {
    let width = usize::from(caps.width).clamp(20, 80);
    let (h, v, tl, tr, bl, br) = if caps.unicode {
        ("─", "│", "╭", "╮", "╰", "╯")
    } else {
        ("-", "|", "+", "+", "+", "+")
    };

    let heading = format!(" {title} ");
    let fill = width.saturating_sub(heading.chars().count() + 2).max(1);
    let inner = width.saturating_sub(4).max(1);

    let mut out = format!("{tl}{heading}{}{tr}\n", h.repeat(fill));
    for line in content.lines() {
        out.push_str(&format!("{v} {line:<inner$} {v}\n"));
    }
    out.push_str(&format!("{bl}{}{br}", h.repeat(width.saturating_sub(2).max(1))));

    if caps.color {
        style(out).cyan().to_string()
    } else {
        out
    }
}

/// Print a titled panel to stdout.
pub fn print_panel(title: &str, content: &str) {
    println!("{}", render_panel(title, content, get_terminal_caps()));
}

pub fn print_success(message: &str) {
    println!("{}", render_status(Status::Success, message, get_terminal_caps()));
}

/// Errors go to stderr.
pub fn print_error(message: &str) {
    eprintln!("{}", render_status(Status::Error, message, get_terminal_caps()));
}

pub fn print_info(message: &str) {
    println!("{}", render_status(Status::Info, message, get_terminal_caps()));
}

// ============================================================================
// Tests
// ============================================================================
