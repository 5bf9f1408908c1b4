//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn status_label(is_active: bool, color: bool) -> String {
    match (is_active, color) {
        (true, true) => "active".green().to_string(),
        (false, true) => "inactive".dimmed().to_string(),
        (true, false) => "active".into(),
        (false, false) => "inactive".into(),
    }
}

// ── Human units ──────────────────────────────────────────────────────

pub fn session_length(minutes: Option<u32>) -> String {
    minutes.map_or_else(
        || "-".into(),
        |m| humantime::format_duration(Duration::from_secs(u64::from(m) * 60)).to_string(),
    )
}

pub fn data_cap(bytes: Option<u64>) -> String {
    bytes.map_or_else(|| "unlimited".into(), |b| ByteSize::b(b).to_string_as(true))
}

pub fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

// ── Spinner ──────────────────────────────────────────────────────────

/// Spinner on stderr while a request is in flight. Hidden when quiet or
/// when stderr is not a terminal.
pub fn spinner(message: &'static str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Status line on stderr, so stdout stays machine-readable.
pub fn notice(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    out.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_length_is_humanized() {
        assert_eq!(session_length(Some(90)), "1h 30m");
        assert_eq!(session_length(Some(1440)), "1day");
        assert_eq!(session_length(None), "-");
    }

    #[test]
    fn missing_cap_reads_unlimited() {
        assert_eq!(data_cap(None), "unlimited");
    }

    #[test]
    fn plain_list_is_one_id_per_line() {
        #[derive(serde::Serialize, Tabled)]
        struct Row {
            id: u32,
        }
        let out = render_list(
            OutputFormat::Plain,
            &[Row { id: 1 }, Row { id: 2 }],
            |r| Row { id: r.id },
            |r| r.id.to_string(),
        );
        assert_eq!(out.ok().as_deref(), Some("1\n2"));
    }

    #[test]
    fn status_without_color_is_plain_text() {
        assert_eq!(status_label(true, false), "active");
        assert_eq!(status_label(false, false), "inactive");
    }
}
