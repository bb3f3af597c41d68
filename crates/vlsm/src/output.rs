//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output` (or the config
//! default). Table uses `tabled`, structured formats use serde, plain
//! emits one identifier per line.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use tabled::{Table, Tabled, settings::Style};

use vlsm_config::Defaults;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Resolved output settings ─────────────────────────────────────────

/// Output choices after merging CLI flags over config defaults.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Settings {
    /// CLI flags win; config defaults fill the gaps; unknown config values fall back.
    pub fn resolve(global: &GlobalOpts, defaults: &Defaults) -> Self {
        let format = global.output.unwrap_or_else(|| {
            parse_or(&defaults.output, "defaults.output", OutputFormat::Table)
        });
        let color = global
            .color
            .unwrap_or_else(|| parse_or(&defaults.color, "defaults.color", ColorMode::Auto));

        Self {
            format,
            color: should_color(color),
            quiet: global.quiet,
        }
    }
}

fn parse_or<T: ValueEnum>(value: &str, key: &str, fallback: T) -> T {
    T::from_str(value, true).unwrap_or_else(|_| {
        tracing::warn!(key, value, "ignoring unrecognized config value");
        fallback
    })
}

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
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
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
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

/// Write pretty-printed JSON to `path`, creating parent directories.
pub fn write_json_file<T: serde::Serialize + ?Sized>(
    path: &Path,
    data: &T,
) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut json = render_json_pretty(data)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

// ── Format-specific renderers ────────────────────────────────────────

/// Rounded table of `Tabled` rows.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(
    data: &T,
) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(
    data: &T,
) -> Result<String, CliError> {
    Ok(serde_json::to_string(data)?)
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    if compact {
        render_json_compact(data)
    } else {
        render_json_pretty(data)
    }
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
