//! `sxstyle` - resolve an sx description against a theme from the terminal.
//!
//! The terminal's column count stands in for the viewport width unless
//! `--width` or `--breakpoint` is given.
//!
//! ```text
//! sxstyle --theme theme.yaml '{"color": "primary", "p": [1, 3]}'
//! sxstyle --theme light.yaml --dark-theme dark.yaml --mode dark @card.yaml --format yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use sxstyle::{
    breakpoint_index, AdaptiveTheme, ColorMode, Overrides, ResolvedStyle, SxDescription, Theme,
    ThemeChoice, UseSx,
};

const FALLBACK_WIDTH: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "sxstyle", version, about = "Resolve sx style descriptions against a theme")]
struct Cli {
    /// Sx description as inline JSON/YAML, or `@path` to read it from a file
    sx: String,

    /// Theme file (YAML or JSON); an empty theme is used when omitted
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Dark variant of the theme, selected by --mode
    #[arg(long, requires = "theme")]
    dark_theme: Option<PathBuf>,

    /// Color mode used to pick between --theme and --dark-theme
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// Viewport width; defaults to the terminal's column count
    #[arg(long, conflicts_with = "breakpoint")]
    width: Option<f64>,

    /// Breakpoint index to resolve at, bypassing width measurement
    #[arg(long)]
    breakpoint: Option<usize>,

    /// Typeface applied when the description sets no fontFamily
    #[arg(long)]
    font_family: Option<String>,

    /// Apply --font-family even when the description sets one
    #[arg(long, requires = "font_family")]
    force_font: bool,

    /// Output format for the resolved style
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

/// What a run resolved, before rendering.
#[derive(Debug)]
struct Resolution {
    breakpoint: usize,
    width: Option<f64>,
    style: ResolvedStyle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let resolution = resolve(&cli)?;

    let mut summary = format!(
        "{} {}",
        style("breakpoint").dim(),
        style(resolution.breakpoint).bold()
    );
    if let Some(width) = resolution.width {
        summary.push_str(&format!(" {}", style(format!("(width {})", width)).dim()));
    }
    eprintln!("{}", summary);

    println!("{}", render(&resolution.style, cli.format)?);
    Ok(())
}

fn resolve(cli: &Cli) -> Result<Resolution> {
    let theme = load_theme(cli)?;
    let sx = load_sx(&cli.sx)?;

    let (breakpoint, width) = match cli.breakpoint {
        Some(index) => (index, None),
        None => {
            let width = cli.width.unwrap_or_else(terminal_width);
            (breakpoint_index(width, theme.breakpoints()), Some(width))
        }
    };

    let overrides = match (&cli.font_family, cli.force_font) {
        (Some(family), true) => Overrides::new().force("fontFamily", family.as_str()),
        (Some(family), false) => Overrides::font_family(family),
        (None, _) => Overrides::new(),
    };

    let mut use_sx = UseSx::global();
    let handle = use_sx.bind(&theme, breakpoint).call(&sx, &overrides);

    Ok(Resolution {
        breakpoint,
        width,
        style: handle.style().clone(),
    })
}

fn load_theme(cli: &Cli) -> Result<Arc<Theme>> {
    let Some(path) = &cli.theme else {
        return Ok(Arc::new(Theme::new()));
    };
    let light = read_theme(path)?;

    let Some(dark_path) = &cli.dark_theme else {
        return Ok(Arc::new(light));
    };
    let adaptive = AdaptiveTheme::new(light, read_theme(dark_path)?);

    Ok(match cli.mode {
        Mode::Auto => ThemeChoice::from(&adaptive).resolve(),
        Mode::Light => adaptive.resolve_for(ColorMode::Light),
        Mode::Dark => adaptive.resolve_for(ColorMode::Dark),
    })
}

fn read_theme(path: &Path) -> Result<Theme> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read theme file {}", path.display()))?;
    let theme = if path.extension().is_some_and(|ext| ext == "json") {
        Theme::from_json(&source)
    } else {
        Theme::from_yaml(&source)
    };
    theme.with_context(|| format!("failed to load theme {}", path.display()))
}

fn load_sx(arg: &str) -> Result<SxDescription> {
    let source = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read sx file {}", path))?,
        None => arg.to_string(),
    };

    let sx = if source.trim_start().starts_with('{') {
        SxDescription::from_json(&source)
    } else {
        SxDescription::from_yaml(&source)
    };
    sx.context("failed to parse sx description")
}

fn terminal_width() -> f64 {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| f64::from(w))
        .unwrap_or(FALLBACK_WIDTH)
}

fn render(style: &ResolvedStyle, format: Format) -> Result<String> {
    let output = match format {
        Format::Json => serde_json::to_string_pretty(style)?,
        Format::Yaml => serde_yaml::to_string(style)?,
    };
    Ok(output.trim_end().to_string())
}
