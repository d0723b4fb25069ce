//! `stylemark` - preview markup and theme files in a real terminal.
//!
//! ```text
//! stylemark render "{{_error_}}failed{{_nc_}}"
//! stylemark render --theme ocean.yaml --preview Preview "{{_Preview_Theme_Title_}}Menu"
//! echo "{{|red|}}captured" | stylemark strip -
//! stylemark markup "{{|cyan::B|}}[INFO] ready"
//! stylemark check-theme ocean.yaml
//! ```

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use stylemark::{ColorProfile, RealEnv, Renderer, TagRegistry, ThemeFile};

/// Render, strip and convert stylemark markup
#[derive(Parser, Debug)]
#[command(name = "stylemark")]
#[command(version)]
#[command(about = "Render, strip and convert stylemark markup")]
struct Cli {
    /// Log theme loading and profile detection (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render markup to ANSI escapes
    Render(RenderArgs),

    /// Remove tags and escape sequences
    Strip {
        /// Text to strip, or - for stdin
        text: String,
    },

    /// Convert markup to bracket-style widget markup
    Markup {
        /// Text to convert, or - for stdin
        text: String,

        /// Theme file to load first
        #[arg(short, long)]
        theme: Option<PathBuf>,
    },

    /// Resolve a theme file and show a sample of every key
    CheckTheme(CheckThemeArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Text to render, or - for stdin
    text: String,

    /// Theme file to load first
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Force a profile (ascii, ansi16, ansi256, truecolor)
    #[arg(short, long, value_parser = parse_profile)]
    profile: Option<ColorProfile>,

    /// Load the theme under this namespace instead of live
    #[arg(long, requires = "theme")]
    preview: Option<String>,

    /// Base style the text renders inside
    #[arg(long)]
    within: Option<String>,
}

#[derive(Args, Debug)]
struct CheckThemeArgs {
    /// Theme file
    file: PathBuf,

    /// Force a profile (ascii, ansi16, ansi256, truecolor)
    #[arg(short, long, value_parser = parse_profile)]
    profile: Option<ColorProfile>,
}

fn parse_profile(value: &str) -> Result<ColorProfile, String> {
    ColorProfile::from_name(value).ok_or_else(|| {
        format!(
            "unknown profile '{}' (expected ascii, ansi16, ansi256 or truecolor)",
            value
        )
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &mut out)
}

fn run(command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Render(args) => render(args, out),
        Commands::Strip { text } => {
            let renderer = renderer(None);
            writeln!(out, "{}", renderer.strip(&read_text(&text)?))?;
            Ok(())
        }
        Commands::Markup { text, theme } => {
            let renderer = renderer(None);
            if let Some(path) = theme {
                load_theme_or_warn(&renderer, &path, None);
            }
            writeln!(out, "{}", renderer.to_display_markup(&read_text(&text)?))?;
            Ok(())
        }
        Commands::CheckTheme(args) => check_theme(args, out),
    }
}

/// A renderer over the built-in tags. A forced profile also forces color.
fn renderer(profile: Option<ColorProfile>) -> Renderer {
    let registry = Arc::new(TagRegistry::with_defaults());
    let renderer = Renderer::from_env(registry, &RealEnv);
    match profile {
        Some(profile) => renderer.with_profile(profile).with_terminal(true),
        None => renderer,
    }
}

fn read_text(text: &str) -> Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer.trim_end_matches('\n').to_string())
}

/// Missing or broken themes leave the built-in tags in place.
fn load_theme_or_warn(renderer: &Renderer, path: &Path, namespace: Option<&str>) {
    match ThemeFile::from_file(path) {
        Ok(theme) => {
            let loaded = theme.load_into(renderer.registry(), namespace);
            log::debug!("loaded {} theme keys from {}", loaded.len(), path.display());
        }
        Err(e) => log::warn!("{}; using built-in tags", e),
    }
}

fn render(args: RenderArgs, out: &mut impl Write) -> Result<()> {
    let renderer = renderer(args.profile);
    if let Some(path) = &args.theme {
        load_theme_or_warn(&renderer, path, args.preview.as_deref());
    }
    let text = read_text(&args.text)?;
    let rendered = match &args.within {
        Some(base) => renderer.to_ansi_within(&text, base),
        None => renderer.to_ansi(&text),
    };
    writeln!(out, "{}", rendered)?;
    Ok(())
}

fn check_theme(args: CheckThemeArgs, out: &mut impl Write) -> Result<()> {
    let theme = ThemeFile::from_file(&args.file)
        .with_context(|| format!("Cannot check theme {}", args.file.display()))?;
    if theme.colors.is_empty() {
        bail!("{} defines no colors", args.file.display());
    }

    let renderer = renderer(args.profile);
    let loaded = theme.load_into(renderer.registry(), None);

    if let Some(name) = &theme.metadata.name {
        writeln!(out, "{}", name)?;
    }
    let width = loaded
        .entries
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, code) in &loaded.entries {
        let sample = format!(
            "{}sample{}",
            renderer.delimiters().wrap_direct(code),
            renderer.delimiters().wrap_direct("-")
        );
        writeln!(
            out,
            "{:<width$}  {:<16}  {}",
            name,
            code,
            renderer.to_ansi(&sample),
            width = width
        )?;
    }
    Ok(())
}
