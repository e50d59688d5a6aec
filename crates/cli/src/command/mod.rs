use anyhow::{Context, Result};
use clap::Args;
use samewindow_dom::HtmlSource;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

mod check;
mod rewrite;

pub use check::run_check;
pub use rewrite::run_rewrite;

pub const STDIN_LABEL: &str = "<stdin>";

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// UTF-8 HTML files or directories (`-` or nothing reads stdin)
    pub paths: Vec<PathBuf>,

    /// Rewrite files in place; directories are walked recursively
    #[arg(long)]
    pub in_place: bool,

    /// Write the rewritten HTML here instead of stdout
    #[arg(short, long, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Print a JSON report (requires --in-place)
    #[arg(long, requires = "in_place")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// UTF-8 HTML files or directories (`-` or nothing reads stdin)
    pub paths: Vec<PathBuf>,

    /// Print a JSON report instead of one line per finding
    #[arg(long)]
    pub json: bool,
}

fn read_stdin() -> Result<String> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read stdin")?;
    String::from_utf8(input).with_context(|| format!("{STDIN_LABEL} is not valid UTF-8"))
}

fn read_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8; convert it first", path.display()))
}

fn parse(text: String, label: &str) -> Result<HtmlSource> {
    HtmlSource::parse(text).with_context(|| format!("Failed to parse {label}"))
}

fn write_output(target: Option<&Path>, html: &str) -> Result<()> {
    match target {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write stdout")
        }
    }
}
