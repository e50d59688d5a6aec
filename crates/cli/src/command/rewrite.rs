use super::{parse, read_file, read_stdin, write_output, RewriteArgs, STDIN_LABEL};
use crate::config::Config;
use crate::files::{collect_html_files, is_stdin};
use crate::report::{FileReport, RewriteReport};
use anyhow::{bail, Context, Result};
use samewindow_normalizer::normalize_links_with_stats;
use std::fs;

pub fn run_rewrite(args: RewriteArgs, config: &Config) -> Result<i32> {
    if is_stdin(&args.paths) {
        if args.in_place {
            bail!("--in-place needs file or directory paths");
        }
        let mut doc = parse(read_stdin()?, STDIN_LABEL)?;
        let stats = normalize_links_with_stats(&mut doc);
        log::info!("{STDIN_LABEL}: rewrote {} of {} links", stats.rewritten, stats.scanned);
        write_output(args.output.as_deref(), &doc.render())?;
        return Ok(0);
    }

    if !args.in_place {
        let [single] = args.paths.as_slice() else {
            bail!("Rewriting several paths requires --in-place");
        };
        if single.is_dir() {
            bail!(
                "{} is a directory; rewriting directories requires --in-place",
                single.display()
            );
        }
        let label = single.display().to_string();
        let mut doc = parse(read_file(single)?, &label)?;
        let stats = normalize_links_with_stats(&mut doc);
        log::info!("{label}: rewrote {} of {} links", stats.rewritten, stats.scanned);
        write_output(args.output.as_deref(), &doc.render())?;
        return Ok(0);
    }

    let files = collect_html_files(&args.paths, &config.scan)?;
    let mut report = RewriteReport::default();

    for path in files {
        let label = path.display().to_string();
        let mut doc = parse(read_file(&path)?, &label)?;
        let stats = normalize_links_with_stats(&mut doc);
        let written = doc.is_modified();
        if written {
            fs::write(&path, doc.render())
                .with_context(|| format!("Failed to write {label}"))?;
            log::info!("{label}: rewrote {} of {} links", stats.rewritten, stats.scanned);
        } else {
            log::debug!("{label}: nothing to rewrite");
        }
        report.push(FileReport {
            path: label,
            stats,
            written,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render_summary());
    }
    Ok(0)
}
