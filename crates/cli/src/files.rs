use crate::config::ScanConfig;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand the given paths into HTML files.
///
/// Files named explicitly are always kept. Directories are walked
/// recursively and filtered by extension and exclude globs. The result is
/// sorted and deduplicated.
pub fn collect_html_files(paths: &[PathBuf], scan: &ScanConfig) -> Result<Vec<PathBuf>> {
    let exclude = scan.exclude_set()?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("No such file or directory: {}", path.display());
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !exclude.is_match(entry.path()));
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && scan.matches_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    log::debug!("collected {} html files", files.len());
    Ok(files)
}

/// `-` or no paths at all means stdin
pub fn is_stdin(paths: &[PathBuf]) -> bool {
    match paths {
        [] => true,
        [only] => only == Path::new("-"),
        _ => false,
    }
}
