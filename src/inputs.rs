use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Collect input pages: `*.html` directly inside `in_dir` (sorted), then the
/// explicit paths. Paths are canonicalized and de-duplicated; anything that is
/// not an existing file is dropped.
pub fn discover(files: &[PathBuf], in_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = in_dir {
        candidates.extend(html_files_in(dir));
    }
    candidates.extend(files.iter().cloned());

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for path in candidates {
        let Ok(resolved) = fs::canonicalize(&path) else {
            warn!(path = %path.display(), "input not found, skipping");
            continue;
        };
        if !resolved.is_file() || !seen.insert(resolved.clone()) {
            continue;
        }
        out.push(resolved);
    }
    out
}

fn html_files_in(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot read input directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "html"))
        .collect();
    files.sort();
    files
}
