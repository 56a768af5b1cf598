pub mod csv;

pub use csv::CsvRowIterator;

use anyhow::Context;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Lists the importable files in the deck directory, sorted by name so the
/// file-selection prompt is stable between runs.
pub fn list_deck_files(dir: &Path) -> anyhow::Result<Vec<(PathBuf, String)>> {
    if !dir.exists() {
        anyhow::bail!("deck directory '{}' does not exist", dir.display());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read deck directory: {}", dir.display()))?
    {
        let entry = entry
            .with_context(|| format!("failed to read entry in deck directory: {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(OsStr::to_str)
            && ext.eq_ignore_ascii_case("csv")
        {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            files.push((path, file_name));
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}
