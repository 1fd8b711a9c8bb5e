//! Common utilities for spanalpha-cmd

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Checks if a file exists and is readable
pub fn validate_file_exists(path: &str) -> Result<()> {
    let file_path = Path::new(path);
    if !file_path.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }
    if !file_path.is_file() {
        anyhow::bail!("Path is not a file: {}", path);
    }
    Ok(())
}

/// The input file name without its `.gz` and data extensions:
/// `exports/Batch_42.csv.gz` becomes `Batch_42`.
pub fn batch_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    match Path::new(name).file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => name.to_string(),
    }
}

/// Path of the exchange file of one topic: `<dir>/<batch>-uAlpha-<topic>.csv`.
///
/// Path separators in the topic name are replaced with `_`.
pub fn topic_output_path(output_dir: &Path, batch: &str, topic: &str) -> PathBuf {
    let topic = topic.replace(['/', '\\'], "_");
    output_dir.join(format!("{batch}-uAlpha-{topic}.csv"))
}
