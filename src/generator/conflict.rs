use std::fs;
use std::path::Path;

use anyhow::Context;

use super::HARVESTER_EXTENSION;

/// True when `dir` already holds a regular file named `{short_name}.py`.
/// Near-matches and directories of the same name do not count.
pub(super) fn harvester_exists(short_name: &str, dir: &Path) -> anyhow::Result<bool> {
    let target = format!("{short_name}.{HARVESTER_EXTENSION}");

    let entries = fs::read_dir(dir)
        .with_context(|| format!("unable to list harvesters directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() && entry.file_name().to_string_lossy() == target.as_str() {
            return Ok(true);
        }
    }
    Ok(false)
}
