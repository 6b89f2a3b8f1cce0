mod generator;
pub mod oai;

use std::path::{Path, PathBuf};

pub use generator::{
    GenerateOutcome, Generator, GeneratorArgs, GeneratorConfig, HARVESTER_EXTENSION,
    resolve_date_range,
};

/// Expand a leading tilde in operator-supplied paths.
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
