pub mod output;
pub mod report;

pub use output::{create_writer, JsonWriter, OutputFormat, OutputWriter, TerminalWriter};
pub use report::{EntityReport, Report, RoleCounts, TypeReport};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
