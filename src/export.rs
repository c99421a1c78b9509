use crate::catalog::CatalogEntry;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the entry's code into `dir` under its suggested file name, byte for
/// byte. The directory is created if needed.
pub fn save_code(entry: &CatalogEntry, dir: &Path) -> Result<PathBuf, String>
{
    fs::create_dir_all(dir)
        .map_err(|err| format!("Failed to create {}: {err}", dir.display()))?;
    let path = dir.join(entry.file_name);
    fs::write(&path, entry.code.as_bytes())
        .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
    info!("exported '{}' to {}", entry.id, path.display());
    Ok(path)
}
