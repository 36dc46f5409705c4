use crate::Result;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write `contents` to `dir/name` so that readers only ever see the complete file.
///
/// The data goes to a temporary file in the same directory first and is then renamed over
/// the destination.
pub fn write_atomic(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).into_app_err_with(|| format!("creating output directory '{}'", dir.display()))?;

    let target = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir).into_app_err_with(|| format!("creating temporary file in '{}'", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .into_app_err_with(|| format!("writing '{}'", target.display()))?;
    tmp.as_file()
        .sync_all()
        .into_app_err_with(|| format!("flushing '{}'", target.display()))?;
    let _ = tmp
        .persist(&target)
        .map_err(|e| e.error)
        .into_app_err_with(|| format!("replacing '{}'", target.display()))?;

    Ok(target)
}
