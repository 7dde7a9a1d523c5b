use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// List the files in `folder` with the given extension (without the dot), sorted by file name.
/// Files with any other extension are skipped with a warning; subdirectories are ignored.
pub fn folder_inputs<P: AsRef<Path>>(folder: P, extension: &str) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    let mut entries = fs::read_dir(folder)?
        .map(|e| e.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut inputs = Vec::with_capacity(entries.len());
    for path in entries {
        if path.is_dir() {
            debug!("ignoring directory {}", path.display());
            continue;
        }
        if has_extension(&path, extension) {
            inputs.push(path);
        } else {
            warn!("ignoring file with wrong extension: {}", path.display());
        }
    }
    if inputs.is_empty() {
        return Err(Error::NoInputs {
            folder: folder.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(inputs)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e == extension.trim_start_matches('.'))
}

/// Figure title for an input: the file stem for a file, the directory name for a folder.
pub fn title_for(path: &Path) -> String {
    let name = if path.is_dir() {
        path.file_name()
    } else {
        path.file_stem()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path used when none is given: the input file with its extension replaced, or for a
/// folder a sibling file named after it.
pub fn default_output(input: &Path, extension: &str) -> PathBuf {
    if input.is_dir() {
        let abs = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
        let mut name = abs.into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    } else {
        input.with_extension(extension)
    }
}
