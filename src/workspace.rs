//! Workspace reset.
//! Clears every page folder under `profiles/` and the root `Images/` cache so a run never
//! inherits stale pages from a previous, larger stratagem list.
//! Best-effort: each failed delete is returned to the caller instead of stopping the reset.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::Config;
use crate::error::GenerateError;

/// Returns the failures; an empty vec means the workspace is clean.
pub fn reset_workspace(config: &Config) -> Vec<GenerateError> {
    let mut failures = remove_all_subfolders(&config.profiles_dir());
    if let Err(err) = remove_dir_if_present(&config.root_images_dir()) {
        failures.push(err);
    }
    failures
}

/// Ensures `base` exists, then removes every directory inside it. Files are left alone.
pub fn remove_all_subfolders(base: &Path) -> Vec<GenerateError> {
    let mut failures = Vec::new();

    if let Err(err) = fs::create_dir_all(base) {
        failures.push(GenerateError::io("create folder", base, err));
        return failures;
    }

    let entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(err) => {
            failures.push(GenerateError::io("list folder", base, err));
            return failures;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                failures.push(GenerateError::io("list folder", base, err));
                continue;
            }
        };
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Err(err) = fs::remove_dir_all(&path) {
            failures.push(GenerateError::io("remove folder", path, err));
        }
    }

    failures
}

fn remove_dir_if_present(path: &Path) -> Result<(), GenerateError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(GenerateError::io("remove folder", path, err)),
    }
}
