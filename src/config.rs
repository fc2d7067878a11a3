//! Config module.
//! Resolves where the generator reads and writes, relative to the current sdProfile directory.
//! Holds the fixed layout names the StreamDock host expects and the default device metadata
//! used when a page manifest has to be created from scratch.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Stratagems per page; one per non-reserved grid slot.
pub const PAGE_SIZE: usize = 15;

pub const PROFILES_DIR: &str = "profiles";
pub const IMAGES_DIR: &str = "Images";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const MARKER_FILE: &str = ".generated-by-stratagem-generator";
pub const PROFILE_SUFFIX: &str = ".sdProfile";

pub const DATA_FILE: &str = "stratagems.data.json";
pub const ICONS_DIR: &str = "stratagems";

// Skeleton metadata for manifests that don't exist yet
pub const DEVICE_MODEL: &str = "20GBA9901";
pub const DEVICE_UUID: &str = "MBox-N1E";
pub const PROFILE_NAME: &str = "Helldivers 2 All Stratagems";
pub const PROFILE_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The sdProfile directory holding page 0.
    pub profile_root: PathBuf,
    pub data_file: PathBuf,
    pub icons_dir: PathBuf,
    /// Reject sequence symbols missing from the keymap instead of passing them through.
    pub strict_symbols: bool,
}

impl Config {
    /// Defaults relative to `profile_root`, matching a plain no-argument run.
    pub fn for_profile(profile_root: impl Into<PathBuf>) -> Self {
        let profile_root = profile_root.into();
        Config {
            data_file: profile_root.join(DATA_FILE),
            icons_dir: profile_root.join(ICONS_DIR),
            profile_root,
            strict_symbols: false,
        }
    }

    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to resolve current working directory")?;
        Self::for_existing_profile(&cwd)
    }

    /// Resolves `dir` to an absolute path first, so `.` or `..` still yield a real profile id.
    pub fn for_existing_profile(dir: &Path) -> Result<Self> {
        let root = fs::canonicalize(dir)
            .with_context(|| format!("Failed to resolve profile directory: {}", dir.display()))?;
        Ok(Self::for_profile(root))
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.profile_root.join(PROFILES_DIR)
    }

    pub fn root_images_dir(&self) -> PathBuf {
        self.profile_root.join(IMAGES_DIR)
    }

    pub fn root_manifest(&self) -> PathBuf {
        self.profile_root.join(MANIFEST_FILE)
    }

    /// Folder name of the working profile, written as `Pages.Current`.
    pub fn current_profile_id(&self) -> String {
        profile_id_of(&self.profile_root)
    }
}

fn profile_id_of(path: &Path) -> String {
    path.file_name()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .unwrap_or_default()
}
