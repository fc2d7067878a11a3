//! Icon assignment.
//! Icons are looked up by a slug of the stratagem name (`Eagle 500kg Bomb` -> `eagle-500kg-bomb.png`)
//! in the read-only icons directory, then copied into the page's `Images/` folder under a random
//! basename that is unique on that page. The host app chokes on spaces, hence the renaming.
//! A missing source icon is not fatal; the copy error is handed back for logging.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::GenerateError;
use crate::stratagem::Stratagem;
use crate::token::{self, ICON_TOKEN_LEN};

const DEFAULT_ICON_EXTENSION: &str = ".png";

/// Lowercase, runs of anything outside `a-z0-9` become one hyphen, no hyphens at either end.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

pub fn icon_filename(stratagem: &Stratagem) -> String {
    format!("{}.png", slugify(&stratagem.name))
}

/// Extension with its dot, `.png` when the name has none.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| DEFAULT_ICON_EXTENSION.to_string())
}

/// Destination names already handed out on one page. Create one per page.
#[derive(Debug, Default)]
pub struct PageImageNames {
    used: HashSet<String>,
}

impl PageImageNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Random basename for `source_filename`, keeping its extension.
    pub fn allocate(&mut self, source_filename: &str) -> String {
        self.allocate_with(source_filename, || token::random_token(ICON_TOKEN_LEN))
    }

    /// Draws tokens from `next_token` until one is unused on this page.
    pub fn allocate_with(
        &mut self,
        source_filename: &str,
        mut next_token: impl FnMut() -> String,
    ) -> String {
        let ext = extension_of(source_filename);
        loop {
            let candidate = format!("{}{}", next_token(), ext);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            tracing::debug!("Icon name {} already used on this page, drawing again", candidate);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    UpToDate,
}

/// Copies `icons_dir/source_filename` to `dest_dir/dest_name`, creating `dest_dir` if needed.
/// Skipped when the destination has the same size and is at least as new as the source.
pub fn copy_icon(
    icons_dir: &Path,
    source_filename: &str,
    dest_dir: &Path,
    dest_name: &str,
) -> Result<CopyOutcome, GenerateError> {
    fs::create_dir_all(dest_dir).map_err(|e| GenerateError::io("create folder", dest_dir, e))?;

    let src = icons_dir.join(source_filename);
    let dest = dest_dir.join(dest_name);

    if is_up_to_date(&src, &dest) {
        return Ok(CopyOutcome::UpToDate);
    }

    fs::copy(&src, &dest).map_err(|e| GenerateError::io("copy icon", &src, e))?;
    Ok(CopyOutcome::Copied)
}

fn is_up_to_date(src: &Path, dest: &Path) -> bool {
    let (Ok(s), Ok(d)) = (fs::metadata(src), fs::metadata(dest)) else {
        return false;
    };
    if s.len() != d.len() {
        return false;
    }
    match (s.modified(), d.modified()) {
        (Ok(src_time), Ok(dest_time)) => src_time <= dest_time,
        _ => false,
    }
}
