//! Page planning.
//! Splits the stratagem list into pages of `PAGE_SIZE`, gives every page after the first its own
//! freshly named sdProfile folder under `profiles/`, and lays down that folder's scaffolding.
//! Page 0 always lives in the working profile itself.

use chrono::{SecondsFormat, Utc};
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

use crate::config::{Config, IMAGES_DIR, MANIFEST_FILE, MARKER_FILE, PAGE_SIZE};
use crate::error::GenerateError;
use crate::stratagem::Stratagem;
use crate::token;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    /// `None` for page 0, which reuses the working profile.
    pub folder_id: Option<String>,
    pub manifest_path: PathBuf,
    pub images_dir: PathBuf,
    /// Indices into the full stratagem list.
    pub range: Range<usize>,
}

impl Page {
    pub fn stratagems<'a>(&self, all: &'a [Stratagem]) -> &'a [Stratagem] {
        &all[self.range.clone()]
    }

    pub fn folder(&self) -> Option<PathBuf> {
        self.manifest_path.parent().map(PathBuf::from)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagePlan {
    pub pages: Vec<Page>,
    /// Value for `Pages.Pages`: current profile first, then generated folders in creation order.
    pub page_ids: Vec<String>,
    pub current_profile_id: String,
}

impl PagePlan {
    pub fn generated_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|page| page.folder_id.is_some())
    }
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Pure planning step; touches no files.
pub fn plan_pages(config: &Config, total: usize) -> PagePlan {
    let current_profile_id = config.current_profile_id();
    let mut page_ids = vec![current_profile_id.clone()];
    let mut pages = Vec::with_capacity(page_count(total));

    for index in 0..page_count(total) {
        let start = (index * PAGE_SIZE).min(total);
        let end = (start + PAGE_SIZE).min(total);

        let page = if index == 0 {
            Page {
                index,
                folder_id: None,
                manifest_path: config.root_manifest(),
                images_dir: config.root_images_dir(),
                range: start..end,
            }
        } else {
            let folder_id = token::profile_folder_name();
            let folder = config.profiles_dir().join(&folder_id);
            page_ids.push(folder_id.clone());
            Page {
                index,
                folder_id: Some(folder_id),
                manifest_path: folder.join(MANIFEST_FILE),
                images_dir: folder.join(IMAGES_DIR),
                range: start..end,
            }
        };
        pages.push(page);
    }

    PagePlan {
        pages,
        page_ids,
        current_profile_id,
    }
}

/// Creates folder, `Images/` and the generation marker for every generated page.
/// Each step is attempted independently.
pub fn create_page_folders(plan: &PagePlan) -> Vec<GenerateError> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut failures = Vec::new();

    for page in plan.generated_pages() {
        let Some(folder) = page.folder() else {
            continue;
        };
        if let Err(err) = fs::create_dir_all(&folder) {
            failures.push(GenerateError::io("create folder", &folder, err));
        }
        if let Err(err) = fs::create_dir_all(&page.images_dir) {
            failures.push(GenerateError::io("create folder", &page.images_dir, err));
        }
        let marker = folder.join(MARKER_FILE);
        if let Err(err) = fs::write(&marker, &timestamp) {
            failures.push(GenerateError::io("write marker", marker, err));
        }
        tracing::debug!("Prepared page {} folder {}", page.index + 1, folder.display());
    }

    failures
}
