//! Generation run.
//! Three phases, strictly in order: reset the workspace, plan and scaffold the pages, then
//! synthesize and write each page's manifest in ascending page order.
//! Nothing in here is fatal. Failures are logged as they happen and collected in the
//! `RunReport` so the caller can decide on the exit status.

use std::fmt;

use crate::button::{self, MultiAction};
use crate::config::Config;
use crate::error::GenerateError;
use crate::icons::{self, CopyOutcome, PageImageNames};
use crate::layout;
use crate::manifest::{self, ManifestSource, PageList};
use crate::planner::{self, Page, PagePlan};
use crate::stratagem::Stratagem;
use crate::workspace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Reset,
    Scaffold,
    IconCopy,
    ManifestWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reset => write!(f, "workspace reset"),
            Stage::Scaffold => write!(f, "page scaffolding"),
            Stage::IconCopy => write!(f, "icon copy"),
            Stage::ManifestWrite => write!(f, "manifest write"),
        }
    }
}

#[derive(Debug)]
pub struct Failure {
    pub stage: Stage,
    /// Zero-based page index, when the failure belongs to one page.
    pub page: Option<usize>,
    pub error: GenerateError,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub total_stratagems: usize,
    pub page_ids: Vec<String>,
    pub pages_written: usize,
    pub buttons_placed: usize,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Pages whose manifest could not be written. Any of these makes the run a failure.
    pub fn failed_pages(&self) -> Vec<usize> {
        self.failures
            .iter()
            .filter(|f| f.stage == Stage::ManifestWrite)
            .filter_map(|f| f.page)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed_pages().is_empty()
    }

    fn record(&mut self, stage: Stage, page: Option<usize>, error: GenerateError) {
        tracing::warn!("{} failed: {}", stage, error);
        self.failures.push(Failure { stage, page, error });
    }
}

pub fn run(config: &Config, stratagems: &[Stratagem]) -> RunReport {
    let mut report = RunReport {
        total_stratagems: stratagems.len(),
        ..RunReport::default()
    };

    for error in workspace::reset_workspace(config) {
        report.record(Stage::Reset, None, error);
    }

    let plan = planner::plan_pages(config, stratagems.len());
    report.page_ids = plan.page_ids.clone();
    for error in planner::create_page_folders(&plan) {
        report.record(Stage::Scaffold, None, error);
    }

    for page in &plan.pages {
        generate_page(config, &plan, page, stratagems, &mut report);
    }

    report
}

fn generate_page(
    config: &Config,
    plan: &PagePlan,
    page: &Page,
    all: &[Stratagem],
    report: &mut RunReport,
) {
    let slice = page.stratagems(all);
    println!(
        "\n📄 Processing Page {}: {}",
        page.index + 1,
        page.manifest_path.display()
    );
    println!(
        "   Stratagems: {} (indices {}-{})",
        slice.len(),
        page.range.start,
        page.range.end as isize - 1
    );

    let (mut manifest, source) = manifest::load_manifest(&page.manifest_path);
    match source {
        ManifestSource::Existing => {}
        ManifestSource::Missing => {
            tracing::debug!("No manifest at {}, starting from skeleton", page.manifest_path.display())
        }
        ManifestSource::Invalid(reason) => tracing::warn!(
            "Ignoring unreadable manifest {}: {}",
            page.manifest_path.display(),
            reason
        ),
    }

    let mut image_names = PageImageNames::new();
    let mut buttons: Vec<(&'static str, MultiAction)> = Vec::with_capacity(slice.len());
    for (position, stratagem) in layout::assign_slots(slice) {
        let image = place_icon(config, page, stratagem, &mut image_names, report);
        buttons.push((position, button::stratagem_button(stratagem, Some(image.as_str()))));
        println!("  ✅ {} -> {} ({})", stratagem.name, position, stratagem.sequence);
    }
    let placed = buttons.len();

    if page.index == 0 {
        manifest.set_page_list(&PageList {
            current: plan.current_profile_id.clone(),
            pages: plan.page_ids.clone(),
        });
    }
    manifest.rebuild_actions(buttons);

    match manifest::write_manifest(&page.manifest_path, &manifest) {
        Ok(()) => {
            report.pages_written += 1;
            report.buttons_placed += placed;
            println!("  💾 Updated {}", page.manifest_path.display());
        }
        Err(error) => {
            eprintln!("  ❌ Error writing {}: {}", page.manifest_path.display(), error);
            report.record(Stage::ManifestWrite, Some(page.index), error);
        }
    }
}

/// Copies the stratagem's icon into the page's `Images/` and returns the name to reference.
/// The name is returned even when the copy fails so the button still points somewhere sensible.
fn place_icon(
    config: &Config,
    page: &Page,
    stratagem: &Stratagem,
    image_names: &mut PageImageNames,
    report: &mut RunReport,
) -> String {
    let source = icons::icon_filename(stratagem);
    let dest = image_names.allocate(&source);
    match icons::copy_icon(&config.icons_dir, &source, &page.images_dir, &dest) {
        Ok(CopyOutcome::Copied) => {}
        Ok(CopyOutcome::UpToDate) => tracing::debug!("{} already up to date", dest),
        Err(error) => {
            eprintln!(
                "⚠️  Failed to copy icon {} -> {}/{}",
                source,
                page.images_dir.display(),
                dest
            );
            report.record(Stage::IconCopy, Some(page.index), error);
        }
    }
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MARKER_FILE, PAGE_SIZE};
    use serde_json::{Value, json};
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const SEQUENCES: [&str; 5] = ["wasd", "sswd", "wdd", "dsaww", "sa"];

    fn sandbox() -> (TempDir, Config) {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path().join("ROOT.sdProfile");
        fs::create_dir_all(root.join("stratagems")).expect("icons dir");
        let config = Config::for_profile(&root);
        (temp, config)
    }

    fn stratagems(config: &Config, n: usize) -> Vec<Stratagem> {
        (0..n)
            .map(|i| {
                let s = Stratagem::new(format!("Stratagem {i}"), SEQUENCES[i % SEQUENCES.len()]);
                fs::write(config.icons_dir.join(icons::icon_filename(&s)), format!("icon {i}"))
                    .expect("icon");
                s
            })
            .collect()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json")
    }

    fn page_manifest(config: &Config, report: &RunReport, index: usize) -> Value {
        if index == 0 {
            read_json(&config.root_manifest())
        } else {
            read_json(
                &config
                    .profiles_dir()
                    .join(&report.page_ids[index])
                    .join("manifest.json"),
            )
        }
    }

    #[test]
    fn test_single_record_example() {
        let (_temp, config) = sandbox();
        let input = vec![Stratagem::new("Eagle Strafing Run", "sa")];

        let report = run(&config, &input);

        assert!(report.is_success());
        assert_eq!(report.page_count(), 1);
        let manifest = read_json(&config.root_manifest());
        let button = &manifest["Actions"]["0,0"];
        assert_eq!(button["States"][0]["Title"], "Eagle Strafing Run");
        assert_eq!(button["Actions"].as_array().unwrap().len(), 4);
        assert_eq!(
            manifest["Pages"],
            json!({"Current": "ROOT.sdProfile", "Pages": ["ROOT.sdProfile"]})
        );
        assert_eq!(manifest["DeviceModel"], "20GBA9901");
    }

    #[test]
    fn test_empty_input_writes_navigation_only() {
        let (_temp, config) = sandbox();

        let report = run(&config, &[]);

        assert!(report.is_success());
        let manifest = read_json(&config.root_manifest());
        let keys: Vec<&String> = manifest["Actions"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["0,5", "2,5"]);
    }

    #[test]
    fn test_records_spread_across_pages() {
        let (_temp, config) = sandbox();
        let input = stratagems(&config, 37);

        let report = run(&config, &input);

        assert!(report.is_success(), "failures: {:?}", report.failures);
        assert_eq!(report.page_count(), 3);
        assert_eq!(report.pages_written, 3);
        assert_eq!(report.buttons_placed, 37);

        let root = read_json(&config.root_manifest());
        assert_eq!(root["Pages"]["Current"], "ROOT.sdProfile");
        assert_eq!(root["Pages"]["Pages"], json!(report.page_ids));

        let mut seen = Vec::new();
        for index in 0..3 {
            let manifest = page_manifest(&config, &report, index);
            let actions = manifest["Actions"].as_object().unwrap();
            let expected = (37 - index * PAGE_SIZE).min(PAGE_SIZE);
            assert_eq!(actions.len(), expected + 2);
            for (slot, position) in layout::POSITIONS.iter().take(expected).enumerate() {
                let title = actions[*position]["States"][0]["Title"].as_str().unwrap();
                assert_eq!(title, format!("Stratagem {}", index * PAGE_SIZE + slot));
                seen.push(title.to_string());
            }
            if index > 0 {
                assert!(manifest.get("Pages").is_none());
            }
        }
        let unique: HashSet<&String> = seen.iter().collect();
        assert_eq!(unique.len(), 37);
    }

    #[test]
    fn test_icons_copied_under_unique_names_per_page() {
        let (_temp, config) = sandbox();
        let input = stratagems(&config, 20);

        let report = run(&config, &input);
        assert!(report.failures.is_empty(), "failures: {:?}", report.failures);

        let root = read_json(&config.root_manifest());
        let images: HashSet<String> = layout::POSITIONS
            .iter()
            .map(|p| root["Actions"][*p]["States"][0]["Image"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(images.len(), 15);
        for image in &images {
            assert!(config.root_images_dir().join(image).is_file());
        }

        let second = config.profiles_dir().join(&report.page_ids[1]);
        assert!(second.join(MARKER_FILE).is_file());
        assert_eq!(fs::read_dir(second.join("Images")).unwrap().count(), 5);
    }

    #[test]
    fn test_missing_icon_is_not_fatal() {
        let (_temp, config) = sandbox();
        let input = vec![Stratagem::new("No Icon Here", "wasd")];

        let report = run(&config, &input);

        assert!(report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, Stage::IconCopy);
        assert_eq!(report.failures[0].page, Some(0));
        let manifest = read_json(&config.root_manifest());
        assert_eq!(manifest["Actions"]["0,0"]["States"][0]["Title"], "No Icon Here");
    }

    #[test]
    fn test_regeneration_keeps_reserved_and_clears_stale_pages() {
        let (_temp, config) = sandbox();
        let first = run(&config, &stratagems(&config, 40));
        assert_eq!(first.page_count(), 3);

        let mut root = read_json(&config.root_manifest());
        root["Actions"]["0,5"] = json!({"Name": "My Indicator"});
        root["Actions"]["1,5"] = json!({"Name": "Scratch"});
        root["Icon"] = json!("custom.png");
        fs::write(config.root_manifest(), root.to_string()).expect("rewrite");

        let second = run(&config, &stratagems(&config, 10));

        assert_eq!(second.page_count(), 1);
        let page_dirs = fs::read_dir(config.profiles_dir()).unwrap().count();
        assert_eq!(page_dirs, 0);

        let root = read_json(&config.root_manifest());
        assert_eq!(root["Actions"]["0,5"], json!({"Name": "My Indicator"}));
        assert_eq!(root["Actions"]["2,5"]["Name"], "change page");
        assert!(root["Actions"].get("1,5").is_none());
        assert_eq!(root["Actions"].as_object().unwrap().len(), 12);
        assert_eq!(root["Icon"], "custom.png");
        assert_eq!(root["Pages"]["Pages"], json!(["ROOT.sdProfile"]));
    }

    #[test]
    fn test_repeated_runs_are_structurally_stable() {
        let (_temp, config) = sandbox();
        let input = stratagems(&config, 7);

        run(&config, &input);
        let first = read_json(&config.root_manifest());
        run(&config, &input);
        let second = read_json(&config.root_manifest());

        for position in layout::POSITIONS.iter().take(7) {
            let a = &first["Actions"][*position];
            let b = &second["Actions"][*position];
            assert_eq!(a["States"][0]["Title"], b["States"][0]["Title"]);
            assert_eq!(a["Actions"].as_array().unwrap().len(), b["Actions"].as_array().unwrap().len());
            let codes = |v: &Value| -> Vec<Value> {
                v["Actions"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|h| h["Settings"]["Hotkeys"][0]["VKeyCode"].clone())
                    .collect()
            };
            assert_eq!(codes(a), codes(b));
        }
        assert_eq!(first["Actions"]["0,5"], second["Actions"]["0,5"]);
        assert_eq!(first["Actions"]["2,5"], second["Actions"]["2,5"]);
    }

    #[test]
    fn test_write_failure_marks_run_failed() {
        let (_temp, config) = sandbox();
        // A directory squatting on the manifest path makes the write fail
        fs::create_dir_all(config.root_manifest()).expect("blocker");

        let report = run(&config, &[Stratagem::new("Reinforce", "wsdaw")]);

        assert!(!report.is_success());
        assert_eq!(report.failed_pages(), vec![0]);
        assert_eq!(report.pages_written, 0);
    }
}
