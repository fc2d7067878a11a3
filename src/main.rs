mod button;
mod config;
mod error;
mod generator;
mod icons;
mod keymap;
mod layout;
mod manifest;
mod planner;
mod stratagem;
mod token;
mod workspace;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::config::Config;

fn main() -> Result<()> {
    // Parse CLI arguments; a bare run works on the current sdProfile directory
    let matches = Command::new("stratagem-deck")
        .version("0.1.1")
        .about("Generates StreamDock stratagem pages from stratagems.data.json")
        .arg(
            Arg::new("profile")
                .long("profile")
                .value_name("DIR")
                .help("sdProfile directory holding page 1 (default: current directory)"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .value_name("FILE")
                .help("Stratagem list (default: <profile>/stratagems.data.json)"),
        )
        .arg(
            Arg::new("icons")
                .long("icons")
                .value_name("DIR")
                .help("Icon source folder (default: <profile>/stratagems)"),
        )
        .arg(
            Arg::new("strict-keys")
                .long("strict-keys")
                .action(ArgAction::SetTrue)
                .help("Fail when a sequence uses a symbol with no keycode"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log skipped copies and other debug detail"),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match matches.get_one::<String>("profile") {
        Some(dir) => Config::for_existing_profile(Path::new(dir))?,
        None => Config::from_current_dir()?,
    };
    if let Some(data) = matches.get_one::<String>("data") {
        config.data_file = PathBuf::from(data);
    }
    if let Some(icons) = matches.get_one::<String>("icons") {
        config.icons_dir = PathBuf::from(icons);
    }
    config.strict_symbols = matches.get_flag("strict-keys");

    // Input problems abort before anything on disk is touched
    let stratagems = stratagem::load_stratagems(&config.data_file)?;
    if config.strict_symbols {
        stratagem::ensure_known_symbols(&stratagems).context("Strict key check failed")?;
    }

    println!("🎮 Helldivers 2 Stratagem Generator");
    println!("===================================================");
    println!("Total stratagems: {}", stratagems.len());

    let report = generator::run(&config, &stratagems);

    println!(
        "\n🎉 All {} stratagems distributed across {} pages!",
        report.total_stratagems,
        report.page_count()
    );
    if !report.failures.is_empty() {
        println!("⚠ {} operation(s) failed:", report.failures.len());
        for failure in &report.failures {
            match failure.page {
                Some(page) => println!("   page {} {}: {}", page + 1, failure.stage, failure.error),
                None => println!("   {}: {}", failure.stage, failure.error),
            }
        }
    }

    if !report.is_success() {
        let failed = report.failed_pages();
        let pages: Vec<String> = failed.iter().map(|p| (p + 1).to_string()).collect();
        bail!(
            "{} of {} page manifests were not written (pages {})",
            failed.len(),
            report.page_count(),
            pages.join(", ")
        );
    }

    Ok(())
}
