//! The patch command

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use console::Term;

use super::args::PatchArgs;
use super::progress::{LOOKING_GLASS, PACKAGE, archive_bar, print_done, print_step};
use super::prompt::{ask_target_version, confirm};
use super::summary::print_summary;
use crate::batch::{batch_patch, find_mod_archives};
use crate::config::PatcherConfig;
use crate::log::FileLog;
use crate::patch::{ModPatcher, PatchPhase, PatchProgress};

/// Patch the requested archives (or every archive in the current directory)
pub fn execute(args: &PatchArgs) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let term = Term::stdout();
    let started = Instant::now();

    let scanning = args.archives.is_empty();
    let steps = step_count(scanning);

    let archives = if scanning {
        print_step(1, steps, LOOKING_GLASS, "Scanning for mod archives...");
        let found = find_mod_archives(".", &config.extensions);
        if found.is_empty() {
            println!("No mod archives found in the current directory.");
            return Ok(());
        }

        println!("Found {} mod archive(s):", found.len());
        for archive in &found {
            println!("  - {}", archive.display());
        }
        if !args.yes && !confirm(&term, "Do you want to patch these files?")? {
            println!("Aborted.");
            return Ok(());
        }
        found
    } else {
        args.archives.clone()
    };

    let target_version = match &args.target_version {
        Some(version) => version.clone(),
        None if args.yes => config.default_target_version.clone(),
        None => ask_target_version(&term, &config.default_target_version)?,
    };

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;
    let log = FileLog::open(config.log_path())?;
    let patcher = ModPatcher::from_config(&config, &log);

    print_step(
        steps,
        steps,
        PACKAGE,
        &format!("Patching {} archive(s) for Minecraft {target_version}...", archives.len()),
    );

    let pb = archive_bar(archives.len() as u64, args.quiet);
    let report = batch_patch(
        &patcher,
        &archives,
        &target_version,
        config.parallel,
        |p: &PatchProgress| {
            if let Some(file) = &p.current_file {
                pb.set_message(file.clone());
            }
            if p.phase == PatchPhase::Complete {
                pb.inc(1);
            }
        },
    );
    pb.finish_and_clear();

    println!();
    print_summary(&report, patcher.output_dir());

    if report.has_errors() && !args.allow_errors {
        eprintln!(
            "{} of {} archive(s) failed; see {}",
            report.error_count(),
            archives.len(),
            log.path().display()
        );
        std::process::exit(1);
    }

    print_done(started.elapsed());
    Ok(())
}

/// One step for patching, plus one when the working directory is scanned.
fn step_count(scanning: bool) -> usize {
    if scanning { 2 } else { 1 }
}

/// Load the config and layer command-line overrides on top.
fn resolve_config(args: &PatchArgs) -> anyhow::Result<PatcherConfig> {
    let mut config = PatcherConfig::discover(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = PathBuf::from(dir);
    }
    if args.parallel {
        config.parallel = true;
    }
    Ok(config)
}
