//! Validate every collection

use anyhow::{bail, Result};
use notify_debouncer_mini::notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::{Site, CONFIG_FILE};

/// Outcome of checking one collection
#[derive(Debug)]
pub struct CollectionReport {
    pub name: String,
    pub result: Result<(usize, usize), String>,
}

/// Load every declared collection and report entry counts or the failure
pub fn check(site: &Site) -> Vec<CollectionReport> {
    let loader = site.loader();
    site.config
        .collections
        .keys()
        .map(|name| {
            let result = loader
                .load_collection(name)
                .map(|c| {
                    let published = c.iter().filter(|e| e.is_published()).count();
                    (c.len(), published)
                })
                .map_err(|e| e.to_string());
            CollectionReport {
                name: name.clone(),
                result,
            }
        })
        .collect()
}

/// Check the site once, failing if any collection does not load
pub fn run(site: &Site) -> Result<()> {
    let reports = check(site);
    let mut failed = 0;

    for report in &reports {
        match &report.result {
            Ok((total, published)) => println!(
                "  {}: {} entries ({} published)",
                report.name, total, published
            ),
            Err(e) => {
                failed += 1;
                println!("  {}: FAILED", report.name);
                tracing::error!("{}", e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} collection(s) failed to load", failed, reports.len());
    }
    Ok(())
}

/// Directories and files that affect the check result
fn watch_targets(site: &Site) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = site
        .config
        .collections
        .values()
        .map(|c| site.base_dir.join(&c.base))
        .filter(|p| p.is_dir())
        .collect();

    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        targets.push(config_path);
    }
    targets
}

/// Editor swap files and VCS internals never affect a check
fn is_relevant(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let in_vcs = path.components().any(|c| c.as_os_str() == ".git");

    !in_vcs
        && name != ".DS_Store"
        && !name.ends_with('~')
        && !name.ends_with(".swp")
        && !name.starts_with(".#")
}

/// Watch for file changes and re-check.
///
/// Events are debounced on the trailing edge: a burst of writes triggers
/// one check 500ms after the last event. Blocks until the watcher stops.
pub fn watch(base_dir: &Path) -> Result<()> {
    let (tx, rx) = channel::<DebounceEventResult>();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let site = Site::new(base_dir)?;
    for target in watch_targets(&site) {
        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&target, mode)?;
        tracing::debug!("Watching: {:?}", target);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Ends when the debouncer drops its sender
    while let Ok(result) = rx.recv() {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {}", e);
                continue;
            }
        };

        let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
        if changed.is_empty() {
            continue;
        }
        for event in &changed {
            tracing::debug!("Changed: {:?}", event.path);
        }

        tracing::info!("Content changed, checking...");
        // Reload so edits to _config.yml take effect
        match Site::new(base_dir) {
            Ok(site) => {
                if let Err(e) = run(&site) {
                    tracing::error!("Check failed: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to reload site: {}", e),
        }
    }

    Ok(())
}
