use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::config::UpdateConfig;
use crate::install::ReplaceOutcome;
use crate::release::{self, InstalledRelease};
use crate::{extract, fetch, install, paths};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    UpToDate,
    Updated,
}

/// One update run, start to finish.
///
/// Everything that can fail over the network or in the archive happens
/// before any live file is touched; an `Err` from this function means
/// the existing installation is intact.
pub fn run(config: &UpdateConfig) -> Result<Outcome> {
    let root = match &config.install_root {
        Some(r) => r.clone(),
        None => paths::install_root().unwrap_or_else(|e| {
            eprintln!("{} {:#}", "unable to locate install root:".red(), e);
            PathBuf::from(".")
        }),
    };

    let installed = InstalledRelease::current();
    let Some(plan) = release::resolve_update(config, &installed) else {
        return Ok(Outcome::UpToDate);
    };
    eprintln!(
        "{}",
        format!("New release asset {}", plan.download_url).green()
    );

    let scratch = paths::scratch_dir(&root);
    fs::create_dir_all(&scratch)
        .with_context(|| format!("unable to create {}", scratch.display()))?;

    let archive = fetch::download(&plan.download_url, &scratch)?;

    let unpacked = paths::unpack_dir(&archive);
    if unpacked.exists() {
        // stale output from an earlier run
        fs::remove_dir_all(&unpacked)
            .with_context(|| format!("unable to clear {}", unpacked.display()))?;
    }
    extract::extract(&archive, &unpacked)?;
    extract::normalize_layout(&unpacked)?;

    for report in install::install_files(&unpacked, &root, &config.manifest) {
        match &report.outcome {
            ReplaceOutcome::Replaced => {
                eprintln!("{} {}", "updated".green(), report.path.display());
            }
            ReplaceOutcome::SkippedMissing => {
                eprintln!(
                    "{} {} (not in this release)",
                    "skipped".yellow(),
                    report.path.display()
                );
            }
            ReplaceOutcome::Failed(reason) => {
                eprintln!(
                    "{} {}: {}",
                    "failed".red(),
                    report.path.display(),
                    reason
                );
            }
        }
    }

    if install::stage_updater(&unpacked, &root) == ReplaceOutcome::Replaced {
        eprintln!(
            "{} {}-new (swapped in on next launch)",
            "staged".green(),
            install::UPDATER_NAME
        );
    }

    Ok(Outcome::Updated)
}
