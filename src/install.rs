use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the updater binary itself, which must never be overwritten
/// while it runs.
pub const UPDATER_NAME: &str = "anvil-update";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// Source missing from the release: older archives may omit files a
    /// newer manifest expects, and that is fine.
    SkippedMissing,
    Failed(String),
}

impl ReplaceOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ReplaceOutcome::Failed(_))
    }
}

/// One manifest entry's fate, so callers can report partial failure
/// precisely instead of guessing.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: ReplaceOutcome,
}

/// The anvil binaries replaced on every update, in order.
pub fn default_manifest() -> Vec<PathBuf> {
    let exe = std::env::consts::EXE_SUFFIX;
    vec![
        PathBuf::from(format!("bin/anvil{exe}")),
        PathBuf::from(format!("bin/anvilcli{exe}")),
        PathBuf::from(format!("anvilterm{exe}")),
    ]
}

/// Move `src` onto `dst`, replacing what is there. Never propagates an
/// error: a missing source is a no-op success and anything else is
/// captured in the outcome for the caller to report.
///
/// `dst` never has a missing window. A plain rename swaps in place on
/// the same volume; across volumes the content is copied to a sibling
/// of `dst` first and renamed over it.
pub fn replace_file(src: &Path, dst: &Path) -> ReplaceOutcome {
    if !src.exists() {
        return ReplaceOutcome::SkippedMissing;
    }
    if let Some(parent) = dst.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return ReplaceOutcome::Failed(e.to_string());
        }
    }

    if fs::rename(src, dst).is_ok() {
        return ReplaceOutcome::Replaced;
    }

    let tmp = staging_path(dst);
    if let Err(e) = fs::copy(src, &tmp) {
        let _ = fs::remove_file(&tmp);
        return ReplaceOutcome::Failed(e.to_string());
    }
    if let Err(e) = fs::rename(&tmp, dst) {
        let _ = fs::remove_file(&tmp);
        return ReplaceOutcome::Failed(e.to_string());
    }
    let _ = fs::remove_file(src);
    ReplaceOutcome::Replaced
}

fn staging_path(dst: &Path) -> PathBuf {
    let mut name = dst
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".tmp");
    dst.with_file_name(name)
}

/// Replace every manifest entry from the unpacked tree onto the install
/// root, best-effort, and report each outcome.
pub fn install_files(unpacked: &Path, root: &Path, manifest: &[PathBuf]) -> Vec<FileReport> {
    manifest
        .iter()
        .map(|rel| FileReport {
            path: rel.clone(),
            outcome: replace_file(&unpacked.join(rel), &root.join(rel)),
        })
        .collect()
}

/// Stage the new updater binary under a `-new` sibling name rather than
/// overwriting the running image; the launcher promotes it on its next
/// start.
pub fn stage_updater(unpacked: &Path, root: &Path) -> ReplaceOutcome {
    let exe = std::env::consts::EXE_SUFFIX;
    let src = unpacked.join("bin").join(format!("{UPDATER_NAME}{exe}"));
    let dst = root.join("bin").join(format!("{UPDATER_NAME}-new{exe}"));
    replace_file(&src, &dst)
}
