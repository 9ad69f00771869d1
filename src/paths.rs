use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Install root for the live installation. The updater runs from
/// `<root>/bin`, so the root is the executable's parent stripped one
/// level.
pub fn install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("unable to find executable path")?;
    let bin = exe
        .parent()
        .context("executable has no parent directory")?;
    Ok(bin.parent().unwrap_or(bin).to_path_buf())
}

/// Scratch directory for downloads and unpacking, reused across runs.
pub fn scratch_dir(root: &Path) -> PathBuf {
    root.join("bin").join("pkgs").join(".pkgtmp")
}

/// Directory the archive unpacks into, derived from the archive name
/// and sitting next to it in the scratch directory.
pub fn unpack_dir(archive: &Path) -> PathBuf {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    for suffix in [".tar.gz", ".tgz", ".zip"] {
        if let Some(stem) = name.strip_suffix(suffix) {
            if !stem.is_empty() {
                return archive.with_file_name(stem);
            }
        }
    }
    archive.with_extension("out")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_layout() {
        assert_eq!(
            scratch_dir(Path::new("/opt/anvil")),
            PathBuf::from("/opt/anvil/bin/pkgs/.pkgtmp")
        );
    }

    #[test]
    fn test_unpack_dir_strips_archive_suffix() {
        assert_eq!(
            unpack_dir(Path::new("/tmp/anvil-win-x64.zip")),
            PathBuf::from("/tmp/anvil-win-x64")
        );
        assert_eq!(
            unpack_dir(Path::new("/tmp/anvil-linux-x64.tar.gz")),
            PathBuf::from("/tmp/anvil-linux-x64")
        );
    }

    #[test]
    fn test_unpack_dir_falls_back_to_out() {
        assert_eq!(
            unpack_dir(Path::new("/tmp/anvil")),
            PathBuf::from("/tmp/anvil.out")
        );
    }
}
