use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Unpack `archive_path` into `dest_dir`, printing each entry as it lands.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir)?;

    let name = archive_path.to_string_lossy();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive_path, dest_dir)
    } else if name.ends_with(".zip") {
        extract_zip(archive_path, dest_dir)
    } else {
        Err(anyhow!("unknown archive format: {}", archive_path.display()))
    }
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).context("failed to open archive")?;
    let mut archive = zip::ZipArchive::new(file).context("failed to read zip archive")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        // entries with unsafe paths (absolute, ..) are skipped outright
        let Some(rel) = entry.enclosed_name() else {
            continue;
        };
        eprint!("\x1b[2K\r{} {}", "x".yellow(), rel.display());

        let out = dest_dir.join(&rel);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&out)?;
        std::io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode))?;
        }
    }
    eprintln!();
    Ok(())
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    use flate2::read::GzDecoder;

    let file = File::open(archive_path).context("failed to open archive")?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    for entry in archive.entries().context("failed to read tar archive")? {
        let mut entry = entry?;
        {
            let path = entry.path()?;
            eprint!("\x1b[2K\r{} {}", "x".yellow(), path.display());
        }
        entry.unpack_in(dest_dir)?;
    }
    eprintln!();
    Ok(())
}

/// Hoist the contents of a single nested top-level directory up one
/// level, so `dir/bin/...` resolves the same way no matter how the
/// archive was authored.
pub fn normalize_layout(dir: &Path) -> Result<()> {
    let entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    if entries.len() != 1 {
        return Ok(());
    }
    let top = entries[0].path();
    if !top.is_dir() {
        return Ok(());
    }

    // Move the wrapper aside first so a child may carry the same name.
    let staging = dir.join(".flatten");
    fs::rename(&top, &staging)?;
    for child in fs::read_dir(&staging)? {
        let child = child?;
        fs::rename(child.path(), dir.join(child.file_name()))?;
    }
    fs::remove_dir(&staging)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_zip_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.zip");
        write_zip(&archive, &[("bin/anvil", "binary"), ("anvilterm", "launcher")]);

        let out = tmp.path().join("out");
        extract(&archive, &out).unwrap();

        assert_eq!(fs::read_to_string(out.join("bin/anvil")).unwrap(), "binary");
        assert_eq!(fs::read_to_string(out.join("anvilterm")).unwrap(), "launcher");
    }

    #[test]
    fn test_corrupt_zip_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.zip");
        fs::write(&archive, "this is not a zip file").unwrap();

        assert!(extract(&archive, &tmp.path().join("out")).is_err());
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.rar");
        fs::write(&archive, "whatever").unwrap();

        assert!(extract(&archive, &tmp.path().join("out")).is_err());
    }

    #[test]
    fn test_normalize_hoists_single_wrapper_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(out.join("anvil-v1.3.0/bin")).unwrap();
        fs::write(out.join("anvil-v1.3.0/bin/anvil"), "binary").unwrap();
        fs::write(out.join("anvil-v1.3.0/anvilterm"), "launcher").unwrap();

        normalize_layout(&out).unwrap();

        assert_eq!(fs::read_to_string(out.join("bin/anvil")).unwrap(), "binary");
        assert!(!out.join("anvil-v1.3.0").exists());
    }

    #[test]
    fn test_normalize_keeps_flat_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(out.join("bin")).unwrap();
        fs::write(out.join("bin/anvil"), "binary").unwrap();
        fs::write(out.join("anvilterm"), "launcher").unwrap();

        normalize_layout(&out).unwrap();

        assert_eq!(fs::read_to_string(out.join("bin/anvil")).unwrap(), "binary");
        assert_eq!(fs::read_to_string(out.join("anvilterm")).unwrap(), "launcher");
    }

    #[test]
    fn test_normalize_handles_same_name_nesting() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(out.join("anvil/anvil")).unwrap();
        fs::write(out.join("anvil/anvil/file"), "x").unwrap();

        normalize_layout(&out).unwrap();

        assert_eq!(fs::read_to_string(out.join("anvil/file")).unwrap(), "x");
    }
}
