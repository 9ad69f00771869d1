use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Download `url` into `dest_dir` with a progress bar, returning the
/// path of the downloaded file. The directory is created if absent.
pub fn download(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("unable to create {}", dest_dir.display()))?;
    let dest = dest_dir.join(url_file_name(url));

    let client = reqwest::blocking::Client::builder()
        .user_agent(crate::USER_AGENT)
        .build()?;

    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to download {url}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("download failed: {}", response.status()));
    }

    let pb = match response.content_length() {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let mut file = File::create(&dest).context("failed to create download file")?;
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = response.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }

    pb.finish_and_clear();
    Ok(dest)
}

/// Last path segment of the URL, query and fragment stripped
fn url_file_name(url: &str) -> &str {
    let tail = url.rsplit('/').next().unwrap_or(url);
    let tail = tail.split(['?', '#']).next().unwrap_or(tail);
    if tail.is_empty() {
        "release.bin"
    } else {
        tail
    }
}
