use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use serde::Deserialize;

use crate::config::UpdateConfig;

pub const DEFAULT_FEED_URL: &str = "https://api.github.com/repos/anvil-sh/anvil/releases/latest";

const RELEASE_REF_PREFIX: &str = "refs/tags/";

/// Release ref this binary was built from. CI stamps the git ref via
/// `ANVIL_RELEASE_REF`; source builds fall back to the crate version tag.
pub const RELEASE_REF: &str = match option_env!("ANVIL_RELEASE_REF") {
    Some(r) => r,
    None => concat!("refs/tags/v", env!("CARGO_PKG_VERSION")),
};

/// The build currently running, fixed at compile time.
#[derive(Debug, Clone)]
pub struct InstalledRelease {
    pub tag: String,
    pub is_public: bool,
}

impl InstalledRelease {
    pub fn from_ref(release_ref: &str) -> Self {
        match release_ref.strip_prefix(RELEASE_REF_PREFIX) {
            Some(tag) => Self {
                tag: tag.to_string(),
                is_public: true,
            },
            None => Self {
                tag: release_ref.to_string(),
                is_public: false,
            },
        }
    }

    pub fn current() -> Self {
        Self::from_ref(RELEASE_REF)
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoteRelease {
    pub tag_name: String,
    // A release whose assets have not been attached yet comes back
    // without the key at all.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// Decision output: the one asset to download for this platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub asset_name: String,
    pub download_url: String,
}

/// Fetch the latest release metadata from the feed
pub fn fetch_latest_release(feed_url: &str) -> Result<RemoteRelease> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(crate::USER_AGENT)
        .build()?;

    let response = client
        .get(feed_url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .context("failed to fetch release metadata")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "release feed error: {} {}",
            response.status(),
            response.text().unwrap_or_default()
        ));
    }

    response
        .json::<RemoteRelease>()
        .context("failed to decode release metadata")
}

/// Pick the asset for this platform, or decide no update is needed.
///
/// Equal tags always mean up to date; the assets are scanned in listed
/// order and the first name ending with `suffix` (case-insensitive) wins.
pub fn plan_update(
    installed: &InstalledRelease,
    remote: &RemoteRelease,
    suffix: &str,
) -> Option<UpdatePlan> {
    if remote.tag_name == installed.tag {
        eprintln!(
            "{}",
            format!("anvil/{} is up to date", installed.tag).yellow()
        );
        return None;
    }
    if remote.assets.is_empty() {
        eprintln!(
            "{}",
            format!("anvil/{} build is not yet complete", remote.tag_name).yellow()
        );
        return None;
    }

    let suffix = suffix.to_ascii_lowercase();
    remote
        .assets
        .iter()
        .find(|a| a.name.to_ascii_lowercase().ends_with(&suffix))
        .map(|a| UpdatePlan {
            asset_name: a.name.clone(),
            download_url: a.browser_download_url.clone(),
        })
}

/// Full update decision: gate, fetch, plan.
///
/// Anything that goes wrong here is reported and treated as "no update" —
/// a broken feed must never leave the caller unable to keep using the
/// installed binaries.
pub fn resolve_update(config: &UpdateConfig, installed: &InstalledRelease) -> Option<UpdatePlan> {
    if !installed.is_public {
        eprintln!(
            "{}",
            format!("{} is not a published release build", installed.tag).yellow()
        );
        if !config.force {
            return None;
        }
    }

    let remote = match fetch_latest_release(&config.feed_url) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {:#}", "update check failed:".red(), e);
            return None;
        }
    };

    plan_update(installed, &remote, &config.asset_suffix)
}
