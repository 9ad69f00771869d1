use std::path::PathBuf;

use crate::{install, platform, release};

/// Runtime knobs for one update run, threaded explicitly through the
/// orchestrator and resolver. Fields other than `force` default to the
/// compiled-in platform values and exist so embedders and tests can
/// point a run at a different feed, root, or file set.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Bypass the published-release gate (never the tag-equality gate).
    pub force: bool,

    /// Release metadata endpoint.
    pub feed_url: String,

    /// Asset name suffix identifying this platform's archive.
    pub asset_suffix: String,

    /// Overrides the install root derived from the running executable.
    pub install_root: Option<PathBuf>,

    /// Ordered relative paths to replace under the install root.
    pub manifest: Vec<PathBuf>,
}

impl UpdateConfig {
    pub fn new(force: bool) -> Self {
        Self {
            force,
            feed_url: release::DEFAULT_FEED_URL.to_string(),
            asset_suffix: platform::asset_suffix().to_string(),
            install_root: None,
            manifest: install::default_manifest(),
        }
    }
}
