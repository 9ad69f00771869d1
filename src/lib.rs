pub mod config;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod paths;
pub mod platform;
pub mod release;
pub mod run;

pub(crate) const USER_AGENT: &str = concat!("anvil-update/", env!("CARGO_PKG_VERSION"));

pub use config::UpdateConfig;
pub use release::{InstalledRelease, RemoteRelease, UpdatePlan};
pub use run::{run, Outcome};
