use ::config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Deployment settings.
///
/// Layered the usual way, lowest priority first: hardcoded defaults,
/// an optional `deploy.toml` next to the binary, then environment
/// variables with the `KUBELAB` prefix. None of this grows the CLI
/// surface, the one and only flag stays `--no-recreate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub provision: ProvisionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Guest OS image passed to `multipass launch`.
    pub image: String,
    /// Pre-authorize destructive recreation, skipping the prompt.
    pub assume_rebuild: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionSettings {
    pub scripts_dir: PathBuf,
    pub tools_dir: PathBuf,
    pub host_entries_path: PathBuf,
    pub guest_tmp_dir: String,
    pub guest_home_dir: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default settings
            .set_default("cluster.image", "jammy")?
            .set_default("cluster.assume_rebuild", false)?
            .set_default("provision.scripts_dir", "scripts")?
            .set_default("provision.tools_dir", "tools")?
            .set_default("provision.host_entries_path", "/tmp/hostentries")?
            .set_default("provision.guest_tmp_dir", "/tmp/")?
            .set_default("provision.guest_home_dir", "/home/ubuntu/")?
            // Optional file next to the binary
            .add_source(File::with_name("deploy").required(false))
            // Environment variables with prefix "KUBELAB"
            .add_source(::config::Environment::with_prefix("KUBELAB").separator("_"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        info!(image = %settings.cluster.image, "configuration loaded");
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cluster: ClusterSettings {
                image: "jammy".to_string(),
                assume_rebuild: false,
            },
            provision: ProvisionSettings {
                scripts_dir: PathBuf::from("scripts"),
                tools_dir: PathBuf::from("tools"),
                host_entries_path: PathBuf::from("/tmp/hostentries"),
                guest_tmp_dir: "/tmp/".to_string(),
                guest_home_dir: "/home/ubuntu/".to_string(),
            },
        }
    }
}
