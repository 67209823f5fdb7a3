use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, error};

use crate::core::spec::VmSpec;
use crate::errors::{DeployError, DeployResult};

/// One VM as reported by `multipass list`.
#[derive(Debug, Deserialize, Clone)]
pub struct VmListEntry {
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub ipv4: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct VmListing {
    #[serde(default)]
    list: Vec<VmListEntry>,
}

#[derive(Debug, Deserialize)]
struct InfoReply {
    #[serde(default)]
    info: HashMap<String, VmDetails>,
}

#[derive(Debug, Deserialize)]
struct VmDetails {
    #[serde(default)]
    ipv4: Vec<String>,
}

/// The hypervisor control surface the orchestrator runs against.
///
/// Multipass is the only real implementation; tests inject a recording
/// mock so the whole deployment flow runs without a hypervisor.
#[async_trait]
pub trait VmManager: Send + Sync {
    /// Current inventory snapshot. Never cached by callers.
    async fn list(&self) -> DeployResult<Vec<VmListEntry>>;

    /// Create a VM with the spec's resources from the given OS image.
    async fn launch(&self, spec: &VmSpec, image: &str) -> DeployResult<()>;

    /// Soft-delete a VM.
    async fn delete(&self, name: &str) -> DeployResult<()>;

    /// Reclaim disk from all soft-deleted VMs.
    async fn purge(&self) -> DeployResult<()>;

    /// IPv4 addresses currently assigned to a VM.
    async fn ipv4(&self, name: &str) -> DeployResult<Vec<String>>;

    /// Copy a local file to `NAME:PATH` inside a guest.
    async fn transfer(&self, src: &Path, dest: &str) -> DeployResult<()>;

    /// Run a command inside a guest, blocking until it exits.
    async fn exec(&self, name: &str, args: &[&str]) -> DeployResult<()>;
}

/// `multipass` CLI client.
pub struct MultipassClient;

impl MultipassClient {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> DeployResult<String> {
        let command = format!("multipass {}", args.join(" "));
        debug!(%command, "running");

        let output = Command::new("multipass").args(args).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(%command, %stderr, "multipass command failed");
            return Err(DeployError::CommandFailed { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for MultipassClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VmManager for MultipassClient {
    async fn list(&self) -> DeployResult<Vec<VmListEntry>> {
        let stdout = self.run(&["list", "--format", "json"]).await?;
        Ok(parse_listing(&stdout))
    }

    async fn launch(&self, spec: &VmSpec, image: &str) -> DeployResult<()> {
        self.run(&[
            "launch",
            "--disk",
            spec.disk,
            "--memory",
            spec.ram,
            "--cpus",
            &spec.cpus.to_string(),
            "--name",
            spec.name,
            image,
        ])
        .await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> DeployResult<()> {
        self.run(&["delete", name]).await?;
        Ok(())
    }

    async fn purge(&self) -> DeployResult<()> {
        self.run(&["purge"]).await?;
        Ok(())
    }

    async fn ipv4(&self, name: &str) -> DeployResult<Vec<String>> {
        let stdout = self.run(&["info", name, "--format", "json"]).await?;
        parse_info(name, &stdout)
    }

    async fn transfer(&self, src: &Path, dest: &str) -> DeployResult<()> {
        self.run(&["transfer", &src.to_string_lossy(), dest]).await?;
        Ok(())
    }

    async fn exec(&self, name: &str, args: &[&str]) -> DeployResult<()> {
        let mut full = vec!["exec", name, "--"];
        full.extend_from_slice(args);
        self.run(&full).await?;
        Ok(())
    }
}

/// Parse `multipass list --format json`. Malformed or empty output means
/// "no VMs exist", never an error.
pub fn parse_listing(stdout: &str) -> Vec<VmListEntry> {
    serde_json::from_str::<VmListing>(stdout)
        .map(|listing| listing.list)
        .unwrap_or_default()
}

/// Parse `multipass info NAME --format json` down to the ipv4 list.
/// Unlike the inventory listing, malformed output here is an error.
pub fn parse_info(name: &str, stdout: &str) -> DeployResult<Vec<String>> {
    let command = format!("multipass info {} --format json", name);
    let mut reply: InfoReply =
        serde_json::from_str(stdout).map_err(|e| DeployError::MalformedOutput {
            command: command.clone(),
            message: e.to_string(),
        })?;

    reply
        .info
        .remove(name)
        .map(|details| details.ipv4)
        .ok_or(DeployError::MalformedOutput {
            command,
            message: format!("no entry for {}", name),
        })
}
