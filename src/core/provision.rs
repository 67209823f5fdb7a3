use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Settings;
use crate::core::multipass::VmManager;
use crate::core::spec::{VmSpec, CONTROLPLANE01};
use crate::errors::{DeployError, DeployResult};

pub const SETUP_HOSTS_SCRIPT: &str = "01-setup-hosts.sh";
pub const CERT_VERIFY_SCRIPT: &str = "cert_verify.sh";
pub const APPROVE_CSR_SCRIPT: &str = "approve-csr.sh";

/// Pushes the host-entries file and the setup scripts into every VM
/// once the cluster is in its final lifecycle state.
pub struct Provisioner<'a, M: VmManager> {
    manager: &'a M,
    settings: &'a Settings,
}

impl<'a, M: VmManager> Provisioner<'a, M> {
    pub fn new(manager: &'a M, settings: &'a Settings) -> Self {
        Self { manager, settings }
    }

    pub async fn provision(&self, specs: &[VmSpec]) -> DeployResult<()> {
        let host_entries = self.write_host_entries(specs).await?;

        for spec in specs {
            self.provision_vm(spec.name, &host_entries).await?;
        }

        // the CSR approval helper lives on the first control plane only
        let approve_csr = self.settings.provision.tools_dir.join(APPROVE_CSR_SCRIPT);
        self.manager
            .transfer(
                &approve_csr,
                &format!(
                    "{}:{}",
                    CONTROLPLANE01, self.settings.provision.guest_home_dir
                ),
            )
            .await?;

        Ok(())
    }

    /// Resolve every VM's first IPv4 address and write the name map.
    ///
    /// A VM that has not yet acquired an address fails the run here,
    /// there is no wait loop.
    async fn write_host_entries(&self, specs: &[VmSpec]) -> DeployResult<PathBuf> {
        let mut entries = String::new();
        for spec in specs {
            let ip = self.first_ipv4(spec.name).await?;
            entries.push_str(&format!("{} {}\n", ip, spec.name));
        }

        let path = self.settings.provision.host_entries_path.clone();
        fs::write(&path, entries)?;
        info!(path = %path.display(), "wrote host entries");
        Ok(path)
    }

    async fn first_ipv4(&self, name: &str) -> DeployResult<String> {
        let addrs = self.manager.ipv4(name).await?;
        addrs.first().cloned().ok_or(DeployError::NoAddress {
            name: name.to_string(),
        })
    }

    async fn provision_vm(&self, name: &str, host_entries: &Path) -> DeployResult<()> {
        info!(name, "provisioning");

        let guest_tmp = &self.settings.provision.guest_tmp_dir;
        let guest_home = &self.settings.provision.guest_home_dir;
        let scripts = &self.settings.provision.scripts_dir;

        self.manager
            .transfer(host_entries, &format!("{}:{}", name, guest_tmp))
            .await?;
        self.manager
            .transfer(
                &scripts.join(SETUP_HOSTS_SCRIPT),
                &format!("{}:{}", name, guest_tmp),
            )
            .await?;
        self.manager
            .transfer(
                &scripts.join(CERT_VERIFY_SCRIPT),
                &format!("{}:{}", name, guest_home),
            )
            .await?;

        let setup_script = format!("{}{}", guest_tmp, SETUP_HOSTS_SCRIPT);
        self.manager
            .exec(name, &["chmod", "u+x", &setup_script])
            .await?;
        self.manager.exec(name, &[setup_script.as_str()]).await?;

        Ok(())
    }
}
