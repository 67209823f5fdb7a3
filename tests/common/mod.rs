use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kubelab_deployer::core::deploy::Prompter;
use kubelab_deployer::core::multipass::{VmListEntry, VmManager};
use kubelab_deployer::core::spec::VmSpec;
use kubelab_deployer::errors::DeployResult;

/// In-memory hypervisor: plays back a scripted inventory and records
/// every call in order, so tests can assert the exact command stream.
pub struct MockVmManager {
    vms: Mutex<Vec<String>>,
    addresses: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockVmManager {
    pub fn new(existing: &[&str]) -> Self {
        Self {
            vms: Mutex::new(existing.iter().map(|name| name.to_string()).collect()),
            addresses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_address(mut self, name: &str, addrs: &[&str]) -> Self {
        self.addresses.insert(
            name.to_string(),
            addrs.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// The recorded stream without the read-only inventory queries.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call != "list")
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VmManager for MockVmManager {
    async fn list(&self) -> DeployResult<Vec<VmListEntry>> {
        self.record("list".to_string());
        Ok(self
            .vms
            .lock()
            .unwrap()
            .iter()
            .map(|name| VmListEntry {
                name: name.clone(),
                state: "Running".to_string(),
                ipv4: Vec::new(),
            })
            .collect())
    }

    async fn launch(&self, spec: &VmSpec, image: &str) -> DeployResult<()> {
        self.record(format!(
            "launch {} {} {} {} {}",
            spec.name, spec.cpus, spec.ram, spec.disk, image
        ));
        self.vms.lock().unwrap().push(spec.name.to_string());
        Ok(())
    }

    async fn delete(&self, name: &str) -> DeployResult<()> {
        self.record(format!("delete {}", name));
        self.vms.lock().unwrap().retain(|vm| vm != name);
        Ok(())
    }

    async fn purge(&self) -> DeployResult<()> {
        self.record("purge".to_string());
        Ok(())
    }

    async fn ipv4(&self, name: &str) -> DeployResult<Vec<String>> {
        self.record(format!("info {}", name));
        Ok(self.addresses.get(name).cloned().unwrap_or_default())
    }

    async fn transfer(&self, src: &Path, dest: &str) -> DeployResult<()> {
        self.record(format!("transfer {} {}", src.display(), dest));
        Ok(())
    }

    async fn exec(&self, name: &str, args: &[&str]) -> DeployResult<()> {
        self.record(format!("exec {} {}", name, args.join(" ")));
        Ok(())
    }
}

/// Prompter with a canned answer and a shared asked-counter.
pub struct ScriptedPrompter {
    answer: bool,
    asked: Arc<AtomicUsize>,
}

impl ScriptedPrompter {
    pub fn new(answer: bool) -> (Self, Arc<AtomicUsize>) {
        let asked = Arc::new(AtomicUsize::new(0));
        (
            Self {
                answer,
                asked: asked.clone(),
            },
            asked,
        )
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _question: &str) -> DeployResult<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}
