use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::info;

use crate::config::Settings;
use crate::core::multipass::VmManager;
use crate::core::spec::VmSpec;
use crate::errors::{DeployError, DeployResult};

/// Asks the operator a yes/no question. Split out so tests can script
/// the answer instead of blocking on stdin.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> DeployResult<bool>;
}

/// Reads the answer from the terminal. Anything other than "y"
/// (case-insensitive) counts as a refusal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> DeployResult<bool> {
        print!("{}", question.red());
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Walks the spec list and brings every VM to its target state, one at
/// a time, in list order.
pub struct Deployer<'a, M: VmManager, P: Prompter> {
    manager: &'a M,
    prompter: P,
    settings: &'a Settings,
}

impl<'a, M: VmManager, P: Prompter> Deployer<'a, M, P> {
    pub fn new(manager: &'a M, prompter: P, settings: &'a Settings) -> Self {
        Self {
            manager,
            prompter,
            settings,
        }
    }

    /// Reconcile the target specs against the current inventory.
    ///
    /// The first spec name that already exists decides the outcome for
    /// the whole run: when recreation is enabled and not pre-authorized
    /// through configuration, the operator is asked once whether the
    /// existing VMs may be destroyed. Declining aborts the run.
    pub async fn confirm_rebuild(
        &mut self,
        specs: &[VmSpec],
        recreate: bool,
    ) -> DeployResult<()> {
        let inventory = self.manager.list().await?;

        for spec in specs {
            if !inventory.iter().any(|vm| vm.name == spec.name) {
                continue;
            }

            info!(name = spec.name, "found existing VM");
            if recreate && !self.settings.cluster.assume_rebuild {
                let rebuild = self
                    .prompter
                    .confirm("VMs are running. Delete and rebuild them (y/n)? ")?;
                if !rebuild {
                    return Err(DeployError::RecreationDeclined);
                }
            }
            // one collision is enough, no second prompt
            return Ok(());
        }

        Ok(())
    }

    /// Create, recreate, or skip each VM per spec, in spec order. The
    /// inventory is re-queried per entry rather than cached.
    pub async fn apply(&self, specs: &[VmSpec], recreate: bool) -> DeployResult<()> {
        for spec in specs {
            let exists = self
                .manager
                .list()
                .await?
                .iter()
                .any(|vm| vm.name == spec.name);

            if exists {
                if recreate {
                    self.delete_vm(spec.name).await?;
                    self.launch_vm(spec).await?;
                }
                // otherwise keep the existing VM untouched
            } else {
                self.launch_vm(spec).await?;
            }
        }

        Ok(())
    }

    async fn delete_vm(&self, name: &str) -> DeployResult<()> {
        println!("{}", format!("Deleting {}", name).yellow());
        self.manager.delete(name).await?;
        self.manager.purge().await
    }

    async fn launch_vm(&self, spec: &VmSpec) -> DeployResult<()> {
        println!(
            "{}",
            format!(
                "Launching {}. CPU: {}, MEM: {}",
                spec.name, spec.cpus, spec.ram
            )
            .blue()
        );
        self.manager
            .launch(spec, &self.settings.cluster.image)
            .await?;
        println!("{}", format!("{} booted!", spec.name).green());
        Ok(())
    }
}
