/*
* Kubelab Cluster Deployer CLI
* ----------------------------
*
* This is the single entry point of the tool: one binary, one optional
* flag, five VMs at the end of it.
*
* Deployment Pipeline:
* -----------------
* kubelab-deploy [--no-recreate]
* ├── preflight            // multipass must resolve on PATH
* ├── spec derivation      // host RAM picks the resource profile
* ├── reconciliation       // existing VMs: ask once before destroying
* ├── lifecycle            // launch / delete+purge+launch / skip
* └── provisioning         // host entries + setup scripts into guests
*
* Technical Implementation:
* ----------------------
* - Built on clap (git-style derive parsing, minus the subcommands)
* - Colored output: blue for stages, yellow for warnings, green for
*   wins, red for the bad news
* - Every failure funnels into one closed DeployError enum, printed
*   red by main with exit code 1
* - Strictly sequential: each multipass call is awaited to completion
*   before the next one is issued
*/

use clap::Parser;
use colored::Colorize;
use tracing::info;

use crate::config::Settings;
use crate::core::deploy::{Deployer, TerminalPrompter};
use crate::core::multipass::MultipassClient;
use crate::core::provision::Provisioner;
use crate::core::spec::{cluster_specs, MemoryProfile};
use crate::core::preflight;
use crate::errors::DeployResult;
use crate::utils::os;

#[derive(Parser)]
#[command(name = "kubelab-deploy")]
#[command(about = "Deploy the Kubernetes lab VM cluster on Multipass", long_about = None)]
pub struct Cli {
    /// Don't recreate VMs if they already exist
    #[arg(long)]
    pub no_recreate: bool,
}

pub async fn run() -> DeployResult<()> {
    let cli = Cli::parse();
    let settings = Settings::new()?;
    let recreate = !cli.no_recreate;

    println!("{}", "Checking system compatibility".blue());
    preflight::ensure_tools(preflight::REQUIRED_TOOLS).await?;

    let mem_gb = os::host_memory_gb()?;
    let profile = MemoryProfile::for_host_gb(mem_gb);
    if profile.is_reduced() {
        println!(
            "{}",
            format!("System RAM is {}GB. VM size is reduced.", mem_gb).yellow()
        );
        println!(
            "{}",
            "It will not be possible for you to run E2E tests (final step).".yellow()
        );
    }
    let specs = cluster_specs(profile);
    println!("{}", "System OK!".green());

    info!(mem_gb, recreate, "deploying {} VMs", specs.len());

    let manager = MultipassClient::new();
    let mut deployer = Deployer::new(&manager, TerminalPrompter, &settings);
    deployer.confirm_rebuild(&specs, recreate).await?;
    deployer.apply(&specs, recreate).await?;

    println!("{}", "Provisioning...".blue());
    let provisioner = Provisioner::new(&manager, &settings);
    provisioner.provision(&specs).await?;

    println!("{}", "Done!".green());
    Ok(())
}
