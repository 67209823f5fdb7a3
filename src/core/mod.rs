pub mod deploy;
pub mod multipass;
pub mod preflight;
pub mod provision;
pub mod spec;

pub use deploy::{Deployer, Prompter, TerminalPrompter};
pub use multipass::{MultipassClient, VmListEntry, VmManager};
pub use provision::Provisioner;
pub use spec::{cluster_specs, MemoryProfile, VmSpec};
