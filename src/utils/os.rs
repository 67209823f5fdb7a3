use serde::{Deserialize, Serialize};

use crate::errors::{DeployError, DeployResult};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
    Unknown,
}

#[cfg(target_os = "linux")]
pub fn current_platform() -> Platform {
    Platform::Linux
}

#[cfg(target_os = "macos")]
pub fn current_platform() -> Platform {
    Platform::MacOS
}

#[cfg(target_os = "windows")]
pub fn current_platform() -> Platform {
    Platform::Windows
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub fn current_platform() -> Platform {
    Platform::Unknown
}

/// Host physical memory in whole gigabytes.
///
/// Multipass-on-macOS is the only supported host, so every other
/// platform is rejected up front rather than producing a cluster that
/// was sized for the wrong machine.
pub fn host_memory_gb() -> DeployResult<u64> {
    match current_platform() {
        Platform::MacOS => {
            let mut system = sysinfo::System::new();
            system.refresh_memory();
            Ok(system.total_memory() / (1024 * 1024 * 1024))
        }
        other => Err(DeployError::UnsupportedPlatform {
            os: format!("{:?}", other),
        }),
    }
}
