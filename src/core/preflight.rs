use tokio::process::Command;
use tracing::debug;

use crate::errors::{DeployError, DeployResult};

/// External executables the deployment cannot run without.
pub const REQUIRED_TOOLS: &[&str] = &["multipass"];

/// Verify every required tool resolves on PATH. The first miss aborts
/// the whole run before anything has been touched.
pub async fn ensure_tools(tools: &[&str]) -> DeployResult<()> {
    for tool in tools {
        let found = Command::new("which")
            .arg(tool)
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false);

        if !found {
            return Err(DeployError::MissingTool {
                tool: tool.to_string(),
            });
        }
        debug!(tool, "found on PATH");
    }

    Ok(())
}
