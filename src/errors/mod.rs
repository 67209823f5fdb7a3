use thiserror::Error;

/// Everything that can stop a deployment.
///
/// Every variant is fatal at the top level: the binary prints the message
/// in red and exits non-zero. Keeping the set closed makes the control
/// flow of the orchestrator testable without a real hypervisor.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Cannot find {tool}. Did you install it as per the instructions?")]
    MissingTool { tool: String },

    #[error("This tool is designed for macOS (host reports {os})")]
    UnsupportedPlatform { os: String },

    #[error("Command failed: {command}\nError: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Aborted: existing VMs were left untouched")]
    RecreationDeclined,

    #[error("Unexpected output from {command}: {message}")]
    MalformedOutput { command: String, message: String },

    #[error("{name} has no IPv4 address yet")]
    NoAddress { name: String },

    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

// Result type alias for convenience
pub type DeployResult<T> = Result<T, DeployError>;
