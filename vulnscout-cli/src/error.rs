//! CLI-specific error types and exit code mapping

use vulnscout_core::error::VulnscoutError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes. Codes 0-2
/// are reserved for the severity gate of a successful scan, so error
/// codes start at 3.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The scan itself failed (invalid root, scanner build failure).
    #[error("scan error: {0}")]
    Scan(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from vulnscout-core.
    #[error("{0}")]
    Core(#[from] VulnscoutError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Scan succeeded, no HIGH/CRITICAL findings |
    /// | 1    | Scan succeeded, HIGH findings             |
    /// | 2    | Scan succeeded, CRITICAL findings         |
    /// | 3    | Configuration error                       |
    /// | 4    | Command error (bad arguments)             |
    /// | 5    | Scan failed                               |
    /// | 6    | JSON output error                         |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 3,
            Self::Command(_) => 4,
            Self::Scan(_) => 5,
            Self::JsonSerialize(_) => 6,
            Self::Io(_) => 10,
            Self::Core(_) => 5,
        }
    }
}

impl From<vulnscout_dep_scanner::DepScannerError> for CliError {
    fn from(e: vulnscout_dep_scanner::DepScannerError) -> Self {
        Self::Scan(e.to_string())
    }
}
