//! Process exit codes and the error type that carries them

use dbdrift_catalog::FetchError;
use dbdrift_core::ConfigError;

/// Process exit status (sysexits-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    Unavailable = 69,
    NoPermission = 77,
    ConfigError = 78,
    Sigint = 130,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Everything that can end a run early
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Exit status reported for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::UsageError,
            Self::Config(_) => ExitCode::ConfigError,
            Self::Fetch(err) => match err {
                FetchError::Unavailable(_) => ExitCode::Unavailable,
                FetchError::PermissionDenied(_) | FetchError::Authentication(_) => ExitCode::NoPermission,
                FetchError::InvalidConnectionString(_) | FetchError::Unsupported(_) => ExitCode::UsageError,
                FetchError::Query(_) | FetchError::Snapshot(_) => ExitCode::GeneralError,
            },
            Self::Interrupted => ExitCode::Sigint,
            Self::Other(_) => ExitCode::GeneralError,
        }
    }
}
