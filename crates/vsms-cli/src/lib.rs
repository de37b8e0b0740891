//! Verified SMS command-line tools.
//!
//! Thin wrapper over `vsms-core`: look up device keys, mark a message as
//! verified, or compute hashes offline.

#![forbid(unsafe_code)]

pub mod cli;

pub use cli::{Cli, Commands};

use vsms_core::{ErrorKind, VerifyError};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation completed successfully (exit code 0)
    Success = 0,
    /// General error (exit code 1)
    GeneralError = 1,
    /// Credentials rejected or unavailable (exit code 2)
    AuthenticationFailed = 2,
    /// Service unreachable or answered with an error (exit code 4)
    ConnectionFailed = 4,
    /// Invalid input provided (exit code 5)
    InvalidInput = 5,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn to_exit_code(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }

    /// Exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<VerifyError>().map(VerifyError::kind) {
            Some(ErrorKind::Unauthorized) => ExitCode::AuthenticationFailed,
            Some(ErrorKind::Transport) => ExitCode::ConnectionFailed,
            Some(ErrorKind::Decoding | ErrorKind::PreconditionFailed | ErrorKind::Config) => {
                ExitCode::InvalidInput
            }
            Some(ErrorKind::Internal) | None => ExitCode::GeneralError,
        }
    }
}
