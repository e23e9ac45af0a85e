//! Exit codes for get-graphql-schema.
//!
//! Scripts can tell a bad config apart from an unreachable or broken schema
//! and from a failed write.

use graphql_config::ConfigError;
use graphql_introspect::IntrospectionError;

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Schema printed
    Success = 0,
    /// Configuration error (missing or invalid config file, bad flag values)
    ConfigError = 2,
    /// Schema error (fetch, validation, build or print failed)
    SchemaError = 3,
    /// I/O error (file read/write failure)
    IoError = 4,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Classifies an error by the first recognised cause in its chain.
    ///
    /// Errors with no recognised cause are reported as configuration errors,
    /// since every other failure path wraps a library or I/O error.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if cause.is::<ConfigError>() {
                return Self::ConfigError;
            }
            if cause.is::<IntrospectionError>() {
                return Self::SchemaError;
            }
            if cause.is::<std::io::Error>() {
                return Self::IoError;
            }
        }
        Self::ConfigError
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
