//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use daikin_config::ConfigError;
use daikin_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to device at {address}")]
    #[diagnostic(
        code(daikin::connection_failed),
        help(
            "Check that the adapter is powered and on the same network.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { address: String, reason: String },

    #[error("Device at {address} did not answer in time")]
    #[diagnostic(
        code(daikin::timeout),
        help("Increase timeout with --timeout or check the adapter's Wi-Fi signal.")
    )]
    Timeout { address: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device at {address} is not an air conditioner (type={kind})")]
    #[diagnostic(code(daikin::unsupported_device))]
    UnsupportedDevice { address: String, kind: String },

    #[error("Unexpected response from device: {message}")]
    #[diagnostic(code(daikin::protocol))]
    Protocol { message: String },

    #[error("Device rejected the request: {message}")]
    #[diagnostic(code(daikin::rejected))]
    Rejected { message: String },

    #[error("Could not change {property} on {address}")]
    #[diagnostic(
        code(daikin::write_failed),
        help("The previous value was kept.\nReason: {reason}")
    )]
    WriteFailed {
        address: String,
        property: String,
        reason: String,
    },

    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(daikin::not_found),
        help("Run: daikin config show to see configured devices")
    )]
    NotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(daikin::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No devices configured")]
    #[diagnostic(
        code(daikin::no_devices),
        help(
            "Pass one with --device <address>, or add one with:\n  \
             daikin config add-device <address>\n\
             Config file: {path}"
        )
    )]
    NoDevices { path: String },

    #[error(transparent)]
    #[diagnostic(code(daikin::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoDevices { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { address, reason } => {
                CliError::ConnectionFailed { address, reason }
            }
            CoreError::Timeout { address } => CliError::Timeout { address },
            CoreError::Protocol { message } => CliError::Protocol { message },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::UnsupportedDevice { address, kind } => {
                CliError::UnsupportedDevice { address, kind }
            }
            CoreError::DeviceNotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Config { message } => CliError::Validation {
                field: "device".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}
