// ── Core error types ──
//
// Device-level errors. Consumers never see HTTP status codes or payload
// parse failures directly; the `From<daikin_api::Error>` impl translates
// them. Controller operations themselves report `bool` and keep the most
// recent error for diagnostics.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to device at {address}: {reason}")]
    ConnectionFailed { address: String, reason: String },

    #[error("Device at {address} did not answer in time")]
    Timeout { address: String },

    // ── Protocol errors ──────────────────────────────────────────────
    #[error("Unexpected response from device: {message}")]
    Protocol { message: String },

    #[error("Device rejected the request: {message}")]
    Rejected { message: String },

    #[error("Device at {address} is not an air conditioner (type={kind})")]
    UnsupportedDevice { address: String, kind: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the device could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<daikin_api::Error> for CoreError {
    fn from(err: daikin_api::Error) -> Self {
        match err {
            daikin_api::Error::Transport(ref e) => {
                let address = e
                    .url()
                    .and_then(|u| u.host_str().map(str::to_owned))
                    .unwrap_or_else(|| "<unknown>".into());
                if e.is_timeout() {
                    CoreError::Timeout { address }
                } else {
                    CoreError::ConnectionFailed {
                        address,
                        reason: e.to_string(),
                    }
                }
            }
            daikin_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            daikin_api::Error::ClientBuild(message) => CoreError::Config { message },
            daikin_api::Error::Http { endpoint, status } => CoreError::Protocol {
                message: format!("{endpoint} returned HTTP {status}"),
            },
            daikin_api::Error::MalformedPayload { endpoint, body } => CoreError::Protocol {
                message: format!("{endpoint} returned a malformed payload: {body:?}"),
            },
            daikin_api::Error::Rejected { endpoint, ret } => CoreError::Rejected {
                message: format!("{endpoint} answered ret={ret}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use daikin_api::{Endpoint, TransportConfig};

    use super::*;

    #[test]
    fn protocol_errors_keep_endpoint() {
        let err = CoreError::from(daikin_api::Error::Rejected {
            endpoint: Endpoint::SetControlInfo,
            ret: "PARAM NG".into(),
        });
        assert_eq!(
            err,
            CoreError::Rejected {
                message: "/aircon/set_control_info answered ret=PARAM NG".into()
            }
        );
        assert!(!err.is_unreachable());
    }

    #[test]
    fn invalid_address_is_config_error() {
        let Err(api_err) =
            daikin_api::DaikinClient::for_address("bad host", &TransportConfig::default())
        else {
            panic!("expected an invalid URL");
        };
        let err = CoreError::from(api_err);
        assert!(matches!(err, CoreError::Config { .. }), "{err:?}");
    }
}
