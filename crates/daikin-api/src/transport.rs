// Shared transport configuration for building reqwest::Client instances.
//
// The adapter speaks plain, unauthenticated HTTP, so the only knobs are
// timeouts and the user agent.

use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("daikin-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Config with the given request timeout and default everything else.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Self::default().connect_timeout),
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| crate::error::Error::ClientBuild(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_never_exceeds_request_timeout() {
        let cfg = TransportConfig::with_timeout(Duration::from_secs(2));
        assert_eq!(cfg.timeout, Duration::from_secs(2));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(2));

        let cfg = TransportConfig::with_timeout(Duration::from_secs(30));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn user_agent_carries_version() {
        let cfg = TransportConfig::default();
        assert!(cfg.user_agent.starts_with("daikin-rs/"));
    }
}
