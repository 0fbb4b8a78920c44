// Adapter HTTP client
//
// Wraps `reqwest::Client` with the adapter's fixed endpoint set. Every call
// is a plain GET; responses are tokenized and validated before the caller
// sees them.

use std::fmt;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::payload::{BasicInfo, ControlInfo, ControlParams, Payload, SensorInfo};
use crate::transport::TransportConfig;

/// The adapter endpoints this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    BasicInfo,
    ControlInfo,
    SensorInfo,
    SetControlInfo,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::BasicInfo => "/common/basic_info",
            Self::ControlInfo => "/aircon/get_control_info",
            Self::SensorInfo => "/aircon/get_sensor_info",
            Self::SetControlInfo => "/aircon/set_control_info",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Raw HTTP client for one adapter.
pub struct DaikinClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DaikinClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the adapter root, e.g. `http://192.168.1.40`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client for a bare host or `host:port` address.
    pub fn for_address(address: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{address}/"))?;
        Self::new(base_url, transport)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The adapter base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /common/basic_info`
    pub async fn basic_info(&self) -> Result<BasicInfo, Error> {
        let payload = self.fetch_validated(Endpoint::BasicInfo).await?;
        Ok(BasicInfo::from(&payload))
    }

    /// `GET /aircon/get_control_info`
    pub async fn control_info(&self) -> Result<ControlInfo, Error> {
        let payload = self.fetch_validated(Endpoint::ControlInfo).await?;
        Ok(ControlInfo::from(&payload))
    }

    /// `GET /aircon/get_sensor_info`
    pub async fn sensor_info(&self) -> Result<SensorInfo, Error> {
        let payload = self.fetch_validated(Endpoint::SensorInfo).await?;
        Ok(SensorInfo::from(&payload))
    }

    /// `GET /aircon/set_control_info?f_dir=..&f_rate=..&stemp=..&mode=..&pow=..&shum=`
    ///
    /// Succeeds only if the first token of the response carries the success
    /// marker. Unlike the read endpoints, a one-token reply is normal here.
    pub async fn set_control_info(&self, params: &ControlParams) -> Result<(), Error> {
        let endpoint = Endpoint::SetControlInfo;
        let (payload, _) = self.fetch(endpoint, Some(&params.to_query())).await?;

        match payload.first() {
            Some((_, value)) if value == crate::payload::SUCCESS_MARKER => Ok(()),
            Some((_, value)) => Err(Error::Rejected {
                endpoint,
                ret: value.to_owned(),
            }),
            None => Err(Error::MalformedPayload {
                endpoint,
                body: String::new(),
            }),
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    async fn fetch_validated(&self, endpoint: Endpoint) -> Result<Payload, Error> {
        let (payload, body) = self.fetch(endpoint, None).await?;
        payload.validate(endpoint, &body)
    }

    /// Send a GET and tokenize the body. Returns the raw body alongside for
    /// diagnostics.
    async fn fetch(&self, endpoint: Endpoint, query: Option<&str>) -> Result<(Payload, String), Error> {
        let mut url = self.endpoint_url(endpoint)?;
        url.set_query(query);
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        debug!(%endpoint, body = body.trim(), "raw response");

        Ok((Payload::parse(&body), body))
    }
}
