// Key-value wire format
//
// Every adapter response is a single line of comma-separated `key=value`
// tokens, e.g. `ret=OK,pow=1,mode=3,stemp=24.0,f_rate=A,f_dir=0`.
// `Payload` is the tokenized form; the typed records below pull the fields
// each endpoint is known to carry and keep them as raw wire strings.
// Interpreting the codes is the job of `daikin-core`.

use crate::client::Endpoint;
use crate::error::Error;

/// Value of `ret` on a successful exchange.
pub const SUCCESS_MARKER: &str = "OK";

/// A tokenized adapter response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    tokens: Vec<(String, String)>,
}

impl Payload {
    /// Split a raw body into `key=value` tokens.
    ///
    /// Never fails: empty tokens are dropped and a token without `=` is kept
    /// with an empty value. Whether the result is usable is decided by
    /// [`Payload::is_well_formed`].
    pub fn parse(body: &str) -> Self {
        let tokens = body
            .trim()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (key.to_owned(), value.to_owned()),
                None => (token.to_owned(), String::new()),
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Look up a key. When a key repeats, the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The first token, in wire order.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.tokens.first().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `ret` status field, if present.
    pub fn ret(&self) -> Option<&str> {
        self.get("ret")
    }

    pub fn is_success(&self) -> bool {
        self.ret() == Some(SUCCESS_MARKER)
    }

    /// At least two tokens and an explicit success marker.
    pub fn is_well_formed(&self) -> bool {
        self.len() >= 2 && self.is_success()
    }

    /// Reject payloads that are short or lack the success marker.
    pub(crate) fn validate(self, endpoint: Endpoint, body: &str) -> Result<Self, Error> {
        if self.len() < 2 {
            return Err(Error::MalformedPayload {
                endpoint,
                body: body.to_owned(),
            });
        }
        if !self.is_success() {
            return Err(Error::Rejected {
                endpoint,
                ret: self.ret().unwrap_or_default().to_owned(),
            });
        }
        Ok(self)
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_owned)
    }
}

// ── Typed records ────────────────────────────────────────────────────

/// `GET /common/basic_info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    /// Adapter type; `aircon` for air conditioners.
    pub kind: Option<String>,
    /// URL-encoded display name.
    pub name: Option<String>,
    /// MAC address as ungrouped hex (`a0b1c2d3e4f5`).
    pub mac: Option<String>,
}

impl BasicInfo {
    pub fn is_aircon(&self) -> bool {
        self.kind.as_deref() == Some("aircon")
    }

    /// The display name with percent-escapes decoded.
    ///
    /// Falls back to the raw value if it is not valid UTF-8 once decoded.
    pub fn decoded_name(&self) -> Option<String> {
        let raw = self.name.as_deref()?;
        Some(
            urlencoding::decode(raw)
                .map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned),
        )
    }

    /// The MAC address grouped into colon-separated octets.
    pub fn formatted_mac(&self) -> Option<String> {
        self.mac.as_deref().map(format_mac)
    }
}

impl From<&Payload> for BasicInfo {
    fn from(payload: &Payload) -> Self {
        Self {
            kind: payload.owned("type"),
            name: payload.owned("name"),
            mac: payload.owned("mac"),
        }
    }
}

/// `GET /aircon/get_control_info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlInfo {
    /// `0` / `1`.
    pub pow: Option<String>,
    /// Operating mode digit.
    pub mode: Option<String>,
    /// Fan rate code.
    pub f_rate: Option<String>,
    /// Fan direction digit.
    pub f_dir: Option<String>,
    /// Cooling target temperature.
    pub dt3: Option<String>,
    /// Heating target temperature.
    pub dt4: Option<String>,
}

impl From<&Payload> for ControlInfo {
    fn from(payload: &Payload) -> Self {
        Self {
            pow: payload.owned("pow"),
            mode: payload.owned("mode"),
            f_rate: payload.owned("f_rate"),
            f_dir: payload.owned("f_dir"),
            dt3: payload.owned("dt3"),
            dt4: payload.owned("dt4"),
        }
    }
}

/// `GET /aircon/get_sensor_info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorInfo {
    /// Indoor (room) temperature.
    pub htemp: Option<String>,
}

impl From<&Payload> for SensorInfo {
    fn from(payload: &Payload) -> Self {
        Self {
            htemp: payload.owned("htemp"),
        }
    }
}

/// Query parameters for `GET /aircon/set_control_info`.
///
/// The adapter expects every field to be present, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlParams {
    pub f_dir: String,
    pub f_rate: String,
    pub stemp: String,
    pub mode: String,
    pub pow: String,
    pub shum: String,
}

impl ControlParams {
    /// Render as a URL query string in the fixed wire order.
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("f_dir", &self.f_dir)
            .append_pair("f_rate", &self.f_rate)
            .append_pair("stemp", &self.stemp)
            .append_pair("mode", &self.mode)
            .append_pair("pow", &self.pow)
            .append_pair("shum", &self.shum)
            .finish()
    }
}

fn format_mac(raw: &str) -> String {
    raw.as_bytes()
        .chunks(2)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(":")
}
