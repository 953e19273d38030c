//! Configuration client for the device XML API.
//!
//! Reads are `GET /api/?type=config&action=get&xpath=...` requests
//! authenticated with the `X-PAN-KEY` header. Every answer is wrapped in a
//! `<response status="...">` envelope; [`classify_response`] turns that
//! envelope into a payload or a [`QueryError`], treating error code 7
//! ("object not found") as the not-found signal.
//!
//! # Configuration
//!
//! [`ApiClientConfig::from_env`] reads the same variables the acceptance
//! suite uses to reach its device:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `PANOS_HOSTNAME` | device hostname or address | required |
//! | `PANOS_API_KEY` | API key | required |
//! | `PANOS_PROTOCOL` | `https` or `http` | `https` |
//! | `PANOS_PORT` | port override | protocol default |
//! | `PANOS_SKIP_VERIFY_CERTIFICATE` | accept invalid TLS certificates | `false` |
//! | `PANOS_TIMEOUT` | request timeout in seconds | `30` |

use crate::client::{ConfigClient, QueryError, QueryResult};
use crate::path::ConfigPath;
use log::{debug, info, trace};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Url;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Error code the API uses for a node that does not exist.
pub const OBJECT_NOT_FOUND_CODE: u32 = 7;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport protocol for the XML API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Https,
    Http,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Https => write!(f, "https"),
            Protocol::Http => write!(f, "http"),
        }
    }
}

impl FromStr for Protocol {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "https" => Ok(Protocol::Https),
            "http" => Ok(Protocol::Http),
            other => Err(QueryError::configuration(format!(
                "unsupported protocol '{}', expected 'https' or 'http'",
                other
            ))),
        }
    }
}

/// Connection settings for [`XmlApiClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Device hostname or address, without scheme.
    pub hostname: String,
    /// API key sent with every request.
    pub api_key: String,
    pub protocol: Protocol,
    /// Port override; `None` uses the protocol default.
    pub port: Option<u16>,
    /// Accept self-signed or otherwise invalid certificates.
    pub skip_verify_certificate: bool,
    /// Per-request deadline, covering connect through body.
    pub timeout: Duration,
}

// The API key stays out of logs and panic messages.
impl fmt::Debug for ApiClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientConfig")
            .field("hostname", &self.hostname)
            .field("api_key", &"<redacted>")
            .field("protocol", &self.protocol)
            .field("port", &self.port)
            .field("skip_verify_certificate", &self.skip_verify_certificate)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiClientConfig {
    /// Start building a configuration.
    pub fn builder() -> ApiClientConfigBuilder {
        ApiClientConfigBuilder::default()
    }

    /// Load the configuration from `PANOS_*` environment variables.
    pub fn from_env() -> QueryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> QueryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(hostname) = lookup("PANOS_HOSTNAME") {
            builder = builder.hostname(hostname);
        }
        if let Some(api_key) = lookup("PANOS_API_KEY") {
            builder = builder.api_key(api_key);
        }
        if let Some(protocol) = lookup("PANOS_PROTOCOL") {
            builder = builder.protocol(protocol.parse()?);
        }
        if let Some(port) = lookup("PANOS_PORT") {
            let port = port.parse::<u16>().map_err(|e| {
                QueryError::configuration(format!("invalid PANOS_PORT '{}': {}", port, e))
            })?;
            builder = builder.port(port);
        }
        if let Some(skip) = lookup("PANOS_SKIP_VERIFY_CERTIFICATE") {
            let skip = skip.parse::<bool>().map_err(|e| {
                QueryError::configuration(format!(
                    "invalid PANOS_SKIP_VERIFY_CERTIFICATE '{}': {}",
                    skip, e
                ))
            })?;
            builder = builder.skip_verify_certificate(skip);
        }
        if let Some(timeout) = lookup("PANOS_TIMEOUT") {
            let seconds = timeout.parse::<u64>().map_err(|e| {
                QueryError::configuration(format!("invalid PANOS_TIMEOUT '{}': {}", timeout, e))
            })?;
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        builder.build()
    }

    /// URL of the API endpoint, without query parameters.
    pub fn endpoint(&self) -> QueryResult<Url> {
        let authority = match self.port {
            Some(port) => format!("{}:{}", self.hostname, port),
            None => self.hostname.clone(),
        };
        Url::parse(&format!("{}://{}/api/", self.protocol, authority)).map_err(|e| {
            QueryError::configuration(format!("invalid endpoint for '{}': {}", authority, e))
        })
    }
}

/// Builder for [`ApiClientConfig`].
#[derive(Default)]
pub struct ApiClientConfigBuilder {
    hostname: Option<String>,
    api_key: Option<String>,
    protocol: Protocol,
    port: Option<u16>,
    skip_verify_certificate: bool,
    timeout: Option<Duration>,
}

impl ApiClientConfigBuilder {
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn skip_verify_certificate(mut self, skip: bool) -> Self {
        self.skip_verify_certificate = skip;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Configuration`] if the hostname or API key is
    /// missing or empty, or the timeout is zero.
    pub fn build(self) -> QueryResult<ApiClientConfig> {
        let hostname = self
            .hostname
            .filter(|h| !h.is_empty())
            .ok_or_else(|| QueryError::configuration("hostname is required (PANOS_HOSTNAME)"))?;
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| QueryError::configuration("API key is required (PANOS_API_KEY)"))?;
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(QueryError::configuration("timeout must be greater than zero"));
        }

        Ok(ApiClientConfig {
            hostname,
            api_key,
            protocol: self.protocol,
            port: self.port,
            skip_verify_certificate: self.skip_verify_certificate,
            timeout,
        })
    }
}

/// [`ConfigClient`] backed by the device XML API.
#[derive(Clone)]
pub struct XmlApiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl fmt::Debug for XmlApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl XmlApiClient {
    /// Create a client for the configured device.
    pub fn new(config: ApiClientConfig) -> QueryResult<Self> {
        let endpoint = config.endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.skip_verify_certificate)
            .build()
            .map_err(|e| QueryError::configuration(format!("cannot build HTTP client: {}", e)))?;

        info!("XML API client ready for {}", endpoint);
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }

    /// Create a client from `PANOS_*` environment variables.
    pub fn from_env() -> QueryResult<Self> {
        Self::new(ApiClientConfig::from_env()?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a config read of `path`.
    pub fn request_url(&self, path: &ConfigPath) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("type", "config")
            .append_pair("action", "get")
            .append_pair("xpath", &path.to_xpath());
        url
    }
}

impl ConfigClient for XmlApiClient {
    async fn get(&self, path: &ConfigPath) -> QueryResult<String> {
        let url = self.request_url(path);
        let xpath = path.to_xpath();
        debug!("Reading config node {} from {}", xpath, self.endpoint);

        let transport = |e: reqwest::Error| QueryError::Transport {
            endpoint: self.endpoint.to_string(),
            message: e.to_string(),
        };

        let response = self
            .http
            .get(url)
            .header("X-PAN-KEY", &self.api_key)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Http {
                status: status.as_u16(),
                endpoint: self.endpoint.to_string(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        trace!("Response for {}: {}", xpath, body);
        classify_response(&xpath, body)
    }
}

/// Interpret an XML API response envelope.
///
/// - `status="success"` returns the whole document as the payload.
/// - `status="error"` with code 7 is [`QueryError::ObjectNotFound`].
/// - Any other error envelope is [`QueryError::Api`] carrying the code and
///   the text of its `msg` lines.
/// - Anything that is not an envelope is [`QueryError::InvalidResponse`].
pub fn classify_response(xpath: &str, body: String) -> QueryResult<String> {
    let envelope = read_envelope(&body)?;
    match envelope.status.as_str() {
        "success" => Ok(body),
        "error" if envelope.code == Some(OBJECT_NOT_FOUND_CODE) => {
            debug!("Config node {} not found", xpath);
            Err(QueryError::not_found(xpath))
        }
        "error" => Err(QueryError::Api {
            code: envelope.code,
            message: if envelope.messages.is_empty() {
                "no message in error response".to_string()
            } else {
                envelope.messages.join(" ")
            },
        }),
        other => Err(QueryError::invalid_response(format!(
            "unexpected response status '{}'",
            other
        ))),
    }
}

#[derive(Debug, Default)]
struct Envelope {
    status: String,
    code: Option<u32>,
    messages: Vec<String>,
}

fn read_envelope(body: &str) -> QueryResult<Envelope> {
    let xml_error = |e: quick_xml::Error| QueryError::invalid_response(e.to_string());

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut envelope: Option<Envelope> = None;
    let mut msg_depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if envelope.is_none() => {
                if e.name().as_ref() != b"response" {
                    return Err(QueryError::invalid_response(format!(
                        "expected <response> root, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                let status = e
                    .try_get_attribute("status")
                    .map_err(|e| xml_error(e.into()))?
                    .ok_or_else(|| QueryError::invalid_response("response has no status"))?
                    .unescape_value()
                    .map_err(xml_error)?
                    .into_owned();
                let code = match e.try_get_attribute("code").map_err(|e| xml_error(e.into()))? {
                    Some(attr) => attr.unescape_value().map_err(xml_error)?.parse::<u32>().ok(),
                    None => None,
                };
                envelope = Some(Envelope {
                    status,
                    code,
                    messages: Vec::new(),
                });
            }
            Event::Start(e) if e.name().as_ref() == b"msg" => msg_depth += 1,
            Event::End(e) if e.name().as_ref() == b"msg" => msg_depth = msg_depth.saturating_sub(1),
            Event::Text(text) if msg_depth > 0 => {
                if let Some(envelope) = envelope.as_mut() {
                    envelope.messages.push(text.unescape().map_err(xml_error)?.into_owned());
                }
            }
            Event::CData(data) if msg_depth > 0 => {
                if let Some(envelope) = envelope.as_mut() {
                    envelope
                        .messages
                        .push(String::from_utf8_lossy(&data.into_inner()).trim().to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    envelope.ok_or_else(|| QueryError::invalid_response("empty response body"))
}
