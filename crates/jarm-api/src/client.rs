// JARM backend HTTP client
//
// Wraps `reqwest::Client` with URL construction and `{ success, error }`
// envelope handling. Endpoint groups (monitoring, alerts, processes,
// tasks) are implemented as inherent methods in separate files so this
// module stays focused on transport mechanics.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the JARM monitoring backend.
///
/// Every JSON response is checked for the `success` flag before the
/// payload is decoded. A body that omits the flag counts as successful
/// when the HTTP status is 2xx.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Timeout baked into `http`, when known. Lets a send failure be
    /// reported as `Error::Timeout` with the budget that ran out.
    timeout: Option<Duration>,
}

/// Application-level status fields shared by every JSON body.
#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: None,
        }
    }

    /// Record the timeout the wrapped `reqwest::Client` was built with.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.root_url(&format!("api/{path}"))
    }

    /// Build `{base}/{path}` for endpoints outside the `/api` tree.
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Ok(Url::parse(&full)?)
    }

    /// Build `{base}/api/{segments...}`, percent-encoding each segment.
    ///
    /// Used wherever a caller-supplied id lands in the path. Empty, `.` and
    /// `..` segments are refused: the URL parser would silently drop or
    /// resolve them and the request would hit a different endpoint.
    pub(crate) fn api_segments_url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::InvalidPathSegment((*bad).to_owned()));
        }

        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn send_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout { timeout },
            _ => Error::Transport(err),
        }
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<(reqwest::StatusCode, String), Error> {
        let resp = req.send().await.map_err(|e| self.send_error(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.send_error(e))?;
        Ok((status, body))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let (status, body) = self.send(self.http.get(url)).await?;
        decode_body(status, &body)
    }

    /// Send a POST request with an optional JSON body and decode the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&impl Serialize>,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let (status, body) = self.send(req).await?;
        decode_body(status, &body)
    }

    /// Send a GET request for a non-JSON body (e.g. the SQL export).
    pub(crate) async fn get_text(&self, url: Url) -> Result<String, Error> {
        debug!("GET {}", url);

        let (status, body) = self.send(self.http.get(url)).await?;

        if status.is_success() {
            return Ok(body);
        }

        // Failures still come back as JSON envelopes.
        let meta: Meta = serde_json::from_str(&body).unwrap_or_default();
        Err(Error::Rejected {
            status: status.as_u16(),
            message: meta
                .error
                .or(meta.message)
                .unwrap_or_else(|| format!("HTTP {status}")),
        })
    }

    /// GET a readiness-style report. The body is decoded for both 200 and
    /// 503, since a 503 carries the failing checks rather than an envelope.
    pub(crate) async fn get_report<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let (status, body) = self.send(self.http.get(url)).await?;
        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            });
        }
        // A proxy's bare 503 is a plain failure, not a report.
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            if let Ok(report) = serde_json::from_str(&body) {
                return Ok(report);
            }
        }
        decode_body(status, &body)
    }
}

/// Check the `success` flag, then decode the whole body into `T`.

pub(crate) fn decode_body<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<T, Error> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if status.is_success() => {
            return Err(Error::Deserialization {
                message: e.to_string(),
                body: body.to_owned(),
            });
        }
        Err(_) => {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: format!("HTTP {status}"),
            });
        }
    };

    let meta = Meta::deserialize(&value).unwrap_or_default();
    if !meta.success.unwrap_or_else(|| status.is_success()) {
        return Err(Error::Rejected {
            status: status.as_u16(),
            message: meta
                .error
                .or(meta.message)
                .unwrap_or_else(|| format!("HTTP {status}")),
        });
    }

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}
