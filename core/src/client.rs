//! Port forwarding API client: request encoding, response decoding, and
//! classification

use crate::{Credentials, Error, ForwardConfig, Result};
use percent_encoding::percent_decode_str;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use url::{form_urlencoded, Url};

/// A decoded API response, exactly one of three shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardResponse {
    /// A forwarded port was assigned.
    Port(u16),
    /// The endpoint rejected the request; the message is kept verbatim.
    ApiError(String),
    /// Neither known key was present. Every received key/value pair is
    /// preserved, in response order, for diagnostic reporting.
    Unknown(Vec<(String, String)>),
}

/// Encode the credential bundle as URL-encoded form data.
///
/// The wire format is exactly these four keys, no others.
pub fn encode_form(credentials: &Credentials) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("user", &credentials.user)
        .append_pair("pass", &credentials.pass)
        .append_pair("client_id", &credentials.client_id)
        .append_pair("local_ip", &credentials.local_ip)
        .finish()
}

/// Blocking client for the port forwarding endpoint.
///
/// Performs exactly one request per call; any transport failure is terminal
/// for the run, no retry is attempted.
pub struct PortForwardClient {
    http: reqwest::blocking::Client,
    endpoint: Url,
}

impl PortForwardClient {
    pub fn new(config: &ForwardConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| Error::network(&config.endpoint, source))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// POST the credentials and classify the response.
    pub fn forward(&self, credentials: &Credentials) -> Result<ForwardResponse> {
        let body = encode_form(credentials);
        log::debug!("posting to endpoint `{}`", self.endpoint);
        log::debug!("request body: {body}");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|source| Error::network(&self.endpoint, source))?;

        // text() decodes with the declared charset, falling back to UTF-8.
        // The endpoint is also known to occasionally percent-escape the JSON
        // body, so that layer is reversed before parsing.
        let text = response
            .text()
            .map_err(|source| Error::network(&self.endpoint, source))?;
        let decoded = percent_decode_str(&text).decode_utf8_lossy().into_owned();
        log::debug!("decoded API response: {decoded}");

        let map: Map<String, Value> = serde_json::from_str(&decoded).map_err(|source| {
            Error::MalformedResponse {
                url: self.endpoint.to_string(),
                detail: "body is not a JSON object".to_string(),
                body: decoded.clone(),
                source: Some(source),
            }
        })?;

        classify(&self.endpoint, &decoded, &map)
    }
}

/// Turn the parsed response mapping into one of the three known shapes.
fn classify(url: &Url, body: &str, map: &Map<String, Value>) -> Result<ForwardResponse> {
    if let Some(value) = map.get("port") {
        let port = coerce_port(value).ok_or_else(|| Error::MalformedResponse {
            url: url.to_string(),
            detail: format!("`port` value {value} is not a valid port number"),
            body: body.to_string(),
            source: None,
        })?;
        return Ok(ForwardResponse::Port(port));
    }

    if let Some(value) = map.get("error") {
        return Ok(ForwardResponse::ApiError(render_value(value)));
    }

    let pairs = map
        .iter()
        .map(|(key, value)| (key.clone(), render_value(value)))
        .collect();
    Ok(ForwardResponse::Unknown(pairs))
}

/// The API reports the port as a JSON number; tolerate a numeric string too.
fn coerce_port(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
