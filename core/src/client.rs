//! Resilient fetch client.
//!
//! # Design
//! One logical request is attempted against each candidate endpoint in turn.
//! An attempt settles fully (response or transport error) before the next
//! candidate is tried. The first 2xx response wins; every failure is recorded
//! and superseded by the next attempt, and only the last one reaches the
//! caller. The client keeps no state between calls: candidates and
//! credentials are re-read for every request.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::resolver::EndpointResolver;
use crate::transport::UreqTransport;

/// Method, body and extra headers for one logical request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// A request carrying `body` serialized as JSON.
    pub fn json<B: Serialize + ?Sized>(method: HttpMethod, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self {
            method,
            headers: Vec::new(),
            body: Some(body),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Parsed body of the first successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            ResponseBody::Json(_) => None,
        }
    }

    /// Deserialize into `T`. A text body is parsed as JSON as a last resort,
    /// which covers backends that omit the content type.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let result = match self {
            ResponseBody::Json(v) => serde_json::from_value(v),
            ResponseBody::Text(s) => serde_json::from_str(&s),
        };
        result.map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Sends each logical request to the first candidate endpoint that answers
/// with a 2xx status.
#[derive(Debug)]
pub struct ResilientClient<T> {
    resolver: EndpointResolver,
    credentials: CredentialStore,
    transport: T,
}

impl ResilientClient<UreqTransport> {
    /// Client over a blocking `ureq` agent honouring the configured
    /// per-attempt timeout.
    pub fn from_config(config: &ClientConfig, credentials: CredentialStore) -> Self {
        Self::new(
            EndpointResolver::new(config),
            credentials,
            UreqTransport::new(config.attempt_timeout),
        )
    }
}

impl<T: Transport> ResilientClient<T> {
    pub fn new(resolver: EndpointResolver, credentials: CredentialStore, transport: T) -> Self {
        Self {
            resolver,
            credentials,
            transport,
        }
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one logical request with fallback across candidates.
    ///
    /// Returns the parsed body of the first 2xx response. When every candidate
    /// fails, returns the last failure.
    pub fn request(
        &self,
        path: &str,
        options: &RequestOptions,
        requires_auth: bool,
    ) -> Result<ResponseBody, ApiError> {
        let candidates = self.resolver.resolve_candidates(path);
        let headers = self.headers_for(options, requires_auth);
        let mut last_error = None;

        for (attempt, url) in candidates.into_iter().enumerate() {
            let request = HttpRequest {
                method: options.method,
                url,
                headers: headers.clone(),
                body: options.body.clone(),
            };
            tracing::debug!(
                attempt = attempt + 1,
                method = request.method.as_str(),
                url = %request.url,
                "trying candidate endpoint"
            );

            match self.transport.execute(&request) {
                Ok(response) if response.is_success() => match parse_body(&request.url, response) {
                    Ok(body) => {
                        tracing::debug!(url = %request.url, "candidate succeeded");
                        return Ok(body);
                    }
                    Err(e) => {
                        tracing::warn!(url = %request.url, error = %e, "candidate returned unparseable JSON");
                        last_error = Some(e);
                    }
                },
                Ok(response) => {
                    tracing::warn!(url = %request.url, status = response.status, "candidate returned error status");
                    last_error = Some(ApiError::Http {
                        status: response.status,
                        body: response.body,
                    });
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e.message, "candidate unreachable");
                    last_error = Some(ApiError::Transport(e));
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::AllAttemptsFailed))
    }

    /// `request` followed by deserialization into `R`.
    pub fn request_json<R: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
        requires_auth: bool,
    ) -> Result<R, ApiError> {
        self.request(path, options, requires_auth)?.into_typed()
    }

    fn headers_for(&self, options: &RequestOptions, requires_auth: bool) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(options.headers.len() + 2);
        if options.body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if requires_auth {
            headers.extend(self.credentials.auth_headers());
        }
        // Caller headers override the defaults above.
        for (name, value) in &options.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }
}

/// JSON when the content type says so, text otherwise.
fn parse_body(url: &str, response: HttpResponse) -> Result<ResponseBody, ApiError> {
    if !response.is_json() {
        return Ok(ResponseBody::Text(response.body));
    }
    serde_json::from_str(&response.body)
        .map(ResponseBody::Json)
        .map_err(|e| ApiError::MalformedBody {
            url: url.to_string(),
            message: e.to_string(),
        })
}
