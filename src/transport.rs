//! HTTP transport boundary.
//!
//! Everything the client knows about the wire lives behind the [`Transport`]
//! trait: one `execute` call taking a method, a path relative to the cluster
//! endpoint, and an optional body. The default implementation is a reqwest
//! client applying the configured [`AuthStrategy`] once per request.

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::{AuthStrategy, ClientConfig},
    error::{Error, Result},
};

/// Raw response from the engine: status code plus undecoded body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response from a status code and body.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Check whether the engine accepted the request.
    ///
    /// Anything >= 300 is treated as a failure, matching the engine's API
    /// conventions (redirects are never expected from a cluster endpoint).
    pub fn is_success(&self) -> bool {
        self.status < 300
    }

    /// Convert an error status into an [`Error::Response`] carrying the
    /// status line and raw body text for diagnosis.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Response {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::Decode)
    }
}

/// Transport collaborator executing requests against the engine.
///
/// The core never retries, times out, or cancels internally; those concerns
/// belong to the implementation behind this trait or to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a single request and return the raw response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<TransportResponse>;
}

/// Default reqwest-backed transport.
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: url::Url,
    auth: AuthStrategy,
}

impl HttpTransport {
    /// Create a transport from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url =
            url::Url::parse(&config.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            inner,
            base_url,
            auth: config.auth,
        })
    }

    fn build_request(
        &self,
        method: Method,
        url: url::Url,
        body: Option<Bytes>,
    ) -> Result<reqwest::Request> {
        match &self.auth {
            #[cfg(feature = "aws-auth")]
            AuthStrategy::AwsSigV4 {
                credentials,
                region,
            } => self.signed_request(method, url, body, credentials, region),
            _ => {
                let mut builder = self
                    .inner
                    .request(method, url)
                    .header(http::header::CONTENT_TYPE, "application/json");

                if let AuthStrategy::Basic { username, password } = &self.auth {
                    let credentials = format!("{}:{}", username, password);
                    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                    builder =
                        builder.header(http::header::AUTHORIZATION, format!("Basic {}", encoded));
                }

                if let Some(body) = body {
                    builder = builder.body(body);
                }

                Ok(builder.build()?)
            }
        }
    }

    /// Build an AWS SigV4-signed request.
    #[cfg(feature = "aws-auth")]
    fn signed_request(
        &self,
        method: Method,
        url: url::Url,
        body: Option<Bytes>,
        credentials: &aws_credential_types::Credentials,
        region: &str,
    ) -> Result<reqwest::Request> {
        use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
        use aws_sigv4::sign::v4;

        let identity = credentials.clone().into();
        let params: aws_sigv4::http_request::SigningParams = v4::SigningParams::builder()
            .identity(&identity)
            .region(region)
            .name("es")
            .time(std::time::SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| Error::Signing(e.to_string()))?
            .into();

        let body = body.unwrap_or_default();

        let signable = SignableRequest::new(
            method.as_str(),
            url.as_str(),
            std::iter::once(("content-type", "application/json")),
            SignableBody::Bytes(&body),
        )
        .map_err(|e| Error::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| Error::Signing(e.to_string()))?
            .into_parts();

        let mut request = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| Error::Signing(e.to_string()))?;

        instructions.apply_to_request_http1x(&mut request);

        Ok(reqwest::Request::try_from(request)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<TransportResponse> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        debug!(method = %method, %url, "executing request");

        let request = self.build_request(method, url, body)?;
        let response = self.inner.execute(request).await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(TransportResponse::new(status, body))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status_passes_2xx() {
        let response = TransportResponse::new(201, Bytes::from_static(b"{}"));
        assert!(response.error_for_status().is_ok());
    }

    #[test]
    fn test_error_for_status_rejects_3xx_and_up() {
        let response = TransportResponse::new(400, Bytes::from_static(b"bad request"));
        match response.error_for_status() {
            Err(Error::Response { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad request");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let redirect = TransportResponse::new(301, Bytes::new());
        assert!(redirect.error_for_status().is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = ClientConfig::new("not a url");
        assert!(matches!(
            HttpTransport::new(config),
            Err(Error::InvalidUrl(_))
        ));
    }
}
