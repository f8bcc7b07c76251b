//! Client configuration.
//!
//! The endpoint and credentials are explicit configuration values passed into
//! client construction; there is no ambient or process-wide endpoint state.

use std::time::Duration;

/// Authentication strategy applied once per outgoing request.
#[derive(Debug, Clone, Default)]
pub enum AuthStrategy {
    /// No authentication.
    #[default]
    None,
    /// HTTP basic authentication.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// AWS SigV4 request signing (for AWS-hosted clusters).
    #[cfg(feature = "aws-auth")]
    AwsSigV4 {
        /// AWS credentials.
        credentials: aws_credential_types::Credentials,
        /// AWS region of the cluster.
        region: String,
    },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Cluster endpoint URL.
    pub url: String,
    /// Authentication strategy.
    pub auth: AuthStrategy,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: AuthStrategy::None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = AuthStrategy::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set AWS SigV4 request signing.
    #[cfg(feature = "aws-auth")]
    pub fn with_aws_credentials(
        mut self,
        credentials: aws_credential_types::Credentials,
        region: impl Into<String>,
    ) -> Self {
        self.auth = AuthStrategy::AwsSigV4 {
            credentials,
            region: region.into(),
        };
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
