use fedbroker_core::{FederationError, TokenResponse};

/// Token parameter looked up when none is configured.
pub const DEFAULT_ACCESS_TOKEN_PARAMETER: &str = "access_token";

/// Generic OAuth2 client capability shared by every vendor.
///
/// Knows which alias the broker configured for the provider, under which
/// parameter the token endpoint returns the access token, and owns the HTTP
/// client used for profile requests.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    alias: String,
    access_token_parameter: String,
    http: reqwest::Client,
}

impl OAuth2Client {
    /// Create a client for the provider configured under `alias`.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            access_token_parameter: DEFAULT_ACCESS_TOKEN_PARAMETER.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Use a different token response parameter for the access token.
    pub fn with_access_token_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.access_token_parameter = parameter.into();
        self
    }

    /// Use a pre-configured HTTP client (timeouts, proxies, pooling).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// The provider alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The token response parameter holding the access token.
    pub fn access_token_parameter(&self) -> &str {
        &self.access_token_parameter
    }

    /// The HTTP client for outbound calls.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Extract the access token, failing with `MissingToken` if absent.
    pub fn extract_access_token(&self, response: &TokenResponse) -> Result<String, FederationError> {
        response
            .param(&self.access_token_parameter)
            .ok_or_else(|| FederationError::MissingToken {
                parameter: self.access_token_parameter.clone(),
            })
    }
}
