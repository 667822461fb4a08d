use serde::{Deserialize, Serialize};

/// Static, provider-specific endpoints and defaults.
///
/// Vendors ship a constructor with their real endpoints; the `with_*` setters
/// exist so a broker (or a test) can point the adapter somewhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Browser redirect target. Configured only, never called by the adapter.
    pub authorization_url: String,
    /// Token endpoint. Its response body is handed to the adapter.
    pub token_url: String,
    /// User-info endpoint, without query string.
    pub profile_url: String,
    /// Comma separated profile fields to request.
    #[serde(default)]
    pub profile_fields: String,
    /// API version sent with profile requests.
    #[serde(default)]
    pub api_version: String,
    /// Scope requested when the broker does not configure one.
    pub default_scope: String,
}

impl ProviderConfig {
    /// Override the authorization endpoint.
    pub fn with_authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = url.into();
        self
    }

    /// Override the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the profile endpoint.
    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = url.into();
        self
    }

    /// Override the requested API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// The default scope split into individual scopes.
    pub fn default_scopes(&self) -> Vec<&str> {
        self.default_scope
            .split(|c: char| c == ' ' || c == ',')
            .filter(|s| !s.is_empty())
            .collect()
    }
}
