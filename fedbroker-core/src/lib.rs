//! # Fedbroker Core
//!
//! `fedbroker-core` provides the foundational traits and types for fedbroker federation adapters.
//! It defines the normalized identity handed to an identity broker, the federation error taxonomy,
//! token response parsing and the [`ProfileNormalizer`] interface each vendor implements.

#![warn(missing_docs)]

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Errors that can occur during a federation attempt.
pub mod error;
pub use crate::error::{FederationError, FederationErrorKind};

/// The normalized identity record.
pub mod state;
pub use crate::state::{NormalizedIdentity, FEDERATED_ACCESS_TOKEN};

/// Static provider configuration.
pub mod config;
pub use crate::config::ProviderConfig;

/// Token endpoint response parsing.
pub mod token_response;
pub use crate::token_response::{extract_param, TokenResponse};

/// Text encoding fixups applied to profile fields.
pub mod encoding;

/// A raw profile object as returned by a vendor, after envelope unwrapping.
pub type RawProfile = Map<String, Value>;

/// Vendor-specific half of a federation attempt.
///
/// Fetches the user's profile with an access token and maps the vendor's
/// fields onto a [`NormalizedIdentity`]. Generic token handling lives in the
/// flow that composes a normalizer with an OAuth2 client.
#[async_trait]
pub trait ProfileNormalizer: Send + Sync {
    /// Get the vendor identifier, e.g. "vkontakte".
    fn provider_id(&self) -> &str;

    /// Endpoints and defaults for this vendor.
    fn vendor_config(&self) -> &ProviderConfig;

    /// Fetch the user's profile and unwrap any vendor envelope.
    ///
    /// `token_response` is the body the access token came from, when there is
    /// one; vendors that piggy-back profile data on it read it from there.
    async fn fetch_profile(
        &self,
        http: &reqwest::Client,
        access_token: &str,
        token_response: Option<&TokenResponse>,
    ) -> Result<RawProfile, FederationError>;

    /// Map a raw profile onto a normalized identity. The raw profile must be
    /// kept on the identity under `alias`.
    fn normalize(
        &self,
        alias: &str,
        profile: RawProfile,
    ) -> Result<NormalizedIdentity, FederationError>;

    /// Endpoint used to validate externally issued access tokens.
    ///
    /// Carries every query parameter the vendor needs except the token itself,
    /// which the caller appends as `access_token=<token>`.
    fn profile_endpoint_for_validation(&self) -> String {
        self.vendor_config().profile_url.clone()
    }
}

#[async_trait]
impl<T: ProfileNormalizer + ?Sized> ProfileNormalizer for std::sync::Arc<T> {
    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }

    fn vendor_config(&self) -> &ProviderConfig {
        (**self).vendor_config()
    }

    async fn fetch_profile(
        &self,
        http: &reqwest::Client,
        access_token: &str,
        token_response: Option<&TokenResponse>,
    ) -> Result<RawProfile, FederationError> {
        (**self)
            .fetch_profile(http, access_token, token_response)
            .await
    }

    fn normalize(
        &self,
        alias: &str,
        profile: RawProfile,
    ) -> Result<NormalizedIdentity, FederationError> {
        (**self).normalize(alias, profile)
    }

    fn profile_endpoint_for_validation(&self) -> String {
        (**self).profile_endpoint_for_validation()
    }
}

/// Type-erased federation flow, so flows for different vendors can share a registry.
#[async_trait]
pub trait ErasedFederationFlow: Send + Sync {
    /// Get the configured provider alias.
    fn alias(&self) -> String;
    /// Scopes to request when the broker does not configure any.
    fn default_scopes(&self) -> Vec<String>;
    /// Turns a token endpoint response body into a normalized identity.
    async fn federate(&self, token_response: &str) -> Result<NormalizedIdentity, FederationError>;
    /// Turns an externally issued access token into a normalized identity.
    async fn federate_access_token(
        &self,
        access_token: &str,
    ) -> Result<NormalizedIdentity, FederationError>;
}

#[async_trait]
impl<T: ErasedFederationFlow + ?Sized> ErasedFederationFlow for std::sync::Arc<T> {
    fn alias(&self) -> String {
        (**self).alias()
    }

    fn default_scopes(&self) -> Vec<String> {
        (**self).default_scopes()
    }

    async fn federate(&self, token_response: &str) -> Result<NormalizedIdentity, FederationError> {
        (**self).federate(token_response).await
    }

    async fn federate_access_token(
        &self,
        access_token: &str,
    ) -> Result<NormalizedIdentity, FederationError> {
        (**self).federate_access_token(access_token).await
    }
}
