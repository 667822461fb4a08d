//! # Fedbroker VK Provider
//!
//! [`ProfileNormalizer`] for VKontakte. VK hands out the user's email alongside the
//! access token instead of in the profile, and wraps `users.get` results in an
//! envelope; both quirks are absorbed here.

use async_trait::async_trait;
use fedbroker_core::encoding::redecode_utf8_or_keep;
use fedbroker_core::state::json_property;
use fedbroker_core::{
    FederationError, NormalizedIdentity, ProfileNormalizer, ProviderConfig, RawProfile,
    TokenResponse,
};
use serde_json::Value;

mod envelope;
use envelope::UsersGetEnvelope;

/// Vendor id, also the default alias.
pub const PROVIDER_ID: &str = "vkontakte";
/// Authorization endpoint.
pub const AUTH_URL: &str = "https://oauth.vk.com/authorize";
/// Token endpoint.
pub const TOKEN_URL: &str = "https://oauth.vk.com/access_token";
/// `users.get` API method.
pub const PROFILE_URL: &str = "https://api.vk.com/method/users.get";
/// Profile fields requested from `users.get`.
pub const PROFILE_FIELDS: &str = "id,screen_name,first_name,last_name";
/// API version sent with profile requests.
pub const API_VERSION: &str = "5.78";
/// Scope requested by default.
pub const DEFAULT_SCOPE: &str = "email";
/// Token response parameter carrying the user's email.
pub const EMAIL_PARAMETER: &str = "email";
/// Content type sent with profile requests.
pub const PROFILE_CONTENT_TYPE: &str = "application/json; charset=utf-8;";

/// The VKontakte profile normalizer.
#[derive(Debug, Clone)]
pub struct VkProvider {
    config: ProviderConfig,
}

impl Default for VkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VkProvider {
    /// A provider talking to the public VK endpoints.
    pub fn new() -> Self {
        Self::with_config(default_config())
    }

    /// A provider with custom endpoints, e.g. a mock server.
    pub fn with_config(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// The access token is inserted as given; token responses hand it out
    /// already in URL-safe form.
    fn profile_request_url(&self, access_token: &str) -> String {
        format!(
            "{}?fields={}&access_token={}&v={}",
            self.config.profile_url,
            self.config.profile_fields,
            access_token,
            self.config.api_version
        )
    }
}

/// The public VK endpoints and defaults.
pub fn default_config() -> ProviderConfig {
    ProviderConfig {
        authorization_url: AUTH_URL.to_string(),
        token_url: TOKEN_URL.to_string(),
        profile_url: PROFILE_URL.to_string(),
        profile_fields: PROFILE_FIELDS.to_string(),
        api_version: API_VERSION.to_string(),
        default_scope: DEFAULT_SCOPE.to_string(),
    }
}

#[async_trait]
impl ProfileNormalizer for VkProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    fn vendor_config(&self) -> &ProviderConfig {
        &self.config
    }

    fn profile_endpoint_for_validation(&self) -> String {
        format!(
            "{}?fields={}&v={}",
            self.config.profile_url, self.config.profile_fields, self.config.api_version
        )
    }

    async fn fetch_profile(
        &self,
        http: &reqwest::Client,
        access_token: &str,
        token_response: Option<&TokenResponse>,
    ) -> Result<RawProfile, FederationError> {
        log::debug!("Requesting users.get from {}", self.config.profile_url);
        // The request URL carries the token; keep it out of error messages.
        let body = http
            .get(self.profile_request_url(access_token))
            .header(reqwest::header::CONTENT_TYPE, PROFILE_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                FederationError::profile_fetch_caused_by(PROVIDER_ID, "request failed", e.without_url())
            })?
            .bytes()
            .await
            .map_err(|e| {
                FederationError::profile_fetch_caused_by(
                    PROVIDER_ID,
                    "could not read response",
                    e.without_url(),
                )
            })?;

        let envelope: UsersGetEnvelope = serde_json::from_slice(&body).map_err(|e| {
            FederationError::profile_fetch_caused_by(PROVIDER_ID, "response is not a users.get envelope", e)
        })?;
        let mut profile = envelope
            .into_first_profile()
            .map_err(|message| FederationError::profile_fetch(PROVIDER_ID, message))?;

        let email = token_response.and_then(|response| response.param(EMAIL_PARAMETER));
        profile.insert(
            "email".to_string(),
            email.map(Value::String).unwrap_or(Value::Null),
        );
        Ok(profile)
    }

    fn normalize(
        &self,
        alias: &str,
        profile: RawProfile,
    ) -> Result<NormalizedIdentity, FederationError> {
        let id = json_property(&profile, "id")
            .ok_or_else(|| FederationError::invalid_profile(alias, "profile has no `id`"))?;
        let mut identity = NormalizedIdentity::new(alias, id)?;

        let email = json_property(&profile, "email");
        identity.username = json_property(&profile, "screen_name")
            .or_else(|| email.clone())
            .unwrap_or_else(|| identity.identifier.clone());
        identity.email = email;

        let first_name =
            json_property(&profile, "first_name").map(|v| redecode_utf8_or_keep("first_name", v));
        let last_name =
            json_property(&profile, "last_name").map(|v| redecode_utf8_or_keep("last_name", v));
        identity.display_name = display_name(first_name.as_deref(), last_name.as_deref());
        identity.first_name = first_name;
        identity.last_name = last_name;

        identity.store_raw_profile(alias, Value::Object(profile));
        Ok(identity)
    }
}

/// First name, then a space and the last name if there is one.
///
/// Only absence drops the space: an empty last name leaves a trailing space.
fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    let mut name = first_name.unwrap_or_default().to_string();
    if let Some(last_name) = last_name {
        name.push(' ');
        name.push_str(last_name);
    }
    name
}
