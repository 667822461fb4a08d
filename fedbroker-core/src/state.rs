use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::FederationError;

/// Context data key under which the federated access token is stored.
pub const FEDERATED_ACCESS_TOKEN: &str = "FEDERATED_ACCESS_TOKEN";

/// A provider-agnostic identity handed to the identity broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    /// Alias of the provider that produced this identity, e.g. "vkontakte".
    pub provider_id: String,
    /// The user's identifier at the provider. Never empty.
    pub identifier: String,
    /// Preferred username.
    pub username: String,
    /// Email address, when the provider disclosed one.
    pub email: Option<String>,
    /// Given name as reported by the provider.
    pub first_name: Option<String>,
    /// Family name as reported by the provider.
    pub last_name: Option<String>,
    /// Full display name.
    pub display_name: String,
    /// Raw profile payloads keyed by provider alias, kept for attribute mappers.
    pub raw_profiles: HashMap<String, Value>,
    /// Auxiliary data for later flows (e.g. the federated access token).
    pub context_data: HashMap<String, String>,
}

impl NormalizedIdentity {
    /// Start an identity for `identifier`. Fails with `InvalidProfile` if it is empty.
    ///
    /// The username defaults to the identifier.
    pub fn new(
        provider_id: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self, FederationError> {
        let provider_id = provider_id.into();
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(FederationError::invalid_profile(
                provider_id,
                "profile identifier is empty",
            ));
        }
        Ok(Self {
            provider_id,
            username: identifier.clone(),
            identifier,
            email: None,
            first_name: None,
            last_name: None,
            display_name: String::new(),
            raw_profiles: HashMap::new(),
            context_data: HashMap::new(),
        })
    }

    /// Keep the raw profile for later attribute mapping.
    pub fn store_raw_profile(&mut self, alias: impl Into<String>, profile: Value) {
        self.raw_profiles.insert(alias.into(), profile);
    }

    /// The raw profile stored under `alias`.
    pub fn raw_profile(&self, alias: &str) -> Option<&Value> {
        self.raw_profiles.get(alias)
    }

    /// The access token attached by the federation flow.
    pub fn access_token(&self) -> Option<&str> {
        self.context_data
            .get(FEDERATED_ACCESS_TOKEN)
            .map(String::as_str)
    }
}

/// Reads `name` from a JSON object as text.
///
/// Strings are returned as is, other scalars as their JSON literal and
/// nested structures as compact JSON. `null` and missing keys yield `None`.
pub fn json_property(object: &Map<String, Value>, name: &str) -> Option<String> {
    match object.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_identifier_is_rejected() {
        let err = NormalizedIdentity::new("vkontakte", "").unwrap_err();
        assert_eq!(err.kind(), crate::error::FederationErrorKind::InvalidProfile);
    }

    #[test]
    fn test_username_defaults_to_identifier() {
        let identity = NormalizedIdentity::new("vkontakte", "42").unwrap();
        assert_eq!(identity.username, "42");
        assert_eq!(identity.access_token(), None);
    }

    #[test]
    fn test_json_property() {
        let object = json!({
            "id": 42,
            "name": "Jo",
            "gone": null,
            "nested": {"a": 1}
        });
        let object = object.as_object().unwrap();

        assert_eq!(json_property(object, "id").as_deref(), Some("42"));
        assert_eq!(json_property(object, "name").as_deref(), Some("Jo"));
        assert_eq!(json_property(object, "gone"), None);
        assert_eq!(json_property(object, "missing"), None);
        assert_eq!(json_property(object, "nested").as_deref(), Some(r#"{"a":1}"#));
    }
}
