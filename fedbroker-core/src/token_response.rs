use serde_json::{Map, Value};

/// The raw body returned by a provider's token endpoint.
///
/// Consumed once per federation attempt to look up named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    body: String,
}

impl TokenResponse {
    /// Wrap a token endpoint response body.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// The untouched response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Look up a top-level parameter. See [`extract_param`].
    pub fn param(&self, name: &str) -> Option<String> {
        extract_param(&self.body, name)
    }
}

impl From<&str> for TokenResponse {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

impl From<String> for TokenResponse {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

/// Extract a top-level parameter from a token endpoint response body.
///
/// Bodies starting with `{` are read as JSON objects, anything else as
/// `key=value` pairs joined by `&`. Values are returned verbatim: form values
/// are not percent-decoded and only JSON strings count, other JSON values are
/// absent. Any key present in the body can be looked up. Missing keys and
/// empty values yield `None`.
pub fn extract_param(body: &str, name: &str) -> Option<String> {
    let value = if body.trim_start().starts_with('{') {
        from_json(body, name)
    } else {
        from_form(body, name)
    };
    value.filter(|v| !v.is_empty())
}

fn from_json(body: &str, name: &str) -> Option<String> {
    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(mut object) => match object.remove(name) {
            Some(Value::String(value)) => Some(value),
            _ => None,
        },
        Err(e) => {
            log::warn!("Could not extract `{}` from token response: {}", name, e);
            None
        }
    }
}

fn from_form(body: &str, name: &str) -> Option<String> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
