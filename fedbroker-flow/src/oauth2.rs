use async_trait::async_trait;
use fedbroker_core::{
    ErasedFederationFlow, FederationError, NormalizedIdentity, ProfileNormalizer, ProviderConfig,
    TokenResponse, FEDERATED_ACCESS_TOKEN,
};

use crate::client::OAuth2Client;

/// Composes the generic [`OAuth2Client`] with a vendor's [`ProfileNormalizer`].
pub struct FederationFlow<N: ProfileNormalizer> {
    client: OAuth2Client,
    normalizer: N,
}

#[async_trait]
impl<N: ProfileNormalizer> ErasedFederationFlow for FederationFlow<N> {
    fn alias(&self) -> String {
        self.client.alias().to_string()
    }

    fn default_scopes(&self) -> Vec<String> {
        self.default_scopes()
    }

    async fn federate(&self, token_response: &str) -> Result<NormalizedIdentity, FederationError> {
        self.federate(token_response).await
    }

    async fn federate_access_token(
        &self,
        access_token: &str,
    ) -> Result<NormalizedIdentity, FederationError> {
        self.federate_access_token(access_token).await
    }
}

impl<N: ProfileNormalizer> FederationFlow<N> {
    /// Create a flow using the vendor id as alias and default client settings.
    pub fn new(normalizer: N) -> Self {
        let client = OAuth2Client::new(normalizer.provider_id());
        Self { client, normalizer }
    }

    /// Create a flow with an explicitly configured client.
    pub fn with_client(client: OAuth2Client, normalizer: N) -> Self {
        Self { client, normalizer }
    }

    /// The OAuth2 client half of this flow.
    pub fn client(&self) -> &OAuth2Client {
        &self.client
    }

    /// The vendor's static configuration.
    pub fn vendor_config(&self) -> &ProviderConfig {
        self.normalizer.vendor_config()
    }

    /// Scopes to request when the broker does not configure any.
    pub fn default_scopes(&self) -> Vec<String> {
        self.vendor_config()
            .default_scopes()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Endpoint used to validate externally issued access tokens.
    pub fn profile_endpoint_for_validation(&self) -> String {
        self.normalizer.profile_endpoint_for_validation()
    }

    /// Completes a federation attempt from the token endpoint's response body.
    ///
    /// The access token is attached to the identity's context data under
    /// [`FEDERATED_ACCESS_TOKEN`]. Any failure ends the attempt; nothing is retried.
    pub async fn federate(
        &self,
        token_response: &str,
    ) -> Result<NormalizedIdentity, FederationError> {
        let response = TokenResponse::new(token_response);
        let access_token = match self.client.extract_access_token(&response) {
            Ok(token) => token,
            Err(e) => {
                log::error!("Federation via {} failed: {}", self.client.alias(), e);
                return Err(e);
            }
        };
        self.complete(&access_token, Some(&response)).await
    }

    /// Completes a federation attempt for an access token issued to another client.
    ///
    /// There is no token response to read piggy-backed data from, so vendors
    /// that deliver the email there yield an identity without email.
    pub async fn federate_access_token(
        &self,
        access_token: &str,
    ) -> Result<NormalizedIdentity, FederationError> {
        if access_token.is_empty() {
            return Err(FederationError::MissingToken {
                parameter: self.client.access_token_parameter().to_string(),
            });
        }
        self.complete(access_token, None).await
    }

    async fn complete(
        &self,
        access_token: &str,
        response: Option<&TokenResponse>,
    ) -> Result<NormalizedIdentity, FederationError> {
        let alias = self.client.alias();
        log::debug!("Fetching {} profile for {}", self.normalizer.provider_id(), alias);

        let result = match self
            .normalizer
            .fetch_profile(self.client.http(), access_token, response)
            .await
        {
            Ok(profile) => self.normalizer.normalize(alias, profile),
            Err(e) => Err(e),
        };

        match result {
            Ok(mut identity) => {
                identity
                    .context_data
                    .insert(FEDERATED_ACCESS_TOKEN.to_string(), access_token.to_string());
                log::debug!("Federated {} identity {}", alias, identity.identifier);
                Ok(identity)
            }
            Err(e) => {
                log::error!("Federation via {} failed: {}", alias, e);
                Err(e)
            }
        }
    }
}
