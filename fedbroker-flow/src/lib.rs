//! # Fedbroker Flow
//!
//! `fedbroker-flow` composes the generic OAuth2 client capability with vendor-specific
//! profile normalizers and exposes the result to an identity broker.
//!
//! ## Key Components
//!
//! - **[`OAuth2Client`]**: Provider alias, access token parameter and HTTP client.
//! - **[`FederationFlow`]**: Turns a token endpoint response into a [`NormalizedIdentity`].
//! - **[`Federation`]**: Registry of flows keyed by provider alias.
//! - **[`FederationBuilder`]**: A builder for configuring and creating a [`Federation`].

#![warn(missing_docs)]

pub use fedbroker_core::ErasedFederationFlow;
use fedbroker_core::{FederationError, NormalizedIdentity, ProfileNormalizer};

use std::collections::HashMap;
use std::sync::Arc;

/// The generic OAuth2 client capability.
pub mod client;
/// Client and normalizer composition.
pub mod oauth2;

pub use client::OAuth2Client;
pub use oauth2::FederationFlow;

/// Registry of federation flows keyed by provider alias.
///
/// Read-only once built; clones share the registered flows.
#[derive(Clone, Default)]
pub struct Federation {
    /// Map of registered flows.
    pub providers: HashMap<String, Arc<dyn ErasedFederationFlow>>,
}

impl Federation {
    /// Create a new [`FederationBuilder`].
    pub fn builder() -> FederationBuilder {
        FederationBuilder::default()
    }

    /// The flow registered under `alias`.
    pub fn provider(&self, alias: &str) -> Option<Arc<dyn ErasedFederationFlow>> {
        self.providers.get(alias).cloned()
    }

    /// Federate a token endpoint response through the flow registered under `alias`.
    pub async fn federate(
        &self,
        alias: &str,
        token_response: &str,
    ) -> Result<NormalizedIdentity, FederationError> {
        self.lookup(alias)?.federate(token_response).await
    }

    /// Federate an externally issued access token through the flow registered under `alias`.
    pub async fn federate_access_token(
        &self,
        alias: &str,
        access_token: &str,
    ) -> Result<NormalizedIdentity, FederationError> {
        self.lookup(alias)?.federate_access_token(access_token).await
    }

    fn lookup(&self, alias: &str) -> Result<&Arc<dyn ErasedFederationFlow>, FederationError> {
        self.providers
            .get(alias)
            .ok_or_else(|| FederationError::UnknownProvider(alias.to_string()))
    }
}

/// A builder for configuring and creating a [`Federation`].
#[derive(Default)]
pub struct FederationBuilder {
    providers: HashMap<String, Arc<dyn ErasedFederationFlow>>,
}

impl FederationBuilder {
    /// Register a flow under its client's alias. A later flow with the same alias replaces it.
    pub fn provider<N>(mut self, flow: FederationFlow<N>) -> Self
    where
        N: ProfileNormalizer + 'static,
    {
        let alias = flow.client().alias().to_string();
        self.providers.insert(alias, Arc::new(flow));
        self
    }

    /// Build the [`Federation`].
    pub fn build(self) -> Federation {
        Federation {
            providers: self.providers,
        }
    }
}
