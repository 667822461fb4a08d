//! # Fedbroker
//!
//! Turns the response of a completed OAuth2 token exchange into a provider-agnostic
//! [`NormalizedIdentity`] for an external identity broker.
//!
//! ```no_run
//! # #[cfg(all(feature = "flow", feature = "vk"))]
//! # async fn run() -> Result<(), fedbroker::FederationError> {
//! use fedbroker::flow::{Federation, FederationFlow};
//! use fedbroker::vk::VkProvider;
//!
//! let federation = Federation::builder()
//!     .provider(FederationFlow::new(VkProvider::new()))
//!     .build();
//!
//! let identity = federation
//!     .federate("vkontakte", "access_token=533bacf01e1&email=a@b.com")
//!     .await?;
//! println!("{} ({})", identity.display_name, identity.username);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub use fedbroker_core as core;
pub use fedbroker_core::{
    FederationError, FederationErrorKind, NormalizedIdentity, ProfileNormalizer, ProviderConfig,
    TokenResponse,
};

/// Federation flows and the provider registry.
#[cfg(feature = "flow")]
pub use fedbroker_flow as flow;

/// The VKontakte provider.
#[cfg(feature = "vk")]
pub use fedbroker_providers_vk as vk;
