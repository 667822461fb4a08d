//! # VK Federation Example
//!
//! Federates a VKontakte token endpoint response and prints the normalized identity.
//!
//! The response body is taken from the first argument, or read from stdin:
//!
//! ```sh
//! cargo run --bin vk_federate -- 'access_token=533bacf01e1&user_id=42&email=a@b.com'
//! ```
//!
//! Environment (a `.env` file is honored):
//! - `VK_ALIAS`: alias the identity broker knows the provider as (default `vkontakte`)
//! - `VK_PROFILE_URL`: override the `users.get` endpoint
//! - `VK_API_VERSION`: override the API version
//! - `VK_TIMEOUT_SECS`: HTTP timeout for the profile request (default 10)

use fedbroker::flow::{Federation, FederationFlow, OAuth2Client};
use fedbroker::vk::{default_config, VkProvider, PROVIDER_ID};
use std::io::Read;
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let alias = std::env::var("VK_ALIAS").unwrap_or_else(|_| PROVIDER_ID.to_string());

    let mut config = default_config();
    if let Ok(url) = std::env::var("VK_PROFILE_URL") {
        config = config.with_profile_url(url);
    }
    if let Ok(version) = std::env::var("VK_API_VERSION") {
        config = config.with_api_version(version);
    }

    let timeout = std::env::var("VK_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .expect("Failed to build HTTP client");

    let client = OAuth2Client::new(alias.clone()).with_http_client(http);
    let federation = Federation::builder()
        .provider(FederationFlow::with_client(
            client,
            VkProvider::with_config(config),
        ))
        .build();

    let token_response = match std::env::args().nth(1) {
        Some(body) => body,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .expect("Failed to read token response from stdin");
            body.trim_end().to_string()
        }
    };

    match federation.federate(&alias, &token_response).await {
        Ok(identity) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&identity).expect("Identity is serializable")
            );
        }
        Err(e) => {
            eprintln!("Federation failed ({:?}): {}", e.kind(), e);
            std::process::exit(1);
        }
    }
}
