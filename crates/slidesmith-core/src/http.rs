//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Create the shared HTTP client used for both the generation call and the
/// image proxy fetches.
///
/// Config: 10s connect timeout, 120s request timeout (the generation call
/// dominates), `slidesmith/{version}` user-agent, redirect limit 10.
#[must_use]
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .user_agent(concat!("slidesmith/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("default HTTP client construction must not fail")
}
