//! Public address discovery over HTTP.
//!
//! Providers are tried in sequence with a short per-request timeout; the
//! first plausible IPv4-shaped response wins. Every failure mode degrades to
//! `None` — the caller falls back to the `localhost` sentinel and the run
//! continues.

use std::net::Ipv4Addr;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::ports::AddressLookup;

const LOOKUP_TIMEOUT_SECS: u64 = 5;

const DEFAULT_PROVIDERS: [&str; 4] = [
    "https://api.ipify.org",
    "https://ipinfo.io/ip",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
];

/// HTTP-backed [`AddressLookup`] with sequential provider fallback.
#[derive(Debug, Clone)]
pub struct HttpAddressLookup {
    providers: Vec<Url>,
}

impl HttpAddressLookup {
    pub fn new() -> Self {
        let providers = DEFAULT_PROVIDERS
            .iter()
            .map(|provider| Url::parse(provider).expect("valid provider URL"))
            .collect();
        Self { providers }
    }

    /// Override the provider list (used by tests against a local server).
    pub fn with_providers(providers: Vec<Url>) -> Self {
        Self { providers }
    }
}

impl Default for HttpAddressLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressLookup for HttpAddressLookup {
    fn public_address(&self) -> Option<String> {
        let client =
            Client::builder().timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS)).build().ok()?;

        for provider in &self.providers {
            let Ok(response) = client.get(provider.clone()).send() else {
                continue;
            };
            if !response.status().is_success() {
                continue;
            }
            let Ok(body) = response.text() else {
                continue;
            };
            let candidate = body.trim();
            if candidate.parse::<Ipv4Addr>().is_ok() {
                return Some(candidate.to_string());
            }
        }
        None
    }
}
