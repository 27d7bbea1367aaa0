//! Network Configuration
//!
//! Holds the RPC endpoint for each selectable cluster plus request
//! timeouts. Custom endpoints are validated before use:
//! - URL format
//! - HTTPS required for anything but local development hosts
//! - Warnings for unknown providers, raw IPs and embedded credentials

use crate::error::{AssetsError, AssetsResult};
use crate::types::Network;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub const ENV_DEVNET_RPC: &str = "WALLET_ASSETS_DEVNET_RPC";
pub const ENV_MAINNET_RPC: &str = "WALLET_ASSETS_MAINNET_RPC";
pub const ENV_TIMEOUT_SECS: &str = "WALLET_ASSETS_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Providers that do not trigger an "unknown provider" warning
const KNOWN_PROVIDER_DOMAINS: &[&str] = &[
    "solana.com",
    "publicnode.com",
    "helius-rpc.com",
    "quiknode.pro",
    "triton.one",
    "ankr.com",
    "alchemy.com",
    "chainstack.com",
];

/// Validation result for an RPC endpoint
#[derive(Debug, Clone)]
pub struct EndpointValidation {
    pub is_valid: bool,
    pub url: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Endpoint and timeout configuration
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    custom_endpoints: HashMap<Network, String>,
    request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self {
            custom_endpoints: HashMap::new(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Defaults overridden by `WALLET_ASSETS_*` environment variables
    pub fn from_env() -> AssetsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> AssetsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        for (network, key) in [
            (Network::Devnet, ENV_DEVNET_RPC),
            (Network::MainnetBeta, ENV_MAINNET_RPC),
        ] {
            if let Some(url) = lookup(key).filter(|v| !v.trim().is_empty()) {
                config
                    .set_endpoint(network, url.trim())
                    .map_err(|e| e.with_details(key))?;
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AssetsError::invalid_input(format!("Invalid timeout: {}", raw))
                    .with_details(ENV_TIMEOUT_SECS)
            })?;
            config.set_request_timeout(Duration::from_secs(secs))?;
        }

        Ok(config)
    }

    /// Endpoint used for `network`
    pub fn endpoint(&self, network: Network) -> &str {
        self.custom_endpoints
            .get(&network)
            .map(String::as_str)
            .unwrap_or_else(|| network.default_endpoint())
    }

    pub fn is_custom(&self, network: Network) -> bool {
        self.custom_endpoints.contains_key(&network)
    }

    /// Override the endpoint for `network` after validating it
    pub fn set_endpoint(&mut self, network: Network, url: &str) -> AssetsResult<EndpointValidation> {
        let validation = validate_endpoint(url);

        match validation.url.clone() {
            Some(normalized) if validation.is_valid => {
                self.custom_endpoints.insert(network, normalized);
                Ok(validation)
            }
            _ => Err(AssetsError::invalid_endpoint(format!(
                "Rejected endpoint for {}: {}",
                network,
                validation.errors.join("; ")
            ))),
        }
    }

    pub fn clear_endpoint(&mut self, network: Network) {
        self.custom_endpoints.remove(&network);
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn set_request_timeout(&mut self, timeout: Duration) -> AssetsResult<()> {
        if timeout.is_zero() {
            return Err(AssetsError::invalid_input("Timeout must be greater than zero"));
        }
        self.request_timeout = timeout;
        Ok(())
    }
}

/// Validate an RPC endpoint URL
pub fn validate_endpoint(url: &str) -> EndpointValidation {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            errors.push(format!("Invalid URL format: {}", e));
            return EndpointValidation {
                is_valid: false,
                url: None,
                warnings,
                errors,
            };
        }
    };

    let host = parsed.host_str().unwrap_or_default().to_string();
    if host.is_empty() {
        errors.push("URL has no host".to_string());
    }

    match parsed.scheme() {
        "https" => {}
        "http" => {
            if is_local_host(&host) {
                warnings.push("HTTP allowed for local development only".to_string());
            } else {
                errors.push("HTTPS required for remote endpoints".to_string());
            }
        }
        other => errors.push(format!("Unsupported URL scheme: {}", other)),
    }

    if !host.is_empty() && !is_local_host(&host) {
        let known = KNOWN_PROVIDER_DOMAINS
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)));
        if !known {
            warnings.push(format!(
                "Domain '{}' is not in the known provider list. Ensure you trust this endpoint.",
                host
            ));
        }

        if matches!(parsed.host(), Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_))) {
            warnings.push("Using IP address instead of domain name".to_string());
        }
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        warnings.push("Credentials in URL - consider using headers for authentication".to_string());
    }

    if let Some(query) = parsed.query() {
        let lower = query.to_lowercase();
        if lower.contains("api-key") || lower.contains("apikey") || lower.contains("api_key") {
            warnings.push("API key in URL query string - it is redacted from logs".to_string());
        }
    }

    let is_valid = errors.is_empty();
    EndpointValidation {
        is_valid,
        url: if is_valid { Some(parsed.to_string()) } else { None },
        warnings,
        errors,
    }
}

fn is_local_host(host: &str) -> bool {
    host == "localhost"
        || host == "127.0.0.1"
        || host == "[::1]"
        || host.starts_with("192.168.")
        || host.starts_with("10.")
}
