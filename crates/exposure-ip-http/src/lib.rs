// # HTTP IP Echo
//
// This crate provides the HTTP-based public-IP detection backend for the
// exposure audit.
//
// ## Behavior
//
// One call to `detect()` walks an ordered list of IP-echo services
// (e.g. api.ipify.org, icanhazip.com) with a short per-request timeout
// and accepts the first response body that is dotted-quad IPv4 syntax.
// First success wins; exhausting the list is a Network error. There are
// no retries beyond the list fallback.
//
// ## Acceptance is syntax-only
//
// The body check is the lax dotted-quad rule (four 1-3 digit groups, no
// range check). An endpoint answering `999.999.999.999` is accepted;
// an endpoint answering HTML or an IPv6 address moves the walk to the
// next endpoint.

use std::time::Duration;

use exposure_core::SourceRegistry;
use exposure_core::config::IpEchoConfig;
use exposure_core::traits::{IpEcho, IpEchoFactory};
use exposure_core::{DottedQuad, Error, Result};

/// HTTP-based echo source
pub struct HttpIpEcho {
    /// Echo endpoint URLs, in fallback order
    urls: Vec<String>,

    /// HTTP client (carries the per-request timeout)
    client: reqwest::Client,
}

impl HttpIpEcho {
    /// Create a new HTTP echo source
    ///
    /// # Parameters
    ///
    /// - `urls`: endpoint URLs, queried in order
    /// - `timeout`: per-request timeout
    pub fn new(urls: Vec<String>, timeout: Duration) -> Self {
        Self {
            urls,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Probe a single endpoint
    ///
    /// Any transport error, non-2xx status, or non-dotted-quad body just
    /// moves the caller on to the next endpoint.
    async fn probe(&self, url: &str) -> Result<DottedQuad> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("{url}: request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("{url}: HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("{url}: failed to read response: {e}")))?;

        parse_echo_body(&body)
    }
}

/// Parse an IP-echo response body: trimmed, dotted-quad syntax only.
pub fn parse_echo_body(body: &str) -> Result<DottedQuad> {
    DottedQuad::parse(body)
}

#[async_trait::async_trait]
impl IpEcho for HttpIpEcho {
    async fn detect(&self) -> Result<DottedQuad> {
        for url in &self.urls {
            match self.probe(url).await {
                Ok(ip) => {
                    tracing::debug!("IP echo {} answered {}", url, ip);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("IP echo endpoint failed: {}", e);
                }
            }
        }

        Err(Error::network(format!(
            "could not determine the server's public IP: all {} echo endpoint(s) failed",
            self.urls.len()
        )))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP echo sources
pub struct HttpEchoFactory;

impl IpEchoFactory for HttpEchoFactory {
    fn create(&self, config: &IpEchoConfig) -> Result<Box<dyn IpEcho>> {
        match config {
            IpEchoConfig::Http { urls, timeout_secs } => Ok(Box::new(HttpIpEcho::new(
                urls.clone(),
                Duration::from_secs(*timeout_secs),
            ))),
            _ => Err(Error::configuration("Invalid config for HTTP IP echo")),
        }
    }
}

/// Register the HTTP echo source with a registry
pub fn register(registry: &SourceRegistry) {
    registry.register_ip_echo("http", Box::new(HttpEchoFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creation() {
        let factory = HttpEchoFactory;

        let config = IpEchoConfig::Http {
            urls: vec!["https://api.ipify.org".to_string()],
            timeout_secs: 3,
        };

        let source = factory.create(&config);
        assert!(source.is_ok());
    }

    #[test]
    fn test_factory_rejects_custom_config() {
        let factory = HttpEchoFactory;

        let config = IpEchoConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({}),
        };

        assert!(factory.create(&config).is_err());
    }

    #[test]
    fn echo_body_acceptance() {
        assert!(parse_echo_body("203.0.113.9\n").is_ok());
        // Syntax-only by design
        assert!(parse_echo_body("999.999.999.999").is_ok());
        assert!(parse_echo_body("<html>rate limited</html>").is_err());
        assert!(parse_echo_body("2001:db8::1").is_err());
        assert!(parse_echo_body("").is_err());
    }
}
