//! Configuration types for the exposure audit
//!
//! This module defines all configuration structures used throughout the
//! crate. The candidate lists (echo endpoints, subdomain labels) are
//! ordered and overridable so tests can inject fakes instead of hitting
//! real network endpoints.

use serde::{Deserialize, Serialize};

/// Candidate labels probed in addition to the bare domain.
///
/// The empty label means the bare domain itself. Order is scan order.
pub const DEFAULT_SUBDOMAINS: &[&str] =
    &["", "www", "ssh", "dev", "staging", "prod", "api", "app"];

/// Default IP echo services, queried in order until one answers.
pub const DEFAULT_ECHO_URLS: &[&str] = &[
    "https://api.ipify.org",  // returns plain text IP
    "https://ifconfig.me/ip", // no rate limit documented
    "https://icanhazip.com",  // no rate limit documented
];

/// Default per-endpoint timeout for echo probes.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// Main audit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Domain under audit (already resolved by the caller)
    pub domain: String,

    /// Ordered candidate labels; the empty string is the bare domain
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,

    /// Public-IP detection configuration
    #[serde(default)]
    pub ip_echo: IpEchoConfig,

    /// Record resolution configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Report rendering configuration
    #[serde(default)]
    pub report: ReportConfig,

    /// Capacity of the audit event channel
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl AuditConfig {
    /// Create a configuration with defaults for everything but the domain
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            subdomains: default_subdomains(),
            ip_echo: IpEchoConfig::default(),
            resolver: ResolverConfig::default(),
            report: ReportConfig::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::configuration("No domain configured"));
        }
        if self.subdomains.is_empty() {
            return Err(crate::Error::configuration(
                "Candidate label list cannot be empty (the empty label means the bare domain)",
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::configuration(
                "Event channel capacity must be > 0",
            ));
        }

        self.ip_echo.validate()?;
        self.resolver.validate()?;

        Ok(())
    }
}

/// Public-IP detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpEchoConfig {
    /// HTTP echo services, queried in order; first valid answer wins
    Http {
        /// Echo endpoint URLs, in fallback order
        urls: Vec<String>,
        /// Per-endpoint timeout in seconds
        timeout_secs: u64,
    },

    /// Custom echo source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl IpEchoConfig {
    /// Validate the echo configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            IpEchoConfig::Http { urls, timeout_secs } => {
                if urls.is_empty() {
                    return Err(crate::Error::configuration(
                        "HTTP IP echo needs at least one endpoint URL",
                    ));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::configuration(
                        "HTTP IP echo timeout must be > 0",
                    ));
                }
                Ok(())
            }
            IpEchoConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::configuration(
                        "Custom IP echo factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::configuration(
                        "Custom IP echo config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the echo source type name
    pub fn type_name(&self) -> &str {
        match self {
            IpEchoConfig::Http { .. } => "http",
            IpEchoConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for IpEchoConfig {
    fn default() -> Self {
        IpEchoConfig::Http {
            urls: DEFAULT_ECHO_URLS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

/// Record resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// In-process resolver built from the system configuration
    #[default]
    System,

    /// Custom resolver
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ResolverConfig::System => Ok(()),
            ResolverConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::configuration(
                        "Custom resolver factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::configuration(
                        "Custom resolver config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the resolver type name
    pub fn type_name(&self) -> &str {
        match self {
            ResolverConfig::System => "system",
            ResolverConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Report rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format for the final report
    #[serde(default)]
    pub format: ReportFormat,

    /// CNAME target suggested in remediation guidance
    #[serde(default = "default_tunnel_hostname")]
    pub tunnel_hostname: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            tunnel_hostname: default_tunnel_hostname(),
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// Machine-readable JSON (additive interface)
    Json,
}

fn default_subdomains() -> Vec<String> {
    DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect()
}

fn default_tunnel_hostname() -> String {
    // Placeholder until the operator supplies their tunnel hostname
    "<tunnel-id>.cfargotunnel.com".to_string()
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scan_bare_domain_first() {
        let config = AuditConfig::new("example.com");
        assert_eq!(config.subdomains[0], "");
        assert_eq!(config.subdomains.len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_domain_is_rejected() {
        let config = AuditConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn echo_config_requires_endpoints() {
        let config = IpEchoConfig::Http {
            urls: Vec::new(),
            timeout_secs: 3,
        };
        assert!(config.validate().is_err());

        let config = IpEchoConfig::Http {
            urls: vec!["https://api.ipify.org".to_string()],
            timeout_secs: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn type_names_route_to_factories() {
        assert_eq!(IpEchoConfig::default().type_name(), "http");
        assert_eq!(ResolverConfig::System.type_name(), "system");
        let custom = ResolverConfig::Custom {
            factory: "scripted".to_string(),
            config: serde_json::json!({}),
        };
        assert_eq!(custom.type_name(), "scripted");
    }
}
