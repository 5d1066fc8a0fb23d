// # Hickory Record Resolver
//
// In-process A-record resolution for the exposure audit, built on
// hickory-resolver and the host's resolver configuration.
//
// ## Behavior
//
// - `lookup_a` asks for A records only; a proxied/CNAME-only name that
//   chases to nothing yields an empty answer, which the audit treats as
//   the desired end state rather than an error
// - NXDOMAIN and "no records found" map to an empty answer
// - Real query failures (timeouts, SERVFAIL, transport) are Network errors
//
// ## Missing resolver configuration
//
// The resolver is built from /etc/resolv.conf (or the platform
// equivalent). If that configuration cannot be read there is no
// resolution capability at all, which surfaces as a DependencyMissing
// error; nothing is auto-installed.

use exposure_core::SourceRegistry;
use exposure_core::config::ResolverConfig;
use exposure_core::traits::{RecordResolver, RecordResolverFactory};
use exposure_core::{DottedQuad, Error, Result};

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::ResolveErrorKind;

/// Record resolver backed by the system DNS configuration
pub struct HickoryRecordResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryRecordResolver {
    /// Build a resolver from the system configuration
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(|e| {
            Error::dependency_missing(format!(
                "cannot initialize the system DNS resolver: {e}"
            ))
        })?;
        Ok(Self { resolver })
    }
}

#[async_trait::async_trait]
impl RecordResolver for HickoryRecordResolver {
    async fn lookup_a(&self, fqdn: &str) -> Result<Vec<DottedQuad>> {
        match self.resolver.ipv4_lookup(fqdn).await {
            Ok(lookup) => lookup
                .iter()
                .map(|a| DottedQuad::parse(&a.0.to_string()))
                .collect(),
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                tracing::debug!("{}: no A records", fqdn);
                Ok(Vec::new())
            }
            Err(e) => Err(Error::network(format!(
                "A record lookup failed for {fqdn}: {e}"
            ))),
        }
    }

    fn resolver_name(&self) -> &'static str {
        "hickory"
    }
}

/// Factory for creating system resolvers
pub struct SystemResolverFactory;

impl RecordResolverFactory for SystemResolverFactory {
    fn create(&self, config: &ResolverConfig) -> Result<Box<dyn RecordResolver>> {
        match config {
            ResolverConfig::System => Ok(Box::new(HickoryRecordResolver::from_system_conf()?)),
            _ => Err(Error::configuration("Invalid config for the system resolver")),
        }
    }
}

/// Register the system resolver with a registry
pub fn register(registry: &SourceRegistry) {
    registry.register_resolver("system", Box::new(SystemResolverFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_rejects_custom_config() {
        let factory = SystemResolverFactory;

        let config = ResolverConfig::Custom {
            factory: "scripted".to_string(),
            config: serde_json::json!({}),
        };

        assert!(factory.create(&config).is_err());
    }

    #[tokio::test]
    async fn construction_reports_missing_resolver_as_dependency() {
        // On hosts with a readable resolver configuration this succeeds;
        // anywhere else the failure must be the DependencyMissing kind.
        match HickoryRecordResolver::from_system_conf() {
            Ok(_) => {}
            Err(Error::DependencyMissing(_)) => {}
            Err(e) => panic!("unexpected error kind: {e}"),
        }
    }
}
