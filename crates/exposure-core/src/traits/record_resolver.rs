// # Record Resolver Trait
//
// Defines the interface for querying A records for a fully-qualified name.
//
// ## Implementations
//
// - System resolver (hickory): `exposure-dns-hickory` crate
// - Test doubles: scripted zones in the contract test suites

use async_trait::async_trait;

use crate::ipv4::DottedQuad;

/// Trait for A-record resolution implementations
///
/// # Absence is not an error
///
/// A name with no A records yields an empty vector. For a tunnel-only
/// host that is the desired end state (CNAME-only), so implementations
/// must map "no records found" to `Ok(vec![])` and reserve errors for
/// genuine query failures (timeouts, servfail, no resolver at all).
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Look up the IPv4 A records for a fully-qualified name
    ///
    /// # Returns
    ///
    /// - `Ok(addresses)`: zero or more resolved addresses
    /// - `Err(Error)`: the query itself failed
    async fn lookup_a(&self, fqdn: &str) -> Result<Vec<DottedQuad>, crate::Error>;

    /// Name of the resolver backend (for logging)
    fn resolver_name(&self) -> &'static str;
}

/// Helper trait for constructing resolvers from configuration
pub trait RecordResolverFactory: Send + Sync {
    /// Create a RecordResolver instance from configuration
    fn create(
        &self,
        config: &crate::config::ResolverConfig,
    ) -> Result<Box<dyn RecordResolver>, crate::Error>;
}
