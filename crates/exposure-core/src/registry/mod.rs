//! Plugin-based source registry
//!
//! The registry allows echo sources and record resolvers to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use exposure_core::registry::SourceRegistry;
//! use exposure_core::config::IpEchoConfig;
//!
//! let registry = SourceRegistry::new();
//! exposure_ip_http::register(&registry);
//!
//! let config = IpEchoConfig::default();
//! let echo = registry.create_ip_echo(&config)?;
//! ```
//!
//! ## Registration
//!
//! Backend crates should register themselves during initialization via a
//! `register(&registry)` function.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::{IpEchoConfig, ResolverConfig};
use crate::error::{Error, Result};
use crate::traits::{IpEcho, IpEchoFactory, RecordResolver, RecordResolverFactory};

/// Registry for plugin-based backend creation
///
/// Maintains maps of type names to factory objects, allowing dynamic
/// instantiation of backends based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct SourceRegistry {
    /// Registered echo source factories
    ip_echo: RwLock<HashMap<String, Box<dyn IpEchoFactory>>>,

    /// Registered record resolver factories
    resolvers: RwLock<HashMap<String, Box<dyn RecordResolverFactory>>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an echo source factory
    ///
    /// # Parameters
    ///
    /// - `name`: Echo source type name (e.g., "http")
    /// - `factory`: Factory object for creating echo source instances
    pub fn register_ip_echo(&self, name: impl Into<String>, factory: Box<dyn IpEchoFactory>) {
        let name = name.into();
        let mut sources = self.ip_echo.write().unwrap();
        sources.insert(name, factory);
    }

    /// Register a record resolver factory
    ///
    /// # Parameters
    ///
    /// - `name`: Resolver type name (e.g., "system")
    /// - `factory`: Factory object for creating resolver instances
    pub fn register_resolver(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RecordResolverFactory>,
    ) {
        let name = name.into();
        let mut resolvers = self.resolvers.write().unwrap();
        resolvers.insert(name, factory);
    }

    /// Create an echo source from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn IpEcho>)`: created echo source instance
    /// - `Err(Error)`: type not registered or creation failed
    pub fn create_ip_echo(&self, config: &IpEchoConfig) -> Result<Box<dyn IpEcho>> {
        let source_type = config.type_name();
        let sources = self.ip_echo.read().unwrap();

        let factory = sources
            .get(source_type)
            .ok_or_else(|| Error::configuration(format!("Unknown IP echo type: {source_type}")))?;

        factory.create(config)
    }

    /// Create a record resolver from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RecordResolver>)`: created resolver instance
    /// - `Err(Error)`: type not registered or creation failed
    pub fn create_resolver(&self, config: &ResolverConfig) -> Result<Box<dyn RecordResolver>> {
        let resolver_type = config.type_name();
        let resolvers = self.resolvers.read().unwrap();

        let factory = resolvers.get(resolver_type).ok_or_else(|| {
            Error::configuration(format!("Unknown resolver type: {resolver_type}"))
        })?;

        factory.create(config)
    }

    /// List all registered echo source types
    pub fn list_ip_echo(&self) -> Vec<String> {
        let sources = self.ip_echo.read().unwrap();
        sources.keys().cloned().collect()
    }

    /// List all registered resolver types
    pub fn list_resolvers(&self) -> Vec<String> {
        let resolvers = self.resolvers.read().unwrap();
        resolvers.keys().cloned().collect()
    }

    /// Check if an echo source type is registered
    pub fn has_ip_echo(&self, name: &str) -> bool {
        let sources = self.ip_echo.read().unwrap();
        sources.contains_key(name)
    }

    /// Check if a resolver type is registered
    pub fn has_resolver(&self, name: &str) -> bool {
        let resolvers = self.resolvers.read().unwrap();
        resolvers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockEchoFactory;

    impl IpEchoFactory for MockEchoFactory {
        fn create(&self, _config: &IpEchoConfig) -> Result<Box<dyn IpEcho>> {
            Err(Error::not_found("Mock echo source not implemented"))
        }
    }

    #[test]
    fn registration_round_trip() {
        let registry = SourceRegistry::new();

        // Initially empty
        assert!(!registry.has_ip_echo("mock"));

        // Register
        registry.register_ip_echo("mock", Box::new(MockEchoFactory));

        // Now present
        assert!(registry.has_ip_echo("mock"));
        assert!(registry.list_ip_echo().contains(&"mock".to_string()));
    }

    #[test]
    fn unknown_type_is_a_configuration_error() {
        let registry = SourceRegistry::new();
        let err = match registry.create_resolver(&ResolverConfig::System) {
            Ok(_) => panic!("expected create_resolver to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::Configuration(_)));
    }
}
