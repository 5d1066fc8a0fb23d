// # IP Echo Trait
//
// Defines the interface for detecting the server's public IPv4 address.
//
// ## Implementations
//
// - HTTP echo services: `exposure-ip-http` crate
// - Test doubles: fixed/failing fakes in the contract test suites
//
// ## Usage
//
// ```rust,ignore
// use exposure_core::IpEcho;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let echo = /* IpEcho implementation */;
//     let server_ip = echo.detect().await?;
//     println!("public address: {server_ip}");
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::ipv4::DottedQuad;

/// Trait for public-IP detection implementations
///
/// One call to `detect()` is one pass over the implementation's candidate
/// set (e.g. an ordered endpoint list). Implementations must not retry
/// after reporting failure; the audit treats a failed detection as
/// terminal and issues no DNS queries afterwards.
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait IpEcho: Send + Sync {
    /// Detect the server's public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(DottedQuad)`: the first syntactically valid IPv4 answer
    /// - `Err(Error)`: every candidate failed or answered garbage
    async fn detect(&self) -> Result<DottedQuad, crate::Error>;

    /// Name of the echo source (for logging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing echo sources from configuration
pub trait IpEchoFactory: Send + Sync {
    /// Create an IpEcho instance from configuration
    fn create(
        &self,
        config: &crate::config::IpEchoConfig,
    ) -> Result<Box<dyn IpEcho>, crate::Error>;
}
