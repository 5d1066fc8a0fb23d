//! Minimal embedding example for exposure-core
//!
//! Demonstrates using the audit engine as a library with in-code
//! backends instead of the HTTP/DNS ones: a canned public IP and a
//! scripted zone. Useful as a template for wiring custom sources.

use std::collections::HashMap;

use exposure_core::config::AuditConfig;
use exposure_core::traits::{IpEcho, RecordResolver};
use exposure_core::{DottedQuad, ExposureAudit, Result};

/// Echo source with a canned answer
struct CannedIpEcho {
    ip: DottedQuad,
}

#[async_trait::async_trait]
impl IpEcho for CannedIpEcho {
    async fn detect(&self) -> Result<DottedQuad> {
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "canned"
    }
}

/// Resolver answering from an in-memory zone
struct InMemoryZone {
    records: HashMap<String, Vec<DottedQuad>>,
}

#[async_trait::async_trait]
impl RecordResolver for InMemoryZone {
    async fn lookup_a(&self, fqdn: &str) -> Result<Vec<DottedQuad>> {
        Ok(self.records.get(fqdn).cloned().unwrap_or_default())
    }

    fn resolver_name(&self) -> &'static str {
        "in-memory"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let server_ip = DottedQuad::parse("198.51.100.4")?;

    // The bare domain still points at the origin; www is proxied
    let mut records = HashMap::new();
    records.insert("demo.example".to_string(), vec![server_ip]);
    records.insert(
        "www.demo.example".to_string(),
        vec![DottedQuad::parse("104.16.0.1")?],
    );

    let (audit, mut events) = ExposureAudit::new(
        Box::new(CannedIpEcho { ip: server_ip }),
        Box::new(InMemoryZone { records }),
        AuditConfig::new("demo.example"),
    )?;

    let report = audit.run().await?;
    drop(audit);

    while let Some(event) = events.recv().await {
        tracing::info!(?event, "audit event");
    }

    print!("{}", report.render_text("demo-tunnel.cfargotunnel.com"));
    std::process::exit(report.status.exit_code() as i32);
}
