//! Test doubles and common utilities for the audit contract tests
//!
//! These doubles exercise the audit engine without touching the network:
//! a fixed/failing echo source and a scripted DNS zone.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use exposure_core::config::AuditConfig;
use exposure_core::error::Result;
use exposure_core::traits::{IpEcho, RecordResolver};
use exposure_core::{DottedQuad, Error};

/// An echo source that always answers with a fixed address
pub struct FixedIpEcho {
    ip: DottedQuad,
    detect_call_count: Arc<AtomicUsize>,
}

impl FixedIpEcho {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: DottedQuad::parse(ip).expect("test address"),
            detect_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times detect() was called
    pub fn detect_call_count(&self) -> usize {
        self.detect_call_count.load(Ordering::SeqCst)
    }

    /// Create a FixedIpEcho that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            detect_call_count: Arc::clone(&other.detect_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpEcho for FixedIpEcho {
    async fn detect(&self) -> Result<DottedQuad> {
        self.detect_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An echo source that always fails, as when every endpoint is exhausted
pub struct FailingIpEcho;

#[async_trait::async_trait]
impl IpEcho for FailingIpEcho {
    async fn detect(&self) -> Result<DottedQuad> {
        Err(Error::network("all echo endpoints failed"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// A resolver answering from a scripted name → addresses table
///
/// Names absent from the table yield no records, mirroring the
/// CNAME-only end state.
pub struct ScriptedResolver {
    zone: HashMap<String, Vec<DottedQuad>>,
    lookup_call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            zone: HashMap::new(),
            lookup_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script one name's A records
    pub fn with_record(mut self, fqdn: &str, addresses: &[&str]) -> Self {
        let parsed = addresses
            .iter()
            .map(|a| DottedQuad::parse(a).expect("test address"))
            .collect();
        self.zone.insert(fqdn.to_string(), parsed);
        self
    }

    /// Number of times lookup_a() was called
    pub fn lookup_call_count(&self) -> usize {
        self.lookup_call_count.load(Ordering::SeqCst)
    }

    /// Create a ScriptedResolver that shares zone and counters with an
    /// existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zone: other.zone.clone(),
            lookup_call_count: Arc::clone(&other.lookup_call_count),
        }
    }
}

#[async_trait::async_trait]
impl RecordResolver for ScriptedResolver {
    async fn lookup_a(&self, fqdn: &str) -> Result<Vec<DottedQuad>> {
        self.lookup_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.zone.get(fqdn).cloned().unwrap_or_default())
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// Helper to create a minimal AuditConfig for testing
pub fn minimal_config(domain: &str) -> AuditConfig {
    AuditConfig::new(domain)
}
