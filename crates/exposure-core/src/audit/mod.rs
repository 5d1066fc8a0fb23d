//! Core audit engine
//!
//! The ExposureAudit engine is responsible for:
//! - Detecting the server's public IP via IpEcho
//! - Scanning A records for the domain and its candidate labels
//! - Evaluating each record against the server IP
//! - Assembling the AuditReport
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐      ┌──────────────────┐      ┌──────────────┐
//! │   IpEcho    │─────▶│  ExposureAudit   │◀────▶│RecordResolver│
//! └─────────────┘      └──────────────────┘      └──────────────┘
//!                               │
//!                     ┌─────────┴─────────┐
//!                     ▼                   ▼
//!              ┌─────────────┐     ┌─────────────┐
//!              │ evaluate()  │     │   Events    │
//!              └─────────────┘     └─────────────┘
//! ```
//!
//! The flow is strictly linear with a single branch (secure vs. exposed):
//! a failed IP detection is terminal and no DNS query is issued after it.
//! Queries run sequentially in candidate order so the result sequence is
//! deterministic and a rescan of an unchanged zone is identical.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AuditConfig;
use crate::error::Result;
use crate::evaluate::{DnsRecord, evaluate};
use crate::ipv4::DottedQuad;
use crate::report::{AuditReport, AuditStatus};
use crate::traits::{IpEcho, RecordResolver};

/// Events emitted by the audit engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// Audit started
    Started {
        domain: String,
        candidates: usize,
    },

    /// Server public IP detected
    ServerIpDetected {
        ip: DottedQuad,
    },

    /// One candidate name queried
    HostScanned {
        hostname: String,
        addresses: usize,
    },

    /// Audit finished
    Completed {
        status: AuditStatus,
        exposed: usize,
    },
}

/// Core audit engine
///
/// Orchestrates the detect → scan → evaluate flow for one invocation.
/// Nothing is persisted; running the same engine twice against an
/// unchanged zone produces identical reports.
///
/// ## Lifecycle
///
/// 1. Create with [`ExposureAudit::new()`]
/// 2. Run once (or more) with [`ExposureAudit::run()`]
/// 3. Drop; the event channel closes with it
pub struct ExposureAudit {
    /// Public-IP detection backend
    ip_echo: Box<dyn IpEcho>,

    /// A-record resolution backend
    resolver: Box<dyn RecordResolver>,

    /// Audit configuration
    config: AuditConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<AuditEvent>,
}

impl ExposureAudit {
    /// Create a new audit engine
    ///
    /// # Parameters
    ///
    /// - `ip_echo`: public-IP detection implementation
    /// - `resolver`: A-record resolution implementation
    /// - `config`: audit configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// progress events
    pub fn new(
        ip_echo: Box<dyn IpEcho>,
        resolver: Box<dyn RecordResolver>,
        config: AuditConfig,
    ) -> Result<(Self, mpsc::Receiver<AuditEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let audit = Self {
            ip_echo,
            resolver,
            config,
            event_tx: tx,
        };

        Ok((audit, rx))
    }

    /// Fully-qualified name for a candidate label ("" means the bare domain)
    pub fn fqdn_for(label: &str, domain: &str) -> String {
        if label.is_empty() {
            domain.to_string()
        } else {
            format!("{label}.{domain}")
        }
    }

    /// Run the audit once
    ///
    /// # Returns
    ///
    /// - `Ok(AuditReport)`: the audit completed (secure or exposed)
    /// - `Err(Error)`: a fatal precondition failed (no public IP, DNS
    ///   query failure)
    pub async fn run(&self) -> Result<AuditReport> {
        self.emit_event(AuditEvent::Started {
            domain: self.config.domain.clone(),
            candidates: self.config.subdomains.len(),
        });

        // Public IP first; failure here is terminal before any DNS work
        let server_ip = self.ip_echo.detect().await?;
        info!(
            "Server public IP ({}): {}",
            self.ip_echo.source_name(),
            server_ip
        );
        self.emit_event(AuditEvent::ServerIpDetected { ip: server_ip });

        let mut records = Vec::new();
        let mut scanned = 0usize;
        for label in &self.config.subdomains {
            let fqdn = Self::fqdn_for(label, &self.config.domain);
            let addresses = self.resolver.lookup_a(&fqdn).await?;
            scanned += 1;
            debug!("{}: {} A record(s)", fqdn, addresses.len());
            self.emit_event(AuditEvent::HostScanned {
                hostname: fqdn.clone(),
                addresses: addresses.len(),
            });
            for ip in addresses {
                records.push(DnsRecord::new(fqdn.clone(), ip));
            }
        }

        let results = evaluate(&records, server_ip);
        let report = AuditReport::new(self.config.domain.clone(), server_ip, scanned, results);

        self.emit_event(AuditEvent::Completed {
            status: report.status,
            exposed: report.exposed().count(),
        });

        Ok(report)
    }

    /// Emit a progress event
    fn emit_event(&self, event: AuditEvent) {
        // A full channel means the consumer stopped listening; drop rather
        // than block the audit
        if self.event_tx.try_send(event).is_err() {
            warn!("Audit event channel full, dropping event");
        }
    }
}
