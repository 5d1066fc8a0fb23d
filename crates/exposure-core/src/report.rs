//! Remediation reporting
//!
//! Presentation logic layered on the evaluator's output: overall status,
//! per-host CNAME guidance, and text rendering. Nothing here touches DNS
//! or infrastructure state; the output is guidance for a human to act on
//! in the Cloudflare dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::evaluate::ExposureResult;
use crate::ipv4::DottedQuad;

/// Overall audit outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Records were found and none resolves to the server address
    Secure,
    /// No A records at all: the desired CNAME-only end state, reported
    /// distinctly from "checked and clean"
    NoRecords,
    /// At least one record resolves directly to the server address
    Exposed,
}

impl AuditStatus {
    /// Derive the status from an evaluation result sequence
    pub fn of(results: &[ExposureResult]) -> Self {
        if results.is_empty() {
            AuditStatus::NoRecords
        } else if results.iter().any(|r| r.is_exposed) {
            AuditStatus::Exposed
        } else {
            AuditStatus::Secure
        }
    }

    /// Process exit code: only exposure is non-zero
    pub fn exit_code(self) -> u8 {
        match self {
            AuditStatus::Exposed => 1,
            AuditStatus::Secure | AuditStatus::NoRecords => 0,
        }
    }
}

/// Suggested CNAME label for a host: the subdomain part of the name, or
/// `@` when the host is the bare domain.
pub fn cname_label(hostname: &str, domain: &str) -> String {
    if hostname == domain {
        return "@".to_string();
    }
    match hostname
        .strip_suffix(domain)
        .and_then(|prefix| prefix.strip_suffix('.'))
    {
        Some(label) if !label.is_empty() => label.to_string(),
        // Host outside the domain; suggest it verbatim rather than guessing
        _ => hostname.to_string(),
    }
}

/// Complete result of one audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Domain under audit
    pub domain: String,
    /// Detected server public IPv4 address
    pub server_ip: DottedQuad,
    /// Number of names queried (records found may be fewer or more)
    pub scanned: usize,
    /// Per-record evaluation, in scan order
    pub results: Vec<ExposureResult>,
    /// Overall outcome
    pub status: AuditStatus,
    /// When the audit ran
    pub generated_at: DateTime<Utc>,
    /// Host firewall state, when the caller collected it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall: Option<String>,
}

impl AuditReport {
    pub fn new(
        domain: impl Into<String>,
        server_ip: DottedQuad,
        scanned: usize,
        results: Vec<ExposureResult>,
    ) -> Self {
        let status = AuditStatus::of(&results);
        Self {
            domain: domain.into(),
            server_ip,
            scanned,
            results,
            status,
            generated_at: Utc::now(),
            firewall: None,
        }
    }

    /// The exposed results, in scan order
    pub fn exposed(&self) -> impl Iterator<Item = &ExposureResult> {
        self.results.iter().filter(|r| r.is_exposed)
    }

    /// Render the human-readable report
    ///
    /// `tunnel_hostname` is the CNAME target suggested for exposed hosts.
    pub fn render_text(&self, tunnel_hostname: &str) -> String {
        let mut out = String::new();

        out.push_str(&format!("DNS exposure audit for {}\n", self.domain));
        out.push_str(&format!("Server public IP: {}\n", self.server_ip));
        out.push_str(&format!("Names scanned: {}\n\n", self.scanned));

        for result in &self.results {
            if result.is_exposed {
                out.push_str(&format!(
                    "  [EXPOSED] {} -> {} (matches the server IP)\n",
                    result.hostname, result.resolved_ip
                ));
            } else {
                out.push_str(&format!(
                    "  [ok]      {} -> {}\n",
                    result.hostname, result.resolved_ip
                ));
            }
        }

        match self.status {
            AuditStatus::NoRecords => {
                out.push_str(&format!(
                    "No A records found for {} or its common subdomains.\n\
                     Nothing resolves directly to this server; CNAME-only is the desired end state.\n",
                    self.domain
                ));
            }
            AuditStatus::Secure => {
                out.push_str(
                    "\nNo record resolves to the server IP. The origin address is not leaked via DNS.\n",
                );
            }
            AuditStatus::Exposed => {
                let exposed = self.exposed().count();
                out.push_str(&format!(
                    "\n{exposed} record(s) resolve directly to this server, bypassing the tunnel.\n\
                     Remediation (Cloudflare dashboard):\n"
                ));
                for result in self.exposed() {
                    let label = cname_label(&result.hostname, &self.domain);
                    out.push_str(&format!(
                        "  - delete the A record for \"{label}\" and add a proxied CNAME {label} -> {tunnel_hostname}\n"
                    ));
                }
            }
        }

        if let Some(firewall) = &self.firewall {
            out.push_str(&format!("\nFirewall: {firewall}\n"));
        }

        out
    }
}
