//! Exposure evaluation
//!
//! Pure classification of scanned records against the detected server
//! address. No network, no side effects; scan order is preserved.

use serde::Serialize;

use crate::ipv4::DottedQuad;

/// A single resolved A record, produced transiently per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    /// Fully-qualified name the record was found on
    pub hostname: String,
    /// Resolved IPv4 address (dotted-quad syntax by construction)
    pub resolved_ip: DottedQuad,
}

impl DnsRecord {
    pub fn new(hostname: impl Into<String>, resolved_ip: DottedQuad) -> Self {
        Self {
            hostname: hostname.into(),
            resolved_ip,
        }
    }
}

/// Evaluation outcome for one record, in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposureResult {
    pub hostname: String,
    pub resolved_ip: DottedQuad,
    /// True exactly when the record resolves to the server address
    pub is_exposed: bool,
}

/// Classify each record against the server address.
///
/// A record is exposed iff its resolved address equals the server address
/// (equality on the canonical dotted-quad form). Empty input yields empty
/// output, which callers treat as secure-but-informational rather than
/// "checked and clean".
pub fn evaluate(records: &[DnsRecord], server_ip: DottedQuad) -> Vec<ExposureResult> {
    records
        .iter()
        .map(|record| ExposureResult {
            hostname: record.hostname.clone(),
            resolved_ip: record.resolved_ip,
            is_exposed: record.resolved_ip == server_ip,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(s: &str) -> DottedQuad {
        DottedQuad::parse(s).expect("test address")
    }

    #[test]
    fn marks_exactly_the_matching_records() {
        let server = quad("1.2.3.4");
        let records = vec![
            DnsRecord::new("example.com", quad("1.2.3.4")),
            DnsRecord::new("www.example.com", quad("5.6.7.8")),
            DnsRecord::new("api.example.com", quad("1.2.3.4")),
        ];

        let results = evaluate(&records, server);
        let exposed = results.iter().filter(|r| r.is_exposed).count();
        let matching = records.iter().filter(|r| r.resolved_ip == server).count();

        assert_eq!(exposed, matching);
        assert!(results[0].is_exposed);
        assert!(!results[1].is_exposed);
        assert!(results[2].is_exposed);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let results = evaluate(&[], quad("9.9.9.9"));
        assert!(results.is_empty());
    }

    #[test]
    fn preserves_scan_order() {
        let records = vec![
            DnsRecord::new("b.example.com", quad("2.2.2.2")),
            DnsRecord::new("a.example.com", quad("1.1.1.1")),
        ];
        let results = evaluate(&records, quad("3.3.3.3"));
        assert_eq!(results[0].hostname, "b.example.com");
        assert_eq!(results[1].hostname, "a.example.com");
    }

    #[test]
    fn canonical_form_equality() {
        // Leading zeros do not hide an exposed record
        let records = vec![DnsRecord::new("example.com", quad("01.2.3.04"))];
        let results = evaluate(&records, quad("1.2.3.4"));
        assert!(results[0].is_exposed);
    }
}
