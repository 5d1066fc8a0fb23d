//! Audit Contract Test: Event Ordering
//!
//! Verifies that the engine reports progress in pipeline order:
//! Started, then the detected IP, then one HostScanned per candidate,
//! then Completed. Consumers (logging, UIs) rely on this ordering.

mod common;

use common::*;
use exposure_core::{AuditEvent, AuditStatus, DottedQuad, ExposureAudit};

#[tokio::test]
async fn events_follow_pipeline_order() {
    let resolver = ScriptedResolver::new().with_record("example.com", &["192.0.2.1"]);

    let (audit, mut events) = ExposureAudit::new(
        Box::new(FixedIpEcho::new("192.0.2.1")),
        Box::new(resolver),
        minimal_config("example.com"),
    )
    .expect("engine construction succeeds");

    audit.run().await.expect("audit succeeds");
    drop(audit); // close the channel so the drain below terminates

    let mut collected = Vec::new();
    while let Some(event) = events.recv().await {
        collected.push(event);
    }

    // Started + ServerIpDetected + 8 HostScanned + Completed
    assert_eq!(collected.len(), 11);

    assert!(matches!(
        collected[0],
        AuditEvent::Started { ref domain, candidates: 8 } if domain == "example.com"
    ));
    assert_eq!(
        collected[1],
        AuditEvent::ServerIpDetected {
            ip: DottedQuad::parse("192.0.2.1").unwrap()
        }
    );
    assert!(matches!(
        collected[2],
        AuditEvent::HostScanned { ref hostname, addresses: 1 } if hostname == "example.com"
    ));
    assert!(matches!(
        collected[10],
        AuditEvent::Completed {
            status: AuditStatus::Exposed,
            exposed: 1
        }
    ));
}
