//! Audit Contract Test: Remediation Guidance
//!
//! Verifies that the reporter derives the right CNAME labels, renders
//! actionable guidance for exposed hosts only, and drives the documented
//! exit codes.
//!
//! If this test fails, operators get wrong or missing fix-it steps.

mod common;

use common::*;
use exposure_core::{AuditStatus, ExposureAudit, cname_label};

#[test]
fn label_derivation() {
    assert_eq!(cname_label("www.example.com", "example.com"), "www");
    assert_eq!(cname_label("example.com", "example.com"), "@");
    assert_eq!(cname_label("staging.example.com", "example.com"), "staging");
}

#[tokio::test]
async fn exposed_report_suggests_proxied_cnames_per_host() {
    let resolver = ScriptedResolver::new()
        .with_record("example.com", &["1.2.3.4"])
        .with_record("ssh.example.com", &["1.2.3.4"])
        .with_record("www.example.com", &["104.16.0.1"]);

    let (audit, _events) = ExposureAudit::new(
        Box::new(FixedIpEcho::new("1.2.3.4")),
        Box::new(resolver),
        minimal_config("example.com"),
    )
    .expect("engine construction succeeds");

    let report = audit.run().await.expect("audit succeeds");
    assert_eq!(report.status, AuditStatus::Exposed);

    let text = report.render_text("mytunnel.cfargotunnel.com");

    // One suggestion per exposed host, none for the proxied one
    assert!(text.contains("\"@\""));
    assert!(text.contains("\"ssh\""));
    assert!(!text.contains("\"www\""));
    assert!(text.contains("mytunnel.cfargotunnel.com"));
    assert!(text.contains("proxied CNAME"));
}

#[tokio::test]
async fn secure_report_exits_zero_without_guidance() {
    let resolver = ScriptedResolver::new().with_record("www.example.com", &["104.16.0.1"]);

    let (audit, _events) = ExposureAudit::new(
        Box::new(FixedIpEcho::new("1.2.3.4")),
        Box::new(resolver),
        minimal_config("example.com"),
    )
    .expect("engine construction succeeds");

    let report = audit.run().await.expect("audit succeeds");

    assert_eq!(report.status, AuditStatus::Secure);
    assert_eq!(report.status.exit_code(), 0);

    let text = report.render_text("mytunnel.cfargotunnel.com");
    assert!(text.contains("not leaked"));
    assert!(!text.contains("Remediation"));
}
