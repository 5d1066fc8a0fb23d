// # Cloudflare Zone Cross-Check
//
// Read-only Cloudflare API client used to audit the zone backing a
// domain, complementing the local DNS scan:
//
// - zone ID lookup by domain (an explicit zone ID skips the lookup)
// - listing the zone's A records; an A record in the zone is origin-IP
//   material even when public resolution no longer shows it, and an
//   unproxied one is flagged
// - reading the zone SSL mode so the report can warn when it is weaker
//   than "full"
//
// This crate never mutates DNS or zone settings: one GET per question,
// full error propagation, no retries.
//
// ## Security
//
// - The API token NEVER appears in logs
// - The Debug implementation redacts the token
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A`
// - SSL Setting: GET `/zones/:zone_id/settings/ssl`

use std::time::Duration;

use exposure_core::{Error, Result};
use serde_json::Value;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only Cloudflare zone auditor
pub struct ZoneAuditor {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone ID (optional, can be auto-detected from the domain)
    zone_id: Option<String>,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ZoneAuditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneAuditor")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

/// One A record as the zone sees it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ZoneRecord {
    /// Record ID (Cloudflare-specific)
    pub id: String,
    /// Record name
    pub name: String,
    /// Record content (the IPv4 address as text)
    pub content: String,
    /// Whether the record is proxied through Cloudflare
    pub proxied: bool,
}

/// Zone-side findings folded into the audit report
#[derive(Debug, Clone, serde::Serialize)]
pub struct ZoneFindings {
    pub zone_id: String,
    /// A records still present in the zone, proxied or not
    pub a_records: Vec<ZoneRecord>,
    /// Current zone SSL mode (off, flexible, full, strict)
    pub ssl_mode: String,
}

impl ZoneFindings {
    /// The A records not proxied through Cloudflare, the worst offenders
    pub fn unproxied(&self) -> impl Iterator<Item = &ZoneRecord> {
        self.a_records.iter().filter(|r| !r.proxied)
    }

    /// Render the zone section of the text report
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str("\nCloudflare zone cross-check:\n");
        out.push_str(&format!("  zone {} / SSL mode: {}", self.zone_id, self.ssl_mode));
        if self.ssl_mode != "full" && self.ssl_mode != "strict" {
            out.push_str("  <- consider \"full\" or \"strict\"");
        }
        out.push('\n');

        if self.a_records.is_empty() {
            out.push_str("  no A records in the zone; CNAME-only, as intended\n");
            return out;
        }

        out.push_str(&format!(
            "  the zone still holds {} A record(s):\n",
            self.a_records.len()
        ));
        for record in &self.a_records {
            out.push_str(&format!(
                "  - {} -> {} [{}]\n",
                record.name,
                record.content,
                if record.proxied { "proxied" } else { "DNS only" }
            ));
        }

        out
    }
}

impl ZoneAuditor {
    /// Create a new zone auditor
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read / DNS:Read
    /// - `zone_id`: optional explicit zone ID (skips the lookup)
    pub fn new(api_token: impl Into<String>, zone_id: Option<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::configuration("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            zone_id,
            client,
        })
    }

    /// Zone name for a domain: "sub.example.com" -> "example.com",
    /// "a.example.co.uk" -> "example.co.uk" (heuristic; not perfect, but
    /// works for most cases).
    pub fn zone_name_for(domain: &str) -> Result<String> {
        let parts: Vec<&str> = domain.split('.').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(Error::configuration(format!(
                "invalid domain name: {domain}"
            )));
        }

        let zone = if parts.len() >= 3
            && parts[parts.len() - 2].len() <= 3
            && parts[parts.len() - 1].len() <= 3
        {
            // Handle TLDs like .co.uk, .com.au
            parts[parts.len() - 3..].join(".")
        } else {
            parts[parts.len() - 2..].join(".")
        };

        Ok(zone)
    }

    /// Authenticated GET returning the parsed JSON body
    ///
    /// Maps HTTP status codes to specific errors (401/403, 404, 429, 5xx).
    async fn get_json(&self, url: &str, what: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(match status.as_u16() {
                401 | 403 => Error::auth(format!(
                    "invalid API token or insufficient permissions ({status})"
                )),
                404 => Error::not_found(format!("{what} not found ({status})")),
                429 => Error::rate_limited(format!(
                    "Cloudflare rate limit exceeded, retry later ({status})"
                )),
                500..=599 => Error::http(format!(
                    "Cloudflare server error (transient): {status} - {error_text}"
                )),
                _ => Error::http(format!(
                    "{what} request failed: {status} - {error_text}"
                )),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::http(format!("failed to parse response: {e}")))
    }

    /// Get the zone ID for a domain
    ///
    /// If a zone ID was pre-configured, returns it directly. Otherwise
    /// queries the API:
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    pub async fn get_zone_id(&self, domain: &str) -> Result<String> {
        if let Some(ref zone_id) = self.zone_id {
            tracing::debug!("Using pre-configured zone ID");
            return Ok(zone_id.clone());
        }

        let zone_name = Self::zone_name_for(domain)?;
        tracing::debug!("Looking up zone ID for domain: {}", zone_name);

        let url = format!("{CLOUDFLARE_API_BASE}/zones?name={zone_name}");
        let json = self.get_json(&url, "zone").await?;
        zone_id_from_response(&json, &zone_name)
    }

    /// List the zone's A records
    pub async fn list_a_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        let url =
            format!("{CLOUDFLARE_API_BASE}/zones/{zone_id}/dns_records?type=A&per_page=100");
        let json = self.get_json(&url, "DNS records").await?;
        a_records_from_response(&json)
    }

    /// Current SSL mode of the zone
    pub async fn ssl_mode(&self, zone_id: &str) -> Result<String> {
        let url = format!("{CLOUDFLARE_API_BASE}/zones/{zone_id}/settings/ssl");
        let json = self.get_json(&url, "SSL setting").await?;
        ssl_mode_from_response(&json)
    }

    /// Run the full zone-side cross-check for a domain
    pub async fn audit(&self, domain: &str) -> Result<ZoneFindings> {
        let zone_id = self.get_zone_id(domain).await?;
        let a_records = self.list_a_records(&zone_id).await?;
        let ssl_mode = self.ssl_mode(&zone_id).await?;

        tracing::info!(
            "Zone {}: {} A record(s), SSL mode {}",
            zone_id,
            a_records.len(),
            ssl_mode
        );

        Ok(ZoneFindings {
            zone_id,
            a_records,
            ssl_mode,
        })
    }
}

fn zone_id_from_response(json: &Value, zone_name: &str) -> Result<String> {
    let zones = json["result"]
        .as_array()
        .ok_or_else(|| Error::http("invalid response format: result is not an array"))?;

    let zone = zones
        .first()
        .ok_or_else(|| Error::not_found(format!("zone not found: {zone_name}")))?;

    let zone_id = zone["id"]
        .as_str()
        .ok_or_else(|| Error::http("invalid response format: zone.id is not a string"))?;

    Ok(zone_id.to_string())
}

fn a_records_from_response(json: &Value) -> Result<Vec<ZoneRecord>> {
    let records = json["result"]
        .as_array()
        .ok_or_else(|| Error::http("invalid response format: result is not an array"))?;

    records
        .iter()
        .map(|record| {
            let name = record["name"]
                .as_str()
                .ok_or_else(|| Error::http("invalid response format: record.name is not a string"))?;
            Ok(ZoneRecord {
                id: record["id"].as_str().unwrap_or_default().to_string(),
                name: name.to_string(),
                content: record["content"].as_str().unwrap_or_default().to_string(),
                proxied: record["proxied"].as_bool().unwrap_or(false),
            })
        })
        .collect()
}

fn ssl_mode_from_response(json: &Value) -> Result<String> {
    json["result"]["value"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::http("invalid response format: setting value is not a string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_token_rejected() {
        assert!(ZoneAuditor::new("", None).is_err());
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let auditor = ZoneAuditor::new("secret_token_12345", None).unwrap();
        let debug_str = format!("{auditor:?}");
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("ZoneAuditor"));
    }

    #[test]
    fn test_zone_name_heuristic() {
        assert_eq!(
            ZoneAuditor::zone_name_for("example.com").unwrap(),
            "example.com"
        );
        assert_eq!(
            ZoneAuditor::zone_name_for("sub.example.com").unwrap(),
            "example.com"
        );
        assert_eq!(
            ZoneAuditor::zone_name_for("deep.nested.example.co.uk").unwrap(),
            "example.co.uk"
        );
        assert!(ZoneAuditor::zone_name_for("localhost").is_err());
        assert!(ZoneAuditor::zone_name_for("bad..name").is_err());
    }

    #[test]
    fn test_zone_id_parsing() {
        let body = json!({
            "result": [{ "id": "abc123", "name": "example.com" }]
        });
        assert_eq!(zone_id_from_response(&body, "example.com").unwrap(), "abc123");

        let empty = json!({ "result": [] });
        assert!(matches!(
            zone_id_from_response(&empty, "example.com").unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_a_record_parsing() {
        let body = json!({
            "result": [
                { "id": "r1", "name": "example.com", "content": "1.2.3.4", "proxied": false },
                { "id": "r2", "name": "www.example.com", "content": "104.16.0.1", "proxied": true }
            ]
        });

        let records = a_records_from_response(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].proxied);
        assert!(records[1].proxied);
    }

    #[test]
    fn test_ssl_mode_parsing() {
        let body = json!({ "result": { "id": "ssl", "value": "full" } });
        assert_eq!(ssl_mode_from_response(&body).unwrap(), "full");
    }

    #[test]
    fn test_findings_rendering() {
        let findings = ZoneFindings {
            zone_id: "abc123".to_string(),
            a_records: vec![ZoneRecord {
                id: "r1".to_string(),
                name: "example.com".to_string(),
                content: "1.2.3.4".to_string(),
                proxied: false,
            }],
            ssl_mode: "flexible".to_string(),
        };

        assert_eq!(findings.unproxied().count(), 1);

        let text = findings.render_text();
        assert!(text.contains("SSL mode: flexible"));
        assert!(text.contains("consider \"full\""));
        assert!(text.contains("example.com -> 1.2.3.4 [DNS only]"));
    }
}
