// # check-dns-exposure
//
// CLI that audits whether a tunnel-only host still leaks its origin IPv4
// address through public DNS A records.
//
// This binary is a THIN integration layer: all audit logic lives in
// exposure-core and its backend crates. The binary is responsible for:
// 1. Resolving the domain under audit (argument or configuration file)
// 2. Initializing the runtime and tracing
// 3. Registering backends and building the audit engine
// 4. Running the audit and rendering the report
//
// ## Configuration
//
// One optional positional argument (the domain) plus environment
// variables:
//
// ### Domain
// - `EXPOSURE_CONFIG_PATHS`: colon-separated files consulted for a
//   `DOMAIN="..."` line when no argument is given
//   (default: /etc/tunnelhost/deploy.env:deploy.env)
//
// ### Public-IP detection
// - `EXPOSURE_ECHO_URLS`: comma-separated IP-echo endpoints, in
//   fallback order
// - `EXPOSURE_PROBE_TIMEOUT_SECS`: per-endpoint timeout (default 3)
//
// ### Scan
// - `EXPOSURE_SUBDOMAINS`: comma-separated candidate labels; an empty
//   entry means the bare domain
//
// ### Report
// - `EXPOSURE_TUNNEL_HOSTNAME`: CNAME target suggested in remediation
// - `EXPOSURE_OUTPUT`: report format, text or json (default text)
// - `EXPOSURE_FIREWALL`: true to append the host firewall state
//
// ### Cloudflare zone cross-check (feature "cloudflare")
// - `EXPOSURE_CF_API_TOKEN`: API token enabling the cross-check
// - `EXPOSURE_CF_ZONE_ID`: explicit zone ID (skips the lookup)
//
// ### Logging
// - `EXPOSURE_LOG_LEVEL`: trace|debug|info|warn|error (default warn)
//
// ## Exit codes
//
// - 0: no record resolves to this server (including "no records at all")
// - 1: exposure detected, or a fatal precondition failure
//
// ## Example
//
// ```bash
// check-dns-exposure example.com
// EXPOSURE_OUTPUT=json check-dns-exposure example.com
// ```

mod firewall;

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use exposure_core::config::{DEFAULT_ECHO_URLS, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_SUBDOMAINS};
use exposure_core::domain::DEFAULT_CONFIG_PATHS;
use exposure_core::{
    AuditConfig, AuditStatus, ExposureAudit, IpEchoConfig, ReportConfig, ReportFormat,
    ResolverConfig, SourceRegistry,
};

/// Exit codes: anything but a clean, unexposed audit is 1
#[derive(Debug, Clone, Copy)]
enum AuditExitCode {
    /// No record resolves to this server
    Secure = 0,
    /// Exposure detected, or a fatal precondition failure
    ExposedOrFailed = 1,
}

impl From<AuditExitCode> for ExitCode {
    fn from(code: AuditExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration (environment + argv)
#[allow(dead_code)]
struct Config {
    domain_arg: Option<String>,
    config_paths: Vec<String>,
    echo_urls: Vec<String>,
    probe_timeout_secs: u64,
    subdomains: Vec<String>,
    tunnel_hostname: Option<String>,
    output: String,
    firewall: bool,
    cf_api_token: Option<String>,
    cf_zone_id: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from the environment and argv
    fn from_env(args: &[String]) -> Result<Self> {
        Ok(Self {
            domain_arg: args.first().cloned(),
            config_paths: env::var("EXPOSURE_CONFIG_PATHS")
                .ok()
                .map(|s| {
                    s.split(':')
                        .map(str::to_string)
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_CONFIG_PATHS.iter().map(|s| s.to_string()).collect()),
            echo_urls: env::var("EXPOSURE_ECHO_URLS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|u| u.trim().to_string())
                        .filter(|u| !u.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_ECHO_URLS.iter().map(|s| s.to_string()).collect()),
            probe_timeout_secs: env::var("EXPOSURE_PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS),
            // Empty entries are kept: the empty label is the bare domain
            subdomains: env::var("EXPOSURE_SUBDOMAINS")
                .ok()
                .map(|s| s.split(',').map(|l| l.trim().to_string()).collect())
                .unwrap_or_else(|| DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect()),
            tunnel_hostname: env::var("EXPOSURE_TUNNEL_HOSTNAME").ok().filter(|t| !t.is_empty()),
            output: env::var("EXPOSURE_OUTPUT").unwrap_or_else(|_| "text".to_string()),
            firewall: env::var("EXPOSURE_FIREWALL")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            cf_api_token: env::var("EXPOSURE_CF_API_TOKEN").ok().filter(|t| !t.is_empty()),
            cf_zone_id: env::var("EXPOSURE_CF_ZONE_ID").ok().filter(|z| !z.is_empty()),
            log_level: env::var("EXPOSURE_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This performs validation of everything except the domain itself,
    /// which may still have to be read from a configuration file:
    /// - Endpoint URL schemes and counts
    /// - Numeric range validation
    /// - Output format and log level enumeration
    /// - API token plausibility (when provided)
    fn validate(&self) -> Result<()> {
        if self.echo_urls.is_empty() {
            anyhow::bail!(
                "EXPOSURE_ECHO_URLS must contain at least one endpoint. \
                Set it via: export EXPOSURE_ECHO_URLS=https://api.ipify.org"
            );
        }

        for url in &self.echo_urls {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!(
                    "EXPOSURE_ECHO_URLS entries must use HTTP or HTTPS scheme. Got: {}",
                    url
                );
            }
            if url.starts_with("http://") {
                eprintln!(
                    "WARNING: echo endpoint {url} uses HTTP (not HTTPS). \
                    This is less secure. Consider using HTTPS."
                );
            }
        }

        if !(1..=60).contains(&self.probe_timeout_secs) {
            anyhow::bail!(
                "EXPOSURE_PROBE_TIMEOUT_SECS must be between 1 and 60 seconds. Got: {}",
                self.probe_timeout_secs
            );
        }

        if self.subdomains.is_empty() {
            anyhow::bail!(
                "EXPOSURE_SUBDOMAINS must contain at least one label \
                (an empty entry means the bare domain)"
            );
        }

        match self.output.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!(
                "EXPOSURE_OUTPUT '{}' is not supported. Supported formats: text, json",
                other
            ),
        }

        if let Some(ref token) = self.cf_api_token {
            // Cloudflare API tokens are typically 40 characters; catch
            // obviously truncated or placeholder values early
            if token.len() < 20 {
                anyhow::bail!(
                    "EXPOSURE_CF_API_TOKEN appears too short ({} chars). \
                    Cloudflare tokens are typically 40 characters. \
                    Verify your token is correct.",
                    token.len()
                );
            }

            let token_lower = token.to_lowercase();
            if token_lower.contains("your_token")
                || token_lower.contains("replace_me")
                || token_lower.contains("example")
            {
                anyhow::bail!(
                    "EXPOSURE_CF_API_TOKEN appears to be a placeholder. \
                    Use an actual API token from the Cloudflare dashboard."
                );
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "EXPOSURE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }

        Ok(())
    }

    /// Validate that a string is a valid domain name
    ///
    /// Basic DNS domain name validation per RFC 1035. Not comprehensive,
    /// but catches common errors before any network work happens.
    fn validate_domain_name(domain: &str) -> Result<()> {
        if domain.is_empty() {
            anyhow::bail!("Domain name cannot be empty");
        }

        // Total length limit (RFC 1035: 253 chars max)
        if domain.len() > 253 {
            anyhow::bail!(
                "Domain name too long: {} chars (max 253). Got: {}",
                domain.len(),
                domain
            );
        }

        for label in domain.split('.') {
            if label.is_empty() {
                anyhow::bail!("Domain name has empty label: '{}'", domain);
            }

            if label.len() > 63 {
                anyhow::bail!(
                    "Domain label too long: {} chars (max 63). Label: '{}'",
                    label.len(),
                    label
                );
            }

            if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
                anyhow::bail!(
                    "Domain label contains invalid characters. Label: '{}'. \
                    Valid: alphanumeric and hyphen only.",
                    label
                );
            }

            if label.starts_with('-') || label.ends_with('-') {
                anyhow::bail!(
                    "Domain label cannot start or end with hyphen. Label: '{}'",
                    label
                );
            }
        }

        Ok(())
    }
}

const USAGE: &str = "usage: check-dns-exposure [domain]

Audits whether any public A record still resolves directly to this
server's IP instead of going through the tunnel. Without a domain
argument, DOMAIN=\"...\" is read from the deployment configuration
(EXPOSURE_CONFIG_PATHS). See the crate docs for all environment
variables.";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    // Load configuration from environment
    let config = match Config::from_env(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return AuditExitCode::ExposedOrFailed.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return AuditExitCode::ExposedOrFailed.into();
    }

    // Initialize tracing (diagnostics go to stderr; the report owns stdout)
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return AuditExitCode::ExposedOrFailed.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return AuditExitCode::ExposedOrFailed.into();
        }
    };

    rt.block_on(async {
        match run_audit(config).await {
            Ok(code) => code,
            Err(e) => {
                error!("Audit failed: {e}");
                eprintln!("check-dns-exposure: {e}");
                AuditExitCode::ExposedOrFailed
            }
        }
    })
    .into()
}

/// Run the audit
async fn run_audit(config: Config) -> Result<AuditExitCode> {
    // Domain: explicit argument wins, then the configuration files
    let domain =
        exposure_core::domain::resolve_domain(config.domain_arg.as_deref(), &config.config_paths)?;
    Config::validate_domain_name(&domain)?;

    // Register the built-in backends
    let registry = SourceRegistry::new();
    exposure_ip_http::register(&registry);
    exposure_dns_hickory::register(&registry);

    let mut report_config = ReportConfig {
        format: match config.output.as_str() {
            "json" => ReportFormat::Json,
            _ => ReportFormat::Text,
        },
        ..ReportConfig::default()
    };
    if let Some(tunnel) = &config.tunnel_hostname {
        report_config.tunnel_hostname = tunnel.clone();
    }

    let audit_config = AuditConfig {
        domain: domain.clone(),
        subdomains: config.subdomains.clone(),
        ip_echo: IpEchoConfig::Http {
            urls: config.echo_urls.clone(),
            timeout_secs: config.probe_timeout_secs,
        },
        resolver: ResolverConfig::System,
        report: report_config,
        ..AuditConfig::new(&domain)
    };

    let ip_echo = registry.create_ip_echo(&audit_config.ip_echo)?;
    let resolver = registry.create_resolver(&audit_config.resolver)?;

    info!("Auditing DNS exposure for {domain}");

    let (audit, mut events) = ExposureAudit::new(ip_echo, resolver, audit_config.clone())?;

    // Drain engine events into the log
    let events_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "audit event");
        }
    });

    let audit_result = audit.run().await;
    drop(audit); // close the event channel so the drain task finishes
    let _ = events_task.await;

    let mut report = audit_result?;

    // Firewall posture is informational and only collected on request,
    // and only when the DNS side came back clean
    if config.firewall && report.status != AuditStatus::Exposed {
        report.firewall = firewall::status().await?;
    }

    // Optional zone-side cross-check against the Cloudflare API
    #[cfg(feature = "cloudflare")]
    let zone_findings = match &config.cf_api_token {
        Some(token) => {
            info!("Running Cloudflare zone cross-check");
            let auditor = exposure_zone_cloudflare::ZoneAuditor::new(
                token.clone(),
                config.cf_zone_id.clone(),
            )?;
            Some(auditor.audit(&domain).await?)
        }
        None => None,
    };

    match audit_config.report.format {
        ReportFormat::Json => {
            let mut doc = serde_json::to_value(&report)?;
            #[cfg(feature = "cloudflare")]
            if let Some(findings) = &zone_findings {
                doc["cloudflare_zone"] = serde_json::to_value(findings)?;
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        ReportFormat::Text => {
            print!("{}", report.render_text(&audit_config.report.tunnel_hostname));
            #[cfg(feature = "cloudflare")]
            if let Some(findings) = &zone_findings {
                print!("{}", findings.render_text());
            }
        }
    }

    Ok(match report.status {
        AuditStatus::Exposed => AuditExitCode::ExposedOrFailed,
        AuditStatus::Secure | AuditStatus::NoRecords => AuditExitCode::Secure,
    })
}
