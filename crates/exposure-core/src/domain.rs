//! Domain resolution
//!
//! The domain under audit comes from an explicit argument when given,
//! otherwise from the first `DOMAIN="..."` line found in an ordered list
//! of well-known configuration files. No domain syntax validation happens
//! here; that belongs to the caller.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Well-known configuration files consulted when no domain argument is
/// given, in priority order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["/etc/tunnelhost/deploy.env", "deploy.env"];

/// Resolve the domain under audit.
///
/// Priority: explicit argument > first configuration path > second
/// configuration path. A missing file is skipped; an unreadable one is an
/// I/O error. Finding no domain anywhere is a configuration error carrying
/// a usage message.
pub fn resolve_domain<P: AsRef<Path>>(explicit: Option<&str>, config_paths: &[P]) -> Result<String> {
    if let Some(domain) = explicit {
        let domain = domain.trim();
        if !domain.is_empty() {
            return Ok(domain.to_string());
        }
    }

    for path in config_paths {
        let path = path.as_ref();
        if let Some(domain) = domain_from_file(path)? {
            tracing::debug!("Domain {} read from {}", domain, path.display());
            return Ok(domain);
        }
    }

    Err(Error::configuration(
        "no domain given and no configuration file defines DOMAIN; \
         usage: check-dns-exposure <domain>",
    ))
}

/// First `DOMAIN=` value in a key-value file, quotes stripped.
fn domain_from_file(path: &Path) -> Result<Option<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    for line in contents.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("DOMAIN=") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn explicit_argument_wins() {
        let file = env_file("DOMAIN=\"from-file.example\"\n");
        let domain = resolve_domain(Some("cli.example"), &[file.path()]).unwrap();
        assert_eq!(domain, "cli.example");
    }

    #[test]
    fn first_config_path_beats_second() {
        let first = env_file("# deployment settings\nDOMAIN=\"first.example\"\n");
        let second = env_file("DOMAIN=\"second.example\"\n");
        let domain = resolve_domain(None, &[first.path(), second.path()]).unwrap();
        assert_eq!(domain, "first.example");
    }

    #[test]
    fn missing_file_falls_through() {
        let missing = Path::new("/nonexistent/deploy.env");
        let present = env_file("EMAIL=ops@example.com\nDOMAIN='quoted.example'\n");
        let domain = resolve_domain(None, &[missing, present.path()]).unwrap();
        assert_eq!(domain, "quoted.example");
    }

    #[test]
    fn no_domain_anywhere_is_a_configuration_error() {
        let file = env_file("EMAIL=ops@example.com\n");
        let err = resolve_domain(None, &[file.path()]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("usage"));
    }

    #[test]
    fn blank_explicit_argument_falls_back() {
        let file = env_file("DOMAIN=fallback.example\n");
        let domain = resolve_domain(Some("  "), &[file.path()]).unwrap();
        assert_eq!(domain, "fallback.example");
    }
}
