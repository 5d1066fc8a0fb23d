//! Host firewall posture
//!
//! Informational only: a secure audit can additionally report whether the
//! host firewall is active. The state is read by shelling out to `ufw`,
//! which is how the surrounding deployment manages the firewall.

use exposure_core::{Error, Result};
use tokio::process::Command;

/// First line of `ufw status`, when available.
///
/// - `ufw` not installed: `Ok(None)`; the report simply omits the line
/// - `ufw` refuses for lack of privilege: `Privilege` error, since the
///   caller explicitly asked for information the process cannot read
pub async fn status() -> Result<Option<String>> {
    let output = match Command::new("ufw").arg("status").output().await {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Ok(stdout.lines().next().map(|line| line.trim().to_string()));
    }

    let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
    if stderr.contains("root") || stderr.contains("permission") {
        Err(Error::privilege(
            "reading the firewall state requires root; re-run with sudo or unset EXPOSURE_FIREWALL",
        ))
    } else {
        Err(Error::Other(format!(
            "ufw status failed: {}",
            stderr.trim()
        )))
    }
}
