//! Tracing setup. Everything goes to stdout; events tagged with the
//! `audit_log` target additionally land in a daily-rotated audit file, so
//! mutating requests, auth failures, and webhook deliveries survive restarts.

use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use std::fs;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer, Registry};

const AUDIT_DIR: &str = "logs";
const AUDIT_FILE_PREFIX: &str = "gearops-audit.log";

pub fn setup_logging() -> Result<(), anyhow::Error> {
    fs::create_dir_all(AUDIT_DIR).context("Failed to create audit log directory")?;

    let audit_layer = fmt::layer()
        .with_writer(rolling::daily(AUDIT_DIR, AUDIT_FILE_PREFIX))
        .with_ansi(false)
        .with_filter(Targets::new().with_target("audit_log", LevelFilter::TRACE));

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    tracing::subscriber::set_global_default(
        Registry::default().with(stdout_layer).with(audit_layer),
    )
    .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Audit-trail entry for a mutating request, recorded before the auth check
/// so rejected calls show up too.
pub fn audit_request(method: &str, path: &str, body: Option<&Value>) {
    let timestamp = Utc::now().to_rfc3339();

    match body {
        Some(body) => {
            info!(
                target: "audit_log",
                method = method,
                uri = path,
                body = %body,
                "{} {} {} {}", timestamp, method, path, body
            );
        }
        None => {
            info!(
                target: "audit_log",
                method = method,
                uri = path,
                "{} {} {}", timestamp, method, path
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // No subscriber installed here; the calls must still be no-op safe.
    #[test]
    fn test_audit_request_accepts_both_body_shapes() {
        audit_request("POST", "/intake", Some(&json!({"vendor_name": "Ana"})));
        audit_request("POST", "/sync/run", None);
    }
}
