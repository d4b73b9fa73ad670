//! # Structured Logging
//!
//! Span macros and subscriber setup for certificate provisioning.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::WriterSettings;

/// Create a tracing span for a certificate operation.
///
/// ```rust,ignore
/// let span = cert_span!("ensure_cert", "svc.ns.svc");
/// let span = cert_span!("ensure_cert", "svc.ns.svc", dry_run = true);
/// ```
#[macro_export]
macro_rules! cert_span {
    ($operation:expr, $dns_name:expr) => {
        tracing::info_span!(
            "cert_operation",
            operation = %$operation,
            dns_name = %$dns_name
        )
    };
    ($operation:expr, $dns_name:expr, $($field:tt)*) => {
        tracing::info_span!(
            "cert_operation",
            operation = %$operation,
            dns_name = %$dns_name,
            $($field)*
        )
    };
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` for `verbose` and
/// `info` otherwise. Output goes to stderr so dry-run renderings on stdout stay
/// machine-readable.
pub fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = if json {
        tracing::subscriber::set_global_default(
            fmt().json().with_env_filter(filter).with_writer(std::io::stderr).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            fmt().with_env_filter(filter).with_writer(std::io::stderr).finish(),
        )
    };

    if result.is_err() {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
}

/// Log the effective settings at startup.
pub fn log_config_info(settings: &WriterSettings) {
    tracing::info!(
        namespace = %settings.namespace,
        name = %settings.name,
        dns_name = settings.dns_name.as_deref().unwrap_or("<derived>"),
        store_dir = %settings.store_dir.display(),
        dry_run = settings.dry_run,
        "certwriter configuration"
    );
}
