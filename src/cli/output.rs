//! Output formatting for CLI commands
//!
//! Supports JSON, YAML and a two-column table for bundle summaries.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::certs::{ArtifactBundle, RecordIdentifier};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Table,
}

/// Printable view of a stored bundle. Never carries key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSummary {
    pub namespace: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
    pub ca_cert_bytes: usize,
    pub cert_bytes: usize,
    pub key_bytes: usize,
    /// PEM text of the CA certificate, for webhook `caBundle` wiring.
    pub ca_cert: String,
}

impl BundleSummary {
    pub fn new(
        identifier: &RecordIdentifier,
        bundle: &ArtifactBundle,
        updated: Option<bool>,
    ) -> Self {
        Self {
            namespace: identifier.namespace.clone(),
            name: identifier.name.clone(),
            updated,
            ca_cert_bytes: bundle.ca_cert().len(),
            cert_bytes: bundle.cert().len(),
            key_bytes: bundle.key().len(),
            ca_cert: String::from_utf8_lossy(bundle.ca_cert()).into_owned(),
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("record", format!("{}/{}", self.namespace, self.name))];
        if let Some(updated) = self.updated {
            rows.push(("updated", updated.to_string()));
        }
        rows.push(("ca-cert.pem", format!("{} bytes", self.ca_cert_bytes)));
        rows.push(("cert.pem", format!("{} bytes", self.cert_bytes)));
        rows.push(("key.pem", format!("{} bytes", self.key_bytes)));
        rows
    }
}

/// Render a bundle summary in `format`.
pub fn format_summary(summary: &BundleSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(summary)
                .context("Failed to encode summary as JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(summary).context("Failed to encode summary as YAML")
        }
        OutputFormat::Table => Ok(summary_table(summary)),
    }
}

/// Write a bundle summary to stdout in `format`.
pub fn print_summary(summary: &BundleSummary, format: OutputFormat) -> Result<()> {
    print!("{}", format_summary(summary, format)?);
    Ok(())
}

fn summary_table(summary: &BundleSummary) -> String {
    let rows = summary.rows();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter().map(|(label, value)| format!("{:<width$}  {}\n", label, value)).collect()
}
