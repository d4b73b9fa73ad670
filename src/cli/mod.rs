//! # Command Line Interface
//!
//! `certwriter ensure` provisions a bundle into the file-backed record store;
//! `certwriter show` prints what is currently stored.

pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::certs::{
    record_to_bundle, service_dns_name, CertWriter, FileRecordStore, RecordStore,
    SecretCertWriter, WriterConfig,
};
use crate::config::WriterSettings;
use crate::observability::{init_logging, log_config_info};
use output::{print_summary, BundleSummary, OutputFormat};

#[derive(Parser)]
#[command(name = "certwriter")]
#[command(about = "Provision webhook TLS certificates into namespaced records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Record store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Record namespace override
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Record name override
    #[arg(long, global = true)]
    pub name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Make sure a usable certificate bundle exists
    Ensure {
        /// DNS name to issue the serving certificate for
        #[arg(long, conflicts_with = "service")]
        dns_name: Option<String>,

        /// Service name; the DNS name becomes `<service>.<namespace>.svc`
        #[arg(long)]
        service: Option<String>,

        /// Render the record to stdout instead of persisting it
        #[arg(long)]
        dry_run: bool,

        /// Output format for the summary
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Show the stored certificate bundle
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let mut settings = WriterSettings::from_env()?;
    apply_overrides(&mut settings, &cli);
    settings.validate()?;

    init_logging(cli.verbose, settings.log_json);
    log_config_info(&settings);

    match cli.command {
        Commands::Ensure { dns_name, service, dry_run, output } => {
            if let Some(dns_name) = dns_name {
                settings.dns_name = Some(dns_name);
            } else if let Some(service) = service {
                settings.dns_name = Some(service_dns_name(&settings.namespace, &service));
            }
            settings.dry_run |= dry_run;
            handle_ensure(&settings, output).await?
        }
        Commands::Show { output } => handle_show(&settings, output).await?,
    }

    Ok(())
}

fn apply_overrides(settings: &mut WriterSettings, cli: &Cli) {
    if let Some(store_dir) = &cli.store_dir {
        settings.store_dir = store_dir.clone();
    }
    if let Some(namespace) = &cli.namespace {
        settings.namespace = namespace.clone();
    }
    if let Some(name) = &cli.name {
        settings.name = name.clone();
    }
    settings.log_json |= cli.json_logs;
}

async fn handle_ensure(settings: &WriterSettings, output: OutputFormat) -> anyhow::Result<()> {
    let dns_name = settings
        .dns_name
        .as_deref()
        .context("DNS name is required: pass --dns-name, --service or set CERTWRITER_DNS_NAME")?;

    let writer = SecretCertWriter::new(
        WriterConfig::new()
            .with_store(Arc::new(FileRecordStore::new(&settings.store_dir)))
            .with_identifier(settings.identifier()),
    )?;

    let provisioned = writer.ensure_cert(dns_name, settings.dry_run).await?;

    // Dry-run output on stdout is the rendered record itself.
    if !settings.dry_run {
        let summary =
            BundleSummary::new(writer.identifier(), &provisioned.bundle, Some(provisioned.updated));
        print_summary(&summary, output)?;
    }
    Ok(())
}

async fn handle_show(settings: &WriterSettings, output: OutputFormat) -> anyhow::Result<()> {
    let identifier = settings.identifier();
    let store = FileRecordStore::new(&settings.store_dir);

    let record = store
        .get(&identifier)
        .await
        .with_context(|| format!("Failed to read certificate record '{}'", identifier))?;
    let bundle = record_to_bundle(&record)
        .with_context(|| format!("Certificate record '{}' has no data", identifier))?;

    print_summary(&BundleSummary::new(&identifier, &bundle, None), output)
}
