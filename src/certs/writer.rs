//! Certificate writer that persists bundles as records in a [`RecordStore`].

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use validator::Validate;

use super::artifacts::ArtifactBundle;
use super::error::{CertWriterError, Result};
use super::generator::{CertificateGenerator, SelfSignedGenerator};
use super::provision::{
    self, BundleValidator, CertReadWriter, CertWriter, ObjectReference, ProvisionRequest,
    Provisioned, StructuralValidator,
};
use super::record::{bundle_to_record, record_to_bundle, Record, RecordIdentifier};
use super::render::render_record;
use super::store::RecordStore;

/// Output stream receiving dry-run renderings.
pub type DryRunSink = Arc<Mutex<dyn Write + Send>>;

/// Options for constructing a [`SecretCertWriter`].
///
/// `store` and `identifier` are required. `generator` defaults to
/// [`SelfSignedGenerator`], `dry_run_sink` to standard output and `validator`
/// to [`StructuralValidator`].
#[derive(Default)]
pub struct WriterConfig {
    pub store: Option<Arc<dyn RecordStore>>,
    pub generator: Option<Arc<dyn CertificateGenerator>>,
    pub identifier: Option<RecordIdentifier>,
    pub dry_run_sink: Option<DryRunSink>,
    pub validator: Option<Arc<dyn BundleValidator>>,
}

impl std::fmt::Debug for WriterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterConfig")
            .field("store", &self.store)
            .field("generator", &self.generator)
            .field("identifier", &self.identifier)
            .field("dry_run_sink", &self.dry_run_sink.as_ref().map(|_| "[sink]"))
            .field("validator", &self.validator)
            .finish()
    }
}

impl WriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn CertificateGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_identifier(mut self, identifier: RecordIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_dry_run_sink(mut self, sink: DryRunSink) -> Self {
        self.dry_run_sink = Some(sink);
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn BundleValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    fn set_defaults(&mut self) {
        if self.generator.is_none() {
            self.generator = Some(Arc::new(SelfSignedGenerator::default()));
        }
        if self.dry_run_sink.is_none() {
            self.dry_run_sink = Some(Arc::new(Mutex::new(io::stdout())));
        }
        if self.validator.is_none() {
            self.validator = Some(Arc::new(StructuralValidator));
        }
    }
}

/// Provisions certificates by reading and writing a record in a [`RecordStore`].
///
/// The DNS name and dry-run flag travel with each call in a [`ProvisionRequest`],
/// so one writer may serve concurrent callers. Concurrent writers racing on the
/// same identifier resolve through the store: a losing create surfaces as
/// `AlreadyExists` and updates are last-writer-wins.
pub struct SecretCertWriter {
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn CertificateGenerator>,
    identifier: RecordIdentifier,
    sink: DryRunSink,
    validator: Arc<dyn BundleValidator>,
}

impl std::fmt::Debug for SecretCertWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCertWriter")
            .field("store", &self.store)
            .field("generator", &self.generator)
            .field("identifier", &self.identifier)
            .field("validator", &self.validator)
            .finish()
    }
}

impl SecretCertWriter {
    /// Build a writer, applying defaults and validating required options.
    ///
    /// # Errors
    ///
    /// `CertWriterError::Config` if the store or identifier is missing, or the
    /// identifier has an empty namespace or name.
    pub fn new(mut config: WriterConfig) -> Result<Self> {
        config.set_defaults();

        let store = config
            .store
            .ok_or_else(|| CertWriterError::config("store must be set in WriterConfig"))?;
        let identifier = config
            .identifier
            .ok_or_else(|| CertWriterError::config("identifier must be set in WriterConfig"))?;
        identifier
            .validate()
            .map_err(|e| CertWriterError::config(format!("invalid record identifier: {}", e)))?;

        let generator = config
            .generator
            .ok_or_else(|| CertWriterError::config("generator must be set in WriterConfig"))?;
        let sink = config
            .dry_run_sink
            .ok_or_else(|| CertWriterError::config("dry-run sink must be set in WriterConfig"))?;
        let validator = config
            .validator
            .ok_or_else(|| CertWriterError::config("validator must be set in WriterConfig"))?;

        Ok(Self { store, generator, identifier, sink, validator })
    }

    pub fn identifier(&self) -> &RecordIdentifier {
        &self.identifier
    }

    async fn build_record(&self, request: &ProvisionRequest) -> Result<(Record, ArtifactBundle)> {
        let bundle = self.generator.generate(&request.dns_name).await?;
        let record = bundle_to_record(&bundle, &self.identifier);
        Ok((record, bundle))
    }

    fn dry_run_write(&self, record: &Record) -> Result<()> {
        let document = format!("---\n{}", render_record(record)?);

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "dry-run sink lock poisoned"))?;
        sink.write_all(document.as_bytes())?;
        sink.flush()?;

        info!(record = %self.identifier, "Rendered certificate record (dry run)");
        Ok(())
    }
}

#[async_trait]
impl CertReadWriter for SecretCertWriter {
    async fn read(&self, request: &ProvisionRequest) -> Result<Option<ArtifactBundle>> {
        if request.dry_run {
            return Err(CertWriterError::not_found(&self.identifier));
        }

        let record = self.store.get(&self.identifier).await?;
        debug!(
            record = %self.identifier,
            has_data = record.data.is_some(),
            "Read certificate record"
        );
        Ok(record_to_bundle(&record))
    }

    async fn write(&self, request: &ProvisionRequest) -> Result<ArtifactBundle> {
        let (record, bundle) = self.build_record(request).await?;
        if request.dry_run {
            self.dry_run_write(&record)?;
            return Ok(bundle);
        }

        match self.store.create(&record).await.map_err(CertWriterError::from) {
            Ok(()) => {
                info!(record = %self.identifier, "Created certificate record");
                Ok(bundle)
            }
            Err(e) => {
                if e.is_already_exists() {
                    warn!(record = %self.identifier, "Certificate record already exists");
                }
                Err(e)
            }
        }
    }

    async fn overwrite(&self, request: &ProvisionRequest) -> Result<ArtifactBundle> {
        let (record, bundle) = self.build_record(request).await?;
        if request.dry_run {
            self.dry_run_write(&record)?;
            return Ok(bundle);
        }

        self.store.update(&record).await?;
        info!(record = %self.identifier, "Updated certificate record");
        Ok(bundle)
    }
}

#[async_trait]
impl CertWriter for SecretCertWriter {
    async fn ensure_cert(&self, dns_name: &str, dry_run: bool) -> Result<Provisioned> {
        let request = ProvisionRequest::new(dns_name, dry_run);
        provision::ensure_cert(self, self.validator.as_ref(), &request).await
    }

    /// Owner references are not wired yet: the record's owners would need the
    /// owning objects' UIDs, which callers do not supply. Always succeeds and
    /// leaves the record untouched.
    fn inject(&self, owners: &[ObjectReference]) -> Result<()> {
        debug!(record = %self.identifier, owners = owners.len(), "Owner injection not supported");
        Ok(())
    }
}
