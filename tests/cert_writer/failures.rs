//! Sink and backend failures surface to the caller unchanged.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use certwriter::certs::{
    CertReadWriter, CertWriter, CertWriterError, DryRunSink, InMemoryRecordStore,
    MockCertificateGenerator, ProvisionRequest, Record, RecordIdentifier, RecordStore,
    SecretCertWriter, StoreError, WriterConfig,
};

use super::support::{identifier, tagged_bundle, DNS_NAME};

/// Sink whose every write fails.
struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Store that has no records and rejects every mutation.
#[derive(Debug)]
struct RejectingStore;

#[async_trait]
impl RecordStore for RejectingStore {
    async fn get(&self, identifier: &RecordIdentifier) -> Result<Record, StoreError> {
        Err(StoreError::not_found(identifier))
    }

    async fn create(&self, _record: &Record) -> Result<(), StoreError> {
        Err(StoreError::backend("create rejected"))
    }

    async fn update(&self, _record: &Record) -> Result<(), StoreError> {
        Err(StoreError::backend("update rejected"))
    }
}

fn writer_with(store: Arc<dyn RecordStore>, sink: DryRunSink) -> SecretCertWriter {
    SecretCertWriter::new(
        WriterConfig::new()
            .with_store(store)
            .with_generator(Arc::new(MockCertificateGenerator::new(tagged_bundle("v1"))))
            .with_identifier(identifier())
            .with_dry_run_sink(sink),
    )
    .unwrap()
}

fn discard() -> DryRunSink {
    Arc::new(Mutex::new(io::sink()))
}

#[tokio::test]
async fn test_failing_sink_is_reported() {
    let store = InMemoryRecordStore::new();
    let writer = writer_with(Arc::new(store.clone()), Arc::new(Mutex::new(ClosedSink)));

    let err = writer.ensure_cert(DNS_NAME, true).await.unwrap_err();
    assert!(matches!(err, CertWriterError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));

    let err = writer.overwrite(&ProvisionRequest::new(DNS_NAME, true)).await.unwrap_err();
    assert!(matches!(err, CertWriterError::Io(_)));

    assert_eq!(store.create_calls(), 0);
    assert_eq!(store.update_calls(), 0);
}

#[tokio::test]
async fn test_create_backend_error_passes_through() {
    let writer = writer_with(Arc::new(RejectingStore), discard());

    let err = writer.write(&ProvisionRequest::new(DNS_NAME, false)).await.unwrap_err();

    assert!(matches!(
        err,
        CertWriterError::Store(StoreError::Backend { ref message }) if message == "create rejected"
    ));
}

#[tokio::test]
async fn test_update_backend_error_passes_through() {
    let writer = writer_with(Arc::new(RejectingStore), discard());

    let err = writer.overwrite(&ProvisionRequest::new(DNS_NAME, false)).await.unwrap_err();

    assert!(matches!(
        err,
        CertWriterError::Store(StoreError::Backend { ref message }) if message == "update rejected"
    ));
}

#[tokio::test]
async fn test_ensure_cert_surfaces_backend_error() {
    let writer = writer_with(Arc::new(RejectingStore), discard());

    let err = writer.ensure_cert(DNS_NAME, false).await.unwrap_err();

    assert!(matches!(err, CertWriterError::Store(StoreError::Backend { .. })));
}
