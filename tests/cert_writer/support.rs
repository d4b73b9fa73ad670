//! Shared fixtures for certificate writer tests.

use std::sync::{Arc, Mutex};

use certwriter::certs::{
    ArtifactBundle, DryRunSink, InMemoryRecordStore, MockCertificateGenerator, RecordIdentifier,
    SecretCertWriter, WriterConfig,
};

pub const NAMESPACE: &str = "ns";
pub const NAME: &str = "webhook-cert";
pub const DNS_NAME: &str = "webhook-service.ns.svc";

pub fn identifier() -> RecordIdentifier {
    RecordIdentifier::new(NAMESPACE, NAME)
}

/// Bundle whose three values are tagged, e.g. `v1-CA`, `v1-CERT`, `v1-KEY`.
pub fn tagged_bundle(tag: &str) -> ArtifactBundle {
    ArtifactBundle::new(format!("{}-CA", tag), format!("{}-CERT", tag), format!("{}-KEY", tag))
}

/// Writer over an in-memory store with a deterministic generator and a
/// captured dry-run sink.
pub struct Harness {
    pub store: InMemoryRecordStore,
    pub generator: Arc<MockCertificateGenerator>,
    pub output: Arc<Mutex<Vec<u8>>>,
    pub writer: SecretCertWriter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_bundle(tagged_bundle("v1"))
    }

    pub fn with_bundle(bundle: ArtifactBundle) -> Self {
        let store = InMemoryRecordStore::new();
        let generator = Arc::new(MockCertificateGenerator::new(bundle));
        let output = Arc::new(Mutex::new(Vec::new()));
        let sink: DryRunSink = output.clone();

        let writer = SecretCertWriter::new(
            WriterConfig::new()
                .with_store(Arc::new(store.clone()))
                .with_generator(generator.clone())
                .with_identifier(identifier())
                .with_dry_run_sink(sink),
        )
        .expect("writer config is complete");

        Self { store, generator, output, writer }
    }

    /// Everything written to the dry-run sink so far.
    pub fn rendered(&self) -> String {
        String::from_utf8(self.output.lock().unwrap().clone()).unwrap()
    }
}
