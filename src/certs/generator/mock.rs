//! Deterministic generator for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::CertificateGenerator;
use crate::certs::artifacts::ArtifactBundle;
use crate::certs::error::GeneratorError;

/// Returns a configured bundle on every call and records how it was called.
///
/// ```rust,ignore
/// let mock = MockCertificateGenerator::new(ArtifactBundle::new("CA", "CERT", "KEY"));
/// mock.set_fail_next(true);
/// assert!(mock.generate("svc.ns.svc").await.is_err());
/// assert_eq!(mock.calls(), 1);
/// ```
#[derive(Debug)]
pub struct MockCertificateGenerator {
    bundle: Mutex<ArtifactBundle>,
    fail_next: AtomicBool,
    calls: AtomicUsize,
    last_dns_name: Mutex<Option<String>>,
}

impl MockCertificateGenerator {
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self {
            bundle: Mutex::new(bundle),
            fail_next: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            last_dns_name: Mutex::new(None),
        }
    }

    /// Replace the bundle returned by subsequent calls.
    pub fn set_bundle(&self, bundle: ArtifactBundle) {
        if let Ok(mut current) = self.bundle.lock() {
            *current = bundle;
        }
    }

    /// Make the next call fail with a backend error.
    pub fn set_fail_next(&self, fail: bool) {
        self.fail_next.store(fail, Ordering::SeqCst);
    }

    /// Number of `generate` calls, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// DNS name passed to the most recent call.
    pub fn last_dns_name(&self) -> Option<String> {
        self.last_dns_name.lock().ok().and_then(|name| name.clone())
    }
}

#[async_trait]
impl CertificateGenerator for MockCertificateGenerator {
    async fn generate(&self, dns_name: &str) -> Result<ArtifactBundle, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_dns_name.lock() {
            *last = Some(dns_name.to_string());
        }

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GeneratorError::backend("mock generator failure"));
        }

        self.bundle
            .lock()
            .map(|bundle| bundle.clone())
            .map_err(|_| GeneratorError::backend("mock generator state poisoned"))
    }
}
