//! Certificate artifact bundle produced by generators and stored in records.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Record field holding the PEM-encoded CA certificate.
pub const CA_CERT_NAME: &str = "ca-cert.pem";

/// Record field holding the PEM-encoded serving certificate.
pub const SERVER_CERT_NAME: &str = "cert.pem";

/// Record field holding the PEM-encoded serving private key.
pub const SERVER_KEY_NAME: &str = "key.pem";

/// The three well-known record fields, in rendering order.
pub const FIELD_NAMES: [&str; 3] = [CA_CERT_NAME, SERVER_CERT_NAME, SERVER_KEY_NAME];

/// CA certificate, serving certificate and serving key for one DNS name.
///
/// The bundle is immutable once produced and its memory is zeroed on drop.
/// `Debug` prints byte counts only so key material never reaches logs.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ArtifactBundle {
    ca_cert: Vec<u8>,
    cert: Vec<u8>,
    key: Vec<u8>,
}

impl ArtifactBundle {
    pub fn new(
        ca_cert: impl Into<Vec<u8>>,
        cert: impl Into<Vec<u8>>,
        key: impl Into<Vec<u8>>,
    ) -> Self {
        Self { ca_cert: ca_cert.into(), cert: cert.into(), key: key.into() }
    }

    /// PEM-encoded CA certificate.
    pub fn ca_cert(&self) -> &[u8] {
        &self.ca_cert
    }

    /// PEM-encoded serving certificate.
    pub fn cert(&self) -> &[u8] {
        &self.cert
    }

    /// PEM-encoded serving private key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// True when any of the three artifacts is empty.
    pub fn has_empty_field(&self) -> bool {
        self.ca_cert.is_empty() || self.cert.is_empty() || self.key.is_empty()
    }
}

impl std::fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("ca_cert", &format!("[{} bytes PEM]", self.ca_cert.len()))
            .field("cert", &format!("[{} bytes PEM]", self.cert.len()))
            .field("key", &"[REDACTED]")
            .finish()
    }
}
