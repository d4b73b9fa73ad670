//! Backend record model and conversion to and from [`ArtifactBundle`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::artifacts::{ArtifactBundle, CA_CERT_NAME, SERVER_CERT_NAME, SERVER_KEY_NAME};

/// Namespace + name address of a record in a [`RecordStore`](super::store::RecordStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Validate)]
pub struct RecordIdentifier {
    #[validate(length(min = 1, message = "namespace cannot be empty"))]
    pub namespace: String,

    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
}

impl RecordIdentifier {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into() }
    }
}

impl fmt::Display for RecordIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Field mapping stored under a record.
pub type RecordData = BTreeMap<String, Vec<u8>>;

/// A backend entity holding certificate material.
///
/// `data` is `None` when the backend holds the record without any field mapping,
/// which is distinct from a present mapping whose fields are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub identifier: RecordIdentifier,
    pub data: Option<RecordData>,
}

impl Record {
    pub fn new(identifier: RecordIdentifier, data: Option<RecordData>) -> Self {
        Self { identifier, data }
    }
}

/// Convert a bundle into a record addressed by `identifier`.
///
/// The resulting mapping always holds exactly the three well-known fields.
pub fn bundle_to_record(bundle: &ArtifactBundle, identifier: &RecordIdentifier) -> Record {
    let mut data = RecordData::new();
    data.insert(CA_CERT_NAME.to_string(), bundle.ca_cert().to_vec());
    data.insert(SERVER_CERT_NAME.to_string(), bundle.cert().to_vec());
    data.insert(SERVER_KEY_NAME.to_string(), bundle.key().to_vec());

    Record::new(identifier.clone(), Some(data))
}

/// Convert a record back into a bundle.
///
/// Returns `None` only when the record carries no mapping at all. A missing
/// individual field reads as an empty byte sequence.
pub fn record_to_bundle(record: &Record) -> Option<ArtifactBundle> {
    let data = record.data.as_ref()?;
    let field = |name: &str| data.get(name).cloned().unwrap_or_default();

    Some(ArtifactBundle::new(field(CA_CERT_NAME), field(SERVER_CERT_NAME), field(SERVER_KEY_NAME)))
}
