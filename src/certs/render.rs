//! YAML rendering of records.
//!
//! Dry-run writes and the file-backed store share one document layout: a
//! Secret-shaped YAML document whose `data` values are base64 encoded.
//!
//! ```yaml
//! apiVersion: v1
//! kind: Secret
//! metadata:
//!   namespace: ns
//!   name: webhook-cert
//! data:
//!   ca-cert.pem: Q0E=
//!   cert.pem: Q0VSVA==
//!   key.pem: S0VZ
//! ```

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{Record, RecordData, RecordIdentifier};

const API_VERSION: &str = "v1";
const KIND: &str = "Secret";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unexpected document kind '{kind}', expected 'Secret'")]
    UnexpectedKind { kind: String },

    #[error("Document describes {found}, expected {expected}")]
    UnexpectedIdentifier { expected: RecordIdentifier, found: RecordIdentifier },

    #[error("Field '{field}' is not valid base64: {source}")]
    InvalidBase64 {
        field: String,
        #[source]
        source: base64::DecodeError,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretDocument {
    api_version: String,
    kind: String,
    metadata: RecordIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<BTreeMap<String, String>>,
}

/// Render a record as a YAML document.
pub fn render_record(record: &Record) -> Result<String, RenderError> {
    let data = record.data.as_ref().map(|data| {
        data.iter().map(|(field, value)| (field.clone(), STANDARD.encode(value))).collect()
    });

    let document = SecretDocument {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: record.identifier.clone(),
        data,
    };

    Ok(serde_yaml::to_string(&document)?)
}

/// Parse a document produced by [`render_record`] back into a record.
pub fn parse_rendered_record(input: &str) -> Result<Record, RenderError> {
    let document: SecretDocument = serde_yaml::from_str(input)?;
    if document.kind != KIND {
        return Err(RenderError::UnexpectedKind { kind: document.kind });
    }

    let data = match document.data {
        Some(encoded) => {
            let mut data = RecordData::new();
            for (field, value) in encoded {
                let decoded = STANDARD.decode(value.as_bytes()).map_err(|source| {
                    RenderError::InvalidBase64 { field: field.clone(), source }
                })?;
                data.insert(field, decoded);
            }
            Some(data)
        }
        None => None,
    };

    Ok(Record::new(document.metadata, data))
}
