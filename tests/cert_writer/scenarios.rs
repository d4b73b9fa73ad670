//! Read / write / overwrite scenarios against an in-memory store.

use std::sync::Arc;

use certwriter::certs::{
    bundle_to_record, CertReadWriter, CertWriter, CertWriterError, ProvisionRequest, Record,
    CA_CERT_NAME, SERVER_CERT_NAME, SERVER_KEY_NAME,
};

use super::support::{identifier, tagged_bundle, Harness, DNS_NAME, NAME, NAMESPACE};

fn request() -> ProvisionRequest {
    ProvisionRequest::new(DNS_NAME, false)
}

#[tokio::test]
async fn test_write_read_conflict_overwrite() {
    let h = Harness::new();

    // write on an empty store creates the record
    let written = h.writer.write(&request()).await.unwrap();
    assert_eq!(written, tagged_bundle("v1"));
    assert_eq!(h.store.create_calls(), 1);
    assert_eq!(h.generator.last_dns_name().as_deref(), Some(DNS_NAME));

    let stored = h.store.snapshot(&identifier()).await.unwrap();
    let data = stored.data.as_ref().unwrap();
    assert_eq!(data[CA_CERT_NAME], b"v1-CA".to_vec());
    assert_eq!(data[SERVER_CERT_NAME], b"v1-CERT".to_vec());
    assert_eq!(data[SERVER_KEY_NAME], b"v1-KEY".to_vec());

    // read returns what was written
    let read = h.writer.read(&request()).await.unwrap();
    assert_eq!(read, Some(tagged_bundle("v1")));

    // a second write conflicts and leaves the record alone
    h.generator.set_bundle(tagged_bundle("v2"));
    let err = h.writer.write(&request()).await.unwrap_err();
    assert!(err.is_already_exists());
    assert!(matches!(
        err,
        CertWriterError::AlreadyExists { ref namespace, ref name }
            if namespace == NAMESPACE && name == NAME
    ));
    assert_eq!(h.store.snapshot(&identifier()).await.unwrap(), stored);

    // overwrite replaces the record
    let overwritten = h.writer.overwrite(&request()).await.unwrap();
    assert_eq!(overwritten, tagged_bundle("v2"));
    assert_eq!(h.writer.read(&request()).await.unwrap(), Some(tagged_bundle("v2")));
    assert_eq!(h.store.update_calls(), 1);
}

#[tokio::test]
async fn test_read_missing_record_is_not_found() {
    let h = Harness::new();

    let err = h.writer.read(&request()).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(
        err,
        CertWriterError::NotFound { ref namespace, ref name }
            if namespace == NAMESPACE && name == NAME
    ));
}

#[tokio::test]
async fn test_read_record_without_data_is_none() {
    let h = Harness::new();
    h.store.insert(Record::new(identifier(), None)).await;

    assert_eq!(h.writer.read(&request()).await.unwrap(), None);
}

#[tokio::test]
async fn test_overwrite_missing_record_is_not_found() {
    let h = Harness::new();

    let err = h.writer.overwrite(&request()).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_generator_failure_writes_nothing() {
    let h = Harness::new();
    h.generator.set_fail_next(true);

    let err = h.writer.write(&request()).await.unwrap_err();

    assert!(matches!(err, CertWriterError::Generation(_)));
    assert_eq!(h.store.create_calls(), 0);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_ensure_cert_creates_then_reuses() {
    let h = Harness::new();

    let first = h.writer.ensure_cert(DNS_NAME, false).await.unwrap();
    assert!(first.updated);
    assert_eq!(first.bundle, tagged_bundle("v1"));

    h.generator.set_bundle(tagged_bundle("v2"));
    let second = h.writer.ensure_cert(DNS_NAME, false).await.unwrap();
    assert!(!second.updated);
    assert_eq!(second.bundle, tagged_bundle("v1"));

    assert_eq!(h.generator.calls(), 1);
    assert_eq!(h.store.create_calls(), 1);
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn test_ensure_cert_repairs_incomplete_bundle() {
    let h = Harness::new();
    let broken = certwriter::certs::ArtifactBundle::new("old-CA", "", "old-KEY");
    h.store.insert(bundle_to_record(&broken, &identifier())).await;

    let provisioned = h.writer.ensure_cert(DNS_NAME, false).await.unwrap();

    assert!(provisioned.updated);
    assert_eq!(provisioned.bundle, tagged_bundle("v1"));
    assert_eq!(h.store.update_calls(), 1);
    assert_eq!(
        h.store.snapshot(&identifier()).await,
        Some(bundle_to_record(&tagged_bundle("v1"), &identifier()))
    );
}

#[tokio::test]
async fn test_ensure_cert_repairs_record_without_data() {
    let h = Harness::new();
    h.store.insert(Record::new(identifier(), None)).await;

    let provisioned = h.writer.ensure_cert(DNS_NAME, false).await.unwrap();

    assert!(provisioned.updated);
    assert_eq!(h.store.update_calls(), 1);
    assert_eq!(h.writer.read(&request()).await.unwrap(), Some(tagged_bundle("v1")));
}

#[tokio::test]
async fn test_concurrent_ensure_cert_converges() {
    let h = Arc::new(Harness::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let h = h.clone();
        handles.push(tokio::spawn(async move { h.writer.ensure_cert(DNS_NAME, false).await }));
    }

    for handle in handles {
        let provisioned = handle.await.unwrap().unwrap();
        assert_eq!(provisioned.bundle, tagged_bundle("v1"));
    }

    assert_eq!(h.store.len().await, 1);
    assert_eq!(h.store.update_calls(), 0);
    assert_eq!(h.writer.read(&request()).await.unwrap(), Some(tagged_bundle("v1")));
}

#[test]
fn test_inject_is_a_no_op() {
    let h = Harness::new();
    let owners = vec![certwriter::certs::ObjectReference {
        kind: "Deployment".into(),
        namespace: Some(NAMESPACE.into()),
        name: "webhook".into(),
    }];

    assert!(h.writer.inject(&owners).is_ok());
    assert_eq!(h.store.create_calls(), 0);
    assert_eq!(h.store.update_calls(), 0);
}
