//! Dry-run renders records instead of touching the backend.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use certwriter::certs::{
    bundle_to_record, parse_rendered_record, CertReadWriter, CertWriter, ProvisionRequest,
};

use super::support::{identifier, tagged_bundle, Harness, DNS_NAME, NAME, NAMESPACE};

fn dry_run() -> ProvisionRequest {
    ProvisionRequest::new(DNS_NAME, true)
}

fn documents(rendered: &str) -> Vec<&str> {
    rendered.split("---\n").filter(|doc| !doc.trim().is_empty()).collect()
}

#[tokio::test]
async fn test_dry_run_write_renders_record() {
    let h = Harness::new();

    let bundle = h.writer.write(&dry_run()).await.unwrap();
    assert_eq!(bundle, tagged_bundle("v1"));

    let rendered = h.rendered();
    assert!(rendered.starts_with("---\n"));
    assert!(rendered.contains(&format!("namespace: {}", NAMESPACE)));
    assert!(rendered.contains(&format!("name: {}", NAME)));
    for value in ["v1-CA", "v1-CERT", "v1-KEY"] {
        assert!(rendered.contains(&STANDARD.encode(value)), "missing {}", value);
    }

    assert_eq!(h.store.create_calls(), 0);
    assert_eq!(h.store.update_calls(), 0);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_dry_run_rendering_parses_back() {
    let h = Harness::new();
    h.writer.overwrite(&dry_run()).await.unwrap();

    let rendered = h.rendered();
    let docs = documents(&rendered);
    assert_eq!(docs.len(), 1);

    let record = parse_rendered_record(docs[0]).unwrap();
    assert_eq!(record, bundle_to_record(&tagged_bundle("v1"), &identifier()));
}

#[tokio::test]
async fn test_dry_run_leaves_existing_record_untouched() {
    let h = Harness::with_bundle(tagged_bundle("v2"));
    let existing = bundle_to_record(&tagged_bundle("v1"), &identifier());
    h.store.insert(existing.clone()).await;

    h.writer.overwrite(&dry_run()).await.unwrap();

    assert_eq!(h.store.snapshot(&identifier()).await, Some(existing));
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn test_dry_run_read_is_not_found() {
    let h = Harness::new();
    h.store.insert(bundle_to_record(&tagged_bundle("v1"), &identifier())).await;

    let err = h.writer.read(&dry_run()).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_dry_run_ensure_cert_generates_once_and_renders_once() {
    let h = Harness::new();

    let provisioned = h.writer.ensure_cert(DNS_NAME, true).await.unwrap();

    assert!(provisioned.updated);
    assert_eq!(provisioned.bundle, tagged_bundle("v1"));
    assert_eq!(h.generator.calls(), 1);
    assert_eq!(documents(&h.rendered()).len(), 1);
    assert_eq!(h.store.create_calls(), 0);
    assert_eq!(h.store.update_calls(), 0);
}

#[tokio::test]
async fn test_dry_run_is_per_call() {
    let h = Harness::new();

    h.writer.ensure_cert(DNS_NAME, true).await.unwrap();
    assert!(h.store.is_empty().await);

    let provisioned = h.writer.ensure_cert(DNS_NAME, false).await.unwrap();
    assert!(provisioned.updated);
    assert_eq!(h.store.create_calls(), 1);
    assert_eq!(documents(&h.rendered()).len(), 1);
}
