use certwriter::certs::{
    bundle_to_record, parse_rendered_record, record_to_bundle, render_record, ArtifactBundle,
    Record, RecordData, RecordIdentifier, CA_CERT_NAME,
};
use proptest::prelude::*;

fn bytes() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

fn identifier() -> impl Strategy<Value = RecordIdentifier> {
    ("[a-z][a-z0-9-]{0,20}", "[a-z][a-z0-9-]{0,30}")
        .prop_map(|(namespace, name)| RecordIdentifier::new(namespace, name))
}

proptest! {
    #[test]
    fn bundle_survives_record_conversion(
        ca in bytes(),
        cert in bytes(),
        key in bytes(),
        id in identifier(),
    ) {
        let bundle = ArtifactBundle::new(ca, cert, key);
        let record = bundle_to_record(&bundle, &id);

        prop_assert_eq!(&record.identifier, &id);
        prop_assert_eq!(record.data.as_ref().map(|data| data.len()), Some(3));
        prop_assert_eq!(record_to_bundle(&record), Some(bundle));
    }

    #[test]
    fn record_is_absent_only_without_data(
        id in identifier(),
        fields in proptest::collection::btree_map("[a-z.-]{1,12}", bytes(), 0..4),
    ) {
        prop_assert_eq!(record_to_bundle(&Record::new(id.clone(), None)), None);

        let data: RecordData = fields;
        let expected_ca = data.get(CA_CERT_NAME).cloned().unwrap_or_default();
        let bundle = record_to_bundle(&Record::new(id, Some(data)));

        prop_assert!(bundle.is_some());
        let bundle = bundle.unwrap();
        prop_assert_eq!(bundle.ca_cert(), expected_ca.as_slice());
    }

    #[test]
    fn rendered_record_parses_back(
        ca in bytes(),
        cert in bytes(),
        key in bytes(),
        id in identifier(),
    ) {
        let record = bundle_to_record(&ArtifactBundle::new(ca, cert, key), &id);
        let rendered = render_record(&record).unwrap();

        prop_assert_eq!(parse_rendered_record(&rendered).unwrap(), record);
    }
}
