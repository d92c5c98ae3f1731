use aws_utils_core::contract::{HostedZone, MockDnsProvider, RecordSet};
use aws_utils_core::dns::{DnsRecordUpserter, RECORD_TTL};
use aws_utils_core::{Error, ProviderError};

fn zones() -> Vec<HostedZone> {
    vec![
        HostedZone {
            id: "/hostedzone/ZOTHER".into(),
            name: "example.org.".into(),
        },
        HostedZone {
            id: "/hostedzone/Z123".into(),
            name: "example.com.".into(),
        },
    ]
}

#[tokio::test]
async fn test_txt_record_is_quoted_and_sent_to_derived_zone() {
    let mut provider = MockDnsProvider::new();
    provider
        .expect_list_hosted_zones()
        .times(1)
        .returning(|| Ok(zones()));
    provider
        .expect_upsert_record_set()
        .withf(|zone_id: &String, record: &RecordSet| {
            zone_id == "/hostedzone/Z123"
                && record.name == "sub.example.com"
                && record.record_type == "TXT"
                && record.value == "\"hello\""
                && record.ttl == 300
        })
        .times(1)
        .returning(|_, _| Ok(()));

    DnsRecordUpserter::new(provider)
        .upsert_record("sub.example.com", "TXT", "hello")
        .await
        .expect("Upsert should succeed");
}

#[tokio::test]
async fn test_non_txt_value_passes_through_unchanged() {
    let mut provider = MockDnsProvider::new();
    provider.expect_list_hosted_zones().returning(|| Ok(zones()));
    provider
        .expect_upsert_record_set()
        .withf(|_, record: &RecordSet| {
            record.record_type == "A" && record.value == "98.101.23.99" && record.ttl == RECORD_TTL
        })
        .times(1)
        .returning(|_, _| Ok(()));

    DnsRecordUpserter::new(provider)
        .upsert_record("sub.example.com", "A", "98.101.23.99")
        .await
        .expect("Upsert should succeed");
}

#[tokio::test]
async fn test_unmatched_zone_fails_with_not_found() {
    let mut provider = MockDnsProvider::new();
    provider.expect_list_hosted_zones().returning(|| Ok(zones()));
    provider.expect_upsert_record_set().never();

    let err = DnsRecordUpserter::new(provider)
        .upsert_record("www.missing.net", "CNAME", "target.example.com")
        .await
        .unwrap_err();

    match &err {
        Error::NotFound(name) => assert_eq!(name, "missing.net."),
        other => panic!("Expected NotFound, got: {other:?}"),
    }
    assert_eq!(err.to_string(), "Could not find hosted zone for missing.net.");
}

#[tokio::test]
async fn test_hosted_zone_id_requires_exact_name() {
    let mut provider = MockDnsProvider::new();
    provider.expect_list_hosted_zones().returning(|| Ok(zones()));
    let upserter = DnsRecordUpserter::new(provider);

    assert_eq!(
        upserter.hosted_zone_id("example.com.").await.unwrap(),
        "/hostedzone/Z123"
    );
    // Without the trailing dot the zone does not match.
    assert!(matches!(
        upserter.hosted_zone_id("example.com").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_zone_listing_error_is_propagated() {
    let mut provider = MockDnsProvider::new();
    provider
        .expect_list_hosted_zones()
        .returning(|| Err(ProviderError::new("ExpiredToken")));
    provider.expect_upsert_record_set().never();

    let err = DnsRecordUpserter::new(provider)
        .upsert_record("sub.example.com", "A", "10.0.0.1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider(ref e) if e.message() == "ExpiredToken"));
}

#[tokio::test]
async fn test_rejected_change_carries_provider_message() {
    let mut provider = MockDnsProvider::new();
    provider.expect_list_hosted_zones().returning(|| Ok(zones()));
    provider
        .expect_upsert_record_set()
        .returning(|_, _| Err(ProviderError::new("InvalidChangeBatch: bad value")));

    let err = DnsRecordUpserter::new(provider)
        .upsert_record("sub.example.com", "A", "not-an-ip")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "InvalidChangeBatch: bad value");
}
