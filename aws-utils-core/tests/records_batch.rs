use aws_utils_core::contract::{HostedZone, MockDnsProvider, RecordSet};
use aws_utils_core::dns::DnsRecordUpserter;
use aws_utils_core::records::{apply_records, office365_records, RecordSpec};
use aws_utils_core::Error;

#[test]
fn test_office365_records_for_domain() {
    let records = office365_records("example.com");
    assert_eq!(records.len(), 10);

    assert_eq!(
        records[0],
        RecordSpec::new("example.com", "MX", "0 example-com.mail.protection.outlook.com")
    );
    assert_eq!(records[1].record_type, "TXT");
    assert_eq!(records[1].value, "v=spf1 include:spf.protection.outlook.com -all");

    let cnames = records.iter().filter(|r| r.record_type == "CNAME").count();
    let srvs: Vec<_> = records.iter().filter(|r| r.record_type == "SRV").collect();
    assert_eq!(cnames, 6);
    assert_eq!(srvs.len(), 2);
    assert_eq!(srvs[0].name, "_sip._tls.example.com");
    assert_eq!(srvs[1].value, "100 1 5061 sipfed.online.lync.com");

    assert!(records
        .iter()
        .all(|r| r.name == "example.com" || r.name.ends_with(".example.com")));
}

#[tokio::test]
async fn test_apply_records_reports_each_outcome() {
    let mut provider = MockDnsProvider::new();
    provider.expect_list_hosted_zones().returning(|| {
        Ok(vec![HostedZone {
            id: "Z1".into(),
            name: "example.com.".into(),
        }])
    });
    provider
        .expect_upsert_record_set()
        .withf(|zone_id: &String, _: &RecordSet| zone_id == "Z1")
        .times(2)
        .returning(|_, _| Ok(()));

    let records = vec![
        RecordSpec::new("example.com", "TXT", "v=spf1 -all"),
        RecordSpec::new("www.unknown.org", "CNAME", "example.com"),
        RecordSpec::new("www.example.com", "CNAME", "example.com"),
    ];

    let upserter = DnsRecordUpserter::new(provider);
    let outcomes = apply_records(&upserter, &records).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].record, records[0]);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(Error::NotFound(ref zone)) if zone == "unknown.org."
    ));
    assert!(outcomes[2].result.is_ok());
}
