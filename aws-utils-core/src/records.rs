//! Batches of DNS records: the Office 365 preset and batch application.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::contract::DnsProvider;
use crate::dns::DnsRecordUpserter;
use crate::error::Result;

/// One record to upsert, as written in a records file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
}

impl RecordSpec {
    pub fn new(name: impl Into<String>, record_type: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub struct RecordOutcome {
    pub record: RecordSpec,
    pub result: Result<()>,
}

/// Records pointing `domain` at Office 365 mail, autodiscover, device
/// enrollment and Skype for Business.
///
/// The MX target is built from the first two labels of `domain` joined by `-`
/// (`example.com` gives `example-com.mail.protection.outlook.com`).
pub fn office365_records(domain: &str) -> Vec<RecordSpec> {
    let mx_host = domain.split('.').take(2).collect::<Vec<_>>().join("-");
    let sub = |label: &str| format!("{label}.{domain}");

    vec![
        RecordSpec::new(
            domain,
            "MX",
            format!("0 {mx_host}.mail.protection.outlook.com"),
        ),
        RecordSpec::new(domain, "TXT", "v=spf1 include:spf.protection.outlook.com -all"),
        RecordSpec::new(sub("autodiscover"), "CNAME", "autodiscover.outlook.com"),
        RecordSpec::new(
            sub("enterpriseenrollment"),
            "CNAME",
            "enterpriseenrollment.manage.microsoft.com",
        ),
        RecordSpec::new(
            sub("enterpriseregistration"),
            "CNAME",
            "enterpriseregistration.windows.net",
        ),
        RecordSpec::new(sub("lyncdiscover"), "CNAME", "webdir.online.lync.com"),
        RecordSpec::new(sub("msoid"), "CNAME", "clientconfig.microsoftonline-p.net"),
        RecordSpec::new(sub("sip"), "CNAME", "sipdir.online.lync.com"),
        RecordSpec::new(sub("_sip._tls"), "SRV", "100 1 443 sipdir.online.lync.com"),
        RecordSpec::new(
            sub("_sipfederationtls._tcp"),
            "SRV",
            "100 1 5061 sipfed.online.lync.com",
        ),
    ]
}

/// Upserts every record concurrently and reports each outcome, in input order.
/// A failed record never stops the others.
pub async fn apply_records<P: DnsProvider>(
    upserter: &DnsRecordUpserter<P>,
    records: &[RecordSpec],
) -> Vec<RecordOutcome> {
    info!(count = records.len(), "Applying record batch");

    let upserts = records.iter().map(|record| async move {
        let result = upserter
            .upsert_record(&record.name, &record.record_type, &record.value)
            .await;
        if let Err(e) = &result {
            error!(record = %record.name, record_type = %record.record_type, error = %e, "Record failed");
        }
        RecordOutcome {
            record: record.clone(),
            result,
        }
    });
    let outcomes = join_all(upserts).await;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(total = outcomes.len(), failed, "Record batch finished");
    outcomes
}
