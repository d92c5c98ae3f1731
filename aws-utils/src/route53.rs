use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;

use aws_utils_core::contract::{DnsProvider, HostedZone, RecordSet};
use aws_utils_core::ProviderError;

use crate::aws::provider_error;

/// [`DnsProvider`] backed by Route53.
pub struct Route53Dns {
    client: Client,
}

impl Route53Dns {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl DnsProvider for Route53Dns {
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>, ProviderError> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = ?e, "Failed to list hosted zones");
                    provider_error(e)
                })?;

            zones.extend(page.hosted_zones().iter().map(|zone| HostedZone {
                id: zone.id().to_string(),
                name: zone.name().to_string(),
            }));

            match page.next_marker() {
                Some(next) if page.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        tracing::info!(count = zones.len(), "Listed hosted zones");
        Ok(zones)
    }

    async fn upsert_record_set(
        &self,
        zone_id: String,
        record: RecordSet,
    ) -> Result<(), ProviderError> {
        let resource_record = ResourceRecord::builder()
            .value(record.value)
            .build()
            .map_err(provider_error)?;
        let record_set = ResourceRecordSet::builder()
            .name(record.name)
            .r#type(RrType::from(record.record_type.as_str()))
            .ttl(record.ttl)
            .resource_records(resource_record)
            .build()
            .map_err(provider_error)?;
        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(provider_error)?;
        let batch = ChangeBatch::builder()
            .changes(change)
            .build()
            .map_err(provider_error)?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, zone_id = %zone_id, "ChangeResourceRecordSets rejected");
                provider_error(e)
            })?;

        tracing::debug!(change = ?output.change_info(), "Change accepted");
        Ok(())
    }
}
