//! Create-or-replace single DNS records through a [`DnsProvider`].

use tracing::{error, info};

use crate::contract::{DnsProvider, RecordSet};
use crate::error::{Error, Result};

/// TTL, in seconds, applied to every upserted record.
pub const RECORD_TTL: i64 = 300;

/// Derives the owning zone of `fqdn`: its last two labels plus a trailing dot.
///
/// `sub.example.com` gives `example.com.`. This is wrong for public suffixes with
/// more than one label: `www.example.co.uk` gives `co.uk.`, which will not match
/// the `example.co.uk.` zone.
pub fn zone_name_for(fqdn: &str) -> String {
    let labels: Vec<&str> = fqdn.strip_suffix('.').unwrap_or(fqdn).split('.').collect();
    let start = labels.len().saturating_sub(2);
    format!("{}.", labels[start..].join("."))
}

/// TXT values must be quoted on the wire; other types are sent unchanged.
pub fn record_value(record_type: &str, value: &str) -> String {
    if record_type == "TXT" {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

pub struct DnsRecordUpserter<P> {
    provider: P,
}

impl<P: DnsProvider> DnsRecordUpserter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Looks up the id of the zone named exactly `zone_name` (trailing dot included).
    pub async fn hosted_zone_id(&self, zone_name: &str) -> Result<String> {
        let zones = self.provider.list_hosted_zones().await?;
        match zones.into_iter().find(|zone| zone.name == zone_name) {
            Some(zone) => Ok(zone.id),
            None => {
                error!(zone = zone_name, "No hosted zone matches");
                Err(Error::NotFound(zone_name.to_string()))
            }
        }
    }

    /// Upserts `fqdn` with a single value in the zone derived by [`zone_name_for`].
    pub async fn upsert_record(&self, fqdn: &str, record_type: &str, value: &str) -> Result<()> {
        let zone_name = zone_name_for(fqdn);
        let zone_id = self.hosted_zone_id(&zone_name).await?;

        let record = RecordSet {
            name: fqdn.to_string(),
            record_type: record_type.to_string(),
            ttl: RECORD_TTL,
            value: record_value(record_type, value),
        };

        info!(
            record = fqdn,
            record_type,
            zone = %zone_name,
            zone_id = %zone_id,
            "Upserting record"
        );
        self.provider
            .upsert_record_set(zone_id, record)
            .await
            .map_err(|e| {
                error!(error = %e, record = fqdn, "Record upsert rejected");
                Error::Provider(e)
            })?;
        info!(record = fqdn, record_type, "Record upserted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_name_keeps_last_two_labels() {
        assert_eq!(zone_name_for("sub.example.com"), "example.com.");
        assert_eq!(zone_name_for("a.b.example.com"), "example.com.");
        assert_eq!(zone_name_for("example.com"), "example.com.");
        assert_eq!(zone_name_for("sub.example.com."), "example.com.");
    }

    #[test]
    fn zone_name_is_naive_for_multi_label_suffixes() {
        assert_eq!(zone_name_for("www.example.co.uk"), "co.uk.");
    }

    #[test]
    fn single_label_name_becomes_its_own_zone() {
        assert_eq!(zone_name_for("localhost"), "localhost.");
    }

    #[test]
    fn only_txt_values_are_quoted() {
        assert_eq!(record_value("TXT", "hello"), "\"hello\"");
        assert_eq!(record_value("A", "98.101.23.99"), "98.101.23.99");
    }
}
