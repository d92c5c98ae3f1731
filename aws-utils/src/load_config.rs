/// `load_config` module: Loads a static YAML records file into the core's [`RecordSpec`] list.
///
/// This module is the only place where user-supplied YAML is parsed.
///
/// # Accepted schema
///
/// ```yaml
/// records:
///   - name: example.com
///     type: MX
///     value: "10 mail.example.com"
///   - name: www.example.com
///     type: CNAME
///     value: example.com
/// ```
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary. Read failures name
/// the file; parse failures mention YAML.
///
/// AWS settings (region, credentials, endpoint) are not part of this file; they come from
/// the environment, see [`crate::aws::load_sdk_config`].
use anyhow::Result;
use aws_utils_core::records::RecordSpec;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct RecordsFile {
    #[serde(default)]
    records: Option<Vec<RecordSpec>>,
}

/// Loads the records to upsert from a YAML file. An empty or absent `records` list is allowed.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RecordSpec>> {
    let path_ref = path.as_ref();
    info!(records_path = ?path_ref, "Loading records from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(records_path = ?path_ref, "Records file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, records_path = ?path_ref, "Failed to read records file");
            return Err(anyhow::anyhow!(
                "Failed to read records file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let parsed: RecordsFile = match serde_yaml::from_str(&content) {
        Ok(parsed) => {
            info!(records_path = ?path_ref, "Parsed records YAML successfully");
            parsed
        }
        Err(e) => {
            error!(error = ?e, records_path = ?path_ref, "Failed to parse records YAML");
            return Err(anyhow::anyhow!("Failed to parse records YAML: {e}"));
        }
    };

    let records = parsed.records.unwrap_or_default();
    for record in &records {
        info!(name = %record.name, record_type = %record.record_type, "Parsed record from file");
    }
    Ok(records)
}
