///
/// This module implements the CLI interface for aws-utils: command parsing, positional
/// arguments, and the async entrypoint shared by `main()` and the integration tests.
///
/// All operation logic (traversal, uploads, zone lookup, stack convergence) lives in
/// [`aws-utils-core`]. This module wires the AWS-backed providers into it and reports
/// results to the user.
///
/// ## How To Use
/// - From the shell: `aws-utils <subcommand> <args...>`, see `--help`.
/// - Programmatically: build a [`Cli`] and call [`run`].
///
/// AWS credentials and region come from the ambient environment.
///
/// [`aws-utils-core`]: ../../aws-utils-core/
use crate::aws::load_sdk_config;
use crate::cloudformation::CloudFormationStacks;
use crate::load_config::load_records;
use crate::route53::Route53Dns;
use crate::s3::S3ObjectStore;
use anyhow::{Context, Result};
use aws_utils_core::contract::TemplateSource;
use aws_utils_core::dns::DnsRecordUpserter;
use aws_utils_core::records::{apply_records, office365_records, RecordSpec};
use aws_utils_core::stack::StackConverger;
use aws_utils_core::upload::{DirectoryUploader, UploadRoot};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Printed under every usage banner.
pub const AMBIENT_NOTE: &str = "Assumes AWS credentials are configured on your machine (e.g. via the AWS CLI or AWS_* variables)";

/// CLI for aws-utils: S3 uploads, Route53 records and CloudFormation stacks.
#[derive(Parser)]
#[clap(
    name = "aws-utils",
    version,
    about = "Upload files to S3, upsert Route53 records and deploy CloudFormation stacks",
    after_help = AMBIENT_NOTE
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a file or a directory tree to an S3 bucket
    #[clap(after_help = "Example: aws-utils upload-dir /home/user/site public-read mybucket site/")]
    UploadDir {
        /// File or directory to upload
        path: PathBuf,
        /// Canned ACL for every object (e.g. private, public-read)
        acl: String,
        /// Destination bucket
        bucket: String,
        /// Prepended verbatim to every object key
        prefix: Option<String>,
    },
    /// Create or replace a single Route53 record
    #[clap(after_help = "Example: aws-utils update-record sub.example.com A 98.101.23.99")]
    UpdateRecord {
        /// Fully qualified record name
        record: String,
        /// Record type (A, CNAME, TXT, MX, ...)
        #[clap(value_name = "TYPE")]
        record_type: String,
        /// Record value; TXT values are quoted automatically
        value: String,
    },
    /// Upsert the records that point a domain at Office 365
    #[clap(
        name = "o365-records",
        after_help = "Assumes the domain has been added and verified in Office 365"
    )]
    O365Records {
        /// Domain whose hosted zone receives the records
        domain: String,
    },
    /// Upsert every record listed in a YAML records file
    ApplyRecords {
        /// Path to the YAML records file
        file: PathBuf,
    },
    /// Create or update a CloudFormation stack and wait for it to complete
    #[clap(after_help = "Example: aws-utils deploy-stack web ./template.yaml")]
    DeployStack {
        /// Stack name
        name: String,
        /// Local template file, or an http(s) URL of a hosted template
        template: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::UploadDir {
            path,
            acl,
            bucket,
            prefix,
        } => {
            let root = UploadRoot {
                path,
                bucket,
                acl,
                prefix,
            };
            tracing::info!(command = "upload-dir", path = %root.path.display(), "Starting upload");
            let config = load_sdk_config().await;
            let uploader = DirectoryUploader::new(S3ObjectStore::from_conf(&config))
                .on_uploaded(|key| println!("Uploaded {key}"));
            let report = uploader
                .upload(&root)
                .await
                .with_context(|| format!("Upload of {} failed", root.path.display()))?;
            tracing::debug!(report = %serde_json::to_string(&report)?, "Upload report");
        }
        Commands::UpdateRecord {
            record,
            record_type,
            value,
        } => {
            tracing::info!(command = "update-record", %record, %record_type, "Updating record");
            let config = load_sdk_config().await;
            DnsRecordUpserter::new(Route53Dns::from_conf(&config))
                .upsert_record(&record, &record_type, &value)
                .await
                .with_context(|| format!("Update of {record} {record_type} failed"))?;
        }
        Commands::O365Records { domain } => {
            tracing::info!(command = "o365-records", %domain, "Applying Office 365 records");
            apply_record_batch(office365_records(&domain)).await?;
        }
        Commands::ApplyRecords { file } => {
            let records = load_records(&file)?;
            tracing::info!(command = "apply-records", count = records.len(), "Applying records file");
            apply_record_batch(records).await?;
        }
        Commands::DeployStack { name, template } => {
            let template = TemplateSource::from_cli_arg(&template)
                .await
                .with_context(|| format!("Cannot load template {template}"))?;
            tracing::info!(command = "deploy-stack", stack = %name, "Converging stack");
            let config = load_sdk_config().await;
            let operation = StackConverger::new(CloudFormationStacks::from_conf(&config))
                .converge(&name, template)
                .await
                .with_context(|| format!("Deployment of stack {name} failed"))?;
            println!("Stack {name}: {operation:?} complete");
        }
    }

    println!("Success");
    Ok(())
}

/// Upserts a batch, printing one line per record. Fails if any record failed.
async fn apply_record_batch(records: Vec<RecordSpec>) -> Result<()> {
    let config = load_sdk_config().await;
    let upserter = DnsRecordUpserter::new(Route53Dns::from_conf(&config));

    for record in &records {
        println!("Creating {} {} {}", record.name, record.record_type, record.value);
    }
    let outcomes = apply_records(&upserter, &records).await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("Success: {} {}", outcome.record.name, outcome.record.record_type),
            Err(e) => {
                failed += 1;
                eprintln!(
                    "Failed: {} {}: {e}",
                    outcome.record.name, outcome.record.record_type
                );
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} records failed", outcomes.len());
    }
    Ok(())
}
