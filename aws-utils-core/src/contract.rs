//! # contract: provider interfaces consumed by the core
//!
//! This module defines the three traits the core operations are written against,
//! plus the plain data types that cross them:
//!
//! - [`ObjectStore`]: put a single object into a bucket
//! - [`DnsProvider`]: list hosted zones and upsert a record set
//! - [`StackProvider`]: list, create, update and await infrastructure stacks
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`; the generated `Mock*` types are exported
//!   under the default `test-export-mocks` feature so downstream crates can test against them.
//!
//! ## Implementations
//! - The `aws-utils` crate implements these traits on top of the AWS SDK.
//! - Implementations flatten their transport/SDK errors into [`ProviderError`].

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::ProviderError;

/// One object to store. The body is an open file handle owned by the request,
/// so it is closed as soon as the request is consumed or dropped.
#[derive(Debug)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    /// Canned ACL, passed through unvalidated.
    pub acl: String,
    pub content_type: String,
    pub body: tokio::fs::File,
}

/// Destination for uploaded objects.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store one object, overwriting any object already under the same key.
    async fn put_object(&self, request: PutObject) -> Result<(), ProviderError>;
}

/// A hosted zone as reported by the DNS provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    pub id: String,
    /// Fully qualified, with the trailing dot (e.g. `example.com.`).
    pub name: String,
}

/// A single-valued record set to create or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub name: String,
    pub record_type: String,
    pub ttl: i64,
    pub value: String,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every hosted zone visible to the caller.
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>, ProviderError>;

    /// Submit a single UPSERT change for `record` in the given zone.
    async fn upsert_record_set(
        &self,
        zone_id: String,
        record: RecordSet,
    ) -> Result<(), ProviderError>;
}

/// Status string the provider reports for a stack that no longer exists.
pub const DELETE_COMPLETE: &str = "DELETE_COMPLETE";

/// Capability flag acknowledging that a template may create IAM resources.
pub const CAPABILITY_IAM: &str = "CAPABILITY_IAM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub name: String,
    pub status: String,
}

/// Where a stack template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Inline template body (JSON or YAML text).
    Body(String),
    /// Template hosted at a URL, typically in S3.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub name: String,
    pub template: TemplateSource,
    pub capabilities: Vec<String>,
}

/// Which of the two convergence branches ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOperation {
    Create,
    Update,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StackProvider: Send + Sync {
    async fn list_stacks(&self) -> Result<Vec<StackSummary>, ProviderError>;

    async fn create_stack(&self, request: StackRequest) -> Result<(), ProviderError>;

    async fn update_stack(&self, request: StackRequest) -> Result<(), ProviderError>;

    /// Block until the stack reaches the terminal "complete" status of `operation`.
    ///
    /// Any timeout is the provider's own; callers enforce none.
    async fn wait_for(&self, name: String, operation: StackOperation)
        -> Result<(), ProviderError>;
}
