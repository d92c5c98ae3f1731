#![doc = "aws-utils-core: core logic library for aws-utils."]

//! This crate holds every operation of aws-utils written against provider traits,
//! with no AWS SDK dependency. The `aws-utils` crate supplies the SDK-backed providers.
//!
//! # Modules
//! - [`upload`]: file and directory uploads with concurrent dispatch
//! - [`dns`]: single-record upserts with zone derivation
//! - [`records`]: record batches (Office 365 preset, records files)
//! - [`stack`]: create-or-update stack convergence
//! - [`contract`]: the provider traits and their request/response types
//! - [`error`]: the shared error taxonomy

pub mod contract;
pub mod dns;
pub mod error;
pub mod records;
pub mod stack;
pub mod upload;

pub use error::{Error, ProviderError, Result};
