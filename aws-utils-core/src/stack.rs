//! Converge an infrastructure stack: create it when absent, update it otherwise,
//! and wait for the provider to report completion.

use std::path::Path;
use tracing::{error, info};

use crate::contract::{
    StackOperation, StackProvider, StackRequest, TemplateSource, CAPABILITY_IAM, DELETE_COMPLETE,
};
use crate::error::{Error, Result};

impl TemplateSource {
    /// Interprets a command-line template argument: `http(s)://` URLs are passed
    /// to the provider, anything else is read as a local template file.
    pub async fn from_cli_arg(arg: &str) -> Result<Self> {
        if arg.starts_with("https://") || arg.starts_with("http://") {
            return Ok(TemplateSource::Url(arg.to_string()));
        }
        Self::from_file(arg).await
    }

    /// Reads a local template file into a [`TemplateSource::Body`].
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = tokio::fs::read_to_string(path).await.map_err(|e| {
            error!(error = ?e, template = %path.display(), "Failed to read template file");
            Error::filesystem(path, e)
        })?;
        Ok(TemplateSource::Body(body))
    }
}

pub struct StackConverger<P> {
    provider: P,
}

impl<P: StackProvider> StackConverger<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// True when a stack named exactly `name` exists and is not `DELETE_COMPLETE`.
    pub async fn stack_exists(&self, name: &str) -> Result<bool> {
        let stacks = self.provider.list_stacks().await?;
        Ok(stacks
            .iter()
            .any(|stack| stack.name == name && stack.status != DELETE_COMPLETE))
    }

    /// Creates or updates `name` from `template` and waits for the terminal status.
    pub async fn converge(&self, name: &str, template: TemplateSource) -> Result<StackOperation> {
        let request = StackRequest {
            name: name.to_string(),
            template,
            capabilities: vec![CAPABILITY_IAM.to_string()],
        };

        let operation = if self.stack_exists(name).await? {
            info!(stack = name, "Stack exists, updating existing stack");
            self.provider.update_stack(request).await?;
            StackOperation::Update
        } else {
            info!(stack = name, "Stack does not exist, creating new stack");
            self.provider.create_stack(request).await?;
            StackOperation::Create
        };

        info!(stack = name, ?operation, "Operation accepted, waiting for resources");
        self.provider
            .wait_for(name.to_string(), operation)
            .await
            .map_err(|e| {
                error!(error = %e, stack = name, ?operation, "Stack did not reach a complete status");
                Error::Provider(e)
            })?;
        info!(stack = name, ?operation, "Stack operation complete");
        Ok(operation)
    }

    /// Converges using the template body read from `path`.
    pub async fn converge_from_file(
        &self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<StackOperation> {
        let template = TemplateSource::from_file(path).await?;
        self.converge(name, template).await
    }

    /// Converges using a template hosted at `url`.
    pub async fn converge_from_url(&self, name: &str, url: &str) -> Result<StackOperation> {
        self.converge(name, TemplateSource::Url(url.to_string())).await
    }
}
