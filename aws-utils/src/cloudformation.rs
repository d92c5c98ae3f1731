use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::types::Capability;
use aws_sdk_cloudformation::Client;
use std::time::Duration;
use uuid::Uuid;

use aws_utils_core::contract::{
    StackOperation, StackProvider, StackRequest, StackSummary, TemplateSource,
};
use aws_utils_core::ProviderError;

use crate::aws::provider_error;

/// Upper bound handed to the SDK waiters: 120 polls of 30 seconds, the
/// provider's own default for stack create/update waits.
const STACK_WAIT_LIMIT: Duration = Duration::from_secs(120 * 30);

/// [`StackProvider`] backed by CloudFormation.
pub struct CloudFormationStacks {
    client: Client,
}

impl CloudFormationStacks {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl StackProvider for CloudFormationStacks {
    async fn list_stacks(&self) -> Result<Vec<StackSummary>, ProviderError> {
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_stacks()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = ?e, "Failed to list stacks");
                    provider_error(e)
                })?;

            stacks.extend(page.stack_summaries().iter().map(|summary| StackSummary {
                name: summary.stack_name().to_string(),
                status: summary.stack_status().as_str().to_string(),
            }));

            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        tracing::info!(count = stacks.len(), "Listed stacks");
        Ok(stacks)
    }

    async fn create_stack(&self, request: StackRequest) -> Result<(), ProviderError> {
        let token = Uuid::new_v4().to_string();
        let mut call = self
            .client
            .create_stack()
            .stack_name(&request.name)
            .client_request_token(&token);
        call = match &request.template {
            TemplateSource::Body(body) => call.template_body(body),
            TemplateSource::Url(url) => call.template_url(url),
        };
        for capability in &request.capabilities {
            call = call.capabilities(Capability::from(capability.as_str()));
        }

        let output = call.send().await.map_err(|e| {
            tracing::error!(error = ?e, stack = %request.name, "CreateStack rejected");
            provider_error(e)
        })?;
        tracing::info!(
            stack = %request.name,
            stack_id = output.stack_id().unwrap_or_default(),
            request_token = %token,
            "CreateStack accepted"
        );
        Ok(())
    }

    async fn update_stack(&self, request: StackRequest) -> Result<(), ProviderError> {
        let token = Uuid::new_v4().to_string();
        let mut call = self
            .client
            .update_stack()
            .stack_name(&request.name)
            .client_request_token(&token);
        call = match &request.template {
            TemplateSource::Body(body) => call.template_body(body),
            TemplateSource::Url(url) => call.template_url(url),
        };
        for capability in &request.capabilities {
            call = call.capabilities(Capability::from(capability.as_str()));
        }

        let output = call.send().await.map_err(|e| {
            tracing::error!(error = ?e, stack = %request.name, "UpdateStack rejected");
            provider_error(e)
        })?;
        tracing::info!(
            stack = %request.name,
            stack_id = output.stack_id().unwrap_or_default(),
            request_token = %token,
            "UpdateStack accepted"
        );
        Ok(())
    }

    async fn wait_for(&self, name: String, operation: StackOperation) -> Result<(), ProviderError> {
        tracing::info!(stack = %name, ?operation, "Waiting for stack to complete");
        let result = match operation {
            StackOperation::Create => self
                .client
                .wait_until_stack_create_complete()
                .stack_name(&name)
                .wait(STACK_WAIT_LIMIT)
                .await
                .map(|_| ())
                .map_err(provider_error),
            StackOperation::Update => self
                .client
                .wait_until_stack_update_complete()
                .stack_name(&name)
                .wait(STACK_WAIT_LIMIT)
                .await
                .map(|_| ())
                .map_err(provider_error),
        };
        if let Err(e) = &result {
            tracing::error!(error = %e, stack = %name, ?operation, "Stack wait failed");
        }
        result
    }
}
