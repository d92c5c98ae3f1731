//! Shared AWS plumbing: SDK configuration from the ambient environment and
//! conversion of SDK errors into the core's [`ProviderError`].

use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_utils_core::ProviderError;

/// Loads region, credentials and endpoint overrides from the standard AWS chain
/// (`AWS_*` variables, shared config/credentials files, instance metadata).
pub async fn load_sdk_config() -> SdkConfig {
    let config = aws_config::from_env().load().await;
    tracing::info!(
        region = config.region().map(|r| r.as_ref()).unwrap_or("<unset>"),
        "Loaded AWS configuration from environment"
    );
    config
}

/// Flattens any SDK error, with its full source chain, into a [`ProviderError`].
pub(crate) fn provider_error<E>(err: E) -> ProviderError
where
    E: std::error::Error,
{
    ProviderError::new(DisplayErrorContext(&err).to_string())
}
