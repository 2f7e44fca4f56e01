//! Concrete generation clients

pub mod mock;
pub mod openai;

use crate::client::{AssetClient, FallbackClient};
use crate::config::EaselConfig;
use easel_core::Result;

/// Build the runner-facing client from configuration: the primary model,
/// plus a fallback model wrapper when one is configured.
pub fn from_config(config: &EaselConfig, model_override: Option<&str>) -> Result<FallbackClient> {
    let api_key = config.require_api_key()?.to_string();
    let api_url = config.api_url().to_string();

    let primary_model = model_override.unwrap_or(config.model());
    let primary: Box<dyn AssetClient> = Box::new(openai::OpenAiClient::new(
        api_key.clone(),
        api_url.clone(),
        primary_model.to_string(),
    ));

    let fallback: Option<Box<dyn AssetClient>> = config
        .fallback_model()
        .filter(|m| *m != primary_model)
        .map(|m| {
            Box::new(openai::OpenAiClient::new(api_key, api_url, m.to_string()))
                as Box<dyn AssetClient>
        });

    Ok(FallbackClient::new(primary, fallback))
}
