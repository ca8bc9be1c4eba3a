use super::types::{TextToImageRequest, TextToImageResponse};
use crate::{Error, Result};
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.stability.ai";
pub const TEXT_TO_IMAGE_PATH: &str =
    "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

pub struct StabilityHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StabilityHttpClient {
    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn text_to_image(&self, request: &TextToImageRequest) -> Result<TextToImageResponse> {
        let url = format!("{}{}", self.base_url, TEXT_TO_IMAGE_PATH);
        tracing::debug!("Sending text-to-image request to Stability AI");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Stability AI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Stability AI error (status {}): {}", status, error_text);
            return Err(Error::ProviderRequest(format!(
                "Stability AI error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Stability AI response: {}", e);
            Error::ProviderRequest(format!("Failed to parse Stability AI response: {}", e))
        })
    }
}
