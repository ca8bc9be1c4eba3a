//! Story generation entry point.
//!
//! [`StoryGenerator`] picks an adapter by provider name, runs it, and applies
//! the failure policy: story errors always reach the caller, image errors are
//! replaced by a placeholder illustration.

use crate::ai::{placeholder_image_url, ProviderFactory};
use crate::models::{
    ImageReference, Page, Provider, Story, StoryDraft, StoryParameters, StoredParameters,
};
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Stateless façade over the provider adapters. Cheap to clone.
#[derive(Clone)]
pub struct StoryGenerator {
    factory: Arc<dyn ProviderFactory>,
}

impl StoryGenerator {
    pub fn new<F>(factory: F) -> Self
    where
        F: ProviderFactory + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Generate story text with `provider_name`'s adapter.
    ///
    /// Unknown provider names fail before any adapter is built.
    pub async fn generate_story(
        &self,
        credential: &str,
        params: &StoryParameters,
        provider_name: &str,
    ) -> Result<StoryDraft> {
        let result: Result<StoryDraft> = async {
            let provider: Provider = provider_name.parse()?;
            let adapter = self.factory.connect(provider, credential)?;
            adapter.generate_story(params).await
        }
        .await;

        result.map_err(|e| {
            error!("Error generating story with '{}': {}", provider_name, e);
            e
        })
    }

    /// Illustrate one page. Never fails: any error yields a placeholder URL.
    pub async fn generate_image(
        &self,
        credential: &str,
        image_prompt: &str,
        provider_name: &str,
    ) -> ImageReference {
        let result: Result<ImageReference> = async {
            let provider: Provider = provider_name.parse()?;
            let adapter = self.factory.connect(provider, credential)?;
            adapter.generate_image(image_prompt).await
        }
        .await;

        match result {
            Ok(image) => image,
            Err(Error::ImageGenerationUnsupported(reason)) => {
                info!("Using placeholder image, {}: {}", provider_name, reason);
                ImageReference::Remote(placeholder_image_url(image_prompt))
            }
            Err(e) => {
                warn!(
                    "Error generating image with '{}', using placeholder: {}",
                    provider_name, e
                );
                ImageReference::Remote(placeholder_image_url(image_prompt))
            }
        }
    }

    /// Generate a complete illustrated story ready for the library.
    ///
    /// Page images are requested concurrently; each one degrades on its own.
    pub async fn create_story(
        &self,
        credential: &str,
        params: &StoryParameters,
        provider_name: &str,
    ) -> Result<Story> {
        if params.prompt.trim().is_empty() {
            return Err(Error::InvalidInput("story prompt is empty".to_string()));
        }
        if credential.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "no API key provided for '{}'",
                provider_name
            )));
        }
        let provider: Provider = provider_name.parse().map_err(|e| {
            error!("Error generating story: {}", e);
            e
        })?;

        let draft = self.generate_story(credential, params, provider_name).await?;
        info!(
            "Generated story '{}' with {} pages, illustrating",
            draft.title,
            draft.pages.len()
        );

        let mut tasks = JoinSet::new();
        for (index, page) in draft.pages.iter().enumerate() {
            let generator = self.clone();
            let credential = credential.to_string();
            let image_prompt = page.image_prompt.clone();
            tasks.spawn(async move {
                let image = generator
                    .generate_image(&credential, &image_prompt, provider.as_str())
                    .await;
                (index, image)
            });
        }

        let mut images: Vec<Option<ImageReference>> = vec![None; draft.pages.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, image)) => images[index] = Some(image),
                Err(e) => error!("Image task failed to complete: {}", e),
            }
        }

        let pages = draft
            .pages
            .into_iter()
            .zip(images)
            .map(|(page, image)| {
                let image = image.unwrap_or_else(|| {
                    ImageReference::Remote(placeholder_image_url(&page.image_prompt))
                });
                Page::new(page, image)
            })
            .collect();

        Ok(Story {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            params: StoredParameters {
                params: params.clone(),
                provider: Some(provider),
            },
            pages,
            created_at: Utc::now(),
        })
    }
}
