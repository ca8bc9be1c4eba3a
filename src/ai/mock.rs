use super::{parse_story_response, ProviderFactory, StoryProvider};
use crate::models::{DraftPage, ImageReference, Provider, StoryDraft, StoryParameters};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted provider for tests. Clones share their counters.
#[derive(Clone)]
pub struct MockStoryProvider {
    story_responses: Arc<Mutex<Vec<String>>>,
    fail_stories: bool,
    fail_images: bool,
    unsupported_images: bool,
    story_calls: Arc<Mutex<usize>>,
    image_calls: Arc<Mutex<usize>>,
}

impl MockStoryProvider {
    pub fn new() -> Self {
        Self {
            story_responses: Arc::new(Mutex::new(Vec::new())),
            fail_stories: false,
            fail_images: false,
            unsupported_images: false,
            story_calls: Arc::new(Mutex::new(0)),
            image_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Raw model reply, run through the response parser like a real adapter.
    pub fn with_story_response(self, response: String) -> Self {
        self.story_responses.lock().unwrap().push(response);
        self
    }

    pub fn failing_stories(mut self) -> Self {
        self.fail_stories = true;
        self
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    /// Image requests fail the way a text-only model does.
    pub fn unsupported_images(mut self) -> Self {
        self.unsupported_images = true;
        self
    }

    pub fn get_story_call_count(&self) -> usize {
        *self.story_calls.lock().unwrap()
    }

    pub fn get_image_call_count(&self) -> usize {
        *self.image_calls.lock().unwrap()
    }

    fn default_draft(params: &StoryParameters) -> StoryDraft {
        let page_count = params.story_length.page_count();
        let pages = (1..=page_count)
            .map(|page_number| DraftPage {
                page_number,
                text: match page_number {
                    1 => String::new(),
                    n if n == page_count => "And they all slept soundly. The End.".to_string(),
                    n => format!("Page {} of the story.", n),
                },
                image_prompt: format!("Illustration for page {}", page_number),
            })
            .collect();

        StoryDraft {
            title: format!("A story about {}", params.prompt),
            pages,
        }
    }
}

impl Default for MockStoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryProvider for MockStoryProvider {
    async fn generate_story(&self, params: &StoryParameters) -> Result<StoryDraft> {
        let count = {
            let mut count = self.story_calls.lock().unwrap();
            *count += 1;
            *count
        };

        if self.fail_stories {
            return Err(Error::ProviderRequest("mock story failure".to_string()));
        }

        let response = {
            let responses = self.story_responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses[(count - 1) % responses.len()].clone())
            }
        };

        match response {
            Some(text) => parse_story_response(&text),
            None => Ok(Self::default_draft(params)),
        }
    }

    async fn generate_image(&self, image_prompt: &str) -> Result<ImageReference> {
        let count = {
            let mut count = self.image_calls.lock().unwrap();
            *count += 1;
            *count
        };

        if self.unsupported_images {
            return Err(Error::ImageGenerationUnsupported(
                "mock model returns text only".to_string(),
            ));
        }
        if self.fail_images {
            return Err(Error::ProviderRequest(format!(
                "mock image failure for '{}'",
                image_prompt
            )));
        }

        Ok(ImageReference::Remote(format!(
            "https://mock-images.example.com/{}.png",
            count
        )))
    }
}

/// Factory handing out clones of one [`MockStoryProvider`].
#[derive(Clone, Default)]
pub struct MockProviderFactory {
    provider: MockStoryProvider,
    connections: Arc<Mutex<Vec<(Provider, String)>>>,
}

impl MockProviderFactory {
    pub fn new(provider: MockStoryProvider) -> Self {
        Self {
            provider,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn provider(&self) -> &MockStoryProvider {
        &self.provider
    }

    /// Every `(provider, credential)` pair that was connected, in order.
    pub fn get_connections(&self) -> Vec<(Provider, String)> {
        self.connections.lock().unwrap().clone()
    }
}

impl ProviderFactory for MockProviderFactory {
    fn connect(&self, provider: Provider, credential: &str) -> Result<Box<dyn StoryProvider>> {
        self.connections
            .lock()
            .unwrap()
            .push((provider, credential.to_string()));
        Ok(Box::new(self.provider.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoryLength;

    #[tokio::test]
    async fn test_default_draft_matches_requested_length() {
        let provider = MockStoryProvider::new();
        let mut params = StoryParameters::new("owls");
        params.story_length = StoryLength::Long;

        let draft = provider.generate_story(&params).await.unwrap();
        assert_eq!(draft.pages.len(), 12);
        assert!(draft.pages[0].text.is_empty());
        assert!(draft.pages[11].text.contains("The End"));
    }

    #[tokio::test]
    async fn test_scripted_responses_cycle() {
        let provider = MockStoryProvider::new()
            .with_story_response(r#"{"title": "One", "pages": []}"#.to_string())
            .with_story_response(r#"{"title": "Two", "pages": []}"#.to_string());
        let params = StoryParameters::new("p");

        assert_eq!(provider.generate_story(&params).await.unwrap().title, "One");
        assert_eq!(provider.generate_story(&params).await.unwrap().title, "Two");
        assert_eq!(provider.generate_story(&params).await.unwrap().title, "One");
        assert_eq!(provider.get_story_call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_counters() {
        let provider = MockStoryProvider::new().failing_images();
        let observer = provider.clone();

        assert!(provider.generate_image("x").await.is_err());
        assert_eq!(observer.get_image_call_count(), 1);
    }

    #[test]
    fn test_factory_records_connections() {
        let factory = MockProviderFactory::new(MockStoryProvider::new());
        factory.connect(Provider::Gemini, "k1").unwrap();
        factory.connect(Provider::Stability, "k2").unwrap();

        assert_eq!(
            factory.get_connections(),
            vec![
                (Provider::Gemini, "k1".to_string()),
                (Provider::Stability, "k2".to_string())
            ]
        );
    }
}
