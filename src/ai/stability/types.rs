//! Stability AI text-to-image payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct TextToImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: u32,
    pub height: u32,
    pub width: u32,
    pub samples: u32,
    pub steps: u32,
}

impl TextToImageRequest {
    /// Single weighted prompt with fixed sampling settings (1024x1024, one sample).
    pub fn new(text: String) -> Self {
        Self {
            text_prompts: vec![TextPrompt { text, weight: 1 }],
            cfg_scale: 7,
            height: 1024,
            width: 1024,
            samples: 1,
            steps: 30,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TextPrompt {
    pub text: String,
    pub weight: u32,
}

#[derive(Debug, Deserialize)]
pub struct TextToImageResponse {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub base64: String,
    pub finish_reason: Option<String>,
}
