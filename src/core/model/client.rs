use super::error::ModelError;
use super::wire::{ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent};
use super::prompts::embed_text;
use super::{EncodedImage, ModelClient};
use crate::config::ModelConfig;
use log::{debug, error, info};
use reqwest::blocking::Client;

/// OpenAI 兼容 chat/completions 客户端（阻塞调用）
pub struct ChatCompletionsClient {
    client: Client,
    config: ModelConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        info!(
            "🤖 Model client ready: vision={}, text={}",
            config.vision_model, config.text_model
        );
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn complete(&self, request: &ChatRequest) -> Result<String, ModelError> {
        debug!("POST {} model={}", self.endpoint(), request.model);

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            error!("❌ Model API returned {}", status);
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

pub(crate) fn parse_completion(body: &str) -> Result<String, ModelError> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed.first_content().ok_or(ModelError::EmptyResponse)
}

pub(crate) fn vision_content(prompt: &str, images: &[EncodedImage]) -> MessageContent {
    let mut parts = Vec::with_capacity(images.len() + 1);
    parts.push(ContentPart::Text {
        text: prompt.to_string(),
    });
    parts.extend(images.iter().map(|img| ContentPart::ImageUrl {
        image_url: ImageUrl { url: img.data_url() },
    }));
    MessageContent::Parts(parts)
}

impl ModelClient for ChatCompletionsClient {
    fn describe_images(&self, prompt: &str, images: &[EncodedImage]) -> Result<String, ModelError> {
        if images.is_empty() {
            return Err(ModelError::NoImages);
        }
        let request = ChatRequest::user(&self.config.vision_model, vision_content(prompt, images));
        self.complete(&request)
    }

    fn synthesize_text(&self, prompt: &str, text: &str) -> Result<String, ModelError> {
        let request = ChatRequest::user(
            &self.config.text_model,
            MessageContent::Text(embed_text(prompt, text)),
        );
        self.complete(&request)
    }
}
