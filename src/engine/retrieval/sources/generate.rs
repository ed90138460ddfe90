//! Tier 4: external image generation, only on explicit request.

use super::super::RetrievalError;
use super::check_status;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// URL of one freshly generated image of `food_name`.
    async fn generate(&self, food_name: &str) -> Result<String, RetrievalError>;
}

/// Fixed prompt: one isolated dish on plain white, nothing else in frame.
pub fn food_prompt(food_name: &str) -> String {
    format!(
        "A highly realistic, appetizing photograph of a single serving of \"{food_name}\".
CRITICAL REQUIREMENTS:
1. The food MUST be the ONLY object in the image. Absolutely NO other items, NO side dishes, NO drinks.
2. NO characters, NO mascots, NO people, NO faces, NO hands, NO animals.
3. Pure solid white background (hex #FFFFFF). NO table, NO shadows, NO environment.
4. NO bowls, NO plates, NO utensils, NO chopsticks, NO spoons, NO pots. Just the food itself isolated in the center. If a container is absolutely necessary for liquids, it must be an extremely simple, plain white bowl with no patterns.
5. NO text, NO watermarks, NO logos.
Make it look like a professional, isolated, top-down stock photo for a food catalog. Very intuitive and simple."
    )
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u8,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

pub struct OpenAiImageGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    size: String,
}

impl OpenAiImageGenerator {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            size: size.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self))]
    async fn generate(&self, food_name: &str) -> Result<String, RetrievalError> {
        let food_name = food_name.trim();
        if food_name.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RetrievalError::MissingCredentials(self.name()))?;

        let response = self
            .client
            .post(format!(
                "{}/v1/images/generations",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&GenerationRequest {
                model: &self.model,
                prompt: food_prompt(food_name),
                n: 1,
                size: &self.size,
                response_format: "url",
            })
            .send()
            .await?;

        let body: GenerationResponse = check_status(self.name(), response).await?.json().await?;
        let url = body
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or(RetrievalError::EmptyResponse(self.name()))?;
        info!(model = %self.model, "image generated");
        Ok(url)
    }
}
