use crate::domain::model::{GeneratedContent, GenerationRequest, Service};
use crate::domain::ports::{ConfigProvider, ContentGenerator};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// 讀取 API 金鑰的環境變數名稱
pub const API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub fn build_prompt(company_name: &str, services: &[Service]) -> String {
    let service_prompts = services
        .iter()
        .map(|s| format!("- {}: {}", s.title, s.prompt))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a marketing expert for a company called \"{company_name}\".\n\
         Based on the following services, generate a catchy, professional tagline for the company \
         and a short, engaging description (around 30-40 words) for each service.\n\
         \n\
         Services:\n\
         {service_prompts}\n\
         \n\
         Return the response in a JSON format."
    )
}

pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tagline": {
                "type": "STRING",
                "description": "A catchy tagline for the company."
            },
            "serviceDescriptions": {
                "type": "ARRAY",
                "description": "An array of descriptions for the services provided.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "The title of the service."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "A short, engaging description of the service."
                        }
                    },
                    "required": ["title", "description"]
                }
            }
        },
        "required": ["tagline", "serviceDescriptions"]
    })
}

impl GenerationRequest {
    pub fn for_catalog(company_name: &str, services: &[Service]) -> Self {
        Self {
            prompt: build_prompt(company_name, services),
            response_schema: response_schema(),
        }
    }

    /// generateContent 的請求本體
    pub fn to_body(&self) -> Value {
        json!({
            "contents": [
                { "parts": [ { "text": self.prompt } ] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": self.response_schema
            }
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// 第一個候選回覆的所有文字片段串接
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        })
    }

    /// 依設定建立客戶端，金鑰取自 `API_KEY` 環境變數
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        if api_key.is_none() {
            tracing::warn!("{} is not set, content generation will fail", API_KEY_ENV);
        }
        Self::new(
            config.generation_endpoint(),
            config.model(),
            api_key,
            config.request_timeout(),
        )
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SiteError::MissingConfigError {
                field: API_KEY_ENV.to_string(),
            })?;

        let url = self.url();
        tracing::debug!("Making generation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request.to_body())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Generation response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SiteError::ApiStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload.text().ok_or(SiteError::EmptyResponseError)?;

        let content: GeneratedContent = serde_json::from_str(text.trim())?;
        tracing::info!(
            "✅ Generated tagline and {} service descriptions",
            content.service_descriptions.len()
        );
        Ok(content)
    }
}
