use crate::error::GenerationError;
use crate::traits::TextGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};
use url::Url;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait a moment and try again.";
pub const RATE_LIMIT_PREFIX: &str = "Rate limit";
pub const ERROR_PREFIX: &str = "Error";

const RATE_LIMIT_MARKERS: [&str; 4] = ["resource_exhausted", "resource exhausted", "rate limit", "429"];

impl GenerationError {
    /// Transient provider throttling, recognised from the error text.
    pub fn is_rate_limited(&self) -> bool {
        let lowered = self.to_string().to_lowercase();
        RATE_LIMIT_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Total attempts, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// `base_delay * 2^attempt`, saturating.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Answered(String),
    RateLimited,
    ProviderError(String),
}

impl GenerationOutcome {
    /// Legacy text form: failures become sentinel answers callers detect by prefix.
    pub fn render(&self) -> String {
        match self {
            GenerationOutcome::Answered(text) => text.clone(),
            GenerationOutcome::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            GenerationOutcome::ProviderError(detail) => format!("{ERROR_PREFIX}: {detail}"),
        }
    }
}

pub fn is_sentinel_answer(answer: &str) -> bool {
    answer.starts_with(ERROR_PREFIX) || answer.starts_with(RATE_LIMIT_PREFIX)
}

/// Calls the generator with exponential backoff on rate limits. Never fails:
/// every error is folded into the outcome.
pub async fn generate_with_retry<G>(generator: &G, prompt: &str, policy: RetryPolicy) -> GenerationOutcome
where
    G: TextGenerator + ?Sized,
{
    let attempts = policy.attempts();

    for attempt in 0..attempts {
        match generator.generate(prompt).await {
            Ok(text) => return GenerationOutcome::Answered(text.trim().to_string()),
            Err(err) if err.is_rate_limited() => {
                if attempt + 1 >= attempts {
                    warn!(attempts, model = generator.model_name(), "rate limit budget exhausted");
                    return GenerationOutcome::RateLimited;
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_retries = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "rate limit hit, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                error!(error = %err, model = generator.model_name(), "generation request failed");
                return GenerationOutcome::ProviderError(err.to_string());
            }
        }
    }

    GenerationOutcome::RateLimited
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
        }
    }

    /// Reads `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_ENDPOINT`. Returns
    /// `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::new(non_blank("GEMINI_API_KEY")?);
        if let Some(model) = non_blank("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(endpoint) = non_blank("GEMINI_ENDPOINT") {
            config.endpoint = endpoint;
        }
        Some(config)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini `generateContent` over HTTPS.
pub struct GeminiGenerator {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { config, client })
    }

    // Appended as text so a path prefix on the endpoint survives.
    fn request_url(&self) -> Result<Url, GenerationError> {
        let mut url = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        ))?;
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.request_url()?)
            .json(&body)
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await.map_err(redact_url)?;
        response_text(&payload)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// The request URL carries the api key.
fn redact_url(err: reqwest::Error) -> GenerationError {
    GenerationError::Http(err.without_url())
}

fn response_text(payload: &GenerateContentResponse) -> Result<String, GenerationError> {
    let text = payload
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}
