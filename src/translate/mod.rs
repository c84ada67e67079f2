use std::time::Duration;

use reqwest::Proxy;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::form::ExerciseDraft;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Persian";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation API key is not configured")]
    MissingApiKey,

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("translation request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },

    #[error("translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("translation service returned no text")]
    EmptyResponse,

    #[error("translation service returned an invalid bundle: {source}")]
    InvalidBundle {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub model: String,
    pub target_language: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            proxy: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslatableField {
    Name,
    Description,
    Instructions,
}

impl TranslatableField {
    pub const ALL: [TranslatableField; 3] = [Self::Name, Self::Description, Self::Instructions];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "description" | "desc" => Some(Self::Description),
            "instructions" | "steps" => Some(Self::Instructions),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Instructions => "instructions",
        }
    }

    fn source_text(self, draft: &ExerciseDraft) -> String {
        match self {
            Self::Name => draft.name_en.clone(),
            Self::Description => draft.description.clone(),
            Self::Instructions => draft.instructions.join("\n"),
        }
    }

    fn apply(self, draft: &mut ExerciseDraft, translated: String) {
        match self {
            Self::Name => draft.name = translated,
            Self::Description => draft.description_fa = translated,
            Self::Instructions => draft.instructions_fa = split_lines(&translated),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TranslatedBundle {
    pub name: String,
    pub description: String,
    pub instructions: String,
}

impl TranslatedBundle {
    pub fn apply(self, draft: &mut ExerciseDraft) {
        draft.instructions_fa = split_lines(&self.instructions);
        draft.name = self.name;
        draft.description_fa = self.description;
    }
}

#[derive(Debug)]
pub struct FieldFailure {
    pub field: TranslatableField,
    pub error: TranslateError,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

// No Debug: the struct holds the API key.
#[derive(Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: TranslatorConfig,
    api_key: String,
}

impl Translator {
    pub fn new(config: TranslatorConfig, api_key: &str) -> Result<Self, TranslateError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(TranslateError::MissingApiKey);
        }
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_seconds.max(1)));
        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = Proxy::all(proxy).map_err(|source| TranslateError::ProxySetup {
                proxy: proxy.to_string(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|source| TranslateError::HttpClientBuild { source })?;
        Ok(Self {
            client,
            config,
            api_key: api_key.to_string(),
        })
    }

    pub async fn translate_text(&self, text: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let body = text_request_body(&self.config.target_language, text);
        let out = self.generate(&body).await?;
        Ok(out.trim().to_string())
    }

    pub async fn translate_bundle(
        &self,
        name_en: &str,
        description: &str,
        instructions: &[String],
    ) -> Result<TranslatedBundle, TranslateError> {
        let body = bundle_request_body(
            &self.config.target_language,
            name_en,
            description,
            instructions,
        );
        let raw = self.generate(&body).await?;
        parse_bundle(&raw)
    }

    pub async fn translate_all(&self, draft: &mut ExerciseDraft) -> Result<(), TranslateError> {
        let bundle = self
            .translate_bundle(&draft.name_en, &draft.description, &draft.instructions)
            .await?;
        bundle.apply(draft);
        Ok(())
    }

    // Fields are translated concurrently; each success is written to the
    // draft even when other fields fail.
    pub async fn translate_fields(
        &self,
        draft: &mut ExerciseDraft,
        fields: &[TranslatableField],
    ) -> Vec<FieldFailure> {
        let sources: Vec<(TranslatableField, String)> = fields
            .iter()
            .map(|field| (*field, field.source_text(draft)))
            .collect();
        let results = futures::future::join_all(
            sources
                .into_iter()
                .map(|(field, source)| async move { (field, self.translate_text(&source).await) }),
        )
        .await;

        let mut failures = Vec::new();
        for (field, result) in results {
            match result {
                Ok(translated) => field.apply(draft, translated),
                Err(error) => {
                    tracing::warn!(
                        field = field.label(),
                        error = %error,
                        "field translation failed"
                    );
                    failures.push(FieldFailure { field, error });
                }
            }
        }
        failures
    }

    async fn generate(&self, body: &Value) -> Result<String, TranslateError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        tracing::debug!(%url, "sending translation request");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| TranslateError::Request { source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|source| TranslateError::Request { source })?;
        extract_text(&parsed).ok_or(TranslateError::EmptyResponse)
    }
}

fn text_system_instruction(language: &str) -> String {
    format!(
        "You are an expert translator. Translate the given English text to {language}. Only return the translated text, without any additional explanations or introductory phrases."
    )
}

fn bundle_system_instruction(language: &str) -> String {
    format!(
        "You are an expert translator. The user will provide English text for an exercise. Translate the name, description, and instructions to {language}. Respond with a JSON object matching the provided schema. Ensure the translated instructions have each step separated by a newline character."
    )
}

pub fn text_request_body(language: &str, text: &str) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": text_system_instruction(language) }] },
        "contents": [{ "role": "user", "parts": [{ "text": text }] }],
    })
}

pub fn bundle_request_body(
    language: &str,
    name_en: &str,
    description: &str,
    instructions: &[String],
) -> Value {
    let prompt = format!(
        "Translate the following English texts to {language}:\n\nName: \"{name_en}\"\nDescription: \"{description}\"\nInstructions:\n{}\n",
        instructions.join("\n")
    );
    json!({
        "systemInstruction": { "parts": [{ "text": bundle_system_instruction(language) }] },
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "name": {
                        "type": "STRING",
                        "description": format!("The {language} translation of the exercise name."),
                    },
                    "description": {
                        "type": "STRING",
                        "description": format!("The {language} translation of the exercise description."),
                    },
                    "instructions": {
                        "type": "STRING",
                        "description": format!("The {language} translation of the exercise instructions, with each step separated by a newline character."),
                    },
                },
                "required": ["name", "description", "instructions"],
            },
        },
    })
}

fn extract_text(resp: &GenerateResponse) -> Option<String> {
    let content = resp.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_bundle(raw: &str) -> Result<TranslatedBundle, TranslateError> {
    serde_json::from_str(raw.trim()).map_err(|source| TranslateError::InvalidBundle { source })
}

fn split_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
