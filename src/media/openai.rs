//! [`OpenAiMediaService`] — production media service over any
//! OpenAI-compatible REST API.
//!
//! Three endpoints, all driven by [`MediaConfig`]:
//!
//! * `/v1/audio/transcriptions` — speech-to-text (multipart upload).
//! * `/v1/chat/completions` — chat completion, multimodal when reference
//!   images are attached.
//! * `/v1/audio/speech` — text-to-speech, mp3, fixed voice and speed.
//!
//! Nothing is hardcoded: base URL, API key, models, voice, language and
//! timeouts all come from config.  The speech synthesis call carries its
//! own shorter timeout (`tts_timeout_secs`) so a stalled playback request
//! cannot hold the conversation hostage for the full chat timeout.

use async_trait::async_trait;

use crate::config::MediaConfig;
use crate::session::ImageBlob;

use super::service::{ChatMessage, ChatRole, MediaError, MediaService};

// ---------------------------------------------------------------------------
// OpenAiMediaService
// ---------------------------------------------------------------------------

/// Calls OpenAI-compatible speech and chat endpoints.
///
/// The `Authorization: Bearer …` header is attached only when
/// `config.api_key` is a non-empty string, so local OpenAI-compatible
/// servers that require no authentication work unchanged.
pub struct OpenAiMediaService {
    client: reqwest::Client,
    config: MediaConfig,
    system_prompt: Option<String>,
}

impl OpenAiMediaService {
    /// Build a service from config, without a system prompt.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is the last-resort fallback
    /// if the builder fails.
    pub fn from_config(config: &MediaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            system_prompt: None,
        }
    }

    /// Attach a system prompt that is prepended to every chat completion.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.config.api_key.as_deref().unwrap_or("");
        if key.is_empty() {
            req
        } else {
            req.bearer_auth(key)
        }
    }

    /// Map non-2xx responses onto the error taxonomy.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };

        Err(match status.as_u16() {
            401 | 403 => MediaError::Auth(detail),
            429 => MediaError::Quota(detail),
            415 => MediaError::UnsupportedFormat(detail),
            _ => MediaError::Transient(detail),
        })
    }
}

#[async_trait]
impl MediaService for OpenAiMediaService {
    /// POST the recording to `/v1/audio/transcriptions`.
    ///
    /// The language is pinned when config names one; `"auto"` leaves the
    /// provider's built-in detection in charge.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, MediaError> {
        let url = format!("{}/v1/audio/transcriptions", self.config.base_url);

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("recording.webm")
            .mime_str("audio/webm")
            .map_err(|e| MediaError::UnsupportedFormat(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.config.stt_model.clone())
            .part("file", part);
        if self.config.language != "auto" {
            form = form.text("language", self.config.language.clone());
        }

        let req = self.authorize(self.client.post(&url).multipart(form));
        let response = Self::check_status(req.send().await?).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MediaError::Parse(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or_else(|| MediaError::Parse("missing 'text' field".into()))?
            .trim()
            .to_string();

        log::debug!("media: transcription = {:?}", text);
        Ok(text)
    }

    /// POST to `/v1/chat/completions`.
    ///
    /// Message order: optional system prompt, full history, then the
    /// instruction as the final user message.  Reference images ride along
    /// as `image_url` parts (base64 data URLs) on that final message.
    async fn complete_chat(
        &self,
        history: &[ChatMessage],
        instruction: &str,
        images: &[ImageBlob],
    ) -> Result<String, MediaError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let mut messages: Vec<serde_json::Value> = Vec::with_capacity(history.len() + 2);
        if let Some(prompt) = &self.system_prompt {
            messages.push(serde_json::json!({
                "role": ChatRole::System.as_str(),
                "content": prompt,
            }));
        }
        for message in history {
            messages.push(serde_json::json!({
                "role": message.role.as_str(),
                "content": message.content,
            }));
        }

        let user_content: serde_json::Value = if images.is_empty() {
            serde_json::json!(instruction)
        } else {
            let mut parts = vec![serde_json::json!({ "type": "text", "text": instruction })];
            for image in images {
                parts.push(serde_json::json!({
                    "type": "image_url",
                    "image_url": { "url": image.data_url(), "detail": "high" },
                }));
            }
            serde_json::json!(parts)
        };
        messages.push(serde_json::json!({
            "role": ChatRole::User.as_str(),
            "content": user_content,
        }));

        let body = serde_json::json!({
            "model":       self.config.chat_model,
            "messages":    messages,
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  self.config.max_tokens,
        });

        let req = self.authorize(self.client.post(&url).json(&body));
        let response = Self::check_status(req.send().await?).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MediaError::Parse(e.to_string()))?;

        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(MediaError::EmptyResponse)?
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(MediaError::EmptyResponse);
        }

        Ok(reply)
    }

    /// POST to `/v1/audio/speech` and return the mp3 bytes.
    ///
    /// Carries a dedicated, shorter request timeout (`tts_timeout_secs`)
    /// than the chat calls.
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, MediaError> {
        let url = format!("{}/v1/audio/speech", self.config.base_url);

        let body = serde_json::json!({
            "model":           self.config.tts_model,
            "voice":           self.config.tts_voice,
            "input":           text,
            "speed":           self.config.tts_speed,
            "response_format": "mp3",
        });

        let req = self
            .authorize(self.client.post(&url).json(&body))
            .timeout(std::time::Duration::from_secs(self.config.tts_timeout_secs));
        let response = Self::check_status(req.send().await?).await?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
