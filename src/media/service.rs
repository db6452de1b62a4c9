//! Core [`MediaService`] trait and its error type.
//!
//! The media service is an external collaborator: speech-to-text, chat
//! completion and text-to-speech behind one seam.  The orchestrator only
//! ever talks to `dyn MediaService`, so tests swap in a scripted double
//! and the production code plugs in [`OpenAiMediaService`](super::OpenAiMediaService).

use async_trait::async_trait;
use thiserror::Error;

use crate::session::ImageBlob;

// ---------------------------------------------------------------------------
// MediaError
// ---------------------------------------------------------------------------

/// An external media call failed.
///
/// Every variant carries a human-readable category so the presentation
/// layer can explain the failure without knowing the transport.  The
/// session is never advanced when one of these surfaces; the user retries
/// the same action.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Credentials rejected (HTTP 401/403).
    #[error("media service authentication failed: {0}")]
    Auth(String),

    /// Rate limit or account quota exhausted (HTTP 429).
    #[error("media service quota exhausted: {0}")]
    Quota(String),

    /// The request did not complete within the configured timeout.
    #[error("media service request timed out")]
    Timeout,

    /// Network-level or otherwise retriable failure.
    #[error("transient media service failure: {0}")]
    Transient(String),

    /// The service rejected the submitted audio/image format (HTTP 415).
    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),

    /// The response body could not be decoded as expected.
    #[error("failed to parse media service response: {0}")]
    Parse(String),

    /// The service answered but produced no usable content.
    #[error("media service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for MediaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MediaError::Timeout
        } else {
            MediaError::Transient(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Chat message types
// ---------------------------------------------------------------------------

/// Role of one chat-completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Wire name used by OpenAI-compatible endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One entry of the conversation history sent with a chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// MediaService trait
// ---------------------------------------------------------------------------

/// Async seam to the external speech/chat provider.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn MediaService>`.  Each method is all-or-nothing: there is no
/// partial-success state for a single call.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Speech-to-text.  `audio` is an encoded recording (e.g. webm/opus)
    /// exactly as captured by the presentation layer.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, MediaError>;

    /// Chat completion over the accumulated `history` plus a final
    /// `instruction` message.  When `images` is non-empty the instruction
    /// is sent as multimodal content (text + image parts).
    async fn complete_chat(
        &self,
        history: &[ChatMessage],
        instruction: &str,
        images: &[ImageBlob],
    ) -> Result<String, MediaError>;

    /// Text-to-speech with the provider's fixed voice/speed configuration.
    /// Returns encoded audio ready for playback.
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, MediaError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
