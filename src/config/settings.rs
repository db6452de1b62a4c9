//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared freely.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// MediaConfig
// ---------------------------------------------------------------------------

/// Connection and model settings for the external media service.
///
/// Works with any OpenAI-compatible provider: the three endpoints used are
/// `/v1/audio/transcriptions`, `/v1/chat/completions` and
/// `/v1/audio/speech`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Base URL of the API endpoint (e.g. `https://api.openai.com`).
    pub base_url: String,
    /// API key — `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Chat model; must support vision for the artifact-photo turn.
    pub chat_model: String,
    /// Speech-to-text model.
    pub stt_model: String,
    /// Text-to-speech model.
    pub tts_model: String,
    /// TTS voice name.
    pub tts_voice: String,
    /// TTS speaking speed (1.0 = normal).
    pub tts_speed: f32,
    /// Transcription language as an ISO-639-1 code, or `"auto"` to let the
    /// provider detect it.
    pub language: String,
    /// Chat sampling temperature.
    pub temperature: f32,
    /// Token budget per chat completion — generous enough for a full pitch
    /// script plus feedback.
    pub max_tokens: u32,
    /// Maximum seconds to wait for transcription/chat responses.
    pub timeout_secs: u64,
    /// Shorter dedicated timeout for speech synthesis, so a stalled
    /// playback request cannot hold the conversation for a full minute.
    pub tts_timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            chat_model: "gpt-4o".into(),
            stt_model: "whisper-1".into(),
            tts_model: "tts-1".into(),
            tts_voice: "nova".into(),
            tts_speed: 0.95,
            language: "auto".into(),
            temperature: 0.8,
            max_tokens: 1500,
            timeout_secs: 60,
            tts_timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// PromptConfig
// ---------------------------------------------------------------------------

/// Settings for the coach persona prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// URL of a plain-text / CSV design-vocabulary list to embed in the
    /// system prompt.  Google Sheets share links are accepted.  `None`
    /// (or a failed download) falls back to the built-in list.
    pub vocabulary_url: Option<String>,
}

// ---------------------------------------------------------------------------
// CoachConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Media service connection and model settings.
    pub media: MediaConfig,
    /// Coach persona / vocabulary settings.
    pub prompt: PromptConfig,
}

impl CoachConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(CoachConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            log::info!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `CoachConfig` must serialise to TOML and deserialise back
    /// without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = CoachConfig::default();
        original.save_to(&path).expect("save");

        let loaded = CoachConfig::load_from(&path).expect("load");

        assert_eq!(original.media.base_url, loaded.media.base_url);
        assert_eq!(original.media.api_key, loaded.media.api_key);
        assert_eq!(original.media.chat_model, loaded.media.chat_model);
        assert_eq!(original.media.stt_model, loaded.media.stt_model);
        assert_eq!(original.media.tts_model, loaded.media.tts_model);
        assert_eq!(original.media.tts_voice, loaded.media.tts_voice);
        assert_eq!(original.media.tts_speed, loaded.media.tts_speed);
        assert_eq!(original.media.language, loaded.media.language);
        assert_eq!(original.media.timeout_secs, loaded.media.timeout_secs);
        assert_eq!(
            original.media.tts_timeout_secs,
            loaded.media.tts_timeout_secs
        );
        assert_eq!(original.prompt.vocabulary_url, loaded.prompt.vocabulary_url);
    }

    /// `load_from` on a non-existent path must return defaults, not error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = CoachConfig::load_from(&path).expect("should not error");
        let default = CoachConfig::default();

        assert_eq!(config.media.base_url, default.media.base_url);
        assert_eq!(config.media.chat_model, default.media.chat_model);
        assert_eq!(config.media.language, default.media.language);
    }

    #[test]
    fn default_values_match_the_service_contract() {
        let cfg = CoachConfig::default();

        assert_eq!(cfg.media.base_url, "https://api.openai.com");
        assert!(cfg.media.api_key.is_none());
        assert_eq!(cfg.media.chat_model, "gpt-4o");
        assert_eq!(cfg.media.stt_model, "whisper-1");
        assert_eq!(cfg.media.tts_model, "tts-1");
        assert_eq!(cfg.media.tts_voice, "nova");
        assert_eq!(cfg.media.tts_speed, 0.95);
        assert_eq!(cfg.media.language, "auto");
        assert_eq!(cfg.media.max_tokens, 1500);
        assert_eq!(cfg.media.tts_timeout_secs, 15);
        assert!(cfg.prompt.vocabulary_url.is_none());
    }

    /// Modified non-default values must survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = CoachConfig::default();
        cfg.media.base_url = "http://localhost:8080".into();
        cfg.media.api_key = Some("sk-test".into());
        cfg.media.chat_model = "gpt-4o-mini".into();
        cfg.media.language = "zh".into();
        cfg.media.timeout_secs = 30;
        cfg.prompt.vocabulary_url = Some("https://example.com/vocab.csv".into());

        cfg.save_to(&path).expect("save");
        let loaded = CoachConfig::load_from(&path).expect("load");

        assert_eq!(loaded.media.base_url, "http://localhost:8080");
        assert_eq!(loaded.media.api_key, Some("sk-test".into()));
        assert_eq!(loaded.media.chat_model, "gpt-4o-mini");
        assert_eq!(loaded.media.language, "zh");
        assert_eq!(loaded.media.timeout_secs, 30);
        assert_eq!(
            loaded.prompt.vocabulary_url,
            Some("https://example.com/vocab.csv".into())
        );
    }
}
