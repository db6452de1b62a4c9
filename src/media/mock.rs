//! Scripted media service double for orchestrator and flow tests.
//!
//! [`MockMediaService`] answers `transcribe` from a queue of scripted
//! utterances, `complete_chat` from a queue of scripted replies, and
//! `synthesize_speech` with a fixed byte blob.  Any of the three calls can
//! be switched to fail with a chosen [`MediaError`] category.  It also
//! counts calls so tests can assert exactly how many round trips an
//! action performed.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::session::ImageBlob;

use super::service::{ChatMessage, MediaError, MediaService};

// ---------------------------------------------------------------------------
// MockMediaService
// ---------------------------------------------------------------------------

/// Which call should fail, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingCall {
    Transcribe,
    CompleteChat,
    SynthesizeSpeech,
}

#[derive(Default)]
struct MockState {
    transcriptions: VecDeque<String>,
    replies: VecDeque<String>,
    transcribe_calls: usize,
    chat_calls: usize,
    speech_calls: usize,
    /// Image count seen on the most recent chat call.
    last_image_count: usize,
    /// History length seen on the most recent chat call.
    last_history_len: usize,
    /// Instruction seen on the most recent chat call.
    last_instruction: Option<String>,
}

/// Test double: scripted transcriptions and replies, optional injected
/// failure, call counting.
pub struct MockMediaService {
    state: Mutex<MockState>,
    failing: Option<FailingCall>,
}

impl MockMediaService {
    /// A mock whose every call succeeds with the scripted values.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            failing: None,
        }
    }

    /// A mock whose `failing` call always returns a transient error.
    pub fn failing(call: FailingCall) -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            failing: Some(call),
        }
    }

    /// Queue a transcription to be returned by the next `transcribe` call.
    pub fn script_transcription(&self, text: impl Into<String>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .transcriptions
            .push_back(text.into());
        self
    }

    /// Queue a reply to be returned by the next `complete_chat` call.
    pub fn script_reply(&self, text: impl Into<String>) -> &Self {
        self.state.lock().unwrap().replies.push_back(text.into());
        self
    }

    pub fn transcribe_calls(&self) -> usize {
        self.state.lock().unwrap().transcribe_calls
    }

    pub fn chat_calls(&self) -> usize {
        self.state.lock().unwrap().chat_calls
    }

    pub fn speech_calls(&self) -> usize {
        self.state.lock().unwrap().speech_calls
    }

    pub fn last_image_count(&self) -> usize {
        self.state.lock().unwrap().last_image_count
    }

    pub fn last_history_len(&self) -> usize {
        self.state.lock().unwrap().last_history_len
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.state.lock().unwrap().last_instruction.clone()
    }
}

impl Default for MockMediaService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaService for MockMediaService {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, MediaError> {
        let mut state = self.state.lock().unwrap();
        state.transcribe_calls += 1;
        if self.failing == Some(FailingCall::Transcribe) {
            return Err(MediaError::Transient("scripted transcribe failure".into()));
        }
        Ok(state
            .transcriptions
            .pop_front()
            .unwrap_or_else(|| "scripted transcription".into()))
    }

    async fn complete_chat(
        &self,
        history: &[ChatMessage],
        instruction: &str,
        images: &[ImageBlob],
    ) -> Result<String, MediaError> {
        let mut state = self.state.lock().unwrap();
        state.chat_calls += 1;
        state.last_image_count = images.len();
        state.last_history_len = history.len();
        state.last_instruction = Some(instruction.to_string());
        if self.failing == Some(FailingCall::CompleteChat) {
            return Err(MediaError::Quota("scripted quota failure".into()));
        }
        Ok(state
            .replies
            .pop_front()
            .unwrap_or_else(|| "scripted reply".into()))
    }

    async fn synthesize_speech(&self, _text: &str) -> Result<Vec<u8>, MediaError> {
        let mut state = self.state.lock().unwrap();
        state.speech_calls += 1;
        if self.failing == Some(FailingCall::SynthesizeSpeech) {
            return Err(MediaError::Timeout);
        }
        Ok(vec![0x49, 0x44, 0x33]) // "ID3"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_values_come_back_in_order() {
        let mock = MockMediaService::new();
        mock.script_transcription("first").script_transcription("second");
        assert_eq!(mock.transcribe(&[1]).await.unwrap(), "first");
        assert_eq!(mock.transcribe(&[2]).await.unwrap(), "second");
        assert_eq!(mock.transcribe_calls(), 2);
    }

    #[tokio::test]
    async fn failing_chat_reports_quota() {
        let mock = MockMediaService::failing(FailingCall::CompleteChat);
        let err = mock.complete_chat(&[], "instruction", &[]).await.unwrap_err();
        assert!(matches!(err, MediaError::Quota(_)));
    }

    #[tokio::test]
    async fn records_chat_call_shape() {
        let mock = MockMediaService::new();
        let history = vec![ChatMessage::user("hello")];
        mock.complete_chat(&history, "the instruction", &[])
            .await
            .unwrap();
        assert_eq!(mock.last_history_len(), 1);
        assert_eq!(mock.last_image_count(), 0);
        assert_eq!(mock.last_instruction().as_deref(), Some("the instruction"));
    }
}
