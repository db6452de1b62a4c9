//! Mutable state of one coaching run.
//!
//! [`Session`] is an explicit value object owned by the orchestrator —
//! never shared, never persisted.  Field access goes through methods so
//! the two invariants hold by construction: transcript entries are
//! append-only, and the generated pitch is written at most once per run.

use base64::Engine as _;
use chrono::{DateTime, Utc};

use super::rubric::RubricScores;
use super::stage::Stage;

// ---------------------------------------------------------------------------
// Speaker / TurnRecord
// ---------------------------------------------------------------------------

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One immutable logged utterance.  Insertion order is chronological and
/// entries are never reordered or edited after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TurnRecord {
    fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageBlob
// ---------------------------------------------------------------------------

/// An uploaded reference photo of the design artifact.
///
/// Held as opaque bytes; the media service receives it as a base64
/// `data:` URL in a multimodal chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    bytes: Vec<u8>,
    mime: String,
}

impl ImageBlob {
    /// Wrap raw image bytes with their MIME type (e.g. `"image/jpeg"`).
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Render as a `data:<mime>;base64,<payload>` URL for the chat API.
    pub fn data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, encoded)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The full mutable state of one student's run through the coaching stages.
///
/// Created empty at [`Stage::Upload`]; lives in memory only and is
/// exclusively owned by one orchestrator.  [`Session::restart`] returns it
/// to its initial state with nothing surviving.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_stage: Stage,
    transcript: Vec<TurnRecord>,
    reference_images: Vec<ImageBlob>,
    generated_pitch: Option<String>,
    rubric_scores: Option<RubricScores>,
}

impl Session {
    /// A fresh session at the upload stage with all fields empty.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    /// Chronological transcript, oldest first.
    pub fn transcript(&self) -> &[TurnRecord] {
        &self.transcript
    }

    /// Uploaded photos in display order.
    pub fn reference_images(&self) -> &[ImageBlob] {
        &self.reference_images
    }

    pub fn generated_pitch(&self) -> Option<&str> {
        self.generated_pitch.as_deref()
    }

    /// `None` until (and unless) rubric extraction succeeds — the
    /// presentation layer treats "no scores yet" as a normal state.
    pub fn rubric_scores(&self) -> Option<&RubricScores> {
        self.rubric_scores.as_ref()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add an uploaded photo.  Legal at any time before the run starts;
    /// the orchestrator only reads the set when confirming the upload.
    pub fn add_image(&mut self, image: ImageBlob) {
        self.reference_images.push(image);
    }

    /// Remove a photo by display index.  Out-of-range indices are ignored.
    pub fn remove_image(&mut self, index: usize) {
        if index < self.reference_images.len() {
            self.reference_images.remove(index);
        }
    }

    pub(crate) fn push_user_turn(&mut self, text: impl Into<String>) {
        self.transcript.push(TurnRecord::now(Speaker::User, text));
    }

    pub(crate) fn push_assistant_turn(&mut self, text: impl Into<String>) {
        self.transcript
            .push(TurnRecord::now(Speaker::Assistant, text));
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        if stage != self.current_stage {
            log::debug!("session: stage {} → {}", self.current_stage, stage);
        }
        self.current_stage = stage;
    }

    /// Store the generated pitch script.  Write-once: a second call within
    /// the same run is ignored, so practice loop-backs can never clobber
    /// the script the student is rehearsing.
    pub(crate) fn set_generated_pitch(&mut self, pitch: impl Into<String>) {
        if self.generated_pitch.is_some() {
            log::warn!("session: ignoring attempt to overwrite generated pitch");
            return;
        }
        self.generated_pitch = Some(pitch.into());
    }

    pub(crate) fn set_rubric_scores(&mut self, scores: Option<RubricScores>) {
        self.rubric_scores = scores;
    }

    /// Reset everything: stage back to [`Stage::Upload`], transcript,
    /// images, pitch and scores all cleared.
    pub fn restart(&mut self) {
        log::info!("session: restarting — all state cleared");
        *self = Session::new();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
