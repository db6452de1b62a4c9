//! [`SessionOrchestrator`] — bridges one user action to a media service
//! round trip, session updates and a stage transition.
//!
//! # Action flow
//!
//! ```text
//! UserAction::ConfirmUpload
//!   └─▶ images present? → chat(intro + images) → TTS → append turn → FreeDescription
//!
//! UserAction::StopRecording(audio)
//!   └─▶ transcribe → chat(history + next-stage instruction) → TTS
//!         └─▶ append user turn + assistant turn, transition
//!             (GeneratePitch stores the script and auto-advances;
//!              Evaluation runs best-effort rubric extraction)
//!
//! UserAction::ClickButton / Redescribe / Restart
//!   └─▶ chat + TTS where the entered stage has an instruction,
//!       pure session mutation where it does not
//! ```
//!
//! Ordering invariant: every external call completes before the session is
//! mutated.  A failed call therefore leaves stage and transcript exactly
//! as they were, and the caller can retry the same action.

use std::sync::Arc;

use thiserror::Error;

use crate::media::{ChatMessage, MediaError, MediaService};
use crate::prompt;
use crate::session::{
    transition, ImageBlob, PreconditionError, RubricScores, Session, Speaker, Stage, UserAction,
};

// ---------------------------------------------------------------------------
// CoachError
// ---------------------------------------------------------------------------

/// Anything [`SessionOrchestrator::handle_user_action`] can surface.
///
/// Both variants are user-facing: a precondition message tells the student
/// what to do differently, a media message tells them the coach is
/// temporarily unreachable and the action can simply be retried.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

// ---------------------------------------------------------------------------
// ActionOutcome
// ---------------------------------------------------------------------------

/// What the presentation layer renders after a handled action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// Stage the session is now in.
    pub stage: Stage,
    /// Transcription of the student's recording, when the action carried one.
    pub transcription: Option<String>,
    /// The coach's reply text, when the action triggered a chat completion.
    pub reply: Option<String>,
    /// Synthesised audio of the reply, ready for playback.
    pub speech: Option<Vec<u8>>,
}

impl ActionOutcome {
    /// An outcome for actions that produced no media traffic.
    fn quiet(stage: Stage) -> Self {
        Self {
            stage,
            transcription: None,
            reply: None,
            speech: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionOrchestrator
// ---------------------------------------------------------------------------

/// Owns one [`Session`] and drives it through the coaching stages, one
/// request/response cycle per user action.
///
/// Strictly sequential: `handle_user_action` takes `&mut self`, so at most
/// one external call chain is in flight per session and no action overlaps
/// another.
pub struct SessionOrchestrator {
    session: Session,
    media: Arc<dyn MediaService>,
    recording: bool,
    speaking: bool,
}

impl SessionOrchestrator {
    /// Create an orchestrator with a fresh session.
    pub fn new(media: Arc<dyn MediaService>) -> Self {
        Self {
            session: Session::new(),
            media,
            recording: false,
            speaking: false,
        }
    }

    // -----------------------------------------------------------------------
    // State access for the presentation layer
    // -----------------------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Register an uploaded reference photo.
    pub fn upload_image(&mut self, image: ImageBlob) {
        self.session.add_image(image);
    }

    /// Remove a reference photo by display index.
    pub fn remove_image(&mut self, index: usize) {
        self.session.remove_image(index);
    }

    /// The presentation layer started playing the coach's reply.  While
    /// playback runs, `StartRecording` is rejected.
    pub fn playback_started(&mut self) {
        self.speaking = true;
    }

    /// Playback finished (or failed); recording becomes legal again.
    pub fn playback_finished(&mut self) {
        self.speaking = false;
    }

    // -----------------------------------------------------------------------
    // Action entry point
    // -----------------------------------------------------------------------

    /// Apply one user action: at most one media round trip, then session
    /// updates and a stage transition.
    pub async fn handle_user_action(
        &mut self,
        action: UserAction,
    ) -> Result<ActionOutcome, CoachError> {
        log::debug!(
            "orchestrator: '{}' at stage '{}'",
            action.name(),
            self.session.current_stage()
        );

        match action {
            UserAction::ConfirmUpload => self.confirm_upload().await,
            UserAction::StartRecording => self.start_recording(),
            UserAction::StopRecording { audio } => self.stop_recording(audio).await,
            UserAction::ClickButton(_) => self.advance(&action, None).await,
            UserAction::Redescribe => self.pure_transition(&action),
            UserAction::Restart => self.restart(),
        }
    }

    // -----------------------------------------------------------------------
    // Action handlers
    // -----------------------------------------------------------------------

    /// Confirm the upload: requires at least one image, then runs the
    /// free-description entry turn (the only turn that carries images).
    async fn confirm_upload(&mut self) -> Result<ActionOutcome, CoachError> {
        if self.session.reference_images().is_empty() {
            return Err(PreconditionError::NoReferenceImages.into());
        }
        self.advance(&UserAction::ConfirmUpload, None).await
    }

    /// Start recording — purely local, no external call.
    fn start_recording(&mut self) -> Result<ActionOutcome, CoachError> {
        let stage = self.session.current_stage();
        if self.speaking {
            return Err(PreconditionError::PlaybackInProgress.into());
        }
        if self.recording || !stage.accepts_recording() {
            return Err(PreconditionError::ActionNotAllowed {
                stage,
                action: "start recording",
            }
            .into());
        }
        self.recording = true;
        Ok(ActionOutcome::quiet(stage))
    }

    /// Stop recording: transcribe whatever was captured and run the next
    /// stage's entry turn.  Stopping early finalises the capture — the
    /// recording flag drops even if transcription later fails.
    async fn stop_recording(&mut self, audio: Vec<u8>) -> Result<ActionOutcome, CoachError> {
        let stage = self.session.current_stage();
        if !self.recording {
            return Err(PreconditionError::ActionNotAllowed {
                stage,
                action: "stop recording",
            }
            .into());
        }
        self.recording = false;

        let text = self.media.transcribe(&audio).await?;
        self.advance(&UserAction::StopRecording { audio }, Some(text))
            .await
    }

    /// Apply a transition with no media traffic (redescribe, practice
    /// again).  Transcript, pitch and scores are left untouched.
    fn pure_transition(&mut self, action: &UserAction) -> Result<ActionOutcome, CoachError> {
        let next = transition(self.session.current_stage(), action, None)?;
        self.session.set_stage(next);
        Ok(ActionOutcome::quiet(next))
    }

    /// Full reset back to [`Stage::Upload`]; local flags drop too.
    fn restart(&mut self) -> Result<ActionOutcome, CoachError> {
        self.session.restart();
        self.recording = false;
        self.speaking = false;
        Ok(ActionOutcome::quiet(Stage::Upload))
    }

    // -----------------------------------------------------------------------
    // The shared advance path
    // -----------------------------------------------------------------------

    /// Validate the transition, run the entered stage's chat + TTS turn
    /// (when it has one), then apply all session mutations.
    async fn advance(
        &mut self,
        action: &UserAction,
        transcription: Option<String>,
    ) -> Result<ActionOutcome, CoachError> {
        let current = self.session.current_stage();
        let next = transition(current, action, transcription.as_deref())?;

        // The instruction payload for the stage being entered.  Evaluation
        // gets the reference pitch embedded so originality can be judged.
        let instruction: Option<String> = match next {
            Stage::Evaluation => Some(prompt::evaluation_instruction(
                self.session.generated_pitch(),
            )),
            other => prompt::entry_instruction(other).map(str::to_string),
        };

        let Some(instruction) = instruction else {
            // Stage with no entry turn (practice loop-back): pure mutation.
            self.session.set_stage(next);
            return Ok(ActionOutcome::quiet(next));
        };

        // ── 1. Assemble the request ──────────────────────────────────────
        let mut history: Vec<ChatMessage> = self
            .session
            .transcript()
            .iter()
            .map(|turn| match turn.speaker {
                Speaker::User => ChatMessage::user(&turn.text),
                Speaker::Assistant => ChatMessage::assistant(&turn.text),
            })
            .collect();
        if let Some(text) = &transcription {
            history.push(ChatMessage::user(text));
        }

        let images: &[ImageBlob] = if next.sends_images() {
            self.session.reference_images()
        } else {
            &[]
        };

        // ── 2. External calls (nothing mutated yet) ──────────────────────
        let reply = self
            .media
            .complete_chat(&history, &instruction, images)
            .await?;
        let speech = self.media.synthesize_speech(&reply).await?;

        // ── 3. Apply ─────────────────────────────────────────────────────
        if let Some(text) = &transcription {
            self.session.push_user_turn(text.clone());
        }
        self.session.push_assistant_turn(reply.clone());

        let mut landed = next;
        match next {
            Stage::GeneratePitch => {
                // The reply IS the pitch script; store verbatim and move
                // straight to practice.
                self.session.set_generated_pitch(reply.clone());
                if let Some(auto) = next.auto_advance() {
                    landed = auto;
                }
            }
            Stage::Evaluation => {
                // Best-effort: a parse miss just leaves the scores unset.
                let scores = RubricScores::parse(&reply);
                if scores.is_none() {
                    log::info!("orchestrator: no rubric block found in evaluation reply");
                }
                self.session.set_rubric_scores(scores);
            }
            _ => {}
        }
        self.session.set_stage(landed);

        Ok(ActionOutcome {
            stage: landed,
            transcription,
            reply: Some(reply),
            speech: Some(speech),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
