//! Conversation stage model — the closed set of coaching stages and the
//! rules for moving between them.
//!
//! [`Stage`] drives the whole coaching flow.  The intended progression is:
//!
//! ```text
//! Upload ──confirm upload──▶ FreeDescription
//!        ──recording stop──▶ QaImprove
//!        ──recording stop──▶ ConfirmSummary
//!                            ├─confirm──▶ GeneratePitch ──auto──▶ PracticePitch
//!                            └─redescribe──▶ QaImprove   (history preserved)
//! PracticePitch ──recording stop──▶ Evaluation
//! Evaluation ──generate notes──▶ Keywords
//! Keywords ──practice again──▶ PracticePitch
//!          ──restart──▶ Upload  (session cleared)
//! ```
//!
//! [`transition`] is the single exhaustively-matched function that encodes
//! the table above.  An action that does not satisfy its precondition never
//! advances the stage — it returns a [`PreconditionError`] and the caller
//! keeps the session exactly where it was.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One discrete step of the guided coaching conversation.
///
/// The derive order gives `Ord`: stages compare by intended progression
/// (`Upload < FreeDescription < … < Keywords`), which the presentation
/// layer uses to render a progress checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Waiting for the student to upload at least one reference image of
    /// their design artifact.
    Upload,

    /// The student freely describes the artifact aloud ("think out loud").
    FreeDescription,

    /// The coach has asked clarifying questions; the student answers them
    /// and adds missing detail.
    QaImprove,

    /// The coach has summarised the design points; the student either
    /// confirms the summary or loops back to redescribe.
    ConfirmSummary,

    /// The pitch script is being generated.  Transient: auto-advances to
    /// [`Stage::PracticePitch`] once the script is stored.
    GeneratePitch,

    /// The student reads the generated pitch aloud.
    PracticePitch,

    /// The spoken delivery has been scored against the five-part rubric.
    Evaluation,

    /// Terminal stage: the keyword cheat sheet is available.  Only explicit
    /// loop-back (practice again) or a full restart leave this stage.
    Keywords,
}

impl Stage {
    /// Returns `true` when reference images accompany this stage's entry
    /// payload to the media service.
    ///
    /// Only the free-description entry carries images — the coach looks at
    /// the artifact once; every later turn is about spoken expression, not
    /// the design itself.
    pub fn sends_images(&self) -> bool {
        matches!(self, Stage::FreeDescription)
    }

    /// Returns `true` when the student is expected to speak in this stage,
    /// i.e. the start/stop-recording actions are legal here.
    pub fn accepts_recording(&self) -> bool {
        matches!(
            self,
            Stage::FreeDescription | Stage::QaImprove | Stage::PracticePitch
        )
    }

    /// Stage the session moves to immediately after this stage's media
    /// response has been applied, without any further user action.
    ///
    /// Only [`Stage::GeneratePitch`] auto-advances: once the pitch script
    /// is stored the student goes straight to practising it.
    pub fn auto_advance(&self) -> Option<Stage> {
        match self {
            Stage::GeneratePitch => Some(Stage::PracticePitch),
            _ => None,
        }
    }

    /// Returns `true` for the final stage of a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Keywords)
    }

    /// A short human-readable label for status display and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Upload => "Upload artifact photos",
            Stage::FreeDescription => "Free description",
            Stage::QaImprove => "Questions & detail",
            Stage::ConfirmSummary => "Confirm design points",
            Stage::GeneratePitch => "Generate pitch script",
            Stage::PracticePitch => "Practice the pitch",
            Stage::Evaluation => "Scoring & feedback",
            Stage::Keywords => "Keyword cheat sheet",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Upload
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// UserAction
// ---------------------------------------------------------------------------

/// Explicit-choice buttons the presentation layer can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Confirm the design-point summary and generate the pitch script.
    GeneratePitch,
    /// Generate the keyword cheat sheet after scoring.
    GenerateNotes,
    /// Loop back from the cheat sheet to practise the pitch again.
    PracticeAgain,
}

impl ButtonAction {
    fn name(&self) -> &'static str {
        match self {
            ButtonAction::GeneratePitch => "generate pitch",
            ButtonAction::GenerateNotes => "generate notes",
            ButtonAction::PracticeAgain => "practice again",
        }
    }
}

/// One user gesture forwarded by the presentation layer.
///
/// The orchestrator translates each action into at most one media service
/// round trip plus a [`transition`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Confirm the uploaded reference images and begin the conversation.
    ConfirmUpload,
    /// The student pressed the microphone button.
    StartRecording,
    /// The student stopped recording; `audio` is whatever was captured.
    StopRecording { audio: Vec<u8> },
    /// An explicit-choice button was pressed.
    ClickButton(ButtonAction),
    /// Loop back from the summary to answer the questions again.
    Redescribe,
    /// Reset the whole session back to [`Stage::Upload`].
    Restart,
}

impl UserAction {
    /// Short name used in error messages and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::ConfirmUpload => "confirm upload",
            UserAction::StartRecording => "start recording",
            UserAction::StopRecording { .. } => "stop recording",
            UserAction::ClickButton(which) => which.name(),
            UserAction::Redescribe => "redescribe",
            UserAction::Restart => "restart",
        }
    }
}

// ---------------------------------------------------------------------------
// PreconditionError
// ---------------------------------------------------------------------------

/// A stage's entry requirement was not met.  The session never advances on
/// one of these — the caller surfaces the message and lets the user retry
/// the same action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// `ConfirmUpload` with zero reference images.
    #[error("upload at least one photo of the artifact before starting")]
    NoReferenceImages,

    /// The media service transcribed the recording to an empty string.
    #[error("nothing was heard in that recording — please try again")]
    EmptyTranscription,

    /// Recording cannot start while the coach's reply is still playing;
    /// microphone and speaker are exclusive resources.
    #[error("wait for the coach to finish speaking before recording")]
    PlaybackInProgress,

    /// The action is not legal in the current stage.
    #[error("'{action}' is not available during '{stage}'")]
    ActionNotAllowed {
        stage: Stage,
        action: &'static str,
    },
}

impl PreconditionError {
    fn not_allowed(stage: Stage, action: &UserAction) -> Self {
        PreconditionError::ActionNotAllowed {
            stage,
            action: action.name(),
        }
    }
}

// ---------------------------------------------------------------------------
// transition
// ---------------------------------------------------------------------------

/// Compute the stage that follows `current` when `action` is applied.
///
/// `response_text` is the transcription produced for a
/// [`UserAction::StopRecording`] action; it must be non-empty (after
/// trimming) for any recording stage to advance.  Other actions ignore it.
///
/// The match is exhaustive over [`Stage`]: adding a stage is a
/// compile-time-checked change.  On `Err(_)` the caller must leave the
/// session in `current`.
pub fn transition(
    current: Stage,
    action: &UserAction,
    response_text: Option<&str>,
) -> Result<Stage, PreconditionError> {
    // Restart is legal everywhere and always lands on Upload.
    if matches!(action, UserAction::Restart) {
        return Ok(Stage::Upload);
    }

    match current {
        Stage::Upload => match action {
            UserAction::ConfirmUpload => Ok(Stage::FreeDescription),
            _ => Err(PreconditionError::not_allowed(current, action)),
        },

        Stage::FreeDescription => match action {
            UserAction::StopRecording { .. } => {
                require_transcription(response_text)?;
                Ok(Stage::QaImprove)
            }
            _ => Err(PreconditionError::not_allowed(current, action)),
        },

        Stage::QaImprove => match action {
            UserAction::StopRecording { .. } => {
                require_transcription(response_text)?;
                Ok(Stage::ConfirmSummary)
            }
            _ => Err(PreconditionError::not_allowed(current, action)),
        },

        Stage::ConfirmSummary => match action {
            UserAction::ClickButton(ButtonAction::GeneratePitch) => Ok(Stage::GeneratePitch),
            UserAction::Redescribe => Ok(Stage::QaImprove),
            _ => Err(PreconditionError::not_allowed(current, action)),
        },

        // GeneratePitch is transient — the orchestrator applies
        // `auto_advance()` as soon as the script is stored, so no user
        // action is legal while formally in this stage.
        Stage::GeneratePitch => Err(PreconditionError::not_allowed(current, action)),

        Stage::PracticePitch => match action {
            UserAction::StopRecording { .. } => {
                require_transcription(response_text)?;
                Ok(Stage::Evaluation)
            }
            _ => Err(PreconditionError::not_allowed(current, action)),
        },

        Stage::Evaluation => match action {
            UserAction::ClickButton(ButtonAction::GenerateNotes) => Ok(Stage::Keywords),
            _ => Err(PreconditionError::not_allowed(current, action)),
        },

        Stage::Keywords => match action {
            UserAction::ClickButton(ButtonAction::PracticeAgain) => Ok(Stage::PracticePitch),
            _ => Err(PreconditionError::not_allowed(current, action)),
        },
    }
}

fn require_transcription(response_text: Option<&str>) -> Result<(), PreconditionError> {
    match response_text {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(PreconditionError::EmptyTranscription),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
