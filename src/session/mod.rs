//! Session state and the conversation stage model.
//!
//! This module is the heart of the crate:
//!
//! * [`Stage`] / [`UserAction`] / [`transition`] — the closed stage set
//!   and the exhaustively-checked transition rules.
//! * [`Session`] — the explicit value object holding one run's mutable
//!   state (stage, transcript, images, pitch, scores).
//! * [`RubricScores`] — the five-dimension score block, recovered from
//!   free text on a best-effort basis.
//!
//! Everything here is pure data and control: no I/O, no async, no UI.
//! The [`orchestrator`](crate::orchestrator) layers the media service
//! calls on top.

pub mod model;
pub mod rubric;
pub mod stage;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use model::{ImageBlob, Session, Speaker, TurnRecord};
pub use rubric::{RubricScores, MAX_SCORE};
pub use stage::{transition, ButtonAction, PreconditionError, Stage, UserAction};
