//! Session orchestration — one user action in, one media round trip out.
//!
//! [`SessionOrchestrator`] owns the [`Session`](crate::session::Session)
//! and is the only place that mutates it.  The presentation layer calls
//! [`SessionOrchestrator::handle_user_action`] on user gestures and
//! renders the returned [`ActionOutcome`]; it never touches the stage
//! model directly.

pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{ActionOutcome, CoachError, SessionOrchestrator};
