//! Media service integration — speech-to-text, chat completion and
//! text-to-speech behind one async trait.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │               MediaService (trait)                 │
//! │                                                    │
//! │  transcribe(audio)          -> text                │
//! │  complete_chat(history, instruction, images)       │
//! │                             -> reply text          │
//! │  synthesize_speech(text)    -> audio bytes         │
//! └──────────────┬─────────────────────┬───────────────┘
//!                │                     │
//!     OpenAiMediaService      MockMediaService (tests)
//!     (reqwest, 3 endpoints)  (scripted responses)
//! ```
//!
//! Each call is all-or-nothing; a failed call surfaces a categorised
//! [`MediaError`] and leaves the session untouched.

pub mod openai;
pub mod service;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use openai::OpenAiMediaService;
pub use service::{ChatMessage, ChatRole, MediaError, MediaService};

// test-only re-export so flow tests can write `crate::media::MockMediaService`.
#[cfg(test)]
pub use mock::{FailingCall, MockMediaService};
