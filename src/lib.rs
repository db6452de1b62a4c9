//! Pitch Coach — stage model and session orchestrator for a voice-driven
//! design pitch coaching flow.
//!
//! A design student uploads photos of an artifact, talks through it with a
//! coach persona, and comes out the other end with a rehearsed three-minute
//! English pitch, delivery scores, and a cheat sheet.  This crate owns the
//! conversation state machine and the calls to an OpenAI-compatible media
//! service (speech-to-text, chat, text-to-speech); it has no opinion about
//! how audio is captured or played back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     presentation layer                       │
//! │        (records audio, plays speech, renders turns)          │
//! └──────────────┬───────────────────────────────▲───────────────┘
//!                │ UserAction                    │ ActionOutcome
//! ┌──────────────▼───────────────────────────────┴───────────────┐
//! │          orchestrator::SessionOrchestrator                   │
//! │   precondition checks → media round trip → session mutation  │
//! └───────┬──────────────────────┬──────────────────────┬────────┘
//!         │                      │                      │
//! ┌───────▼───────┐   ┌──────────▼──────────┐   ┌───────▼────────┐
//! │ session::     │   │ prompt::            │   │ media::        │
//! │ Stage/Session │   │ entry_instruction   │   │ MediaService   │
//! │ transition()  │   │ system_prompt       │   │ (STT/chat/TTS) │
//! └───────────────┘   └─────────────────────┘   └────────────────┘
//! ```
//!
//! # Stage flow
//!
//! | Stage           | Entered by                         | Coach speaks? |
//! |-----------------|------------------------------------|---------------|
//! | Upload          | start / Restart                    | no            |
//! | FreeDescription | ConfirmUpload (photos attached)    | yes           |
//! | QaImprove       | StopRecording                      | yes           |
//! | ConfirmSummary  | StopRecording                      | yes           |
//! | GeneratePitch   | GeneratePitch button (transient)   | yes           |
//! | PracticePitch   | auto-advance from GeneratePitch    | no            |
//! | Evaluation      | StopRecording                      | yes           |
//! | Keywords        | GenerateNotes button               | yes           |
//!
//! External calls always complete before any session state changes, so a
//! failed action can simply be retried.

pub mod config;
pub mod media;
pub mod orchestrator;
pub mod prompt;
pub mod session;
