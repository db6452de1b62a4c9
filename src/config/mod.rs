//! Configuration module for the pitch coach.
//!
//! Provides `CoachConfig` (top-level settings), sub-configs for the media
//! service and coach persona, `AppPaths` for cross-platform config
//! directories, and TOML persistence via `CoachConfig::load` /
//! `CoachConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{CoachConfig, MediaConfig, PromptConfig};
