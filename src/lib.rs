//! imgscribe: transcribe images to text with hosted vision models.
//!
//! The binary wraps [`app::run`]; the library surface exists so the
//! transcription client can be driven from integration tests.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod transcription;
