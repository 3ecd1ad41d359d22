//! Image transcription through hosted vision models.
//!
//! This module turns an image file into a [`Transcript`] by asking a
//! chat-completion API for a structured JSON answer. Provider selection,
//! schema generation, image encoding and the HTTP exchange each live in their
//! own submodule.

pub mod api;
pub mod error;
pub mod image;
pub mod model;
pub mod provider;
pub mod schema;
pub mod transcript;

pub use api::{TranscriptionClient, TranscriptionConfig};
pub use error::TranscriptionError;
pub use model::TranscriptionModel;
pub use provider::TranscriptionProvider;
pub use schema::TranscriptSchema;
pub use transcript::Transcript;
