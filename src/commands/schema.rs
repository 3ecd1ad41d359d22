//! Print the structured output schema sent with every request.

use crate::transcription::TranscriptSchema;

/// Prints the generated transcript schema as pretty JSON.
///
/// # Errors
/// - If the schema cannot be generated or serialized
pub fn handle_schema() -> Result<(), anyhow::Error> {
    let schema = TranscriptSchema::generate()?;
    println!("{}", serde_json::to_string_pretty(schema.schema())?);
    Ok(())
}
