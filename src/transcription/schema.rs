//! JSON Schema for structured outputs.
//!
//! Providers accept only a subset of JSON Schema in `response_format`: objects
//! must forbid additional properties and the schema must be self-contained.
//! [`TranscriptSchema`] generates the schema from a Rust type with `schemars`,
//! inlines every subschema, and rejects anything still using `$ref`.

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::Value;

use super::error::TranscriptionError;
use super::transcript::Transcript;

/// Name reported to the API in `json_schema.name`
pub const TRANSCRIPT_SCHEMA_NAME: &str = "transcript";

/// A sealed, dereferenced JSON Schema ready to embed in a request.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSchema {
    name: String,
    schema: Value,
}

impl TranscriptSchema {
    /// Generates the schema for [`Transcript`].
    ///
    /// # Errors
    /// - If the generated schema still contains `$ref` indirection
    pub fn generate() -> Result<Self, TranscriptionError> {
        Self::for_type::<Transcript>(TRANSCRIPT_SCHEMA_NAME)
    }

    /// Generates a sealed schema for any `JsonSchema` type.
    ///
    /// # Errors
    /// - If the generated schema still contains `$ref` indirection
    pub fn for_type<T: JsonSchema>(name: &str) -> Result<Self, TranscriptionError> {
        let generator = SchemaSettings::draft2020_12()
            .with(|settings| {
                settings.inline_subschemas = true;
                settings.meta_schema = None;
            })
            .into_generator();
        let mut schema = generator.into_root_schema_for::<T>().to_value();

        seal(&mut schema);
        if let Some(path) = find_reference(&schema, "#") {
            return Err(TranscriptionError::Schema(format!(
                "schema for {name} is not self-contained ($ref at {path})"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

/// Forbids additional properties on every object schema and drops keys
/// providers reject.
fn seal(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("$schema");
            if map.get("$defs").is_some_and(is_empty_object) {
                map.remove("$defs");
            }
            let is_object_schema = map.contains_key("properties")
                || map.get("type").and_then(Value::as_str) == Some("object");
            if is_object_schema {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            for child in map.values_mut() {
                seal(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(seal),
        _ => {}
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(serde_json::Map::is_empty)
}

/// Returns the JSON pointer of the first `$ref`/`$defs`/`definitions` key, if any.
fn find_reference(value: &Value, path: &str) -> Option<String> {
    match value {
        Value::Object(map) => map.iter().find_map(|(key, child)| {
            let child_path = format!("{path}/{key}");
            if matches!(key.as_str(), "$ref" | "$defs" | "definitions") {
                Some(child_path)
            } else {
                find_reference(child, &child_path)
            }
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, child)| find_reference(child, &format!("{path}/{i}"))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Page {
        number: u32,
        body: Transcript,
    }

    #[test]
    fn test_generation_is_deterministic() {
        let first = TranscriptSchema::generate().unwrap();
        let second = TranscriptSchema::generate().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.name(), "transcript");
    }

    #[test]
    fn test_transcript_schema_shape() {
        let schema = TranscriptSchema::generate().unwrap();
        let value = schema.schema();

        assert_eq!(value["type"], "object");
        assert_eq!(value["additionalProperties"], json!(false));
        assert_eq!(value["properties"]["text"]["type"], "string");
        assert_eq!(
            value["properties"]["text"]["description"],
            "Transcription of the provided image"
        );
        assert_eq!(value["required"], json!(["text"]));
        assert!(value.get("$schema").is_none());
        assert!(find_reference(value, "#").is_none());
    }

    #[test]
    fn test_nested_types_are_inlined_and_sealed() {
        let schema = TranscriptSchema::for_type::<Page>("page").unwrap();
        let value = schema.schema();

        assert!(find_reference(value, "#").is_none());
        assert_eq!(value["additionalProperties"], json!(false));
        assert_eq!(value["properties"]["body"]["additionalProperties"], json!(false));
        assert_eq!(value["properties"]["body"]["properties"]["text"]["type"], "string");
    }

    #[test]
    fn test_find_reference_reports_pointer() {
        let value = json!({"properties": {"a": {"$ref": "#/$defs/A"}}});
        assert_eq!(
            find_reference(&value, "#").as_deref(),
            Some("#/properties/a/$ref")
        );
    }
}
