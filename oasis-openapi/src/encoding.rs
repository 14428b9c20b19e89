use oasis_core::TypeDescriptor;
use schemars::generate::SchemaSettings;
use serde_json::Value;
use std::sync::Arc;

/// Turns a type into the text of its JSON Schema.
pub type SchemaEncoder = Arc<dyn Fn(&TypeDescriptor) -> String + Send + Sync>;

/// Turns an example value (and the type it documents, when known) into text.
pub type ExampleEncoder = Arc<dyn Fn(Option<&TypeDescriptor>, &Value) -> String + Send + Sync>;

/// Default schema encoder: schemars, JSON Schema 2020-12.
pub fn schemars_encoder(ty: &TypeDescriptor) -> String {
    ty.root_schema(SchemaSettings::draft2020_12()).as_value().to_string()
}

/// Default example encoder: the value as compact JSON.
pub fn json_example_encoder(_ty: Option<&TypeDescriptor>, example: &Value) -> String {
    example.to_string()
}

/// How types and examples are turned into schema and example documents.
#[derive(Clone)]
pub struct EncodingConfig {
    pub schema_encoder: SchemaEncoder,
    /// Member of the encoder output holding nested definitions, promoted into
    /// `components.schemas`.
    pub schema_definitions_field: String,
    pub example_encoder: ExampleEncoder,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            schema_encoder: Arc::new(schemars_encoder),
            schema_definitions_field: "$defs".to_string(),
            example_encoder: Arc::new(json_example_encoder),
        }
    }
}

impl std::fmt::Debug for EncodingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodingConfig")
            .field("schema_definitions_field", &self.schema_definitions_field)
            .finish_non_exhaustive()
    }
}

impl EncodingConfig {
    pub fn schema_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> String + Send + Sync + 'static,
    {
        self.schema_encoder = Arc::new(encoder);
        self
    }

    pub fn schema_definitions_field(mut self, field: impl Into<String>) -> Self {
        self.schema_definitions_field = field.into();
        self
    }

    pub fn example_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(Option<&TypeDescriptor>, &Value) -> String + Send + Sync + 'static,
    {
        self.example_encoder = Arc::new(encoder);
        self
    }

    pub fn encode_schema(&self, ty: &TypeDescriptor) -> String {
        (self.schema_encoder)(ty)
    }

    /// Encode an example. Output that parses as JSON is embedded as JSON,
    /// anything else as a string.
    pub fn encode_example(&self, ty: Option<&TypeDescriptor>, example: &Value) -> Value {
        let encoded = (self.example_encoder)(ty, example);
        serde_json::from_str(&encoded).unwrap_or(Value::String(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_example_encoder_keeps_json() {
        let encoding = EncodingConfig::default();
        assert_eq!(
            encoding.encode_example(None, &json!({"name": "World"})),
            json!({"name": "World"})
        );
    }

    #[test]
    fn non_json_example_output_becomes_a_string() {
        let encoding = EncodingConfig::default().example_encoder(|_, v| format!("<{v}>"));
        assert_eq!(encoding.encode_example(None, &json!(1)), json!("<1>"));
    }
}
