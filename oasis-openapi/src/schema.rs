use schemars::Schema;
use serde_json::{json, Value};

/// Source of a named, reusable schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomSchema {
    /// Raw JSON Schema text.
    Json(String),
    /// A schema object built in code.
    OpenApi(Schema),
    /// A schema hosted elsewhere, referenced by url.
    Remote(String),
}

impl CustomSchema {
    /// The schema as a JSON value. `Remote` schemas become a plain `$ref`.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            CustomSchema::Json(raw) => serde_json::from_str(raw),
            CustomSchema::OpenApi(schema) => Ok(schema.as_value().clone()),
            CustomSchema::Remote(url) => Ok(json!({ "$ref": url })),
        }
    }
}

/// Registry of custom schemas, keyed by id, in registration order.
///
/// Routes refer to entries with
/// [`BodyInfo::custom`](oasis_core::BodyInfo::custom). Unless `include_all`
/// is set, only referenced entries end up in `components.schemas`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomSchemas {
    schemas: Vec<(String, CustomSchema)>,
    pub include_all: bool,
}

impl CustomSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under `id`, replacing an earlier one with the same id.
    pub fn register(&mut self, id: impl Into<String>, schema: CustomSchema) {
        let id = id.into();
        match self.schemas.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = schema,
            None => self.schemas.push((id, schema)),
        }
    }

    pub fn json(mut self, id: impl Into<String>, raw: impl Into<String>) -> Self {
        self.register(id, CustomSchema::Json(raw.into()));
        self
    }

    pub fn open_api(mut self, id: impl Into<String>, schema: Schema) -> Self {
        self.register(id, CustomSchema::OpenApi(schema));
        self
    }

    pub fn remote(mut self, id: impl Into<String>, url: impl Into<String>) -> Self {
        self.register(id, CustomSchema::Remote(url.into()));
        self
    }

    pub fn include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    pub fn get(&self, id: &str) -> Option<&CustomSchema> {
        self.schemas
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, schema)| schema)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CustomSchema)> {
        self.schemas.iter().map(|(id, schema)| (id.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
