use crate::config::PluginConfig;
use crate::schema::CustomSchema;
use oasis_core::meta::{BodyInfo, BodySchema, ParamInfo, ResponseInfo, RouteInfo, TypeDescriptor};
use serde_json::{json, Map, Value};

/// Error raised while assembling the document.
#[derive(Debug)]
pub enum SpecError {
    /// The schema encoder produced text that is not JSON.
    InvalidSchema {
        name: String,
        source: serde_json::Error,
    },
    /// A raw JSON custom schema could not be parsed.
    InvalidCustomSchema {
        id: String,
        source: serde_json::Error,
    },
    Serialization(serde_json::Error),
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::InvalidSchema { name, source } => {
                write!(f, "Schema encoder output for '{name}' is not valid JSON: {source}")
            }
            SpecError::InvalidCustomSchema { id, source } => {
                write!(f, "Custom schema '{id}' is not valid JSON: {source}")
            }
            SpecError::Serialization(e) => write!(f, "Failed to serialize document: {e}"),
        }
    }
}

impl std::error::Error for SpecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpecError::InvalidSchema { source, .. } => Some(source),
            SpecError::InvalidCustomSchema { source, .. } => Some(source),
            SpecError::Serialization(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SpecError {
    fn from(e: serde_json::Error) -> Self {
        SpecError::Serialization(e)
    }
}

/// Recursively rewrite `$ref` paths from the encoder's definitions field to
/// OpenAPI components format (`#/$defs/X` → `#/components/schemas/X`).
fn sanitize_schema(value: &mut Value, definitions_prefix: &str) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if let Some(name) = ref_str.strip_prefix(definitions_prefix) {
                    *ref_str = format!("#/components/schemas/{name}");
                }
            }

            for (_, v) in obj.iter_mut() {
                sanitize_schema(v, definitions_prefix);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v, definitions_prefix);
            }
        }
        _ => {}
    }
}

/// Insert a type schema, moving its nested definitions aside so they can be
/// promoted to top-level components.
fn insert_schema(
    schemas: &mut Map<String, Value>,
    extra_definitions: &mut Vec<(String, Value)>,
    type_name: &str,
    mut schema: Value,
    definitions_field: &str,
    definitions_prefix: &str,
) {
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        if let Some(Value::Object(defs)) = obj.remove(definitions_field) {
            extra_definitions.extend(defs);
        }
    }
    sanitize_schema(&mut schema, definitions_prefix);
    schemas.insert(type_name.to_string(), schema);
}

/// Walks the documented routes and records what the document refers to.
struct Assembly<'a> {
    config: &'a PluginConfig,
    types: Vec<TypeDescriptor>,
    custom_refs: Vec<String>,
    used_tags: Vec<String>,
}

impl<'a> Assembly<'a> {
    fn new(config: &'a PluginConfig) -> Self {
        Self {
            config,
            types: Vec::new(),
            custom_refs: Vec::new(),
            used_tags: Vec::new(),
        }
    }

    fn operation(&mut self, route: &RouteInfo) -> Value {
        let config = self.config;
        let mut operation: Map<String, Value> = Map::new();

        let tags = config.tags_for(route);
        if !tags.is_empty() {
            for tag in &tags {
                if !self.used_tags.contains(tag) {
                    self.used_tags.push(tag.clone());
                }
            }
            operation.insert("tags".into(), json!(tags));
        }

        if let Some(ref summary) = route.summary {
            operation.insert("summary".into(), json!(summary));
        }
        if let Some(ref description) = route.description {
            operation.insert("description".into(), json!(description));
        }
        if let Some(ref operation_id) = route.operation_id {
            operation.insert("operationId".into(), json!(operation_id));
        }
        if route.deprecated {
            operation.insert("deprecated".into(), json!(true));
        }

        if !route.params.is_empty() {
            let params: Vec<Value> = route.params.iter().map(parameter).collect();
            operation.insert("parameters".into(), json!(params));
        }

        if let Some(ref body) = route.request_body {
            let mut request_body = Map::new();
            if let Some(ref description) = body.description {
                request_body.insert("description".into(), json!(description));
            }
            request_body.insert("required".into(), json!(body.required));
            request_body.insert("content".into(), self.content(body));
            operation.insert("requestBody".into(), Value::Object(request_body));
        }

        let mut responses: Map<String, Value> = Map::new();
        for response in &route.responses {
            responses.insert(response.status.to_string(), self.response(response));
        }
        if responses.is_empty() {
            responses.insert("200".into(), json!({ "description": "Successful response" }));
        }

        let security = config.security_for(route);
        for name in &security {
            if config.find_security_scheme(name).is_none() {
                tracing::warn!(
                    scheme = %name,
                    path = %route.path,
                    "Route documents a security scheme that is not registered"
                );
            }
        }
        if route.protected {
            if let Some(ref unauthorized) = config.default_unauthorized_response {
                if !responses.contains_key("401") {
                    let mut doc = ResponseInfo::new(401, unauthorized.description.clone());
                    doc.body = unauthorized.body.clone();
                    responses.insert("401".into(), self.response(&doc));
                }
            }
        }
        operation.insert("responses".into(), Value::Object(responses));

        if !security.is_empty() {
            let requirements: Vec<Value> = security
                .iter()
                .map(|name| json!({ name.as_str(): [] }))
                .collect();
            operation.insert("security".into(), json!(requirements));
        }

        Value::Object(operation)
    }

    fn response(&mut self, response: &ResponseInfo) -> Value {
        let mut value = Map::new();
        value.insert("description".into(), json!(response.description));
        if let Some(ref body) = response.body {
            if body.schema != BodySchema::Empty || !body.examples.is_empty() {
                value.insert("content".into(), self.content(body));
            }
        }
        Value::Object(value)
    }

    fn content(&mut self, body: &BodyInfo) -> Value {
        let mut media = Map::new();
        if let Some(schema) = self.schema_ref(&body.schema) {
            media.insert("schema".into(), schema);
        }
        if !body.examples.is_empty() {
            let mut examples = Map::new();
            for example in &body.examples {
                let mut entry = Map::new();
                if let Some(ref summary) = example.summary {
                    entry.insert("summary".into(), json!(summary));
                }
                if let Some(ref description) = example.description {
                    entry.insert("description".into(), json!(description));
                }
                let value = self
                    .config
                    .encoding
                    .encode_example(body.type_descriptor(), &example.value);
                entry.insert("value".into(), value);
                examples.insert(example.name.clone(), Value::Object(entry));
            }
            media.insert("examples".into(), Value::Object(examples));
        }
        json!({ body.media_type.as_str(): media })
    }

    fn schema_ref(&mut self, schema: &BodySchema) -> Option<Value> {
        let config = self.config;
        match schema {
            BodySchema::Type(ty) => {
                match self.types.iter().find(|known| known.name() == ty.name()) {
                    Some(known) if known != ty => tracing::warn!(
                        name = ty.name(),
                        first = known.rust_type(),
                        second = ty.rust_type(),
                        "Two types share a schema name, keeping the first"
                    ),
                    Some(_) => {}
                    None => self.types.push(ty.clone()),
                }
                Some(json!({ "$ref": format!("#/components/schemas/{}", ty.name()) }))
            }
            BodySchema::Custom(id) => match config.custom_schemas.get(id) {
                Some(CustomSchema::Remote(url)) => Some(json!({ "$ref": url })),
                Some(_) => {
                    if !self.custom_refs.contains(id) {
                        self.custom_refs.push(id.clone());
                    }
                    Some(json!({ "$ref": format!("#/components/schemas/{id}") }))
                }
                None => {
                    tracing::warn!(
                        id = %id,
                        "Unknown custom schema, documenting as a plain object"
                    );
                    Some(json!({ "type": "object" }))
                }
            },
            BodySchema::Empty => None,
        }
    }

    fn schemas(&self) -> Result<Map<String, Value>, SpecError> {
        let field = self.config.encoding.schema_definitions_field.as_str();
        let prefix = format!("#/{}/", field.trim_start_matches('#').trim_matches('/'));

        let mut schemas: Map<String, Value> = Map::new();
        let mut extra_definitions: Vec<(String, Value)> = Vec::new();

        for ty in &self.types {
            let encoded = self.config.encoding.encode_schema(ty);
            let schema: Value =
                serde_json::from_str(&encoded).map_err(|source| SpecError::InvalidSchema {
                    name: ty.name().to_string(),
                    source,
                })?;
            insert_schema(&mut schemas, &mut extra_definitions, ty.name(), schema, field, &prefix);
        }

        for (def_name, mut def_schema) in extra_definitions {
            sanitize_schema(&mut def_schema, &prefix);
            schemas.entry(def_name).or_insert(def_schema);
        }

        let custom = &self.config.custom_schemas;
        for (id, schema) in custom.iter() {
            if matches!(schema, CustomSchema::Remote(_)) {
                continue;
            }
            if !custom.include_all && !self.custom_refs.iter().any(|r| r == id) {
                continue;
            }
            let value = schema.to_value().map_err(|source| SpecError::InvalidCustomSchema {
                id: id.to_string(),
                source,
            })?;
            if schemas.insert(id.to_string(), value).is_some() {
                tracing::warn!(id, "Custom schema replaces a generated schema of the same name");
            }
        }

        Ok(schemas)
    }

    fn tags(&self) -> Vec<Value> {
        let configured = &self.config.tags;
        let mut tags: Vec<Value> = configured.iter().map(|t| t.to_value()).collect();
        for name in &self.used_tags {
            if !configured.iter().any(|t| &t.name == name) {
                tags.push(json!({ "name": name }));
            }
        }
        tags
    }
}

fn parameter(param: &ParamInfo) -> Value {
    let mut value = Map::new();
    value.insert("name".into(), json!(param.name));
    value.insert("in".into(), json!(param.location.as_str()));
    if let Some(ref description) = param.description {
        value.insert("description".into(), json!(description));
    }
    value.insert("required".into(), json!(param.required));
    value.insert("schema".into(), json!({ "type": param.schema_type }));
    Value::Object(value)
}

/// Build an OpenAPI 3.1.0 document from the plugin configuration and the
/// documented routes of the application.
pub fn build_spec(config: &PluginConfig, routes: &[RouteInfo]) -> Result<Value, SpecError> {
    let mut assembly = Assembly::new(config);
    let mut paths: Map<String, Value> = Map::new();

    for route in routes.iter().filter(|r| config.includes(r)) {
        let operation = assembly.operation(route);
        let method = route.method.as_str().to_lowercase();
        let path_entry = paths.entry(route.path.clone()).or_insert_with(|| json!({}));
        if let Some(obj) = path_entry.as_object_mut() {
            obj.insert(method, operation);
        }
    }

    let mut spec: Map<String, Value> = Map::new();
    spec.insert("openapi".into(), json!("3.1.0"));
    spec.insert("info".into(), serde_json::to_value(&config.info)?);
    if let Some(ref docs) = config.external_docs {
        spec.insert("externalDocs".into(), serde_json::to_value(docs)?);
    }
    if !config.servers.is_empty() {
        spec.insert("servers".into(), serde_json::to_value(&config.servers)?);
    }
    let tags = assembly.tags();
    if !tags.is_empty() {
        spec.insert("tags".into(), json!(tags));
    }
    spec.insert("paths".into(), Value::Object(paths));

    let mut components: Map<String, Value> = Map::new();
    if !config.security_schemes.is_empty() {
        let mut schemes = Map::new();
        for scheme in &config.security_schemes {
            schemes.insert(scheme.name.clone(), serde_json::to_value(scheme)?);
        }
        components.insert("securitySchemes".into(), Value::Object(schemes));
    }
    let schemas = assembly.schemas()?;
    if !schemas.is_empty() {
        components.insert("schemas".into(), Value::Object(schemas));
    }
    if !components.is_empty() {
        spec.insert("components".into(), Value::Object(components));
    }

    Ok(Value::Object(spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rewrites_custom_definitions_prefix() {
        let mut schema = json!({
            "properties": { "a": { "$ref": "#/definitions/A" }, "b": { "$ref": "#/$defs/B" } }
        });
        sanitize_schema(&mut schema, "#/definitions/");
        assert_eq!(schema["properties"]["a"]["$ref"], "#/components/schemas/A");
        assert_eq!(schema["properties"]["b"]["$ref"], "#/$defs/B");
    }

    #[test]
    fn insert_schema_promotes_definitions() {
        let mut schemas = Map::new();
        let mut extra = Vec::new();
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": { "author": { "$ref": "#/$defs/Person" } },
            "$defs": { "Person": { "type": "object" } }
        });
        insert_schema(&mut schemas, &mut extra, "Greeting", schema, "$defs", "#/$defs/");
        let greeting = &schemas["Greeting"];
        assert!(greeting.get("$schema").is_none());
        assert!(greeting.get("$defs").is_none());
        assert_eq!(greeting["properties"]["author"]["$ref"], "#/components/schemas/Person");
        assert_eq!(extra, vec![("Person".to_string(), json!({ "type": "object" }))]);
    }
}
