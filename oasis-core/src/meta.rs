use crate::http::Method;
use schemars::generate::SchemaSettings;
use schemars::{JsonSchema, Schema};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A generic, type-erased metadata registry.
///
/// Plugins register typed consumers via
/// [`AppBuilder::with_meta_consumer`](crate::builder::AppBuilder::with_meta_consumer),
/// and documented route groups push their [`RouteInfo`] into the registry via
/// [`AppBuilder::register_api`](crate::builder::AppBuilder::register_api).
///
/// Internally stores `Vec<M>` per type, keyed by `TypeId`.
#[derive(Default)]
pub struct MetaRegistry {
    inner: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MetaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a single metadata item into the registry.
    pub fn push<M: Any + Send + Sync>(&mut self, item: M) {
        self.entry::<M>().push(item);
    }

    /// Extend the registry with multiple metadata items.
    pub fn extend<M: Any + Send + Sync>(&mut self, items: impl IntoIterator<Item = M>) {
        self.entry::<M>().extend(items);
    }

    /// Get a shared reference to all metadata of a given type.
    pub fn get<M: Any + Send + Sync>(&self) -> Option<&[M]> {
        self.inner
            .get(&TypeId::of::<M>())
            .and_then(|boxed| boxed.downcast_ref::<Vec<M>>())
            .map(|v| v.as_slice())
    }

    /// Get a shared reference to all metadata of a given type, or an empty slice.
    pub fn get_or_empty<M: Any + Send + Sync>(&self) -> &[M] {
        self.get::<M>().unwrap_or(&[])
    }

    fn entry<M: Any + Send + Sync>(&mut self) -> &mut Vec<M> {
        self.inner
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()))
            .downcast_mut::<Vec<M>>()
            .expect("MetaRegistry: type mismatch (should be impossible)")
    }
}

// ── Type descriptors ────────────────────────────────────────────────────────

/// A named handle to a Rust type that can describe itself as a JSON Schema.
///
/// Descriptors are what schema and example encoders receive; they carry the
/// schema name (used as the `components/schemas` key) and a generator for
/// the root schema of the type.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    rust_type: &'static str,
    root_schema: fn(SchemaSettings) -> Schema,
}

impl TypeDescriptor {
    /// Describe `T` through its [`JsonSchema`] implementation.
    pub fn of<T: JsonSchema>() -> Self {
        Self {
            name: T::schema_name().into_owned(),
            rust_type: std::any::type_name::<T>(),
            root_schema: root_schema_for::<T>,
        }
    }

    /// Schema name, e.g. `"Greeting"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified Rust type name.
    pub fn rust_type(&self) -> &'static str {
        self.rust_type
    }

    /// Generate the root schema of this type with the given settings.
    pub fn root_schema(&self, settings: SchemaSettings) -> Schema {
        (self.root_schema)(settings)
    }
}

fn root_schema_for<T: JsonSchema>(settings: SchemaSettings) -> Schema {
    settings.into_generator().into_root_schema_for::<T>()
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("rust_type", &self.rust_type)
            .finish()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.rust_type == other.rust_type
    }
}

// ── Route metadata ──────────────────────────────────────────────────────────

/// Metadata about a single documented route.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub method: Method,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub hidden: bool,
    pub deprecated: bool,
    /// Set when the route sits behind an authentication provider.
    pub protected: bool,
    pub security_scheme_names: Vec<String>,
    pub params: Vec<ParamInfo>,
    pub request_body: Option<BodyInfo>,
    pub responses: Vec<ResponseInfo>,
}

impl RouteInfo {
    /// Non-empty `/`-separated segments of the route path.
    pub fn path_segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Where a parameter is located in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        }
    }
}

/// Metadata about a route parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub location: ParamLocation,
    pub description: Option<String>,
    pub required: bool,
    pub schema_type: String,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            // Path parameters are always required in OpenAPI.
            required: location == ParamLocation::Path,
            schema_type: "string".to_string(),
        }
    }

    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Path)
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Query)
    }

    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Header)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// OpenAPI primitive type, e.g. `"integer"`.
    pub fn schema_type(mut self, schema_type: impl Into<String>) -> Self {
        self.schema_type = schema_type.into();
        self
    }
}

/// What a request or response body contains.
#[derive(Debug, Clone, PartialEq)]
pub enum BodySchema {
    /// A Rust type, encoded through the plugin's schema encoder.
    Type(TypeDescriptor),
    /// A custom schema registered under this id.
    Custom(String),
    /// No schema, only a description.
    Empty,
}

/// A named example attached to a body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleInfo {
    pub name: String,
    pub value: Value,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl ExampleInfo {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            summary: None,
            description: None,
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A documented request or response body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub schema: BodySchema,
    pub description: Option<String>,
    pub required: bool,
    pub media_type: String,
    pub examples: Vec<ExampleInfo>,
}

impl BodyInfo {
    fn with_schema(schema: BodySchema) -> Self {
        Self {
            schema,
            description: None,
            required: true,
            media_type: "application/json".to_string(),
            examples: Vec::new(),
        }
    }

    /// Body described by the JSON Schema of `T`.
    pub fn of<T: JsonSchema>() -> Self {
        Self::with_schema(BodySchema::Type(TypeDescriptor::of::<T>()))
    }

    /// Body described by a custom schema id.
    pub fn custom(id: impl Into<String>) -> Self {
        Self::with_schema(BodySchema::Custom(id.into()))
    }

    pub fn empty() -> Self {
        Self::with_schema(BodySchema::Empty)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn example(mut self, example: ExampleInfo) -> Self {
        self.examples.push(example);
        self
    }

    /// The type descriptor, when the body is described by a Rust type.
    pub fn type_descriptor(&self) -> Option<&TypeDescriptor> {
        match &self.schema {
            BodySchema::Type(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}

/// A documented response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    pub status: u16,
    pub description: String,
    pub body: Option<BodyInfo>,
}

impl ResponseInfo {
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            body: None,
        }
    }

    pub fn body(mut self, body: BodyInfo) -> Self {
        self.body = Some(body);
        self
    }
}

/// Documentation attached to a route when it is registered.
///
/// ```ignore
/// RouteDoc::new()
///     .summary("Say hello")
///     .tag("greet")
///     .response(ResponseInfo::new(200, "Greeting").body(BodyInfo::of::<Greeting>()))
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteDoc {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub hidden: bool,
    pub deprecated: bool,
    pub security_scheme_names: Vec<String>,
    pub params: Vec<ParamInfo>,
    pub request_body: Option<BodyInfo>,
    pub responses: Vec<ResponseInfo>,
}

impl RouteDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Exclude the route from generated documentation.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Document the route as secured by the named scheme instead of the
    /// plugin's default scheme(s).
    pub fn security_scheme(mut self, name: impl Into<String>) -> Self {
        self.security_scheme_names.push(name.into());
        self
    }

    pub fn param(mut self, param: ParamInfo) -> Self {
        self.params.push(param);
        self
    }

    pub fn request_body(mut self, body: BodyInfo) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn response(mut self, response: ResponseInfo) -> Self {
        self.responses.push(response);
        self
    }

    pub(crate) fn into_route_info(self, method: Method, path: &str) -> RouteInfo {
        RouteInfo {
            method,
            path: path.to_string(),
            operation_id: self.operation_id,
            summary: self.summary,
            description: self.description,
            tags: self.tags,
            hidden: self.hidden,
            deprecated: self.deprecated,
            protected: false,
            security_scheme_names: self.security_scheme_names,
            params: self.params,
            request_body: self.request_body,
            responses: self.responses,
        }
    }
}
