use crate::encoding::EncodingConfig;
use crate::info::{ExternalDocs, Info, Server, Tag};
use crate::schema::{CustomSchema, CustomSchemas};
use crate::security::SecurityScheme;
use crate::swagger::SwaggerUiOptions;
use oasis_core::config::{ConfigError, OasisConfig};
use oasis_core::http::Method;
use oasis_core::{BodyInfo, RouteInfo};
use std::sync::Arc;

/// Decides whether a route (method, path segments) is documented.
pub type PathFilter = Arc<dyn Fn(&Method, &[String]) -> bool + Send + Sync>;

/// Derives tag names from the path segments of a route.
pub type TagGenerator = Arc<dyn Fn(&[String]) -> Vec<String> + Send + Sync>;

/// Response documented as `401` on protected routes that do not document one.
#[derive(Debug, Clone, PartialEq)]
pub struct UnauthorizedResponse {
    pub description: String,
    pub body: Option<BodyInfo>,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            description: "Unauthorized".to_string(),
            body: None,
        }
    }
}

impl UnauthorizedResponse {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn body(mut self, body: BodyInfo) -> Self {
        self.body = Some(body);
        self
    }
}

/// Configuration of the [`SwaggerUi`](crate::SwaggerUi) plugin.
///
/// Every option has a default; setters consume and return the config, and
/// nested objects are edited through closures receiving the current value.
///
/// ```ignore
/// PluginConfig::new()
///     .security_scheme("ApiAuth", |s| s.auth_type(AuthType::Http).scheme(AuthScheme::Basic))
///     .default_security_scheme_name("ApiAuth")
///     .swagger(|s| s.swagger_url("api/swagger-ui").display_operation_id(true))
///     .info(|i| i.title("Example API").version("latest"))
///     .server(|s| s.url("localhost:8080").description("develop server"))
///     .tag("greet", |t| t.description("routes for greeting"))
///     .generate_tags(|segments| segments.first().cloned().into_iter().collect())
/// ```
#[derive(Clone, Default)]
pub struct PluginConfig {
    pub security_schemes: Vec<SecurityScheme>,
    pub default_security_scheme_names: Vec<String>,
    pub default_unauthorized_response: Option<UnauthorizedResponse>,
    pub swagger: SwaggerUiOptions,
    pub path_filter: Option<PathFilter>,
    pub info: Info,
    pub external_docs: Option<ExternalDocs>,
    pub servers: Vec<Server>,
    pub tags: Vec<Tag>,
    pub tag_generator: Option<TagGenerator>,
    pub custom_schemas: CustomSchemas,
    pub encoding: EncodingConfig,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `swagger.*` and `openapi.info.*` keys of `config`.
    pub fn from_config(config: &OasisConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            swagger: SwaggerUiOptions::from_config(config)?,
            info: Info::from_config(config)?,
            ..Self::default()
        })
    }

    // ── Security ────────────────────────────────────────────────────────

    /// Register a security scheme. Registering a name again replaces it.
    pub fn security_scheme(
        mut self,
        name: &str,
        f: impl FnOnce(SecurityScheme) -> SecurityScheme,
    ) -> Self {
        let scheme = f(SecurityScheme::new(name));
        match self.security_schemes.iter_mut().find(|s| s.name == name) {
            Some(existing) => *existing = scheme,
            None => self.security_schemes.push(scheme),
        }
        self
    }

    /// Scheme documented on protected routes that name none themselves.
    pub fn default_security_scheme_name(mut self, name: impl Into<String>) -> Self {
        self.default_security_scheme_names = vec![name.into()];
        self
    }

    pub fn default_security_scheme_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_security_scheme_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_unauthorized_response(
        mut self,
        f: impl FnOnce(UnauthorizedResponse) -> UnauthorizedResponse,
    ) -> Self {
        let current = self.default_unauthorized_response.take().unwrap_or_default();
        self.default_unauthorized_response = Some(f(current));
        self
    }

    pub fn find_security_scheme(&self, name: &str) -> Option<&SecurityScheme> {
        self.security_schemes.iter().find(|s| s.name == name)
    }

    /// The registered schemes the default names resolve to.
    pub fn default_security_schemes(&self) -> Vec<&SecurityScheme> {
        self.default_security_scheme_names
            .iter()
            .filter_map(|name| self.find_security_scheme(name))
            .collect()
    }

    /// Scheme names documented for `route`: its own, else the defaults.
    /// Routes that are neither protected nor name a scheme get none.
    pub fn security_for(&self, route: &RouteInfo) -> Vec<String> {
        if !route.security_scheme_names.is_empty() {
            route.security_scheme_names.clone()
        } else if route.protected {
            self.default_security_scheme_names.clone()
        } else {
            Vec::new()
        }
    }

    // ── Swagger UI ──────────────────────────────────────────────────────

    pub fn swagger(mut self, f: impl FnOnce(SwaggerUiOptions) -> SwaggerUiOptions) -> Self {
        self.swagger = f(self.swagger);
        self
    }

    // ── Route selection and tags ────────────────────────────────────────

    pub fn path_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Method, &[String]) -> bool + Send + Sync + 'static,
    {
        self.path_filter = Some(Arc::new(filter));
        self
    }

    pub fn generate_tags<F>(mut self, generator: F) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
    {
        self.tag_generator = Some(Arc::new(generator));
        self
    }

    /// Whether `route` appears in the document.
    pub fn includes(&self, route: &RouteInfo) -> bool {
        if route.hidden {
            return false;
        }
        match self.path_filter {
            Some(ref filter) => filter(&route.method, &route.path_segments()),
            None => true,
        }
    }

    /// Route tags followed by generated ones, without blanks or duplicates.
    pub fn tags_for(&self, route: &RouteInfo) -> Vec<String> {
        let generated = match self.tag_generator {
            Some(ref generator) => generator(&route.path_segments()),
            None => Vec::new(),
        };
        let mut tags: Vec<String> = Vec::new();
        for tag in route.tags.iter().cloned().chain(generated) {
            if !tag.trim().is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    // ── Document metadata ───────────────────────────────────────────────

    pub fn info(mut self, f: impl FnOnce(Info) -> Info) -> Self {
        self.info = f(self.info);
        self
    }

    pub fn external_docs(mut self, f: impl FnOnce(ExternalDocs) -> ExternalDocs) -> Self {
        self.external_docs = Some(f(self.external_docs.take().unwrap_or_default()));
        self
    }

    /// Add a server. Servers keep their registration order.
    pub fn server(mut self, f: impl FnOnce(Server) -> Server) -> Self {
        self.servers.push(f(Server::default()));
        self
    }

    /// Add a tag, or replace the one already registered under `name`.
    pub fn tag(mut self, name: &str, f: impl FnOnce(Tag) -> Tag) -> Self {
        let tag = f(Tag::new(name));
        match self.tags.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
        self
    }

    // ── Schemas ─────────────────────────────────────────────────────────

    pub fn custom_schemas(mut self, f: impl FnOnce(CustomSchemas) -> CustomSchemas) -> Self {
        self.custom_schemas = f(self.custom_schemas);
        self
    }

    pub fn encoding(mut self, f: impl FnOnce(EncodingConfig) -> EncodingConfig) -> Self {
        self.encoding = f(self.encoding);
        self
    }

    // ── Validation ──────────────────────────────────────────────────────

    /// Check the configuration for problems that would only show up once
    /// the document is served. `has_provider` tells whether an
    /// authentication provider with the given name exists.
    pub fn validate(&self, has_provider: impl Fn(&str) -> bool) -> Result<(), ConfigurationError> {
        let mut problems = Vec::new();

        for name in &self.default_security_scheme_names {
            if self.find_security_scheme(name).is_none() {
                problems.push(format!(
                    "default security scheme '{name}' is not registered; add `.security_scheme(\"{name}\", ...)`"
                ));
            }
        }

        if let Some(ref provider) = self.swagger.authentication {
            if !has_provider(provider) {
                problems.push(format!(
                    "swagger authentication provider '{provider}' is not registered; call \
                     `.with_authenticator(\"{provider}\", ...)` before installing the plugin"
                ));
            }
        }

        if self.swagger.swagger_url.trim_matches('/').is_empty() {
            problems.push("swagger url must not be empty".to_string());
        }

        for (id, schema) in self.custom_schemas.iter() {
            if !matches!(schema, CustomSchema::Json(_)) {
                continue;
            }
            if let Err(e) = schema.to_value() {
                problems.push(format!("custom schema '{id}' is not valid JSON: {e}"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError { problems })
        }
    }

    /// Check the configuration against the application's documented routes.
    ///
    /// Runs once every route is known, at `build()`. Reports a documented
    /// `GET /` when `forward_root` is on.
    pub fn validate_routes(&self, routes: &[RouteInfo]) -> Result<(), ConfigurationError> {
        let mut problems = Vec::new();

        if self.swagger.forward_root {
            let root = routes
                .iter()
                .find(|r| r.method == Method::GET && r.path_segments().is_empty());
            if let Some(route) = root {
                problems.push(format!(
                    "swagger forward_root redirects `GET /`, but the application also \
                     registers `GET {}`; turn off `.forward_root(true)` or move that route",
                    route.path
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError { problems })
        }
    }
}

impl std::fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginConfig")
            .field("security_schemes", &self.security_schemes)
            .field("default_security_scheme_names", &self.default_security_scheme_names)
            .field("default_unauthorized_response", &self.default_unauthorized_response)
            .field("swagger", &self.swagger)
            .field("path_filter", &self.path_filter.is_some())
            .field("info", &self.info)
            .field("external_docs", &self.external_docs)
            .field("servers", &self.servers)
            .field("tags", &self.tags)
            .field("tag_generator", &self.tag_generator.is_some())
            .field("custom_schemas", &self.custom_schemas)
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Problems found by [`PluginConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    pub problems: Vec<String>,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Invalid Swagger UI configuration:")?;
        for problem in &self.problems {
            writeln!(f, "  - {problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationError {}
