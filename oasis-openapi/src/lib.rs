mod builder;
mod config;
pub mod encoding;
mod ext;
mod handlers;
pub mod info;
pub mod schema;
pub mod security;
pub mod swagger;

pub use builder::{build_spec, SpecError};
pub use config::{ConfigurationError, PathFilter, PluginConfig, TagGenerator, UnauthorizedResponse};
pub use encoding::{EncodingConfig, ExampleEncoder, SchemaEncoder};
pub use ext::SwaggerUi;
pub use handlers::{render_index, swagger_routes};
pub use info::{Contact, ExternalDocs, Info, License, Server, Tag};
pub use schema::{CustomSchema, CustomSchemas};
pub use security::{AuthKeyLocation, AuthScheme, AuthType, OAuthFlow, OAuthFlows, SecurityScheme};
pub use swagger::{SpecValidator, SwaggerUiOptions, SwaggerUiSort, SwaggerUiSyntaxHighlight};
