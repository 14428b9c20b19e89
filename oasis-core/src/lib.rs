pub mod auth;
pub mod builder;
pub mod config;
pub mod error;
pub mod http;
pub mod layers;
pub mod meta;
pub mod plugin;
pub mod plugins;
pub mod routes;

pub use auth::{AuthRejection, Authenticator, BasicAuth, Principal};
pub use builder::{AppBuilder, NoState};
pub use config::{ConfigError, ConfigValue, FromConfigValue, OasisConfig};
pub use error::HttpError;
pub use layers::{default_trace, init_tracing};
pub use meta::{
    BodyInfo, BodySchema, ExampleInfo, MetaRegistry, ParamInfo, ParamLocation, ResponseInfo,
    RouteDoc, RouteInfo, TypeDescriptor,
};
pub use plugin::Plugin;
pub use plugins::Tracing;
pub use routes::ApiRoutes;

pub use schemars;
