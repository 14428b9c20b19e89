use crate::config::PluginConfig;
use crate::handlers::swagger_routes;
use oasis_core::meta::RouteInfo;
use oasis_core::{AppBuilder, Plugin};

/// Plugin that documents the application's routes as an OpenAPI document and
/// serves it with a Swagger UI page.
///
/// Authentication providers referenced by the configuration must be
/// registered before the plugin is installed.
///
/// # Example
///
/// ```ignore
/// use oasis_openapi::{PluginConfig, SwaggerUi};
///
/// AppBuilder::new()
///     .with_state(())
///     .with_authenticator("SwaggerAuth", BasicAuth::new("docs", check))
///     .with(SwaggerUi::new(
///         PluginConfig::new().swagger(|s| s.authentication("SwaggerAuth")),
///     ))
/// ```
///
/// # Panics
///
/// Installing panics when [`PluginConfig::validate`] reports problems, and
/// `build()` panics when [`PluginConfig::validate_routes`] does.
pub struct SwaggerUi {
    config: PluginConfig,
}

impl SwaggerUi {
    pub fn new(config: PluginConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }
}

impl Plugin for SwaggerUi {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        let config = self.config;
        if let Err(e) = config.validate(|name| app.has_authenticator(name)) {
            panic!("\n=== CONFIGURATION ERROR ===\n\n{e}");
        }

        let provider = config
            .swagger
            .authentication
            .as_deref()
            .and_then(|name| app.authenticator(name));

        app.with_meta_consumer::<RouteInfo, _>(move |routes| {
            if let Err(e) = config.validate_routes(routes) {
                panic!("\n=== CONFIGURATION ERROR ===\n\n{e}");
            }
            swagger_routes::<T>(&config, routes, provider)
        })
    }
}
