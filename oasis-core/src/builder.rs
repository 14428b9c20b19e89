use crate::auth::{protect_handler, Authenticator};
use crate::config::OasisConfig;
use crate::http::Router;
use crate::meta::{MetaRegistry, RouteInfo};
use crate::plugin::Plugin;
use crate::routes::{ApiRoute, ApiRoutes};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

type LayerFn = Box<dyn FnOnce(Router) -> Router + Send>;

/// A meta consumer reads typed metadata from the registry and returns
/// a router fragment to be merged into the application.
type MetaConsumer<T> = Box<dyn FnOnce(&MetaRegistry) -> Router<T> + Send>;

/// Marker type: application state has not been set yet.
///
/// `AppBuilder<NoState>` is the initial phase returned by [`AppBuilder::new()`].
/// Call [`.with_state()`](AppBuilder::with_state) to transition to `AppBuilder<T>`.
///
/// `NoState` is not `Clone`, so it never satisfies the state bound of the
/// typed phase. Plugins and routes cannot be added before the state is set:
///
/// ```compile_fail
/// use oasis_core::{AppBuilder, Tracing};
///
/// let _ = AppBuilder::new().with(Tracing).with_state(());
/// ```
///
/// ```compile_fail
/// use oasis_core::http::Router;
/// use oasis_core::AppBuilder;
///
/// let _ = AppBuilder::new().register_routes(Router::new()).with_state(());
/// ```
#[derive(Debug)]
pub struct NoState;

/// Configuration that is independent of the application state type.
struct BuilderConfig {
    config: Option<OasisConfig>,
    custom_layers: Vec<LayerFn>,
    authenticators: HashMap<String, Arc<dyn Authenticator>>,
}

/// Builder for assembling an Oasis application.
///
/// Collects state, documented routes, plugins and Tower layers, then produces
/// an `axum::Router` (or starts serving directly) with everything wired
/// together.
///
/// # Two-phase builder
///
/// The builder starts in the `NoState` phase, which only accepts
/// state-independent configuration (config, authentication providers,
/// layers). [`.with_state(state)`](AppBuilder::with_state) moves to the typed
/// phase, where routes are registered, plugins installed, and `.build()` or
/// `.serve()` called. State-independent configuration carries over.
pub struct AppBuilder<T = NoState> {
    shared: BuilderConfig,
    state: Option<T>,
    routes: Vec<Router<T>>,
    api_routes: Vec<ApiRoute<T>>,
    meta_registry: MetaRegistry,
    meta_consumers: Vec<MetaConsumer<T>>,
}

impl AppBuilder<NoState> {
    /// Create a new, empty builder in the pre-state phase.
    pub fn new() -> Self {
        Self {
            shared: BuilderConfig {
                config: None,
                custom_layers: Vec::new(),
                authenticators: HashMap::new(),
            },
            state: None,
            routes: Vec::new(),
            api_routes: Vec::new(),
            meta_registry: MetaRegistry::new(),
            meta_consumers: Vec::new(),
        }
    }

    /// Provide the application state and move to the typed phase.
    pub fn with_state<S: Clone + Send + Sync + 'static>(self, state: S) -> AppBuilder<S> {
        AppBuilder {
            shared: self.shared,
            state: Some(state),
            routes: Vec::new(),
            api_routes: Vec::new(),
            meta_registry: MetaRegistry::new(),
            meta_consumers: Vec::new(),
        }
    }
}

impl Default for AppBuilder<NoState> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Either phase ────────────────────────────────────────────────────────────

impl<T> AppBuilder<T> {
    // ── Configuration ───────────────────────────────────────────────────

    /// Store an `OasisConfig` in the builder so plugins can read it.
    pub fn with_config(mut self, config: OasisConfig) -> Self {
        self.shared.config = Some(config);
        self
    }

    /// The config stored via [`with_config`](Self::with_config), if any.
    pub fn config(&self) -> Option<&OasisConfig> {
        self.shared.config.as_ref()
    }

    // ── Authentication providers ────────────────────────────────────────

    /// Register a named authentication provider.
    ///
    /// Route groups ([`ApiRoutes::authenticated`]) and plugins refer to
    /// providers by this name. Registering a name twice replaces the provider.
    pub fn with_authenticator<A: Authenticator>(mut self, name: &str, provider: A) -> Self {
        if self
            .shared
            .authenticators
            .insert(name.to_string(), Arc::new(provider))
            .is_some()
        {
            tracing::warn!(provider = name, "Authentication provider registered twice, replacing");
        }
        self
    }

    /// Look up a provider registered via [`with_authenticator`](Self::with_authenticator).
    pub fn authenticator(&self, name: &str) -> Option<Arc<dyn Authenticator>> {
        self.shared.authenticators.get(name).cloned()
    }

    pub fn has_authenticator(&self, name: &str) -> bool {
        self.shared.authenticators.contains_key(name)
    }

    // ── Layer primitives ────────────────────────────────────────────────

    /// Apply a custom transformation to the final router.
    ///
    /// Layers are applied during `build()` in registration order.
    pub fn with_layer_fn<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Router) -> Router + Send + 'static,
    {
        self.shared.custom_layers.push(Box::new(f));
        self
    }

}

// ── Typed phase (state set) ─────────────────────────────────────────────────

impl<T: Clone + Send + Sync + 'static> AppBuilder<T> {
    /// Install a [`Plugin`] into this builder.
    ///
    /// # Example
    ///
    /// ```ignore
    /// AppBuilder::new()
    ///     .with_state(())
    ///     .with(Tracing)
    ///     .with(SwaggerUi::new(PluginConfig::new()))
    /// ```
    pub fn with<Pl: Plugin>(self, plugin: Pl) -> Self {
        tracing::debug!(plugin = Pl::name(), "Installing plugin");
        plugin.install(self)
    }

    /// Register a raw, undocumented `axum::Router` fragment.
    pub fn register_routes(mut self, router: Router<T>) -> Self {
        self.routes.push(router);
        self
    }

    /// Register a group of documented routes.
    ///
    /// Handlers are mounted at `build()`; their [`RouteInfo`] is published to
    /// the [`MetaRegistry`] immediately, so documentation plugins see every
    /// documented route no matter whether they were installed before or after.
    pub fn register_api(mut self, routes: ApiRoutes<T>) -> Self {
        let entries = routes.into_entries();
        self.meta_registry
            .extend::<RouteInfo>(entries.iter().map(|e| e.info.clone()));
        self.api_routes.extend(entries);
        self
    }

    /// Register a typed metadata consumer.
    ///
    /// At `build()` time, the consumer receives a shared slice of all `M` items
    /// from the [`MetaRegistry`] and returns a `Router<T>` to merge into the app.
    /// Multiple consumers for the same type can coexist (non-draining).
    ///
    /// # Example
    ///
    /// ```ignore
    /// app.with_meta_consumer::<RouteInfo, _>(|routes| {
    ///     swagger_routes::<T>(config, routes)
    /// })
    /// ```
    pub fn with_meta_consumer<M, F>(mut self, f: F) -> Self
    where
        M: std::any::Any + Send + Sync,
        F: FnOnce(&[M]) -> Router<T> + Send + 'static,
    {
        self.meta_consumers.push(Box::new(move |registry| {
            let items = registry.get_or_empty::<M>();
            f(items)
        }));
        self
    }

    /// Assemble the final `axum::Router` from all registered routes and layers.
    ///
    /// # Panics
    ///
    /// Panics if [`with_state`](AppBuilder::with_state) was never called, or
    /// if a route group references an authentication provider that was never
    /// registered.
    pub fn build(self) -> Router {
        let state = self
            .state
            .expect("AppBuilder: state must be set before build");

        let mut router = Router::new();

        for r in self.routes {
            router = router.merge(r);
        }

        router = router.merge(mount_api_routes(
            self.api_routes,
            &self.shared.authenticators,
        ));

        // Invoke meta consumers (e.g. the OpenAPI document builder).
        let meta_registry = self.meta_registry;
        for consumer in self.meta_consumers {
            router = router.merge(consumer(&meta_registry));
        }

        let mut app = router.with_state(state);

        for layer_fn in self.shared.custom_layers {
            app = layer_fn(app);
        }

        app
    }

    /// Build the application and start serving on the given address.
    ///
    /// Blocks until Ctrl-C or SIGTERM, then completes in-flight requests.
    pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.build();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "Oasis server listening");
        crate::http::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Oasis server stopped");
        Ok(())
    }
}

fn mount_api_routes<T: Clone + Send + Sync + 'static>(
    entries: Vec<ApiRoute<T>>,
    providers: &HashMap<String, Arc<dyn Authenticator>>,
) -> Router<T> {
    let mut router = Router::new();
    for entry in entries {
        let mut handler = entry.handler;
        for name in &entry.providers {
            let Some(provider) = providers.get(name) else {
                panic!(
                    "\n=== CONFIGURATION ERROR ===\n\nRoute {} {} requires authentication provider '{}', \
                     which was never registered. Call `.with_authenticator(\"{}\", ...)`.\n",
                    entry.info.method, entry.info.path, name, name
                );
            };
            handler = protect_handler(handler, provider.clone());
        }
        router = router.route(&entry.info.path, handler);
    }
    router
}

/// Wait for a shutdown signal (Ctrl-C or SIGTERM on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
