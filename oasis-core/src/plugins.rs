use crate::builder::AppBuilder;
use crate::layers::{default_trace, init_tracing};
use crate::plugin::Plugin;

/// Structured logging for the whole application.
///
/// Sets up the `tracing` subscriber (filtered by `RUST_LOG`) and logs every
/// request through a `TraceLayer`. Install it first so later plugins can log
/// while they install.
pub struct Tracing;

impl Plugin for Tracing {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        init_tracing();
        app.with_layer_fn(|router| router.layer(default_trace()))
    }
}
