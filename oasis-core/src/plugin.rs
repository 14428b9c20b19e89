use crate::builder::AppBuilder;

/// Something that can be installed on a typed [`AppBuilder`] with `.with(plugin)`.
///
/// A plugin receives the builder after `with_state()` and hands it back. It
/// may add layers, register routers or subscribe to route metadata with
/// [`AppBuilder::with_meta_consumer`]. Anything a plugin needs from the
/// application (config, authentication providers) must be on the builder
/// before the plugin is installed.
pub trait Plugin: Send + 'static {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T>;

    /// Name used in diagnostics.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
