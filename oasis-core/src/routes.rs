use crate::http::routing::{self, MethodRouter};
use crate::http::Method;
use crate::meta::{RouteDoc, RouteInfo};
use axum::handler::Handler;

/// A documented route: the handler, its metadata, and the authentication
/// providers guarding it (outermost last).
pub(crate) struct ApiRoute<T> {
    pub(crate) info: RouteInfo,
    pub(crate) handler: MethodRouter<T>,
    pub(crate) providers: Vec<String>,
}

/// A group of documented routes.
///
/// Each route pairs an axum handler with a [`RouteDoc`]. The group is handed
/// to [`AppBuilder::register_api`](crate::builder::AppBuilder::register_api),
/// which mounts the handlers and publishes their [`RouteInfo`] for plugins.
///
/// ```ignore
/// let api = ApiRoutes::new()
///     .get("/hello", hello, RouteDoc::new().tag("greet"))
///     .authenticated("ApiAuth", ApiRoutes::new()
///         .post("/admin/reset", reset, RouteDoc::new().summary("Reset state")));
/// ```
pub struct ApiRoutes<T> {
    entries: Vec<ApiRoute<T>>,
}

impl<T: Clone + Send + Sync + 'static> ApiRoutes<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `handler` at `path`, documented as answering `method`.
    pub fn route(
        mut self,
        method: Method,
        path: &str,
        handler: MethodRouter<T>,
        doc: RouteDoc,
    ) -> Self {
        self.entries.push(ApiRoute {
            info: doc.into_route_info(method, path),
            handler,
            providers: Vec::new(),
        });
        self
    }

    pub fn get<H, X>(self, path: &str, handler: H, doc: RouteDoc) -> Self
    where
        H: Handler<X, T>,
        X: 'static,
    {
        self.route(Method::GET, path, routing::get(handler), doc)
    }

    pub fn post<H, X>(self, path: &str, handler: H, doc: RouteDoc) -> Self
    where
        H: Handler<X, T>,
        X: 'static,
    {
        self.route(Method::POST, path, routing::post(handler), doc)
    }

    pub fn put<H, X>(self, path: &str, handler: H, doc: RouteDoc) -> Self
    where
        H: Handler<X, T>,
        X: 'static,
    {
        self.route(Method::PUT, path, routing::put(handler), doc)
    }

    pub fn patch<H, X>(self, path: &str, handler: H, doc: RouteDoc) -> Self
    where
        H: Handler<X, T>,
        X: 'static,
    {
        self.route(Method::PATCH, path, routing::patch(handler), doc)
    }

    pub fn delete<H, X>(self, path: &str, handler: H, doc: RouteDoc) -> Self
    where
        H: Handler<X, T>,
        X: 'static,
    {
        self.route(Method::DELETE, path, routing::delete(handler), doc)
    }

    /// Nest `group` behind the named authentication provider.
    ///
    /// Every route of the group is marked `protected`; the provider itself is
    /// resolved when the application is built.
    pub fn authenticated(mut self, provider: &str, group: ApiRoutes<T>) -> Self {
        for mut entry in group.entries {
            entry.info.protected = true;
            entry.providers.push(provider.to_string());
            self.entries.push(entry);
        }
        self
    }

    pub fn merge(mut self, other: ApiRoutes<T>) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn route_info(&self) -> impl Iterator<Item = &RouteInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<ApiRoute<T>> {
        self.entries
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ApiRoutes<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn authenticated_marks_nested_routes_protected() {
        let api: ApiRoutes<()> = ApiRoutes::new()
            .get("/open", ok, RouteDoc::new())
            .authenticated("ApiAuth", ApiRoutes::new().post("/closed", ok, RouteDoc::new()));

        let infos: Vec<_> = api.route_info().collect();
        assert_eq!(infos.len(), 2);
        assert!(!infos[0].protected);
        assert!(infos[1].protected);
        assert_eq!(infos[1].method, Method::POST);

        let entries = api.into_entries();
        assert_eq!(entries[1].providers, vec!["ApiAuth".to_string()]);
    }

    #[test]
    fn route_keeps_doc_fields() {
        let api: ApiRoutes<()> = ApiRoutes::new().get(
            "/users/{id}",
            ok,
            RouteDoc::new().summary("Get user").tag("users").deprecated(),
        );
        let info = api.route_info().next().unwrap();
        assert_eq!(info.path, "/users/{id}");
        assert_eq!(info.summary.as_deref(), Some("Get user"));
        assert_eq!(info.tags, vec!["users".to_string()]);
        assert!(info.deprecated);
        assert_eq!(info.path_segments(), vec!["users", "{id}"]);
    }
}
