//! Named authentication providers.
//!
//! Providers are registered on the builder with
//! [`AppBuilder::with_authenticator`](crate::builder::AppBuilder::with_authenticator)
//! and referenced by name from route groups
//! ([`ApiRoutes::authenticated`](crate::routes::ApiRoutes::authenticated))
//! and plugins.

use crate::error::HttpError;
use crate::http::extract::{Request, State};
use crate::http::header::AUTHORIZATION;
use crate::http::middleware::{self, Next};
use crate::http::response::{IntoResponse, Response};
use crate::http::routing::MethodRouter;
use crate::http::{HeaderMap, HeaderValue, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

/// The identity established by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No credentials were supplied.
    Missing,
    /// Credentials were supplied but are malformed or wrong.
    Invalid(String),
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthRejection::Missing => write!(f, "Missing credentials"),
            AuthRejection::Invalid(msg) => write!(f, "Invalid credentials: {msg}"),
        }
    }
}

/// A runtime authentication provider.
pub trait Authenticator: Send + Sync + 'static {
    /// Validate the credentials carried by the request headers.
    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthRejection>;

    /// Value of the `WWW-Authenticate` header sent with a `401`, if any.
    fn challenge(&self) -> Option<HeaderValue> {
        None
    }
}

type CredentialCheck = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// HTTP Basic authentication (RFC 7617).
///
/// ```ignore
/// let auth = BasicAuth::new("docs", |user, password| user == "admin" && password == "secret");
/// AppBuilder::new().with_state(()).with_authenticator("SwaggerAuth", auth)
/// ```
#[derive(Clone)]
pub struct BasicAuth {
    realm: String,
    check: CredentialCheck,
}

impl BasicAuth {
    pub fn new<F>(realm: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            realm: realm.into(),
            check: Arc::new(check),
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Decode an `Authorization: Basic ...` header value into `(user, password)`.
    pub fn decode(header: &str) -> Result<(String, String), AuthRejection> {
        let encoded = header
            .strip_prefix("Basic ")
            .ok_or_else(|| AuthRejection::Invalid("expected Basic scheme".into()))?;
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthRejection::Invalid(e.to_string()))?;
        let decoded =
            String::from_utf8(decoded).map_err(|e| AuthRejection::Invalid(e.to_string()))?;
        let (user, password) = decoded
            .split_once(':')
            .ok_or_else(|| AuthRejection::Invalid("missing ':' separator".into()))?;
        Ok((user.to_string(), password.to_string()))
    }
}

impl Authenticator for BasicAuth {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthRejection> {
        let header = headers
            .get(AUTHORIZATION)
            .ok_or(AuthRejection::Missing)?
            .to_str()
            .map_err(|e| AuthRejection::Invalid(e.to_string()))?;
        let (user, password) = Self::decode(header)?;
        if (self.check)(&user, &password) {
            Ok(Principal { name: user })
        } else {
            Err(AuthRejection::Invalid("bad username or password".into()))
        }
    }

    fn challenge(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!("Basic realm=\"{}\", charset=\"UTF-8\"", self.realm)).ok()
    }
}

async fn require_auth(
    State(provider): State<Arc<dyn Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    match provider.authenticate(req.headers()) {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(rejection) => {
            tracing::debug!(
                path = %req.uri().path(),
                %rejection,
                "Request rejected by authentication provider"
            );
            HttpError::Unauthorized {
                message: rejection.to_string(),
                challenge: provider.challenge(),
            }
            .into_response()
        }
    }
}

/// Wrap a single handler with the given provider.
pub fn protect_handler<S>(
    handler: MethodRouter<S>,
    provider: Arc<dyn Authenticator>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    handler.route_layer(middleware::from_fn_with_state(provider, require_auth))
}

/// Wrap every route of a router with the given provider.
pub fn protect_router<S>(router: Router<S>, provider: Arc<dyn Authenticator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(provider, require_auth))
}
