use http_body_util::BodyExt;
use oasis_core::http::body::Body;
use oasis_core::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use oasis_core::http::routing::get;
use oasis_core::http::{Method, Router, StatusCode};
use oasis_core::{ApiRoutes, AppBuilder, BasicAuth, MetaRegistry, Plugin, RouteDoc, RouteInfo};
use tower::ServiceExt;

async fn hello() -> &'static str {
    "hello"
}

async fn send(
    router: Router,
    method: Method,
    path: &str,
    auth: Option<&str>,
) -> (StatusCode, String, Option<String>) {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(value) = auth {
        builder = builder.header(AUTHORIZATION, value);
    }
    let response = router.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let challenge = response
        .headers()
        .get(WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap(), challenge)
}

fn basic(user: &str, password: &str) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {encoded}")
}

fn admin_auth() -> BasicAuth {
    BasicAuth::new("test", |user, password| user == "admin" && password == "secret")
}

/// Plugin that serves the number of documented routes it saw.
struct RouteCounter;

impl Plugin for RouteCounter {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.with_meta_consumer::<RouteInfo, _>(|routes| {
            let count = routes.len().to_string();
            Router::new().route("/count", get(move || async move { count }))
        })
    }
}

#[tokio::test]
async fn register_api_mounts_handlers() {
    let app = AppBuilder::new()
        .with_state(())
        .register_api(ApiRoutes::new().get("/hello", hello, RouteDoc::new()))
        .build();

    let (status, body, _) = send(app, Method::GET, "/hello", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn meta_consumer_sees_routes_registered_after_plugin() {
    let app = AppBuilder::new()
        .with_state(())
        .with(RouteCounter)
        .register_api(
            ApiRoutes::new()
                .get("/a", hello, RouteDoc::new())
                .post("/b", hello, RouteDoc::new()),
        )
        .build();

    let (status, body, _) = send(app, Method::GET, "/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "2");
}

#[tokio::test]
async fn same_path_different_methods_share_a_route() {
    let app = AppBuilder::new()
        .with_state(())
        .register_api(
            ApiRoutes::new()
                .get("/items", || async { "list" }, RouteDoc::new())
                .post("/items", || async { "create" }, RouteDoc::new()),
        )
        .build();

    let (_, body, _) = send(app.clone(), Method::GET, "/items", None).await;
    assert_eq!(body, "list");
    let (_, body, _) = send(app, Method::POST, "/items", None).await;
    assert_eq!(body, "create");
}

#[tokio::test]
async fn authenticated_group_requires_credentials() {
    let app = AppBuilder::new()
        .with_state(())
        .register_api(ApiRoutes::new().authenticated(
            "ApiAuth",
            ApiRoutes::new().get("/secret", hello, RouteDoc::new()),
        ))
        .with_authenticator("ApiAuth", admin_auth())
        .build();

    let (status, _, challenge) = send(app.clone(), Method::GET, "/secret", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge.as_deref(),
        Some("Basic realm=\"test\", charset=\"UTF-8\"")
    );

    let (status, _, _) =
        send(app.clone(), Method::GET, "/secret", Some(&basic("admin", "wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body, _) =
        send(app, Method::GET, "/secret", Some(&basic("admin", "secret"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "hello");
}

#[test]
#[should_panic(expected = "never registered")]
fn missing_provider_panics_at_build() {
    let _ = AppBuilder::new()
        .with_state(())
        .register_api(ApiRoutes::new().authenticated(
            "Nope",
            ApiRoutes::new().get("/secret", hello, RouteDoc::new()),
        ))
        .build();
}

#[test]
fn authenticator_lookup() {
    let app = AppBuilder::new().with_authenticator("ApiAuth", admin_auth());
    assert!(app.has_authenticator("ApiAuth"));
    assert!(app.authenticator("ApiAuth").is_some());
    assert!(app.authenticator("Other").is_none());
}

#[test]
fn meta_registry_is_typed() {
    let mut registry = MetaRegistry::new();
    registry.push(1u32);
    registry.extend(vec![2u32, 3u32]);
    registry.push("other");

    assert_eq!(registry.get::<u32>(), Some(&[1u32, 2, 3][..]));
    assert_eq!(registry.get_or_empty::<&str>(), &["other"]);
    assert!(registry.get::<u64>().is_none());
}

#[test]
fn basic_auth_decode() {
    assert_eq!(
        BasicAuth::decode(&basic("user", "pa:ss")).unwrap(),
        ("user".to_string(), "pa:ss".to_string())
    );
    assert!(BasicAuth::decode("Bearer abc").is_err());
    assert!(BasicAuth::decode("Basic !!!").is_err());
}

#[tokio::test]
async fn raw_routes_and_tracing_layer() {
    let app = AppBuilder::new()
        .with_state(())
        .with(oasis_core::Tracing)
        .register_routes(Router::new().route("/raw", get(|| async { "raw" })))
        .build();

    let (status, body, _) = send(app, Method::GET, "/raw", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "raw");
}

#[tokio::test]
async fn rejection_body_is_json_error() {
    let app = AppBuilder::new()
        .with_state(())
        .with_authenticator("ApiAuth", admin_auth())
        .register_api(ApiRoutes::new().authenticated(
            "ApiAuth",
            ApiRoutes::new().get("/secret", hello, RouteDoc::new()),
        ))
        .build();

    let (_, body, _) = send(app, Method::GET, "/secret", None).await;
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Missing credentials");
}

#[tokio::test]
async fn pre_state_configuration_carries_into_typed_phase() {
    let builder = AppBuilder::new()
        .with_config(oasis_core::OasisConfig::empty())
        .with_authenticator("ApiAuth", admin_auth())
        .with_layer_fn(|router| router.route("/layered", get(|| async { "layered" })))
        .with_state(());
    assert!(builder.config().is_some());
    assert!(builder.has_authenticator("ApiAuth"));

    let app = builder
        .register_api(ApiRoutes::new().authenticated(
            "ApiAuth",
            ApiRoutes::new().get("/secret", hello, RouteDoc::new()),
        ))
        .build();

    let (status, _, _) = send(app.clone(), Method::GET, "/secret", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body, _) =
        send(app.clone(), Method::GET, "/secret", Some(&basic("admin", "secret"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "hello");
    let (_, body, _) = send(app, Method::GET, "/layered", None).await;
    assert_eq!(body, "layered");
}
