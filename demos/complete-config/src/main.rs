use oasis_core::http::extract::Path;
use oasis_core::http::Json;
use oasis_core::meta::{BodyInfo, ExampleInfo, ParamInfo, ResponseInfo};
use oasis_core::plugins::Tracing;
use oasis_core::{ApiRoutes, AppBuilder, BasicAuth, OasisConfig, RouteDoc};
use oasis_openapi::{
    AuthScheme, AuthType, PluginConfig, SwaggerUi, SwaggerUiSort, SwaggerUiSyntaxHighlight,
};
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Serialize, JsonSchema)]
struct Greeting {
    message: String,
}

async fn hello() -> Json<Greeting> {
    Json(Greeting {
        message: "Hello World!".to_string(),
    })
}

async fn hello_name(Path(name): Path<String>) -> Json<Greeting> {
    Json(Greeting {
        message: format!("Hello {name}!"),
    })
}

async fn secret() -> &'static str {
    "Hello Secret!"
}

fn credentials(user: &str, password: &str) -> bool {
    user == "user" && password == "pass"
}

/// Every plugin option, on top of the `swagger.*` / `openapi.info.*` keys
/// from `application.yaml`.
fn plugin_config(config: &OasisConfig) -> Result<PluginConfig, oasis_core::ConfigError> {
    Ok(PluginConfig::from_config(config)?
        .security_scheme("ApiAuth", |s| s.auth_type(AuthType::Http).scheme(AuthScheme::Basic))
        .security_scheme("SwaggerAuth", |s| s.auth_type(AuthType::Http).scheme(AuthScheme::Basic))
        .default_security_scheme_name("ApiAuth")
        .default_unauthorized_response(|r| r.description("invalid username or password"))
        .swagger(|s| {
            s.forward_root(false)
                .authentication("SwaggerAuth")
                .disable_spec_validator()
                .sort(SwaggerUiSort::Alphanumerically)
                .syntax_highlight(SwaggerUiSyntaxHighlight::Agate)
        })
        .path_filter(|_, segments| segments.first().map(String::as_str) != Some("test"))
        .info(|i| {
            i.terms_of_service("example.com")
                .contact(|c| {
                    c.name("Mr. Example")
                        .url("example.com/contact")
                        .email("example@mail.com")
                })
                .license(|l| l.name("Mr. Example").url("example.com/license"))
        })
        .external_docs(|d| {
            d.url("https://docs.example.com")
                .description("Example external documentation description")
        })
        .server(|s| s.url("localhost:8080").description("develop server"))
        .server(|s| s.url("127.0.0.1:8080").description("production server"))
        .tag("greet", |t| {
            t.description("routes for greeting")
                .external_doc_description("documentation for greetings")
                .external_doc_url("example.com/doc")
        })
        .generate_tags(|segments| segments.first().cloned().into_iter().collect())
        .custom_schemas(|c| {
            c.json("customSchema1", r#"{"type": "string"}"#)
                .open_api("customSchema2", schemars::json_schema!({ "type": "string" }))
                .remote("customSchema3", "example.com/schema")
                .include_all(false)
        })
        .encoding(|e| {
            e.schema_encoder(|ty| {
                let schema = ty.root_schema(SchemaSettings::draft2020_12());
                serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
            })
            .schema_definitions_field("$defs")
            .example_encoder(|_, example| example.to_string())
        }))
}

fn api() -> ApiRoutes<()> {
    ApiRoutes::new()
        .get(
            "/hello",
            hello,
            RouteDoc::new()
                .operation_id("hello")
                .summary("Say hello")
                .tag("greet")
                .response(
                    ResponseInfo::new(200, "A greeting").body(
                        BodyInfo::of::<Greeting>().example(ExampleInfo::new(
                            "world",
                            serde_json::json!({ "message": "Hello World!" }),
                        )),
                    ),
                ),
        )
        .get(
            "/hello/{name}",
            hello_name,
            RouteDoc::new()
                .summary("Greet someone by name")
                .param(ParamInfo::path("name").description("Who to greet"))
                .response(ResponseInfo::new(200, "A greeting").body(BodyInfo::of::<Greeting>())),
        )
        .get("/test/hello", hello, RouteDoc::new().summary("Not documented"))
        .authenticated(
            "ApiAuth",
            ApiRoutes::new().get(
                "/secret",
                secret,
                RouteDoc::new()
                    .summary("A protected greeting")
                    .response(
                        ResponseInfo::new(200, "The secret")
                            .body(BodyInfo::custom("customSchema1")),
                    ),
            ),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = OasisConfig::load("dev")?;
    let address = config.get_or("app.address", "localhost:8080".to_string());
    let swagger = plugin_config(&config)?;

    AppBuilder::new()
        .with_state(())
        .with_config(config)
        .with(Tracing)
        .with_authenticator("ApiAuth", BasicAuth::new("api", credentials))
        .with_authenticator("SwaggerAuth", BasicAuth::new("swagger", credentials))
        .with(SwaggerUi::new(swagger))
        .register_api(api())
        .serve(&address)
        .await
}
