use oasis_core::http::Method;
use oasis_core::{BodyInfo, ConfigValue, OasisConfig, RouteInfo};
use oasis_openapi::{
    AuthScheme, AuthType, CustomSchema, PluginConfig, SpecValidator, SwaggerUiSort,
    SwaggerUiSyntaxHighlight,
};
use serde_json::json;

fn two_schemes() -> PluginConfig {
    PluginConfig::new()
        .security_scheme("ApiAuth", |s| s.auth_type(AuthType::Http).scheme(AuthScheme::Basic))
        .security_scheme("TokenAuth", |s| {
            s.auth_type(AuthType::Http)
                .scheme(AuthScheme::Bearer)
                .bearer_format("JWT")
        })
}

fn route(path: &str, protected: bool) -> RouteInfo {
    RouteInfo {
        method: Method::GET,
        path: path.to_string(),
        operation_id: None,
        summary: None,
        description: None,
        tags: vec![],
        hidden: false,
        deprecated: false,
        protected,
        security_scheme_names: vec![],
        params: vec![],
        request_body: None,
        responses: vec![],
    }
}

// ── Read-back of every option ───────────────────────────────────────────────

#[test]
fn swagger_options_read_back() {
    let config = PluginConfig::new().swagger(|s| {
        s.forward_root(true)
            .swagger_url("/api/swagger-ui")
            .root_host_path("/my-web-app")
            .authentication("SwaggerAuth")
            .disable_spec_validator()
            .display_operation_id(true)
            .show_tag_filter_input(true)
            .sort(SwaggerUiSort::Alphanumerically)
            .syntax_highlight(SwaggerUiSyntaxHighlight::Monokai)
    });

    let swagger = &config.swagger;
    assert!(swagger.forward_root);
    assert_eq!(swagger.swagger_url, "/api/swagger-ui");
    assert_eq!(swagger.root_host_path, "/my-web-app");
    assert_eq!(swagger.authentication.as_deref(), Some("SwaggerAuth"));
    assert_eq!(swagger.validator, SpecValidator::Disabled);
    assert!(swagger.display_operation_id);
    assert!(swagger.show_tag_filter_input);
    assert_eq!(swagger.sort, SwaggerUiSort::Alphanumerically);
    assert_eq!(swagger.syntax_highlight, SwaggerUiSyntaxHighlight::Monokai);
}

#[test]
fn defaults() {
    let config = PluginConfig::new();
    assert_eq!(config.info.title, "API");
    assert_eq!(config.info.version, "latest");
    assert_eq!(config.swagger.swagger_url, "swagger-ui");
    assert!(!config.swagger.forward_root);
    assert_eq!(config.swagger.validator, SpecValidator::Default);
    assert_eq!(config.swagger.syntax_highlight, SwaggerUiSyntaxHighlight::Agate);
    assert_eq!(config.encoding.schema_definitions_field, "$defs");
    assert!(!config.custom_schemas.include_all);
    assert!(config.default_unauthorized_response.is_none());
}

#[test]
fn info_read_back() {
    let config = PluginConfig::new().info(|i| {
        i.title("Example API")
            .version("latest")
            .description("This is an example api")
            .terms_of_service("example.com")
            .contact(|c| c.name("Mr. Example").url("example.com/contact").email("example@mail.com"))
            .license(|l| l.name("Mr. Example").url("example.com/license"))
    });

    let info = &config.info;
    assert_eq!(info.title, "Example API");
    assert_eq!(info.description.as_deref(), Some("This is an example api"));
    assert_eq!(info.terms_of_service.as_deref(), Some("example.com"));
    let contact = info.contact.as_ref().unwrap();
    assert_eq!(contact.email.as_deref(), Some("example@mail.com"));
    assert_eq!(info.license.as_ref().unwrap().url.as_deref(), Some("example.com/license"));
}

#[test]
fn servers_keep_order_and_tags_replace_in_place() {
    let config = PluginConfig::new()
        .external_docs(|d| d.url("https://docs.example.com").description("External docs"))
        .server(|s| s.url("localhost:8080").description("develop server"))
        .server(|s| s.url("127.0.0.1:8080").description("production server"))
        .tag("greet", |t| t.description("first"))
        .tag("admin", |t| t)
        .tag("greet", |t| {
            t.description("routes for greeting")
                .external_doc_description("documentation for greetings")
                .external_doc_url("example.com/doc")
        });

    let urls: Vec<_> = config.servers.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["localhost:8080", "127.0.0.1:8080"]);

    let names: Vec<_> = config.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["greet", "admin"]);
    assert_eq!(config.tags[0].description.as_deref(), Some("routes for greeting"));
    assert_eq!(config.tags[0].external_doc_url.as_deref(), Some("example.com/doc"));
    assert_eq!(config.external_docs.as_ref().unwrap().url, "https://docs.example.com");
}

#[test]
fn custom_schemas_and_encoding_read_back() {
    let config = PluginConfig::new()
        .custom_schemas(|c| {
            c.json("customSchema1", r#"{"type": "string"}"#)
                .open_api("customSchema2", schemars::json_schema!({ "type": "string" }))
                .remote("customSchema3", "example.com/schema")
                .include_all(true)
        })
        .encoding(|e| {
            e.schema_definitions_field("definitions")
                .example_encoder(|_, v| v.to_string())
        });

    let custom = &config.custom_schemas;
    assert!(custom.include_all);
    assert_eq!(custom.len(), 3);
    assert_eq!(
        custom.get("customSchema3"),
        Some(&CustomSchema::Remote("example.com/schema".into()))
    );
    assert_eq!(config.encoding.schema_definitions_field, "definitions");
    assert_eq!(config.encoding.encode_example(None, &json!([1, 2])), json!([1, 2]));
}

#[test]
fn default_unauthorized_response_read_back() {
    let config = PluginConfig::new().default_unauthorized_response(|r| {
        r.description("invalid username or password")
            .body(BodyInfo::custom("customSchema1"))
    });
    let response = config.default_unauthorized_response.unwrap();
    assert_eq!(response.description, "invalid username or password");
    assert_eq!(response.body, Some(BodyInfo::custom("customSchema1")));
}

// ── Security scheme resolution ──────────────────────────────────────────────

#[test]
fn default_scheme_resolves_to_its_settings() {
    let config = two_schemes().default_security_scheme_name("TokenAuth");

    let defaults = config.default_security_schemes();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].name, "TokenAuth");
    assert_eq!(defaults[0].scheme, Some(AuthScheme::Bearer));
    assert_eq!(defaults[0].bearer_format.as_deref(), Some("JWT"));

    assert_eq!(config.security_for(&route("/secret", true)), vec!["TokenAuth"]);
    assert!(config.security_for(&route("/open", false)).is_empty());
}

#[test]
fn route_schemes_win_over_defaults() {
    let config = two_schemes().default_security_scheme_name("TokenAuth");
    let mut secret = route("/secret", true);
    secret.security_scheme_names = vec!["ApiAuth".into()];
    assert_eq!(config.security_for(&secret), vec!["ApiAuth"]);
}

#[test]
fn re_registering_a_scheme_replaces_it() {
    let config = two_schemes().security_scheme("ApiAuth", |s| s.auth_type(AuthType::ApiKey));
    assert_eq!(config.security_schemes.len(), 2);
    assert_eq!(config.find_security_scheme("ApiAuth").unwrap().auth_type, AuthType::ApiKey);
}

// ── Route selection ─────────────────────────────────────────────────────────

#[test]
fn path_filter_excludes_test_routes() {
    let config = PluginConfig::new()
        .path_filter(|_, segments| segments.first().map(String::as_str) != Some("test"));

    let included: Vec<_> = ["/hello", "/test", "/test/nested", "/", "/api/test"]
        .into_iter()
        .filter(|path| config.includes(&route(path, false)))
        .collect();
    assert_eq!(included, vec!["/hello", "/", "/api/test"]);
}

#[test]
fn hidden_routes_are_never_included() {
    let mut hidden = route("/hello", false);
    hidden.hidden = true;
    assert!(!PluginConfig::new().includes(&hidden));
}

#[test]
fn generated_tags_follow_route_tags() {
    let config = PluginConfig::new()
        .generate_tags(|segments| segments.first().cloned().into_iter().collect());

    let mut greet = route("/greet/{name}", false);
    greet.tags = vec!["hello".into(), "greet".into()];
    assert_eq!(config.tags_for(&greet), vec!["hello", "greet"]);

    assert_eq!(config.tags_for(&route("/users/{id}", false)), vec!["users"]);
    assert!(config.tags_for(&route("/", false)).is_empty());
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn valid_config_passes() {
    let config = two_schemes()
        .default_security_scheme_name("ApiAuth")
        .swagger(|s| s.authentication("SwaggerAuth"));
    assert!(config.validate(|name| name == "SwaggerAuth").is_ok());
}

#[test]
fn validation_reports_every_problem() {
    let config = two_schemes()
        .default_security_scheme_names(["ApiAuth", "Missing"])
        .swagger(|s| s.authentication("SwaggerAuth").swagger_url("/"))
        .custom_schemas(|c| c.json("broken", "{not json"));

    let err = config.validate(|_| false).unwrap_err();
    assert_eq!(err.problems.len(), 4);
    let text = err.to_string();
    assert!(text.contains("'Missing'"));
    assert!(text.contains("'SwaggerAuth'"));
    assert!(text.contains("swagger url"));
    assert!(text.contains("'broken'"));
}

#[test]
fn from_config_overrides_defaults_only_where_set() {
    let mut oasis = OasisConfig::empty();
    oasis.set("swagger.url", ConfigValue::String("docs".into()));
    oasis.set("openapi.info.title", ConfigValue::String("From YAML".into()));

    let config = PluginConfig::from_config(&oasis).unwrap();
    assert_eq!(config.swagger.swagger_url, "docs");
    assert_eq!(config.info.title, "From YAML");
    assert_eq!(config.info.version, "latest");
}

#[test]
fn forward_root_conflicts_with_a_documented_root_route() {
    let config = PluginConfig::new().swagger(|s| s.forward_root(true));
    let routes = vec![route("/hello", false), route("/", false)];

    let err = config.validate_routes(&routes).unwrap_err();
    assert_eq!(err.problems.len(), 1);
    assert!(err.to_string().contains("forward_root"));

    assert!(config.validate_routes(&routes[..1]).is_ok());
    assert!(PluginConfig::new().validate_routes(&routes).is_ok());

    let mut post_root = route("/", false);
    post_root.method = Method::POST;
    assert!(config.validate_routes(&[post_root]).is_ok());
}
