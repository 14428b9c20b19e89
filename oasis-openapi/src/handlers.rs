use crate::builder::build_spec;
use crate::config::PluginConfig;
use crate::swagger::{SpecValidator, SwaggerUiOptions};
use oasis_core::auth::{protect_router, Authenticator};
use oasis_core::http::header::CONTENT_TYPE;
use oasis_core::http::response::{Html, IntoResponse, Redirect, Response};
use oasis_core::http::routing::get;
use oasis_core::http::Router;
use oasis_core::meta::RouteInfo;
use oasis_core::HttpError;
use std::sync::Arc;

const SWAGGER_UI_CDN: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.17.14";

struct SwaggerState {
    /// Serialized document, or the assembly error message.
    spec_json: Result<String, String>,
    index_html: String,
}

/// Build the router serving the Swagger UI page and the OpenAPI document.
///
/// The document is assembled once, here. Routes live under the configured
/// swagger url; `provider`, when given, guards all of them.
pub fn swagger_routes<T: Clone + Send + Sync + 'static>(
    config: &PluginConfig,
    routes: &[RouteInfo],
    provider: Option<Arc<dyn Authenticator>>,
) -> Router<T> {
    let options = &config.swagger;
    let base = options.base_path();
    let public = options.public_path();

    let spec_json = build_spec(config, routes)
        .and_then(|spec| serde_json::to_string_pretty(&spec).map_err(Into::into))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to assemble OpenAPI document");
            e.to_string()
        });
    let state = Arc::new(SwaggerState {
        spec_json,
        index_html: render_index(options, &public),
    });

    let index_location = format!("{public}/index.html");
    let redirect_to = index_location.clone();
    let html_state = state.clone();
    let json_state = state;

    let mut router = Router::<T>::new()
        .route(
            &base,
            get(move || {
                let location = redirect_to.clone();
                async move { Redirect::to(&location) }
            }),
        )
        .route(
            &format!("{base}/index.html"),
            get(move || {
                let state = html_state.clone();
                async move { Html(state.index_html.clone()) }
            }),
        )
        .route(
            &format!("{base}/api.json"),
            get(move || {
                let state = json_state.clone();
                async move { spec_response(&state) }
            }),
        );

    if let Some(provider) = provider {
        router = protect_router(router, provider);
    }

    if options.forward_root {
        router = router.route(
            "/",
            get(move || {
                let location = index_location.clone();
                async move { Redirect::to(&location) }
            }),
        );
    }

    tracing::info!(path = %public, "Swagger UI available");
    router
}

fn spec_response(state: &SwaggerState) -> Response {
    match state.spec_json {
        Ok(ref json) => ([(CONTENT_TYPE, "application/json")], json.clone()).into_response(),
        Err(ref message) => HttpError::Internal(message.clone()).into_response(),
    }
}

/// Render the Swagger UI page for the given options.
pub fn render_index(options: &SwaggerUiOptions, public_path: &str) -> String {
    // JSON string literal, safe inside an inline <script>.
    let js = |value: &str| serde_json::Value::from(value).to_string().replace("</", "<\\/");

    let mut settings = vec![
        format!("url: {}", js(&format!("{public_path}/api.json"))),
        "dom_id: '#swagger-ui'".to_string(),
        "deepLinking: true".to_string(),
        "presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset]".to_string(),
        "layout: \"StandaloneLayout\"".to_string(),
    ];
    match options.validator {
        SpecValidator::Default => {}
        SpecValidator::Disabled => settings.push("validatorUrl: \"none\"".to_string()),
        SpecValidator::Custom(ref url) => settings.push(format!("validatorUrl: {}", js(url))),
    }
    settings.push(format!("displayOperationId: {}", options.display_operation_id));
    settings.push(format!("filter: {}", options.show_tag_filter_input));
    if let Some(sorter) = options.sort.sorter() {
        settings.push(format!("operationsSorter: {}", js(sorter)));
    }
    settings.push(format!(
        "syntaxHighlight: {{ activated: true, theme: {} }}",
        js(options.syntax_highlight.theme())
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Swagger UI</title>
    <link rel="stylesheet" href="{cdn}/swagger-ui.css">
    <style>
        body {{
            margin: 0;
            padding: 0;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="{cdn}/swagger-ui-bundle.js"></script>
    <script src="{cdn}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            window.ui = SwaggerUIBundle({{
                {settings}
            }});
        }};
    </script>
</body>
</html>"#,
        cdn = SWAGGER_UI_CDN,
        settings = settings.join(",\n                "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::{SwaggerUiSort, SwaggerUiSyntaxHighlight};

    #[test]
    fn index_reflects_options() {
        let options = SwaggerUiOptions::default()
            .disable_spec_validator()
            .display_operation_id(true)
            .show_tag_filter_input(true)
            .sort(SwaggerUiSort::HttpMethod)
            .syntax_highlight(SwaggerUiSyntaxHighlight::TomorrowNight);
        let html = render_index(&options, "/app/docs");

        assert!(html.contains(r#"url: "/app/docs/api.json""#));
        assert!(html.contains(r#"validatorUrl: "none""#));
        assert!(html.contains("displayOperationId: true"));
        assert!(html.contains("filter: true"));
        assert!(html.contains(r#"operationsSorter: "method""#));
        assert!(html.contains(r#"theme: "tomorrow-night""#));
    }

    #[test]
    fn defaults_leave_out_optional_settings() {
        let html = render_index(&SwaggerUiOptions::default(), "/swagger-ui");
        assert!(!html.contains("validatorUrl"));
        assert!(!html.contains("operationsSorter"));
        assert!(html.contains("displayOperationId: false"));
        assert!(html.contains(r#"theme: "agate""#));
    }

    #[test]
    fn script_closing_tags_in_values_are_escaped() {
        let options = SwaggerUiOptions::default()
            .spec_validator_url("https://v.example.com/</script><b>");
        let html = render_index(&options, "/x</script>");

        assert_eq!(html.matches("</script>").count(), html.matches("<script").count());
        assert!(html.contains(r#"url: "/x<\/script>/api.json""#));
        assert!(html.contains(r#"validatorUrl: "https://v.example.com/<\/script><b>""#));
    }
}
