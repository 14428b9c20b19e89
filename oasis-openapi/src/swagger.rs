use oasis_core::config::{ConfigError, OasisConfig};

/// Which spec validator the Swagger UI page uses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpecValidator {
    /// The Swagger UI built-in (swagger.io) validator.
    #[default]
    Default,
    Disabled,
    Custom(String),
}

/// How operations are sorted within a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwaggerUiSort {
    /// Order as returned by the server.
    #[default]
    None,
    Alphanumerically,
    HttpMethod,
}

impl SwaggerUiSort {
    /// Value of the `operationsSorter` option, if any.
    pub fn sorter(&self) -> Option<&'static str> {
        match self {
            SwaggerUiSort::None => None,
            SwaggerUiSort::Alphanumerically => Some("alpha"),
            SwaggerUiSort::HttpMethod => Some("method"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwaggerUiSyntaxHighlight {
    #[default]
    Agate,
    Arta,
    Monokai,
    Nord,
    Obsidian,
    TomorrowNight,
}

impl SwaggerUiSyntaxHighlight {
    pub fn theme(&self) -> &'static str {
        match self {
            SwaggerUiSyntaxHighlight::Agate => "agate",
            SwaggerUiSyntaxHighlight::Arta => "arta",
            SwaggerUiSyntaxHighlight::Monokai => "monokai",
            SwaggerUiSyntaxHighlight::Nord => "nord",
            SwaggerUiSyntaxHighlight::Obsidian => "obsidian",
            SwaggerUiSyntaxHighlight::TomorrowNight => "tomorrow-night",
        }
    }
}

/// Options controlling where and how the Swagger UI is served.
#[derive(Debug, Clone, PartialEq)]
pub struct SwaggerUiOptions {
    /// Redirect `/` to the Swagger UI page.
    pub forward_root: bool,
    pub swagger_url: String,
    /// Prefix under which the application is reachable from outside, e.g.
    /// behind a reverse proxy. Used in redirects and page urls only.
    pub root_host_path: String,
    /// Authentication provider guarding the Swagger UI routes.
    pub authentication: Option<String>,
    pub validator: SpecValidator,
    pub display_operation_id: bool,
    pub show_tag_filter_input: bool,
    pub sort: SwaggerUiSort,
    pub syntax_highlight: SwaggerUiSyntaxHighlight,
}

impl Default for SwaggerUiOptions {
    fn default() -> Self {
        Self {
            forward_root: false,
            swagger_url: "swagger-ui".to_string(),
            root_host_path: String::new(),
            authentication: None,
            validator: SpecValidator::Default,
            display_operation_id: false,
            show_tag_filter_input: false,
            sort: SwaggerUiSort::None,
            syntax_highlight: SwaggerUiSyntaxHighlight::Agate,
        }
    }
}

impl SwaggerUiOptions {
    /// Redirect `GET /` to the Swagger UI page.
    ///
    /// The application must not serve `GET /` itself. A documented route
    /// there is reported at `build()`; a raw router registered with
    /// `register_routes` makes axum panic with an overlapping route.
    pub fn forward_root(mut self, forward: bool) -> Self {
        self.forward_root = forward;
        self
    }

    pub fn swagger_url(mut self, url: impl Into<String>) -> Self {
        self.swagger_url = url.into();
        self
    }

    pub fn root_host_path(mut self, path: impl Into<String>) -> Self {
        self.root_host_path = path.into();
        self
    }

    pub fn authentication(mut self, provider: impl Into<String>) -> Self {
        self.authentication = Some(provider.into());
        self
    }

    pub fn disable_spec_validator(mut self) -> Self {
        self.validator = SpecValidator::Disabled;
        self
    }

    pub fn spec_validator_url(mut self, url: impl Into<String>) -> Self {
        self.validator = SpecValidator::Custom(url.into());
        self
    }

    pub fn display_operation_id(mut self, display: bool) -> Self {
        self.display_operation_id = display;
        self
    }

    pub fn show_tag_filter_input(mut self, show: bool) -> Self {
        self.show_tag_filter_input = show;
        self
    }

    pub fn sort(mut self, sort: SwaggerUiSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn syntax_highlight(mut self, highlight: SwaggerUiSyntaxHighlight) -> Self {
        self.syntax_highlight = highlight;
        self
    }

    /// Route prefix of the UI inside the application, e.g. `/api/swagger-ui`.
    pub fn base_path(&self) -> String {
        format!("/{}", self.swagger_url.trim_matches('/'))
    }

    /// Externally visible prefix of the UI, e.g. `/my-app/api/swagger-ui`.
    pub fn public_path(&self) -> String {
        let root = self.root_host_path.trim_matches('/');
        if root.is_empty() {
            self.base_path()
        } else {
            format!("/{root}{}", self.base_path())
        }
    }

    /// Read the `swagger.*` keys, keeping the defaults for missing ones.
    pub fn from_config(config: &OasisConfig) -> Result<Self, ConfigError> {
        let mut options = SwaggerUiOptions::default();
        if let Some(url) = config.get_opt("swagger.url")? {
            options.swagger_url = url;
        }
        if let Some(forward) = config.get_opt("swagger.forward-root")? {
            options.forward_root = forward;
        }
        if let Some(root) = config.get_opt("swagger.root-host-path")? {
            options.root_host_path = root;
        }
        options.authentication = config.get_opt("swagger.authentication")?;
        if let Some(display) = config.get_opt("swagger.display-operation-id")? {
            options.display_operation_id = display;
        }
        if let Some(show) = config.get_opt("swagger.show-tag-filter-input")? {
            options.show_tag_filter_input = show;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_normalized() {
        let options = SwaggerUiOptions::default()
            .swagger_url("/api/swagger-ui/")
            .root_host_path("/my-web-app/");
        assert_eq!(options.base_path(), "/api/swagger-ui");
        assert_eq!(options.public_path(), "/my-web-app/api/swagger-ui");
    }

    #[test]
    fn default_paths() {
        let options = SwaggerUiOptions::default();
        assert_eq!(options.base_path(), "/swagger-ui");
        assert_eq!(options.public_path(), "/swagger-ui");
    }
}
