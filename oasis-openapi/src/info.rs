//! Document-level metadata: `info`, `externalDocs`, `servers` and `tags`.

use oasis_core::config::{ConfigError, OasisConfig};
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Contact {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl License {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// The `info` object of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "latest".to_string(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }
}

impl Info {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn terms_of_service(mut self, terms: impl Into<String>) -> Self {
        self.terms_of_service = Some(terms.into());
        self
    }

    pub fn contact(mut self, f: impl FnOnce(Contact) -> Contact) -> Self {
        self.contact = Some(f(self.contact.take().unwrap_or_default()));
        self
    }

    pub fn license(mut self, f: impl FnOnce(License) -> License) -> Self {
        self.license = Some(f(self.license.take().unwrap_or_default()));
        self
    }

    /// Read `openapi.info.title`, `openapi.info.version` and
    /// `openapi.info.description`, keeping the defaults for missing keys.
    pub fn from_config(config: &OasisConfig) -> Result<Self, ConfigError> {
        let mut info = Info::default();
        if let Some(title) = config.get_opt::<String>("openapi.info.title")? {
            info.title = title;
        }
        if let Some(version) = config.get_opt::<String>("openapi.info.version")? {
            info.version = version;
        }
        info.description = config.get_opt("openapi.info.description")?;
        Ok(info)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExternalDocs {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A tag with optional description and external documentation link.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub external_doc_description: Option<String>,
    pub external_doc_url: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            external_doc_description: None,
            external_doc_url: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn external_doc_description(mut self, description: impl Into<String>) -> Self {
        self.external_doc_description = Some(description.into());
        self
    }

    pub fn external_doc_url(mut self, url: impl Into<String>) -> Self {
        self.external_doc_url = Some(url.into());
        self
    }

    /// OpenAPI tag object. `externalDocs` is only emitted when a url is set.
    pub fn to_value(&self) -> Value {
        let mut tag = Map::new();
        tag.insert("name".into(), json!(self.name));
        if let Some(ref description) = self.description {
            tag.insert("description".into(), json!(description));
        }
        if let Some(ref url) = self.external_doc_url {
            let mut docs = Map::new();
            docs.insert("url".into(), json!(url));
            if let Some(ref description) = self.external_doc_description {
                docs.insert("description".into(), json!(description));
            }
            tag.insert("externalDocs".into(), Value::Object(docs));
        }
        Value::Object(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_serializes_camel_case() {
        let info = Info::default()
            .title("Example API")
            .terms_of_service("example.com")
            .contact(|c| c.name("Mr. Example").email("example@mail.com"));
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["termsOfService"], "example.com");
        assert_eq!(value["contact"], json!({ "name": "Mr. Example", "email": "example@mail.com" }));
        assert!(value.get("license").is_none());
    }

    #[test]
    fn tag_without_doc_url_has_no_external_docs() {
        let tag = Tag::new("greet").external_doc_description("orphan description");
        assert_eq!(tag.to_value(), json!({ "name": "greet" }));
    }
}
