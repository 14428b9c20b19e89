use serde::Serialize;
use std::collections::BTreeMap;

/// Kind of a documented security scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AuthType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[default]
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    #[serde(rename = "mutualTLS")]
    MutualTls,
}

/// HTTP authentication scheme names from the IANA registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    Basic,
    Bearer,
    Digest,
    Hoba,
    Mutual,
    Negotiate,
    OAuth,
    #[serde(rename = "scram-sha-1")]
    ScramSha1,
    #[serde(rename = "scram-sha-256")]
    ScramSha256,
    Vapid,
}

/// Where an API key is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKeyLocation {
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: BTreeMap<String, String>,
}

impl OAuthFlow {
    pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = Some(url.into());
        self
    }

    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    pub fn refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = Some(url.into());
        self
    }

    pub fn scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    pub fn implicit(mut self, f: impl FnOnce(OAuthFlow) -> OAuthFlow) -> Self {
        self.implicit = Some(f(self.implicit.take().unwrap_or_default()));
        self
    }

    pub fn password(mut self, f: impl FnOnce(OAuthFlow) -> OAuthFlow) -> Self {
        self.password = Some(f(self.password.take().unwrap_or_default()));
        self
    }

    pub fn client_credentials(mut self, f: impl FnOnce(OAuthFlow) -> OAuthFlow) -> Self {
        self.client_credentials = Some(f(self.client_credentials.take().unwrap_or_default()));
        self
    }

    pub fn authorization_code(mut self, f: impl FnOnce(OAuthFlow) -> OAuthFlow) -> Self {
        self.authorization_code = Some(f(self.authorization_code.take().unwrap_or_default()));
        self
    }
}

/// A named security scheme, emitted under `components.securitySchemes`.
///
/// ```ignore
/// SecurityScheme::new("ApiAuth")
///     .auth_type(AuthType::Http)
///     .scheme(AuthScheme::Basic)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub auth_type: AuthType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<AuthScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<AuthKeyLocation>,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SecurityScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auth_type: AuthType::default(),
            scheme: None,
            bearer_format: None,
            location: None,
            key_name: None,
            open_id_connect_url: None,
            flows: None,
            description: None,
        }
    }

    pub fn auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    pub fn scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    pub fn bearer_format(mut self, format: impl Into<String>) -> Self {
        self.bearer_format = Some(format.into());
        self
    }

    /// Where the key is carried (`apiKey` schemes).
    pub fn location(mut self, location: AuthKeyLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Name of the header, query parameter or cookie (`apiKey` schemes).
    pub fn key_name(mut self, name: impl Into<String>) -> Self {
        self.key_name = Some(name.into());
        self
    }

    pub fn open_id_connect_url(mut self, url: impl Into<String>) -> Self {
        self.open_id_connect_url = Some(url.into());
        self
    }

    pub fn flows(mut self, f: impl FnOnce(OAuthFlows) -> OAuthFlows) -> Self {
        self.flows = Some(f(self.flows.take().unwrap_or_default()));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_basic_serializes_to_openapi_shape() {
        let scheme = SecurityScheme::new("ApiAuth")
            .auth_type(AuthType::Http)
            .scheme(AuthScheme::Basic);
        assert_eq!(
            serde_json::to_value(&scheme).unwrap(),
            json!({ "type": "http", "scheme": "basic" })
        );
    }

    #[test]
    fn api_key_uses_in_and_name() {
        let scheme = SecurityScheme::new("Key")
            .auth_type(AuthType::ApiKey)
            .location(AuthKeyLocation::Header)
            .key_name("X-Api-Key");
        assert_eq!(
            serde_json::to_value(&scheme).unwrap(),
            json!({ "type": "apiKey", "in": "header", "name": "X-Api-Key" })
        );
    }

    #[test]
    fn scheme_names_follow_iana_spelling() {
        assert_eq!(serde_json::to_value(AuthScheme::ScramSha256).unwrap(), "scram-sha-256");
        assert_eq!(serde_json::to_value(AuthScheme::OAuth).unwrap(), "oauth");
        assert_eq!(serde_json::to_value(AuthType::MutualTls).unwrap(), "mutualTLS");
    }

    #[test]
    fn oauth_flows_keep_scopes() {
        let scheme = SecurityScheme::new("OAuth")
            .auth_type(AuthType::OAuth2)
            .flows(|f| {
                f.client_credentials(|c| {
                    c.token_url("https://auth.example.com/token")
                        .scope("read", "Read access")
                })
            });
        let value = serde_json::to_value(&scheme).unwrap();
        assert_eq!(
            value["flows"]["clientCredentials"],
            json!({
                "tokenUrl": "https://auth.example.com/token",
                "scopes": { "read": "Read access" }
            })
        );
    }
}
