//! Data models exchanged with the API and persisted on disk

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The active API target, persisted in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetRecord {
    /// Base URL of the credential-management API
    pub api_url: String,
    /// URL of the authentication server advertised by the API
    pub auth_url: String,
    /// OAuth client id advertised by the API
    #[serde(default)]
    pub auth_client_id: String,
}

impl TargetRecord {
    /// Whether both URLs are well-formed absolute URLs; a record failing this
    /// is treated as absent
    pub fn is_complete(&self) -> bool {
        is_absolute_url(&self.api_url) && is_absolute_url(&self.auth_url)
    }

    /// Whether the API is reached over plain HTTP
    pub fn is_insecure(&self) -> bool {
        self.api_url
            .get(..7)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http://"))
    }
}

fn is_absolute_url(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && Url::parse(raw).is_ok()
}

/// Body of the `/info` discovery endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InfoResponse {
    /// Application metadata
    #[serde(default)]
    pub app: AppInfo,
    /// Authentication server the API delegates to
    #[serde(rename = "auth-server")]
    pub auth_server: AuthServerInfo,
}

/// Application metadata reported by `/info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppInfo {
    /// Server version string
    #[serde(default)]
    pub version: String,
    /// Server application name
    #[serde(default)]
    pub name: String,
}

/// Authentication server block reported by `/info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthServerInfo {
    /// Absolute URL of the authentication server
    #[serde(default)]
    pub url: String,
    /// OAuth client id to use against the authentication server
    #[serde(default)]
    pub client: String,
}

/// Decoded body of a successful secret operation
///
/// Decoding is lenient: known fields are picked out one by one and anything
/// that fails to decode is dropped instead of failing the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecretBody {
    /// Credential type (`value`, `password`, `certificate`, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Credential payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Last modification timestamp as reported by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Every other field of the payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecretBody {
    /// Decode a response body, degrading to an empty value on malformed JSON
    pub fn from_slice_lenient(body: &[u8]) -> Self {
        let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let content_type = take_string(&mut fields, "type");
        let updated_at = take_string(&mut fields, "updated_at");
        let value = fields.remove("value").filter(|v| !v.is_null());

        Self {
            content_type,
            value,
            updated_at,
            extra: fields,
        }
    }

    /// Whether nothing at all was decoded
    pub fn is_empty(&self) -> bool {
        self.content_type.is_none()
            && self.value.is_none()
            && self.updated_at.is_none()
            && self.extra.is_empty()
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
