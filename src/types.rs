//! Data types returned by the Config Lake API.
//!
//! The public types are plain maps plus [`AllDetails`]. The `*Body` types
//! describe what the server may send on the wire and are converted into the
//! public types by the client.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Non-sensitive settings, keyed by name.
pub type ConfigMap = HashMap<String, String>;

/// Sensitive settings, keyed by name. Values arrive already decrypted.
pub type SecretMap = HashMap<String, String>;

/// Configurations and secrets of one project environment, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllDetails {
    /// Plain-text configuration values.
    pub configs: ConfigMap,
    /// Secret values.
    pub secrets: SecretMap,
    /// Project the values belong to.
    pub project_id: u64,
    /// Environment the values belong to.
    pub environment: String,
}

impl AllDetails {
    /// Look a key up in the configs first, then in the secrets.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.configs
            .get(key)
            .or_else(|| self.secrets.get(key))
            .map(String::as_str)
    }
}

type JsonObject = serde_json::Map<String, Value>;

/// Body of `/api/config/...`: either `{"configs": {...}}` or a flat map.
#[derive(Debug)]
pub(crate) struct ConfigsBody(pub(crate) ConfigMap);

impl<'de> Deserialize<'de> for ConfigsBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        unwrap_envelope(object, "configs")
            .map(Self)
            .map_err(de::Error::custom)
    }
}

impl From<ConfigsBody> for ConfigMap {
    fn from(body: ConfigsBody) -> Self {
        body.0
    }
}

/// Body of `/api/secrets/...`: either `{"secrets": {...}}` or a flat map.
///
/// Sibling fields such as `environment_key` are ignored.
#[derive(Debug)]
pub(crate) struct SecretsBody(pub(crate) SecretMap);

impl<'de> Deserialize<'de> for SecretsBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        unwrap_envelope(object, "secrets")
            .map(Self)
            .map_err(de::Error::custom)
    }
}

impl From<SecretsBody> for SecretMap {
    fn from(body: SecretsBody) -> Self {
        body.0
    }
}

/// Body of `/api/all/...`.
#[derive(Debug, Deserialize)]
pub(crate) struct AllDetailsBody {
    #[serde(default, deserialize_with = "configs_field")]
    configs: ConfigMap,
    #[serde(default, deserialize_with = "secrets_field")]
    secrets: SecretMap,
    #[serde(default)]
    project_id: Option<u64>,
    #[serde(default)]
    environment: Option<String>,
}

impl AllDetailsBody {
    /// Fill in `project_id`/`environment` from the request when the server omits them.
    pub(crate) fn into_details(self, project_id: u64, environment: &str) -> AllDetails {
        AllDetails {
            configs: self.configs,
            secrets: self.secrets,
            project_id: self.project_id.unwrap_or(project_id),
            environment: self
                .environment
                .unwrap_or_else(|| environment.to_string()),
        }
    }
}

/// The map under `key` when it holds an object, otherwise the whole body.
fn unwrap_envelope(mut object: JsonObject, key: &str) -> Result<HashMap<String, String>, String> {
    match object.remove(key) {
        Some(Value::Object(inner)) => string_map(inner, Some(key)),
        Some(other) => {
            object.insert(key.to_string(), other);
            string_map(object, None)
        }
        None => string_map(object, None),
    }
}

fn string_map(object: JsonObject, parent: Option<&str>) -> Result<HashMap<String, String>, String> {
    object
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(text) => Ok((name, text)),
            other => {
                let key = match parent {
                    Some(parent) => format!("{parent}.{name}"),
                    None => name,
                };
                Err(format!(
                    "value of `{key}` must be a string, got {}",
                    json_type(&other)
                ))
            }
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn configs_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ConfigMap, D::Error> {
    let object = JsonObject::deserialize(deserializer)?;
    string_map(object, Some("configs")).map_err(de::Error::custom)
}

fn secrets_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretMap, D::Error> {
    let object = JsonObject::deserialize(deserializer)?;
    string_map(object, Some("secrets")).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn configs_body_accepts_flat_map() {
        let body: ConfigsBody = serde_json::from_str(r#"{"A":"1","B":"2"}"#).unwrap();
        assert_eq!(ConfigMap::from(body), map(&[("A", "1"), ("B", "2")]));
    }

    #[test]
    fn configs_body_unwraps_envelope() {
        let body: ConfigsBody =
            serde_json::from_str(r#"{"configs":{"API_URL":"https://x"},"project_id":3}"#).unwrap();
        assert_eq!(ConfigMap::from(body), map(&[("API_URL", "https://x")]));
    }

    #[test]
    fn configs_key_with_string_value_is_a_plain_setting() {
        let body: ConfigsBody = serde_json::from_str(r#"{"configs":"yes"}"#).unwrap();
        assert_eq!(ConfigMap::from(body), map(&[("configs", "yes")]));
    }

    #[test]
    fn non_string_values_are_rejected() {
        assert!(serde_json::from_str::<ConfigsBody>(r#"{"PORT":8080}"#).is_err());
        assert!(serde_json::from_str::<ConfigsBody>(r#"{"configs":{"PORT":8080}}"#).is_err());
        assert!(serde_json::from_str::<SecretsBody>(r#"["a","b"]"#).is_err());
        assert!(serde_json::from_str::<SecretsBody>("null").is_err());
    }

    #[test]
    fn rejection_names_the_offending_key() {
        let err = serde_json::from_str::<ConfigsBody>(r#"{"HOST":"db","PORT":8080}"#).unwrap_err();
        assert!(
            err.to_string().contains("value of `PORT` must be a string, got a number"),
            "got: {err}"
        );

        let err = serde_json::from_str::<SecretsBody>(r#"{"secrets":{"TOKEN":null}}"#).unwrap_err();
        assert!(err.to_string().contains("`secrets.TOKEN`"), "got: {err}");

        let err = serde_json::from_str::<AllDetailsBody>(r#"{"configs":{"DEBUG":true}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("`configs.DEBUG`"), "got: {err}");
    }

    #[test]
    fn secrets_body_ignores_environment_key() {
        let body: SecretsBody = serde_json::from_str(
            r#"{"secrets":{"DB_PASSWORD":"hunter2"},"environment_key":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(SecretMap::from(body), map(&[("DB_PASSWORD", "hunter2")]));
    }

    #[test]
    fn all_details_prefers_server_identity() {
        let body: AllDetailsBody = serde_json::from_str(
            r#"{"configs":{"X":"y"},"secrets":{"P":"q"},"project_id":1,"environment":"production"}"#,
        )
        .unwrap();
        let details = body.into_details(99, "staging");
        assert_eq!(details.project_id, 1);
        assert_eq!(details.environment, "production");
        assert_eq!(details.configs, map(&[("X", "y")]));
        assert_eq!(details.secrets, map(&[("P", "q")]));
    }

    #[test]
    fn all_details_echoes_request_identity_when_missing() {
        let body: AllDetailsBody = serde_json::from_str(r#"{"configs":{"X":"y"}}"#).unwrap();
        let details = body.into_details(5, "development");
        assert_eq!(details.project_id, 5);
        assert_eq!(details.environment, "development");
        assert!(details.secrets.is_empty());
    }

    #[test]
    fn all_details_get_checks_configs_before_secrets() {
        let details = AllDetails {
            configs: map(&[("SHARED", "config"), ("ONLY_CONFIG", "c")]),
            secrets: map(&[("SHARED", "secret"), ("ONLY_SECRET", "s")]),
            project_id: 1,
            environment: "production".into(),
        };
        assert_eq!(details.get("SHARED"), Some("config"));
        assert_eq!(details.get("ONLY_SECRET"), Some("s"));
        assert_eq!(details.get("MISSING"), None);
    }
}
