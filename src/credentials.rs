use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::CredentialError;

/// One credential record: who commits and where the result is pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub remote_name: String,
    pub remote_url: String,
}

#[derive(Debug, Clone)]
struct ServiceEntry {
    name: String,
    records: Vec<(String, Value)>,
}

/// Two-level credential mapping (service -> key -> record), in file order.
///
/// Records are kept as raw JSON and only checked when extracted, so a single
/// incomplete record does not hide the rest of the file.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    services: Vec<ServiceEntry>,
}

impl CredentialStore {
    /// Load the credential file.
    ///
    /// A missing file, an unreadable file or malformed JSON all produce an
    /// empty store. The cause is logged, never returned.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("Credential file {} not found", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::from_json_str(&content),
            Err(e) => {
                log::warn!("Could not read credential file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Build a store from JSON text with the same leniency as [`load`](Self::load).
    pub fn from_json_str(content: &str) -> Self {
        let root: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring malformed credential file: {}", e);
                return Self::default();
            }
        };

        match root {
            Value::Object(map) => Self::from_map(map),
            other => {
                log::warn!(
                    "Ignoring credential file: expected an object at the top level, found {}",
                    json_kind(&other)
                );
                Self::default()
            }
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut services = Vec::with_capacity(map.len());

        for (name, value) in map {
            match value {
                Value::Object(records) => services.push(ServiceEntry {
                    name,
                    records: records.into_iter().collect(),
                }),
                other => log::warn!(
                    "Skipping service '{}': expected an object, found {}",
                    name,
                    json_kind(&other)
                ),
            }
        }

        CredentialStore { services }
    }

    /// True when no service holds any record
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of records across all services
    pub fn len(&self) -> usize {
        self.services.iter().map(|s| s.records.len()).sum()
    }

    /// Iterate over `(service, key)` pairs in file order
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.services.iter().flat_map(|service| {
            service
                .records
                .iter()
                .map(move |(key, _)| (service.name.as_str(), key.as_str()))
        })
    }

    fn record(&self, service: &str, key: &str) -> Option<&Value> {
        self.services
            .iter()
            .find(|s| s.name == service)?
            .records
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The username of a record, if it has one; used for menu display.
    pub fn username(&self, service: &str, key: &str) -> Option<&str> {
        self.record(service, key)?.get("username")?.as_str()
    }

    /// Extract the four credential fields for the selected pair.
    pub fn credentials(&self, service: &str, key: &str) -> Result<Credentials, CredentialError> {
        let record = self
            .record(service, key)
            .ok_or_else(|| CredentialError::NotFound {
                service: service.to_string(),
                key: key.to_string(),
            })?;

        let field = |name: &'static str| -> Result<String, CredentialError> {
            match record.get(name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(CredentialError::NotAString {
                    service: service.to_string(),
                    key: key.to_string(),
                    field: name,
                }),
                None => Err(CredentialError::MissingField {
                    service: service.to_string(),
                    key: key.to_string(),
                    field: name,
                }),
            }
        };

        Ok(Credentials {
            username: field("username")?,
            email: field("email")?,
            remote_name: field("remote_name")?,
            remote_url: field("remote_url")?,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "github": {
            "work": {
                "username": "alice",
                "email": "a@x.com",
                "remote_name": "origin",
                "remote_url": "git@github.com:a/r.git"
            },
            "personal": {
                "username": "alice-home",
                "email": "alice@home.net",
                "remote_name": "origin",
                "remote_url": "git@github.com:alice/r.git"
            }
        },
        "gitee": {
            "mirror": {
                "username": "bob",
                "email": "bob@gitee.com",
                "remote_name": "gitee",
                "remote_url": "https://gitee.com/bob/r.git"
            }
        }
    }"#;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::load(&temp.path().join("Git_Data/config.json"));
        assert!(store.is_empty());
        assert_eq!(store.keys().count(), 0);
    }

    #[rstest]
    #[case::empty_object("{}")]
    #[case::malformed("{ \"github\": ")]
    #[case::empty_text("")]
    #[case::array_root("[1, 2, 3]")]
    fn test_degenerate_files_are_empty(#[case] content: &str) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, content).unwrap();

        let store = CredentialStore::load(&path);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_keys_follow_file_order() {
        let store = CredentialStore::from_json_str(SAMPLE);
        let keys: Vec<_> = store.keys().collect();
        assert_eq!(
            keys,
            vec![("github", "work"), ("github", "personal"), ("gitee", "mirror")]
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_credentials_round_trip() {
        let store = CredentialStore::from_json_str(SAMPLE);
        let creds = store.credentials("gitee", "mirror").unwrap();
        assert_eq!(
            creds,
            Credentials {
                username: "bob".to_string(),
                email: "bob@gitee.com".to_string(),
                remote_name: "gitee".to_string(),
                remote_url: "https://gitee.com/bob/r.git".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let store = CredentialStore::from_json_str(
            r#"{"github": {"work": {"username": "alice", "email": "a@x.com", "remote_name": "origin"}}}"#,
        );
        let err = store.credentials("github", "work").unwrap_err();
        assert_eq!(
            err,
            CredentialError::MissingField {
                service: "github".to_string(),
                key: "work".to_string(),
                field: "remote_url",
            }
        );
        assert!(err.to_string().contains("remote_url"));
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let store = CredentialStore::from_json_str(
            r#"{"github": {"work": {"username": 42, "email": "a@x.com", "remote_name": "origin", "remote_url": "u"}}}"#,
        );
        assert!(matches!(
            store.credentials("github", "work"),
            Err(CredentialError::NotAString { field: "username", .. })
        ));
        assert_eq!(store.username("github", "work"), None);
    }

    #[test]
    fn test_unknown_pair_is_not_found() {
        let store = CredentialStore::from_json_str(SAMPLE);
        assert!(matches!(
            store.credentials("gitlab", "work"),
            Err(CredentialError::NotFound { .. })
        ));
    }

    #[test]
    fn test_non_object_service_is_skipped() {
        let store = CredentialStore::from_json_str(
            r#"{"broken": "oops", "github": {"work": {"username": "alice"}}}"#,
        );
        let keys: Vec<_> = store.keys().collect();
        assert_eq!(keys, vec![("github", "work")]);
        assert_eq!(store.username("github", "work"), Some("alice"));
    }
}
