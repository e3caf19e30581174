use super::errors::ConfigError;
use serde::de::DeserializeOwned;

/// Config key under which a backend's settings are stored.
pub fn backend_key(backend: &str) -> String {
    format!("picbed.{}", backend)
}

/// Read/write access to persisted settings, keyed by dotted path
/// (`picbed.aliyun`, `transport.timeout_secs`).
#[async_trait::async_trait]
pub trait ConfigResolver: Send + Sync {
    fn get_config(&self, key: &str) -> Option<toml::Value>;

    /// Each entry of `patch` replaces the value at its dotted key.
    async fn save_config(&self, patch: toml::Table) -> Result<(), ConfigError>;

    /// Settings of one backend, `None` while the backend is unset.
    fn backend_settings(&self, backend: &str) -> Option<BackendSettings> {
        self.get_config(&backend_key(backend))
            .and_then(BackendSettings::from_value)
    }
}

/// The stored settings table of a single backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendSettings(toml::Table);

impl BackendSettings {
    pub fn new(table: toml::Table) -> Self {
        Self(table)
    }

    pub fn from_value(value: toml::Value) -> Option<Self> {
        match value {
            toml::Value::Table(table) => Some(Self(table)),
            _ => None,
        }
    }

    pub fn table(&self) -> &toml::Table {
        &self.0
    }

    /// String form of a scalar setting; numbers and booleans are rendered.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Ok(toml::Value::Table(self.0.clone()).try_into()?)
    }
}

impl From<toml::Table> for BackendSettings {
    fn from(table: toml::Table) -> Self {
        Self(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        bucket: String,
        #[serde(default)]
        path: String,
    }

    fn settings(text: &str) -> BackendSettings {
        BackendSettings::new(text.parse::<toml::Table>().unwrap())
    }

    #[test]
    fn renders_scalars_as_strings() {
        let s = settings("bucket = \"b\"\nversion = 2\nenabled = true");
        assert_eq!(s.get_str("bucket").as_deref(), Some("b"));
        assert_eq!(s.get_str("version").as_deref(), Some("2"));
        assert_eq!(s.get_str("enabled").as_deref(), Some("true"));
        assert_eq!(s.get_str("missing"), None);
    }

    #[test]
    fn parses_into_typed_struct() {
        let parsed: Sample = settings("bucket = \"b\"").parse().unwrap();
        assert_eq!(parsed.bucket, "b");
        assert_eq!(parsed.path, "");
    }

    #[test]
    fn only_tables_are_settings() {
        assert!(BackendSettings::from_value(toml::Value::String("x".into())).is_none());
    }
}
