use super::errors::ConfigError;
use super::models::Config;
use super::resolver::ConfigResolver;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Table};

/// Config file contents held in memory, optionally backed by a file on disk.
pub struct ConfigStore {
    path: Option<PathBuf>,
    document: RwLock<toml::Table>,
}

impl ConfigStore {
    pub(crate) fn with_path(path: PathBuf, table: toml::Table) -> Self {
        Self {
            path: Some(path),
            document: RwLock::new(table),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(table: toml::Table) -> Self {
        Self {
            path: None,
            document: RwLock::new(table),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::in_memory(content.parse::<toml::Table>()?))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Typed application settings, with defaults for anything missing.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let table = self.document.read().clone();
        Ok(toml::Value::Table(table).try_into()?)
    }
}

#[async_trait::async_trait]
impl ConfigResolver for ConfigStore {
    fn get_config(&self, key: &str) -> Option<toml::Value> {
        let document = self.document.read();
        let mut parts = key.split('.');
        let mut current = document.get(parts.next()?)?;
        for part in parts {
            current = current.as_table()?.get(part)?;
        }
        Some(current.clone())
    }

    /// All or nothing: the in-memory table is only replaced once every key
    /// applied and the file (if any) was written.
    async fn save_config(&self, patch: toml::Table) -> Result<(), ConfigError> {
        let mut updated = self.document.read().clone();
        for (key, value) in &patch {
            set_in_table(&mut updated, key, value.clone())?;
        }

        if let Some(path) = &self.path {
            // Edit the file in place so comments and layout survive
            let content = tokio::fs::read_to_string(path).await?;
            let mut doc = content.parse::<DocumentMut>()?;
            for (key, value) in &patch {
                set_in_document(&mut doc, key, value)?;
            }
            tokio::fs::write(path, doc.to_string()).await?;

            tracing::debug!("Saved {} key(s) to {}", patch.len(), path.display());
        }

        *self.document.write() = updated;
        Ok(())
    }
}

fn split_key(key: &str) -> Result<(Vec<&str>, &str), ConfigError> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let last = parts
        .pop()
        .filter(|last| !last.is_empty())
        .ok_or_else(|| ConfigError::InvalidConfig(format!("Invalid config key '{}'", key)))?;
    Ok((parts, last))
}

fn set_in_table(table: &mut toml::Table, key: &str, value: toml::Value) -> Result<(), ConfigError> {
    let (parents, last) = split_key(key)?;

    let mut current = table;
    for part in parents {
        current = match current
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        {
            toml::Value::Table(inner) => inner,
            _ => {
                return Err(ConfigError::InvalidConfig(format!(
                    "Config key '{}' is not a table",
                    part
                )))
            }
        };
    }
    current.insert(last.to_string(), value);
    Ok(())
}

fn set_in_document(doc: &mut DocumentMut, key: &str, value: &toml::Value) -> Result<(), ConfigError> {
    let (parents, last) = split_key(key)?;

    let mut current = doc.as_table_mut();
    for part in parents {
        let item = current.entry(part).or_insert_with(|| {
            let mut table = Table::new();
            table.set_implicit(true);
            Item::Table(table)
        });
        current = item.as_table_mut().ok_or_else(|| {
            ConfigError::InvalidConfig(format!("Config key '{}' is not a table", part))
        })?;
    }
    current.insert(last, to_edit_item(value)?);
    Ok(())
}

fn to_edit_item(value: &toml::Value) -> Result<Item, ConfigError> {
    match value {
        toml::Value::Table(table) => {
            let doc = toml::to_string(table)?.parse::<DocumentMut>()?;
            Ok(Item::Table(doc.as_table().clone()))
        }
        other => Ok(Item::Value(other.to_string().parse::<toml_edit::Value>()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[picbed]
current = "aliyun"

[picbed.aliyun]
bucket = "pics"
area = "oss-cn-hangzhou"
"#;

    #[test]
    fn resolves_dotted_keys() {
        let store = ConfigStore::from_toml_str(SAMPLE).unwrap();

        assert_eq!(
            store.get_config("picbed.aliyun.bucket"),
            Some(toml::Value::String("pics".into()))
        );
        assert!(store.get_config("picbed.github").is_none());
        assert!(store.get_config("picbed.current.deeper").is_none());
    }

    #[test]
    fn backend_settings_absent_until_set() {
        let store = ConfigStore::from_toml_str(SAMPLE).unwrap();
        assert!(store.backend_settings("aliyun").is_some());
        assert!(store.backend_settings("internal").is_none());
    }

    #[test]
    fn typed_view_fills_defaults() {
        let store = ConfigStore::from_toml_str(SAMPLE).unwrap();
        let config = store.config().unwrap();

        assert_eq!(config.picbed.current, "aliyun");
        assert_eq!(config.transport.timeout_secs, 30);
        assert_eq!(config.transport.user_agent, "picbed");
    }

    #[tokio::test]
    async fn save_replaces_whole_backend_table() {
        let store = ConfigStore::from_toml_str(SAMPLE).unwrap();
        let mut table = toml::Table::new();
        table.insert("url".into(), toml::Value::String("https://img.local".into()));

        let mut patch = toml::Table::new();
        patch.insert("picbed.internal".into(), toml::Value::Table(table));
        patch.insert("picbed.current".into(), toml::Value::String("internal".into()));
        store.save_config(patch).await.unwrap();

        assert_eq!(store.config().unwrap().picbed.current, "internal");
        let internal = store.backend_settings("internal").unwrap();
        assert_eq!(internal.get_str("url").as_deref(), Some("https://img.local"));
        // Untouched siblings survive
        assert!(store.backend_settings("aliyun").is_some());
    }

    #[tokio::test]
    async fn save_writes_through_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picbed.toml");
        tokio::fs::write(&path, "# keep me\n[picbed]\ncurrent = \"\"\n").await.unwrap();

        let store = ConfigStore::with_path(path.clone(), "[picbed]\ncurrent = \"\"".parse().unwrap());
        let mut patch = toml::Table::new();
        patch.insert("picbed.github.repo".into(), toml::Value::String("me/pics".into()));
        store.save_config(patch).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("# keep me"));
        let reparsed = ConfigStore::from_toml_str(&written).unwrap();
        assert_eq!(
            reparsed.get_config("picbed.github.repo"),
            Some(toml::Value::String("me/pics".into()))
        );
    }

    #[tokio::test]
    async fn failed_save_leaves_store_unchanged() {
        let store = ConfigStore::from_toml_str(SAMPLE).unwrap();
        let mut table = toml::Table::new();
        table.insert("url".into(), toml::Value::String("https://img.local".into()));

        let mut patch = toml::Table::new();
        patch.insert("picbed.aaa".into(), toml::Value::Table(table));
        patch.insert("picbed.current.deeper".into(), toml::Value::Integer(1));

        assert!(store.save_config(patch).await.is_err());
        assert!(store.backend_settings("aaa").is_none());
        assert_eq!(store.config().unwrap().picbed.current, "aliyun");
    }

    #[tokio::test]
    async fn unreadable_file_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picbed.toml");
        tokio::fs::write(&path, "[picbed\ncurrent = ").await.unwrap();

        let store = ConfigStore::with_path(path.clone(), SAMPLE.parse().unwrap());
        let mut patch = toml::Table::new();
        patch.insert("picbed.current".into(), toml::Value::String("internal".into()));

        assert!(store.save_config(patch).await.is_err());
        assert_eq!(store.config().unwrap().picbed.current, "aliyun");
    }

    #[test]
    fn rejects_empty_key() {
        let mut table = toml::Table::new();
        assert!(set_in_table(&mut table, "picbed.", toml::Value::Integer(1)).is_err());
    }
}
