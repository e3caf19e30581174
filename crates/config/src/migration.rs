use super::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Migrates config file to latest format if needed
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    events: Option<&Arc<picbed_events::EventBus>>,
) -> Result<(), ConfigError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut doc = content.parse::<DocumentMut>()?;

    let added_fields = migrate_document(&mut doc)?;

    // Only write if something changed
    if !added_fields.is_empty() {
        tokio::fs::write(path.as_ref(), doc.to_string()).await?;

        if let Some(event_bus) = events {
            event_bus.emit(picbed_events::AppEvent::ConfigMigrated {
                added_fields: added_fields.clone(),
            });
        }
    }

    Ok(())
}

pub(crate) fn migrate_document(doc: &mut DocumentMut) -> Result<Vec<String>, ConfigError> {
    let mut added_fields = Vec::new();

    migrate_legacy_picbed_section(doc, &mut added_fields)?;
    migrate_picbed_section(doc, &mut added_fields)?;
    migrate_transport_section(doc, &mut added_fields)?;

    Ok(added_fields)
}

/// Older files used `[picBed]` and stored the active backend as `uploader`.
fn migrate_legacy_picbed_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    if !doc.contains_key("picBed") {
        return Ok(());
    }

    let legacy = doc
        .remove("picBed")
        .ok_or_else(|| ConfigError::MigrationError("Failed to remove [picBed]".to_string()))?;
    let mut table = legacy.into_table().map_err(|_| {
        ConfigError::MigrationError("Invalid [picBed] section in config".to_string())
    })?;

    if doc.contains_key("picbed") {
        let picbed = doc["picbed"].as_table_mut().ok_or_else(|| {
            ConfigError::MigrationError("Invalid [picbed] section in config".to_string())
        })?;

        // Backend tables only [picBed] knows about are kept; [picbed] wins otherwise
        for (name, item) in table.iter_mut() {
            if item.is_table_like() && !picbed.contains_key(name.get()) {
                picbed.insert(name.get(), std::mem::take(item));
                added_fields.push(format!("picbed.{} (migrated from picBed)", name.get()));
            }
        }
        added_fields.push("removed deprecated [picBed] section".to_string());
        return Ok(());
    }

    if let Some(uploader) = table.remove("uploader") {
        if !table.contains_key("current") {
            table.insert("current", uploader);
        }
    }
    doc.insert("picbed", Item::Table(table));
    added_fields.push("picbed (migrated from picBed)".to_string());

    Ok(())
}

fn migrate_picbed_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    // Ensure [picbed] section exists
    if !doc.contains_key("picbed") {
        doc["picbed"] = Item::Table(Table::new());
        added_fields.push("picbed".to_string());
    }

    let picbed = doc["picbed"]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError("Invalid [picbed] section in config".to_string()))?;
    ensure_field(picbed, "current", Value::from(""), added_fields);

    Ok(())
}

fn migrate_transport_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    // Ensure [transport] section
    if !doc.contains_key("transport") {
        doc["transport"] = Item::Table(Table::new());
        added_fields.push("transport".to_string());
    }

    let transport = doc["transport"]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError("Invalid [transport] section in config".to_string()))?;
    ensure_field(
        transport,
        "timeout_secs",
        Value::from(super::defaults::timeout_secs() as i64),
        added_fields,
    );
    ensure_field(
        transport,
        "user_agent",
        Value::from(super::defaults::user_agent()),
        added_fields,
    );

    Ok(())
}

fn ensure_field(
    table: &mut Table,
    key: &str,
    default_value: Value,
    added_fields: &mut Vec<String>,
) {
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        added_fields.push(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrate(text: &str) -> (DocumentMut, Vec<String>) {
        let mut doc = text.parse::<DocumentMut>().unwrap();
        let added = migrate_document(&mut doc).unwrap();
        (doc, added)
    }

    #[test]
    fn current_file_is_left_alone() {
        let (_, added) = migrate(
            "[picbed]\ncurrent = \"aliyun\"\n\n[transport]\ntimeout_secs = 10\nuser_agent = \"x\"\n",
        );
        assert!(added.is_empty());
    }

    #[test]
    fn fills_missing_sections() {
        let (doc, added) = migrate("");
        assert!(added.contains(&"picbed".to_string()));
        assert!(added.contains(&"transport".to_string()));
        assert_eq!(doc["picbed"]["current"].as_str(), Some(""));
        assert_eq!(doc["transport"]["timeout_secs"].as_integer(), Some(30));
    }

    #[test]
    fn renames_legacy_section_and_uploader_key() {
        let (doc, added) = migrate(
            "[picBed]\nuploader = \"aliyun\"\n\n[picBed.aliyun]\nbucket = \"pics\"\n",
        );
        assert!(!doc.contains_key("picBed"));
        assert_eq!(doc["picbed"]["current"].as_str(), Some("aliyun"));
        assert_eq!(doc["picbed"]["aliyun"]["bucket"].as_str(), Some("pics"));
        assert!(added.iter().any(|f| f.contains("migrated from picBed")));
    }

    #[test]
    fn legacy_backends_merge_into_existing_section() {
        let (doc, added) = migrate(
            "[picbed]\ncurrent = \"github\"\n\n[picbed.github]\nrepo = \"new/pics\"\n\n\
             [picBed]\nuploader = \"aliyun\"\n\n\
             [picBed.aliyun]\nbucket = \"pics\"\n\n\
             [picBed.github]\nrepo = \"old/pics\"\n",
        );

        assert!(!doc.contains_key("picBed"));
        assert_eq!(doc["picbed"]["current"].as_str(), Some("github"));
        assert_eq!(doc["picbed"]["aliyun"]["bucket"].as_str(), Some("pics"));
        assert_eq!(doc["picbed"]["github"]["repo"].as_str(), Some("new/pics"));
        assert!(added.contains(&"picbed.aliyun (migrated from picBed)".to_string()));
        assert!(!added.iter().any(|f| f.starts_with("picbed.github")));

        let reparsed = doc.to_string().parse::<toml::Table>().unwrap();
        assert_eq!(reparsed["picbed"]["aliyun"]["bucket"].as_str(), Some("pics"));
    }

    #[tokio::test]
    async fn emits_migration_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picbed.toml");
        tokio::fs::write(&path, "[picbed]\n").await.unwrap();

        let bus = picbed_events::EventBus::new(true);
        let mut rx = bus.subscribe();
        migrate_config_if_needed(&path, Some(&bus)).await.unwrap();

        match rx.recv().await.unwrap() {
            picbed_events::AppEvent::ConfigMigrated { added_fields } => {
                assert!(added_fields.contains(&"current".to_string()));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
