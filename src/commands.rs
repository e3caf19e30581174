use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use picbed_config::{backend_key, BackendSettings, ConfigResolver, ConfigStore};
use picbed_events::{AppEvent, EventBus};
use picbed_filesystem::FileSystem;
use picbed_i18n::Translator;
use picbed_models::InputKind;
use picbed_uploader::{validate_required, PluginEntry, PluginRegistry, UploadPipeline};
use std::path::PathBuf;
use std::sync::Arc;

/// Registry lookup with a translated error for unknown names.
fn lookup(registry: &PluginRegistry, translator: &dyn Translator, name: &str) -> Result<PluginEntry> {
    registry
        .get(name)
        .map_err(|_| anyhow!(translator.translate("PLUGIN_NOT_FOUND", &[("name", name)])))
}

pub async fn upload(pipeline: &UploadPipeline, backend: Option<&str>, files: &[PathBuf]) -> Result<()> {
    let mut batch = FileSystem::read_images(files).await?;

    let result = match backend {
        Some(name) => pipeline.upload(name, &mut batch).await,
        None => pipeline.upload_current(&mut batch).await,
    };
    // Whatever made it out stays printed, even when a later image failed
    for record in &batch {
        if let Some(url) = &record.img_url {
            println!("{}", url);
        }
    }

    result?;
    Ok(())
}

pub fn list(registry: &PluginRegistry, store: &ConfigStore) -> Result<()> {
    let current = store.config()?.picbed.current;

    for (name, display_name) in registry.entries() {
        let marker = if name == current { "*".green() } else { " ".normal() };
        println!("{} {:<10} {}", marker, name.cyan(), display_name.dimmed());
    }
    Ok(())
}

pub fn show_config(
    registry: &PluginRegistry,
    store: &ConfigStore,
    translator: &dyn Translator,
    name: &str,
) -> Result<()> {
    let entry = lookup(registry, translator, name)?;
    let settings = store.backend_settings(name);

    for field in entry.plugin.config(settings.as_ref(), translator) {
        let value = match field.kind {
            InputKind::Secret if !field.default.is_empty() => "********".to_string(),
            _ => field.default.clone(),
        };
        let required = if field.required { "*".red() } else { " ".normal() };
        println!(
            "{}{:<16} {:<24} {}",
            required,
            field.name.cyan(),
            field.alias.dimmed(),
            value
        );
        if let InputKind::Select { choices } = &field.kind {
            println!("  {} {}", "choices:".dimmed(), choices.join(", "));
        }
    }
    Ok(())
}

/// Merges `key=value` pairs into the stored settings of `name` and saves them
/// once every required field is filled.
pub async fn set(
    registry: &PluginRegistry,
    store: &ConfigStore,
    translator: &dyn Translator,
    events: &Arc<EventBus>,
    name: &str,
    pairs: &[String],
    make_current: bool,
) -> Result<()> {
    let entry = lookup(registry, translator, name)?;

    let mut table = store
        .backend_settings(name)
        .map(|settings| settings.table().clone())
        .unwrap_or_default();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", pair))?;
        table.insert(key.trim().to_string(), toml::Value::String(value.to_string()));
    }

    let merged = BackendSettings::new(table.clone());
    let descriptors = entry.plugin.config(Some(&merged), translator);
    let missing = validate_required(&descriptors, Some(&merged));
    if !missing.is_empty() {
        bail!("Missing required field(s) for '{}': {}", name, missing.join(", "));
    }

    let mut patch = toml::Table::new();
    patch.insert(backend_key(name), toml::Value::Table(table));
    if make_current {
        patch.insert("picbed.current".to_string(), toml::Value::String(name.to_string()));
    }
    let keys: Vec<String> = patch.keys().cloned().collect();

    store.save_config(patch).await?;
    events.emit(AppEvent::ConfigSaved { keys });
    Ok(())
}

pub async fn select(
    registry: &PluginRegistry,
    store: &ConfigStore,
    translator: &dyn Translator,
    events: &Arc<EventBus>,
    name: &str,
) -> Result<()> {
    lookup(registry, translator, name)?;

    let mut patch = toml::Table::new();
    patch.insert("picbed.current".to_string(), toml::Value::String(name.to_string()));
    store.save_config(patch).await?;

    events.emit(AppEvent::ConfigSaved {
        keys: vec!["picbed.current".to_string()],
    });
    Ok(())
}
