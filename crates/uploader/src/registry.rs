//! Registry of available picture beds

use crate::plugin::BackendPlugin;
use crate::UploadError;
use parking_lot::RwLock;
use picbed_events::{AppEvent, EventBus};
use picbed_i18n::Translator;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered backend.
#[derive(Clone)]
pub struct PluginEntry {
    pub name: String,
    pub display_name: String,
    pub plugin: Arc<dyn BackendPlugin>,
}

/// Maps backend names to plugins.
///
/// Filled during startup, read during uploads. Cloning shares the same
/// underlying map.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Arc<RwLock<HashMap<String, PluginEntry>>>,
    events: Option<Arc<EventBus>>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Arc<EventBus>) -> Self {
        Self {
            plugins: Arc::default(),
            events: Some(events),
        }
    }

    /// Stores `plugin` under `name`.
    ///
    /// A second registration under the same name replaces the first (last
    /// writer wins). The replaced entry is returned, logged and reported as
    /// `PluginReplaced`.
    pub fn register(
        &self,
        name: impl Into<String>,
        display_name: impl Into<String>,
        plugin: Arc<dyn BackendPlugin>,
    ) -> Option<PluginEntry> {
        let name = name.into();
        let entry = PluginEntry {
            name: name.clone(),
            display_name: display_name.into(),
            plugin,
        };

        let previous = self.plugins.write().insert(name.clone(), entry);

        let event = if previous.is_some() {
            tracing::warn!("Replacing picture bed '{}'", name);
            AppEvent::PluginReplaced { name }
        } else {
            tracing::debug!("Registered picture bed '{}'", name);
            AppEvent::PluginRegistered { name }
        };
        if let Some(events) = &self.events {
            events.emit(event);
        }

        previous
    }

    /// Registers `plugin` under its own name and translated display name.
    pub fn register_plugin(
        &self,
        plugin: Arc<dyn BackendPlugin>,
        translator: &dyn Translator,
    ) -> Option<PluginEntry> {
        let name = plugin.name().to_string();
        let display_name = plugin.display_name(translator);
        self.register(name, display_name, plugin)
    }

    pub fn get(&self, name: &str) -> Result<PluginEntry, UploadError> {
        self.plugins
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| UploadError::PluginNotFound(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// `(name, display name)` pairs, sorted by name.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .plugins
            .read()
            .values()
            .map(|entry| (entry.name.clone(), entry.display_name.clone()))
            .collect();
        entries.sort();
        entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.read().contains_key(name)
    }
}
