//! Built-in picture beds.

pub mod aliyun;
pub mod github;
pub mod internal;

pub use aliyun::{AliyunConfig, AliyunPlugin};
pub use github::{GithubConfig, GithubPlugin};
pub use internal::{ApiVersion, InternalConfig, InternalPlugin};

use picbed_i18n::Translator;
use picbed_uploader::{BackendPlugin, PluginRegistry};
use std::sync::Arc;

pub fn builtin_plugins() -> Vec<Arc<dyn BackendPlugin>> {
    vec![
        Arc::new(AliyunPlugin),
        Arc::new(GithubPlugin),
        Arc::new(InternalPlugin),
    ]
}

/// Registers every built-in picture bed under its own name.
pub fn register_builtin(registry: &PluginRegistry, translator: &dyn Translator) {
    for plugin in builtin_plugins() {
        registry.register_plugin(plugin, translator);
    }
    tracing::debug!("Built-in picture beds: {}", registry.list().join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use picbed_i18n::Locale;

    #[test]
    fn registers_all_builtin_backends() {
        let registry = PluginRegistry::new();
        register_builtin(&registry, &Locale::english());

        assert_eq!(registry.list(), ["aliyun", "github", "internal"]);
        assert_eq!(registry.get("aliyun").unwrap().display_name, "Ali Cloud");
    }
}
