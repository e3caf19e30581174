use picbed_events::EventBus;
use picbed_i18n::Translator;
use picbed_uploader::PluginRegistry;
use std::sync::Arc;

pub fn initialize(events: &Arc<EventBus>, translator: &dyn Translator) -> PluginRegistry {
    let registry = PluginRegistry::with_events(Arc::clone(events));
    picbed_backends::register_builtin(&registry, translator);

    tracing::debug!("{} picture bed(s) available", registry.list().len());
    registry
}
