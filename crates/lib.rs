// Re-export all public APIs from the workspace crates

pub use picbed_models::*;
pub use picbed_events::*;
pub use picbed_i18n::*;
pub use picbed_utils::*;
pub use picbed_filesystem::*;
pub use picbed_config::*;
pub use picbed_uploader::*;
pub use picbed_backends::*;

/// Prelude module for convenient imports
pub mod prelude {
    // Core models
    pub use picbed_models::{FieldDescriptor, ImageRecord, InputKind, Payload};

    // Events
    pub use picbed_events::{AppEvent, EventBus};

    // Localization
    pub use picbed_i18n::{Locale, Translator};

    // Configuration
    pub use picbed_config::{BackendSettings, Config, ConfigResolver, ConfigStore};

    // Upload pipeline
    pub use picbed_uploader::{
        BackendPlugin, PluginRegistry, ReqwestTransport, Transport, UploadContext, UploadError,
        UploadPipeline,
    };

    // Built-in picture beds
    pub use picbed_backends::register_builtin;

    // Filesystem
    pub use picbed_filesystem::FileSystem;
}
