use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Finished,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { current: String },
    ConfigCreated { path: String },
    ConfigMigrated { added_fields: Vec<String> },
    ConfigSaved { keys: Vec<String> },

    // Plugin registration
    PluginRegistered { name: String },
    PluginReplaced { name: String },

    // Uploads
    UploadStarted { backend: String, count: usize },
    ImageUploaded { file_name: String, url: String },
    UploadCompleted { backend: String, published: usize, skipped: usize },

    // User-facing notification, consumed by CLI/UI layers
    Notification { title: String, body: String },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
    pub(super) sender: broadcast::Sender<AppEvent>,
}
