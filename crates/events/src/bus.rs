use super::models::{AppEvent, EventBus};
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Arc::new(Self { silent_mode, sender })
    }

    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget: nothing waits for subscribers.
    pub fn emit(&self, event: AppEvent) {
        if !self.silent_mode {
            render(&event);
        }

        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}

fn render(event: &AppEvent) {
    match event {
        // Application lifecycle
        AppEvent::Starting => {
            println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            println!("  {}", "picbed - Picture Bed Uploader".white().bold());
            println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
            println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
        }
        AppEvent::Finished => {
            // Silent
        }

        // Configuration
        AppEvent::ConfigLoading { path } => {
            println!("  {} {}", "Loading config".dimmed(), path.cyan());
        }
        AppEvent::ConfigLoaded { current } => {
            if current.is_empty() {
                println!("  {} No picture bed selected", "⚠".yellow());
            } else {
                println!("  {} Picture bed {}", "✓".green(), current.cyan());
            }
        }
        AppEvent::ConfigCreated { path } => {
            tracing::warn!("Configuration file not found");
            tracing::info!("Created default configuration at: {}", path);
        }
        AppEvent::ConfigMigrated { added_fields } => {
            if !added_fields.is_empty() {
                println!("  {} Config updated: added {}",
                    "↻".blue(),
                    added_fields.join(", ").dimmed()
                );
            }
        }
        AppEvent::ConfigSaved { keys } => {
            println!("  {} Saved {}", "✓".green(), keys.join(", ").cyan());
        }

        // Plugin registration
        AppEvent::PluginRegistered { .. } => {
            // Silent - reduce verbosity
        }
        AppEvent::PluginReplaced { name } => {
            tracing::warn!("Uploader '{}' was registered twice, keeping the latest", name);
        }

        // Uploads
        AppEvent::UploadStarted { backend, count } => {
            println!("  {} Uploading {} image(s) to {}", "→".dimmed(), count.to_string().cyan(), backend.cyan());
        }
        AppEvent::ImageUploaded { file_name, url } => {
            println!("  {} {} {}", "✓".green(), file_name.white(), url.blue());
        }
        AppEvent::UploadCompleted { published, skipped, .. } => {
            if *skipped == 0 {
                println!("  {} {} published", "✓".green(), published.to_string().cyan());
            } else {
                println!("  {} {} published, {} skipped",
                    "✓".green(),
                    published.to_string().cyan(),
                    skipped.to_string().dimmed()
                );
            }
        }

        AppEvent::Notification { title, body } => {
            println!("  {} {}", "✗".red(), title.red().bold());
            println!("    {}", body.dimmed());
        }

        // Errors
        AppEvent::Error { context, error } => {
            tracing::error!("{}: {}", context, error);
        }
    }
}
