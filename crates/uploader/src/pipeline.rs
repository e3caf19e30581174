use crate::plugin::UploadContext;
use crate::registry::PluginRegistry;
use crate::transport::Transport;
use crate::UploadError;
use picbed_config::ConfigResolver;
use picbed_events::{AppEvent, EventBus};
use picbed_i18n::Translator;
use picbed_models::ImageRecord;
use std::sync::Arc;

/// Progress of one batch through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ConfigResolved,
    InFlight,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub backend: String,
    pub published: usize,
    pub skipped: usize,
}

/// Runs a batch through the selected backend and reports failures.
///
/// Holds no per-batch state, so one pipeline can serve any number of
/// sequential `upload` calls.
pub struct UploadPipeline {
    registry: PluginRegistry,
    resolver: Arc<dyn ConfigResolver>,
    transport: Arc<dyn Transport>,
    translator: Arc<dyn Translator>,
    events: Arc<EventBus>,
}

impl UploadPipeline {
    pub fn new(
        registry: PluginRegistry,
        resolver: Arc<dyn ConfigResolver>,
        transport: Arc<dyn Transport>,
        translator: Arc<dyn Translator>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            registry,
            resolver,
            transport,
            translator,
            events,
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Uploads `batch` to `backend`, publishing records in place.
    ///
    /// On failure one notification is emitted and the backend's error is
    /// returned as is. Records published before the failure stay published.
    pub async fn upload(
        &self,
        backend: &str,
        batch: &mut [ImageRecord],
    ) -> Result<UploadSummary, UploadError> {
        let mut state = PipelineState::Idle;

        match self.run(backend, batch, &mut state).await {
            Ok(summary) => {
                transition(backend, &mut state, PipelineState::Completed);
                self.events.emit(AppEvent::UploadCompleted {
                    backend: summary.backend.clone(),
                    published: summary.published,
                    skipped: summary.skipped,
                });
                Ok(summary)
            }
            Err(err) => {
                transition(backend, &mut state, PipelineState::Failed);
                tracing::error!("Upload to '{}' failed: {}", backend, err);
                self.notify_failure(&err);
                Err(err)
            }
        }
    }

    /// Uploads to the backend selected by `picbed.current`.
    pub async fn upload_current(
        &self,
        batch: &mut [ImageRecord],
    ) -> Result<UploadSummary, UploadError> {
        let current = self
            .resolver
            .get_config("picbed.current")
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();

        if current.is_empty() {
            let err = UploadError::missing_config("picbed", "no picture bed selected (picbed.current)");
            self.notify_failure(&err);
            return Err(err);
        }

        self.upload(&current, batch).await
    }

    async fn run(
        &self,
        backend: &str,
        batch: &mut [ImageRecord],
        state: &mut PipelineState,
    ) -> Result<UploadSummary, UploadError> {
        let entry = self.registry.get(backend)?;
        let settings = self.resolver.backend_settings(backend);
        transition(backend, state, PipelineState::ConfigResolved);

        let eligible: Vec<bool> = batch.iter().map(ImageRecord::has_payload).collect();
        let pending = eligible.iter().filter(|e| **e).count();
        self.events.emit(AppEvent::UploadStarted {
            backend: backend.to_string(),
            count: pending,
        });

        let ctx = UploadContext::new(backend, settings, self.transport.as_ref())
            .with_events(&self.events);
        transition(backend, state, PipelineState::InFlight);
        entry.plugin.handle(&ctx, batch).await?;

        let published = batch
            .iter()
            .zip(&eligible)
            .filter(|(record, was_pending)| **was_pending && record.is_published())
            .count();
        if published != pending {
            tracing::warn!(
                "Picture bed '{}' left {} record(s) unpublished without an error",
                backend,
                pending - published
            );
        }

        Ok(UploadSummary {
            backend: backend.to_string(),
            published,
            skipped: batch.len() - pending,
        })
    }

    fn notify_failure(&self, err: &UploadError) {
        let hint = if err.is_connectivity() {
            "CHECK_SETTINGS_AND_NETWORK"
        } else {
            "CHECK_SETTINGS"
        };

        self.events.emit(AppEvent::Notification {
            title: self.translator.tr("UPLOAD_FAILED"),
            body: self.translator.tr(hint),
        });
    }
}

fn transition(backend: &str, state: &mut PipelineState, next: PipelineState) {
    tracing::debug!("[{}] {:?} -> {:?}", backend, state, next);
    *state = next;
}
