//! The contract every picture bed implements, plus the helpers backends
//! share when walking a batch.

use crate::transport::Transport;
use crate::UploadError;
use async_trait::async_trait;
use bytes::Bytes;
use picbed_config::BackendSettings;
use picbed_events::{AppEvent, EventBus};
use picbed_i18n::Translator;
use picbed_models::{FieldDescriptor, ImageRecord};
use serde::de::DeserializeOwned;

/// A picture bed: one remote service images can be published to.
///
/// `handle` walks the batch in order and publishes every record that still
/// has a payload. It stops at the first failure; records published before
/// that keep their URL, the rest keep their payload.
#[async_trait]
pub trait BackendPlugin: Send + Sync {
    /// Registry key, also written to `ImageRecord::backend_type`.
    fn name(&self) -> &str;

    fn display_name(&self, translator: &dyn Translator) -> String;

    /// Settings form for this backend. Must depend on `current` only.
    fn config(
        &self,
        current: Option<&BackendSettings>,
        translator: &dyn Translator,
    ) -> Vec<FieldDescriptor>;

    async fn handle(
        &self,
        ctx: &UploadContext<'_>,
        batch: &mut [ImageRecord],
    ) -> Result<(), UploadError>;
}

/// What a backend gets to work with during one `handle` call.
pub struct UploadContext<'a> {
    backend: &'a str,
    settings: Option<BackendSettings>,
    transport: &'a dyn Transport,
    events: Option<&'a EventBus>,
}

impl<'a> UploadContext<'a> {
    pub fn new(
        backend: &'a str,
        settings: Option<BackendSettings>,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            backend,
            settings,
            transport,
            events: None,
        }
    }

    pub fn with_events(mut self, events: &'a EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn backend(&self) -> &str {
        self.backend
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport
    }

    /// Raw stored settings; `MissingConfig` while the backend is unset.
    pub fn settings(&self) -> Result<&BackendSettings, UploadError> {
        self.settings.as_ref().ok_or_else(|| {
            UploadError::missing_config(self.backend, "no settings stored for this picture bed")
        })
    }

    pub fn parse_settings<T: DeserializeOwned>(&self) -> Result<T, UploadError> {
        self.settings()?
            .parse()
            .map_err(|e| UploadError::missing_config(self.backend, e.to_string()))
    }

    /// Publishes `record` under this backend's tag and reports it.
    pub fn publish(&self, record: &mut ImageRecord, img_url: String) {
        tracing::info!("Uploaded {} to {}: {}", record.file_name, self.backend, img_url);

        if let Some(events) = self.events {
            events.emit(AppEvent::ImageUploaded {
                file_name: record.file_name.clone(),
                url: img_url.clone(),
            });
        }

        record.publish(img_url, self.backend);
    }
}

/// Names of required fields that are missing or blank in `settings`.
pub fn validate_required(
    descriptors: &[FieldDescriptor],
    settings: Option<&BackendSettings>,
) -> Vec<String> {
    descriptors
        .iter()
        .filter(|field| field.required)
        .filter(|field| {
            settings
                .and_then(|s| s.get_str(&field.name))
                .map_or(true, |value| value.trim().is_empty())
        })
        .map(|field| field.name.clone())
        .collect()
}

/// Fails with `MissingConfig` naming the first blank field.
pub fn require_fields(backend: &str, fields: &[(&str, &str)]) -> Result<(), UploadError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(UploadError::missing_config(
            backend,
            format!("'{}' is required", name),
        )),
        None => Ok(()),
    }
}

pub fn resolve_content_type(record: &ImageRecord) -> Result<String, UploadError> {
    record
        .normalized_extension()
        .and_then(|ext| picbed_utils::content_type_for_extension(&ext))
        .ok_or_else(|| UploadError::UnsupportedMediaType(record.file_name.clone()))
}

/// Raw bytes of a record, `None` when it has nothing left to upload.
pub fn payload_bytes(record: &ImageRecord) -> Result<Option<Bytes>, UploadError> {
    record
        .payload_bytes()
        .map_err(|e| UploadError::InvalidPayload {
            file_name: record.file_name.clone(),
            reason: e.to_string(),
        })
}

/// `{custom_url or canonical_base}/{path}{file_name}{suffix}`.
pub fn build_public_url(
    custom_url: &str,
    canonical_base: &str,
    path: &str,
    file_name: &str,
    suffix: &str,
) -> String {
    let base = if custom_url.trim().is_empty() {
        canonical_base
    } else {
        custom_url
    };
    format!("{}{}", picbed_utils::join_url(base, &format!("{}{}", path, file_name)), suffix)
}
