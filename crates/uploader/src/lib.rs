//! Backend plugin contract and the batch upload pipeline.

mod errors;
mod pipeline;
mod plugin;
mod registry;
mod transport;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use errors::{UploadError, UploadErrorKind};
pub use pipeline::{PipelineState, UploadPipeline, UploadSummary};
pub use plugin::{
    build_public_url, payload_bytes, require_fields, resolve_content_type, validate_required,
    BackendPlugin, UploadContext,
};
pub use registry::{PluginEntry, PluginRegistry};
pub use transport::{Method, ReqwestTransport, Transport, TransportRequest, TransportResponse};
