//! In-memory transport for backend and pipeline tests.

use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::UploadError;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Records every request and answers from a script, in order.
/// Once the script runs out every request gets `200` with an empty body.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<TransportResponse, UploadError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .push_back(Ok(TransportResponse::new(status, body.to_string())));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.script
            .lock()
            .push_back(Err(UploadError::TransportError(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: TransportRequest) -> Result<TransportResponse, UploadError> {
        self.requests.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse::new(200, "")))
    }
}
