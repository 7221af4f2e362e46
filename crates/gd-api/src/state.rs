//! State shared across all Actix-web workers.

use std::sync::Arc;

use gd_core::traits::{Authenticator, BlobStore, PortalRepo};

pub struct AppState {
    pub repo: Arc<dyn PortalRepo>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: Arc<dyn Authenticator>,
    /// Shared client for the download proxy; reqwest pools connections
    /// internally so one instance serves every worker.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn PortalRepo>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            repo,
            blobs,
            auth,
            http: reqwest::Client::new(),
        }
    }
}
