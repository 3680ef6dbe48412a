//! Shared setup for API client tests against a mockito server

#![allow(dead_code)]

use kickstartr_api_client::ApiClient;
use kickstartr_core::models::{CreateTemplateRequest, Visibility};
use kickstartr_core::{ArtifactFile, ClientConfig};
use kickstartr_publish::{PublishObserver, PublishState, RecordMetadata};
use std::sync::{Arc, Mutex};

pub const CHUNK_SIZE: usize = 64 * 1024;

pub fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    let config = ClientConfig::new(server.url()).with_upload_chunk_size(CHUNK_SIZE);
    ApiClient::new(&config).unwrap()
}

/// Grant response pointing the PUT back at the mock server
pub fn grant_body(server: &mockito::ServerGuard) -> String {
    serde_json::json!({
        "uploadUrl": {
            "url": format!("{}/blob/templates/demo-app/1.0.0.zip", server.url()),
            "container": "templates",
            "name": "demo-app/1.0.0.zip",
            "headers": { "x-ms-blob-type": "BlockBlob" }
        }
    })
    .to_string()
}

/// 1 MiB archive, 16 chunks
pub fn zip_file() -> ArtifactFile {
    ArtifactFile::new("demo-app.zip", vec![0x50u8; 1024 * 1024])
}

pub fn template_metadata() -> RecordMetadata {
    RecordMetadata::Template(CreateTemplateRequest {
        name: "Demo App".to_string(),
        description: "A demo".to_string(),
        slug: "demo-app".to_string(),
        visibility: Visibility::Public,
        price: "0".to_string(),
        currency: "USD".to_string(),
        version: "1.0.0".to_string(),
        tags: vec![],
    })
}

#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<PublishState>>,
    progress: Mutex<Vec<u8>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn states(&self) -> Vec<PublishState> {
        self.states.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.progress.lock().unwrap().clone()
    }
}

impl PublishObserver for RecordingObserver {
    fn on_state(&self, state: PublishState) {
        self.states.lock().unwrap().push(state);
    }

    fn on_progress(&self, percent: u8) {
        self.progress.lock().unwrap().push(percent);
    }
}
