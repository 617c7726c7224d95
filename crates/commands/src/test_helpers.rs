//! Test helper utilities and mock implementations for cm-commands

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use mockall::mock;

use cm_runtime::deps::{ConfigStore, HttpTransport, TransportError, TransportResponse};
use cm_runtime::models::TargetRecord;

/// Test UI that captures every printed line.
pub use cm_common::ui::TestUserInterface;

// Mock implementation of the HttpTransport trait for testing the probe.
//
// # Example
//
// ```rust
// use cm_commands::test_helpers::MockHttpTransportMock;
//
// let mut transport = MockHttpTransportMock::new();
// transport.expect_execute()
//     .withf(|req| req.url().as_str() == "https://example.com/info")
//     .times(1)
//     .returning(|_| Ok(TransportResponse::new(404, "")));
// ```
mock! {
    pub HttpTransportMock {}

    #[async_trait]
    impl HttpTransport for HttpTransportMock {
        async fn execute(
            &self,
            request: reqwest::Request,
        ) -> std::result::Result<TransportResponse, TransportError>;
    }
}

/// In-memory config store recording how often it was written
#[derive(Default)]
pub struct InMemoryConfigStore {
    record: Mutex<Option<TargetRecord>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl InMemoryConfigStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already holding `record`
    pub fn with_record(record: TargetRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            ..Self::default()
        }
    }

    /// Store whose writes always fail
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Current record
    pub fn current(&self) -> Option<TargetRecord> {
        self.record.lock().unwrap().clone()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn read(&self) -> Option<TargetRecord> {
        self.current()
    }

    fn write(&self, record: &TargetRecord) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("Failed to write config to /nonexistent/config.json"));
        }
        *self.record.lock().unwrap() = Some(record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A well-formed `/info` body advertising `auth_url`
pub fn info_body(auth_url: &str) -> String {
    serde_json::json!({
        "app": {"version": "0.1.0 build DEV", "name": "Pivotal Credential Manager"},
        "auth-server": {"url": auth_url, "client": "bar"}
    })
    .to_string()
}

/// A record as persisted for `api_url` with the default auth server
pub fn target_record(api_url: &str) -> TargetRecord {
    TargetRecord {
        api_url: api_url.to_string(),
        auth_url: "https://example.com".to_string(),
        auth_client_id: "bar".to_string(),
    }
}
