//! In-memory readers for tests of code that resolves extensions.

use std::sync::Mutex;

use extkit_core::{ExtensionKind, ManagedResource, ReadError};

use crate::ResourceReader;

/// What a [`StaticReader`] answers to every list call.
#[derive(Debug, Clone)]
pub enum Canned {
    Items(Vec<ManagedResource>),
    NotFound,
    Api(u16, String),
    Other(String),
}

/// Reader returning a canned answer and recording each `(kind, namespace)` it was asked for.
pub struct StaticReader {
    answer: Canned,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticReader {
    pub fn new(answer: Canned) -> Self {
        Self { answer, calls: Mutex::new(Vec::new()) }
    }

    pub fn items(items: Vec<ManagedResource>) -> Self {
        Self::new(Canned::Items(items))
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait::async_trait]
impl ResourceReader for StaticReader {
    async fn list(&self, kind: &ExtensionKind, namespace: &str) -> Result<Vec<ManagedResource>, ReadError> {
        self.calls.lock().expect("calls lock").push((kind.to_string(), namespace.to_string()));
        match &self.answer {
            Canned::Items(items) => Ok(items.iter().filter(|r| namespace.is_empty() || r.namespace == namespace).cloned().collect()),
            Canned::NotFound => Err(ReadError::NotFound(format!("{} not found", kind))),
            Canned::Api(code, message) => Err(ReadError::Api { code: *code, message: message.clone() }),
            Canned::Other(message) => Err(ReadError::Other(anyhow::anyhow!("{}", message))),
        }
    }
}

/// Reader whose list call never completes; use with cancellation.
pub struct PendingReader;

#[async_trait::async_trait]
impl ResourceReader for PendingReader {
    async fn list(&self, _kind: &ExtensionKind, _namespace: &str) -> Result<Vec<ManagedResource>, ReadError> {
        std::future::pending().await
    }
}
