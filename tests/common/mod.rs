// * Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use equity_harvest::network::{Fetcher, NetworkError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum Reply {
    Body(Vec<u8>),
    Status(u16),
    // * Writes the bytes, then fails mid-transfer
    Truncated(Vec<u8>),
}

#[derive(Default)]
pub struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    page_calls: AtomicUsize,
    download_calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.replies.insert(url.to_string(), Reply::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn with_truncated(mut self, url: &str, partial: impl Into<Vec<u8>>) -> Self {
        self.replies.insert(url.to_string(), Reply::Truncated(partial.into()));
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requested.lock().unwrap().push(url.to_string());
    }

    fn not_found(url: &str, status: u16) -> NetworkError {
        NetworkError::HttpStatus {
            status,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, NetworkError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.record(url);
        match self.replies.get(url) {
            Some(Reply::Body(body)) => Ok(String::from_utf8_lossy(body).into_owned()),
            Some(Reply::Status(status)) => Err(Self::not_found(url, *status)),
            _ => Err(Self::not_found(url, 404)),
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64, NetworkError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        self.record(url);
        match self.replies.get(url) {
            Some(Reply::Body(body)) => {
                tokio::fs::write(dest, body).await?;
                Ok(body.len() as u64)
            }
            Some(Reply::Truncated(partial)) => {
                tokio::fs::write(dest, partial).await?;
                Err(NetworkError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection reset mid-body",
                )))
            }
            Some(Reply::Status(status)) => Err(Self::not_found(url, *status)),
            None => Err(Self::not_found(url, 404)),
        }
    }
}
