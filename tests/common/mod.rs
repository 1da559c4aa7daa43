#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bullet_forge::error::{ImproveError, StorageError};
use bullet_forge::http::{HttpRequest, HttpResponse, HttpTransport};
use bullet_forge::storage::{ImprovementRecord, ImprovementStore};
use serde_json::Value;

/// Scripted transport: pops one queued reply per call and records every request.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, ImproveError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(status: u16, body: Value) -> Arc<Self> {
        let transport = Self::new();
        transport.push_json(status, body);
        transport
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let transport = Self::new();
        transport
            .replies
            .lock()
            .unwrap()
            .push_back(Err(ImproveError::transport(message)));
        transport
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string().into_bytes(),
        }));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn last_body(&self) -> Value {
        serde_json::from_slice(&self.last_request().body).expect("request body is JSON")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ImproveError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no reply queued")
    }
}

/// Store that keeps records in memory.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<ImprovementRecord>>,
}

#[async_trait]
impl ImprovementStore for MemoryStore {
    async fn record(&self, record: &ImprovementRecord) -> Result<(), StorageError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Store whose inserts always fail.
#[derive(Default)]
pub struct BrokenStore {
    pub attempts: AtomicUsize,
}

impl BrokenStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImprovementStore for BrokenStore {
    async fn record(&self, _record: &ImprovementRecord) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Query {
            operation: "insert improvement",
            message: "disk I/O error".to_string(),
        })
    }
}

pub fn chat_reply(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}
