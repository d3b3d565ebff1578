//! Scripted transport for exercising the fetcher without a network

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use domain_scout::{FetchConfig, Result, ScoutError, Transport};

/// What the fake registry answers for a key
#[derive(Debug, Clone)]
pub enum Reply {
    /// `{"errorCode":404,...}`
    NotFound,
    /// A domain registration record
    Record,
    /// Arbitrary body
    Body(String),
    /// Transport-level failure
    Fail,
    /// Never answers
    Hang,
}

pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    default: Reply,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

struct Flight<'a>(&'a AtomicUsize);

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            default: Reply::NotFound,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, key: &str, reply: Reply) -> Self {
        self.replies.insert(key.to_string(), reply);
        self
    }

    pub fn with_default(mut self, reply: Reply) -> Self {
        self.default = reply;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Most requests ever observed in flight at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Keys requested so far, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let key = url.rsplit('/').next().unwrap_or_default().to_string();
        self.calls.lock().push(key.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _flight = Flight(&self.in_flight);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.replies.get(&key).unwrap_or(&self.default) {
            Reply::NotFound => Ok(r#"{"errorCode":404,"title":"Not Found"}"#.to_string()),
            Reply::Record => Ok(format!(
                r#"{{"objectClassName":"domain","ldhName":"{key}","status":["active"]}}"#
            )),
            Reply::Body(body) => Ok(body.clone()),
            Reply::Fail => Err(ScoutError::network(
                "connection refused",
                None,
                Some(url.to_string()),
            )),
            Reply::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
        }
    }
}

/// Config pointing at a placeholder base URL with the given bound and timeout
pub fn config(concurrency: usize, timeout: Duration) -> FetchConfig {
    FetchConfig::default()
        .with_concurrency(concurrency)
        .with_timeout(timeout)
        .with_base_url("http://registry.test/rdap/domain/")
}

pub fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("k{i:03}.ai")).collect()
}
