//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use visit_counter::config::AppConfig;
use visit_counter::flags::{FlagError, FlagOracle, FlagResult, FlagService, Target};
use visit_counter::http::HttpServer;
use visit_counter::lifecycle::Shutdown;
use visit_counter::store::MemoryStore;

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MemoryStore,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// GET `path` and return the body. Asserts a 200 status.
    pub async fn get(&self, path: &str) -> String {
        let res = self.client.get(self.url(path)).send().await.expect("Server unreachable");
        assert_eq!(res.status(), 200, "GET {} should answer 200", path);
        res.text().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config with fast retries so unreachable-store tests finish quickly.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.store.max_attempts = 3;
    config.store.retry_delay_ms = 5;
    config
}

/// Start a server over `store` with the given flag service.
pub async fn start_server(config: AppConfig, store: MemoryStore, flags: FlagService) -> TestServer {
    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(store.clone()), flags);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    TestServer {
        addr,
        store,
        client,
        shutdown,
    }
}

/// Oracle answering from a closure over the target identifier.
pub struct StubOracle<F> {
    answer: F,
    pub calls: AtomicU32,
}

impl<F> StubOracle<F>
where
    F: Fn(&str) -> Option<bool> + Send + Sync + 'static,
{
    /// `None` from `answer` is reported as an evaluation failure.
    pub fn new(answer: F) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicU32::new(0),
        })
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> FlagOracle for StubOracle<F>
where
    F: Fn(&str) -> Option<bool> + Send + Sync + 'static,
{
    async fn bool_variation(&self, _flag: &str, target: &Target) -> FlagResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.answer)(&target.identifier)
            .ok_or_else(|| FlagError::Decode("stub oracle failure".to_string()))
    }
}

/// Pull the visit count out of a rendered page.
pub fn visits_in(page: &str) -> i64 {
    let start = page.find("<strong>").expect("no <strong> in page") + "<strong>".len();
    let end = page[start..].find("</strong>").unwrap() + start;
    page[start..end].parse().unwrap()
}
