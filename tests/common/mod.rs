//! Shared utilities for gateway integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use notify_gateway::config::{GatewayConfig, ProviderConfig};

/// A scripted notification provider backend.
///
/// Serves `POST /notify` and `GET /health` over raw TCP, flips between
/// healthy and failing via [`MockProvider::set_healthy`], and counts the
/// notify calls it receives.
pub struct MockProvider {
    healthy: Arc<AtomicBool>,
    notify_calls: Arc<AtomicU32>,
}

impl MockProvider {
    pub async fn start(addr: SocketAddr, healthy: bool) -> Self {
        let listener = TcpListener::bind(addr).await.unwrap();
        let healthy_flag = Arc::new(AtomicBool::new(healthy));
        let notify_calls = Arc::new(AtomicU32::new(0));

        let flag = healthy_flag.clone();
        let calls = notify_calls.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, _)) => {
                        let flag = flag.clone();
                        let calls = calls.clone();
                        tokio::spawn(async move {
                            let mut buf = vec![0u8; 4096];
                            let n = socket.read(&mut buf).await.unwrap_or(0);
                            let head = String::from_utf8_lossy(&buf[..n]);
                            let path = head
                                .lines()
                                .next()
                                .and_then(|line| line.split_whitespace().nth(1))
                                .unwrap_or("/")
                                .to_string();

                            let healthy = flag.load(Ordering::SeqCst);
                            let (status_line, body) = if path.starts_with("/notify") {
                                calls.fetch_add(1, Ordering::SeqCst);
                                if healthy {
                                    (
                                        "200 OK",
                                        r#"{"status":"success","provider_message_id":"mp-0001"}"#,
                                    )
                                } else {
                                    ("500 Internal Server Error", r#"{"status":"error"}"#)
                                }
                            } else if healthy {
                                ("200 OK", r#"{"status":"healthy"}"#)
                            } else {
                                ("503 Service Unavailable", r#"{"status":"down"}"#)
                            };

                            let response = format!(
                                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status_line,
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            healthy: healthy_flag,
            notify_calls,
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn notify_calls(&self) -> u32 {
        self.notify_calls.load(Ordering::SeqCst)
    }
}

/// Config pointing the gateway at two mock providers, with test-friendly
/// breaker tuning.
#[allow(dead_code)]
pub fn gateway_config(
    bind: SocketAddr,
    primary: SocketAddr,
    secondary: SocketAddr,
    failure_threshold: u32,
    reset_timeout_secs: u64,
) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = bind.to_string();
    config.providers.primary = ProviderConfig {
        name: "aldeamo".into(),
        base_url: format!("http://{}", primary),
        timeout_secs: 2,
        ..ProviderConfig::default()
    };
    config.providers.secondary = ProviderConfig {
        name: "twilio".into(),
        base_url: format!("http://{}", secondary),
        timeout_secs: 2,
        ..ProviderConfig::default()
    };
    config.breaker.failure_threshold = failure_threshold;
    config.breaker.reset_timeout_secs = reset_timeout_secs;
    config.probe.timeout_secs = 1;
    config
}

/// Spin up a gateway on `bind` and wait until it accepts requests.
#[allow(dead_code)]
pub async fn start_gateway(config: GatewayConfig) -> notify_gateway::Shutdown {
    let bind: SocketAddr = config.listener.bind_address.parse().unwrap();
    let shutdown = notify_gateway::Shutdown::new();
    let server = notify_gateway::build_gateway(config).unwrap();
    let listener = TcpListener::bind(bind).await.unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Non-pooled client so each request observes current provider state.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
