//! Admin API scenarios: auth, probe-gated reset, recovery probe.

use std::net::SocketAddr;

use serde_json::Value;

mod common;

const API_KEY: &str = "admin-secret-key";

async fn send(client: &reqwest::Client, gateway: SocketAddr) -> reqwest::Response {
    client
        .post(format!("http://{}/notifications", gateway))
        .json(&serde_json::json!({
            "message": "payment processed",
            "customer_id": "cust_12345"
        }))
        .send()
        .await
        .expect("gateway unreachable")
}

#[tokio::test]
async fn admin_endpoints_require_bearer_token() {
    let primary_addr: SocketAddr = "127.0.0.1:29201".parse().unwrap();
    let secondary_addr: SocketAddr = "127.0.0.1:29202".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29203".parse().unwrap();

    let _primary = common::MockProvider::start(primary_addr, true).await;
    let _secondary = common::MockProvider::start(secondary_addr, true).await;

    let config = common::gateway_config(gateway_addr, primary_addr, secondary_addr, 3, 15);
    let shutdown = common::start_gateway(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/admin/status", gateway_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("http://{}/admin/status", gateway_addr))
        .bearer_auth("wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .get(format!("http://{}/admin/status", gateway_addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn reset_is_gated_on_the_health_probe() {
    let primary_addr: SocketAddr = "127.0.0.1:29211".parse().unwrap();
    let secondary_addr: SocketAddr = "127.0.0.1:29212".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29213".parse().unwrap();

    let primary = common::MockProvider::start(primary_addr, false).await;
    let _secondary = common::MockProvider::start(secondary_addr, true).await;

    // Long reset timeout: only a forced reset can close the circuit here.
    let config = common::gateway_config(gateway_addr, primary_addr, secondary_addr, 2, 3600);
    let shutdown = common::start_gateway(config).await;
    let client = common::test_client();

    for _ in 0..2 {
        let _ = send(&client, gateway_addr).await;
    }

    // Recovery probe reports the outage without touching the breaker.
    let body: Value = client
        .post(format!("http://{}/admin/force-recovery", gateway_addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["recovered"], false);

    // Reset refused while the primary is down; the circuit stays open.
    let body: Value = client
        .post(format!("http://{}/admin/reset", gateway_addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], false);

    let status: Value = client
        .get(format!("http://{}/admin/status", gateway_addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["state"], "open");

    // Once the primary recovers, the reset closes the circuit and the
    // next send goes to the primary again.
    primary.set_healthy(true);

    let body: Value = client
        .post(format!("http://{}/admin/reset", gateway_addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], true);

    let status: Value = client
        .get(format!("http://{}/admin/status", gateway_addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["state"], "closed");
    assert_eq!(status["failures"], 0);
    assert_eq!(status["active_provider"], "primary");

    let notify_calls_before = primary.notify_calls();
    let res = send(&client, gateway_addr).await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["provider_used"], "primary");
    assert_eq!(primary.notify_calls(), notify_calls_before + 1);

    shutdown.trigger();
}
