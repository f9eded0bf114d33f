use serde_json::Value;

use suiwatch::api::{router, AppState};
use suiwatch::watcher::{new_watch_list, TickReport, WatchStatus, WatchedAddress};

async fn spawn_api(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn state(status: WatchStatus) -> AppState {
    AppState {
        status,
        wallets: new_watch_list(vec![WatchedAddress {
            name: "Hot".to_string(),
            address: "0x5".parse().unwrap(),
            can_sweep: true,
        }]),
        signer: "0x5".parse().unwrap(),
    }
}

#[tokio::test]
async fn test_alive_route() {
    let base = spawn_api(state(WatchStatus::new())).await;
    let body = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "✅ Sui watch bot is alive!");
}

#[tokio::test]
async fn test_health_reports_loop_progress() {
    let status = WatchStatus::new();
    let base = spawn_api(state(status.clone())).await;

    let before: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before["status"], "ok");
    assert_eq!(before["watched"], 1);
    assert_eq!(before["ticks"], 0);
    assert!(before["last_tick_at"].is_null());

    status.record(TickReport::default()).await;
    let after: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["ticks"], 1);
    assert!(after["last_tick_at"].is_string());
    assert_eq!(
        after["signer"],
        "0x0000000000000000000000000000000000000000000000000000000000000005"
    );
}
