mod support;

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use suiwatch::watcher::{run_watcher, WatchStatus};
use support::*;

#[tokio::test]
async fn test_two_wallet_scenario() {
    let mut h = harness(vec![wallet("A", "0xaaa", false), wallet("B", "0xbbb", false)]);
    h.balances.push_all("0xaaa", &[1_000_000_000, 1_000_000_000]);
    h.balances.push_all("0xbbb", &[2_000_000_000, 2_500_000_000]);

    let first = h.watcher.tick().await;
    assert_eq!(first.checked, 2);
    assert_eq!(first.changes, 0);
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.watcher.cache().get(&addr("0xaaa")), Some(1_000_000_000));
    assert_eq!(h.watcher.cache().get(&addr("0xbbb")), Some(2_000_000_000));

    let second = h.watcher.tick().await;
    assert_eq!(second.changes, 1);
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("B balance changed"));
    assert!(messages[0].contains("2.0000 → 2.5000"));
    assert!(messages[0].contains("+0.5000"));
    assert_eq!(h.watcher.cache().get(&addr("0xaaa")), Some(1_000_000_000));
    assert_eq!(h.watcher.cache().get(&addr("0xbbb")), Some(2_500_000_000));
}

#[tokio::test]
async fn test_notifies_only_when_reading_differs_from_baseline() {
    let mut h = harness(vec![wallet("A", "0xaaa", false)]);
    h.balances.push_all("0xaaa", &[1, 1, 2, 2, 1]);

    for _ in 0..5 {
        h.watcher.tick().await;
    }

    assert_eq!(h.notifier.count_containing("balance changed"), 2);
    assert_eq!(h.transfer.attempts(), 0);
}

#[tokio::test]
async fn test_address_listed_twice_notifies_once_per_tick() {
    let mut h = harness(vec![wallet("A", "0xaaa", false), wallet("A again", "0xAAA", false)]);
    h.balances.push_all("0xaaa", &[10, 10, 20, 20]);

    h.watcher.tick().await;
    let report = h.watcher.tick().await;

    assert_eq!(report.changes, 1);
    assert_eq!(h.notifier.count_containing("balance changed"), 1);
}

#[tokio::test]
async fn test_signer_deposit_is_swept_once() {
    let mut h = harness(vec![wallet("Hot", SIGNER, true)]);
    h.balances.push_all(SIGNER, &[0, 0, 5_000_000_000]);
    h.transfer.set_moved(4_998_000_000);

    for _ in 0..3 {
        h.watcher.tick().await;
    }

    assert_eq!(h.transfer.attempts(), 1);
    assert_eq!(h.transfer.attempts.lock().unwrap()[0], addr(DESTINATION));
    assert_eq!(h.notifier.count_containing("balance changed"), 1);
    // Reports what the transfer moved, not the observed balance
    assert_eq!(h.notifier.count_containing("💸 Swept 4.9980 SUI from Hot"), 1);
    assert_eq!(h.notifier.count_containing("Tx: digest-1"), 1);
}

#[tokio::test]
async fn test_unchanged_positive_balance_is_not_swept() {
    let mut h = harness(vec![wallet("Hot", SIGNER, true)]);
    h.balances.push_all(SIGNER, &[5, 5]);

    h.watcher.tick().await;
    h.watcher.tick().await;

    assert_eq!(h.transfer.attempts(), 0);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_never_sweeps_addresses_the_key_does_not_control() {
    let mut h = harness(vec![
        wallet("Other", "0x6", true),
        wallet("Hot", SIGNER, false),
    ]);
    h.balances.push_all("0x6", &[0, 100]);
    h.balances.push_all(SIGNER, &[0, 100]);

    h.watcher.tick().await;
    let report = h.watcher.tick().await;

    assert_eq!(report.changes, 2);
    assert_eq!(report.sweeps_attempted, 0);
    assert_eq!(h.transfer.attempts(), 0);
}

#[tokio::test]
async fn test_query_failure_is_isolated() {
    let mut h = harness(vec![wallet("A", "0xaaa", false), wallet("B", "0xbbb", false)]);
    h.balances.push("0xaaa", None);
    h.balances.push("0xbbb", Some(7));
    h.balances.push("0xaaa", None);
    h.balances.push("0xbbb", Some(9));

    let first = h.watcher.tick().await;
    assert_eq!(first.failed, 1);
    let second = h.watcher.tick().await;
    assert_eq!(second.failed, 1);

    assert_eq!(h.watcher.cache().get(&addr("0xaaa")), None);
    assert_eq!(h.watcher.cache().get(&addr("0xbbb")), Some(9));
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("B balance changed"));
}

#[tokio::test]
async fn test_failed_query_keeps_previous_baseline() {
    let mut h = harness(vec![wallet("A", "0xaaa", false)]);
    h.balances.push("0xaaa", Some(3));
    h.balances.push("0xaaa", None);
    h.balances.push("0xaaa", Some(4));

    for _ in 0..3 {
        h.watcher.tick().await;
    }

    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(h.watcher.cache().get(&addr("0xaaa")), Some(4));
}

#[tokio::test]
async fn test_failed_sweep_records_observed_balance_and_retries_on_next_deposit() {
    let mut h = harness(vec![wallet("Hot", SIGNER, true)]);
    h.transfer.set_failing(true);
    h.balances.push_all(SIGNER, &[0, 5, 5, 8]);

    h.watcher.tick().await;
    let report = h.watcher.tick().await;
    assert_eq!(report.sweeps_attempted, 1);
    assert_eq!(report.sweeps_failed, 1);
    assert_eq!(h.watcher.cache().get(&addr(SIGNER)), Some(5));
    assert_eq!(h.notifier.count_containing("⚠️ Sweep from Hot failed"), 1);

    // Same balance: nothing new to sweep
    h.watcher.tick().await;
    assert_eq!(h.transfer.attempts(), 1);

    // Further deposit: retried
    h.transfer.set_failing(false);
    h.watcher.tick().await;
    assert_eq!(h.transfer.attempts(), 2);
    assert_eq!(h.watcher.cache().get(&addr(SIGNER)), Some(8));
}

#[tokio::test]
async fn test_notification_failure_does_not_abort_tick() {
    let mut h = harness_with_notifier(
        vec![wallet("Hot", SIGNER, true), wallet("B", "0xbbb", false)],
        RecordingNotifier::failing(),
    );
    h.balances.push_all(SIGNER, &[0, 10]);
    h.balances.push_all("0xbbb", &[1, 2]);

    h.watcher.tick().await;
    let report = h.watcher.tick().await;

    assert_eq!(report.changes, 2);
    assert_eq!(report.sweeps_attempted, 1);
    assert_eq!(report.sweeps_failed, 0);
    assert_eq!(h.watcher.cache().get(&addr("0xbbb")), Some(2));
}

#[tokio::test]
async fn test_watch_list_edits_apply_on_next_tick() {
    let mut h = harness(vec![wallet("A", "0xaaa", false)]);
    h.balances.push_all("0xaaa", &[1]);
    h.balances.push_all("0xccc", &[4, 6]);

    h.watcher.tick().await;
    h.wallets.write().await.push(wallet("C", "0xccc", false));

    let first = h.watcher.tick().await;
    assert_eq!(first.checked, 2);
    assert_eq!(first.failed, 1); // A has no reading left
    assert!(h.notifier.messages().is_empty());

    h.wallets.write().await.retain(|w| w.name != "A");
    let second = h.watcher.tick().await;
    assert_eq!(second.checked, 1);
    assert_eq!(h.notifier.count_containing("C balance changed"), 1);
    assert_eq!(h.watcher.cache().get(&addr("0xaaa")), Some(1));
}

#[tokio::test]
async fn test_runner_ticks_until_cancelled() {
    let h = harness(vec![wallet("A", "0xaaa", false)]);
    h.balances.push_all("0xaaa", &[1; 100]);

    let status = WatchStatus::new();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(run_watcher(
        h.watcher,
        Duration::from_millis(10),
        status.clone(),
        shutdown.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    handle.await.unwrap();

    let snapshot = status.snapshot().await;
    assert!(snapshot.ticks >= 2);
    assert!(snapshot.last_tick_at.is_some());
    assert_eq!(snapshot.last_report.checked, 1);
}
