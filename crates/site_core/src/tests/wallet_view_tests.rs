use super::*;

use shared::error::{CONNECTION_FALLBACK_MESSAGE, NOT_READY_MESSAGE, TIMEOUT_MESSAGE};

use crate::test_support::{ConnectScript, ScriptedWallet, TEST_ADDRESS};

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn mount(wallet: &Arc<ScriptedWallet>) -> Arc<WalletSessionView> {
    WalletSessionView::mount(Arc::clone(wallet) as Arc<dyn WalletCapability>)
}

fn record(view: &WalletSessionView) -> (Arc<Mutex<Vec<WalletSnapshot>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let subscription = {
        let seen = Arc::clone(&seen);
        view.subscribe(move |snapshot| seen.lock().expect("lock").push(snapshot.clone()))
    };
    (seen, subscription)
}

fn metamask() -> ConnectHint {
    ConnectHint::wallet("metamask", "eip155")
}

#[tokio::test(start_paused = true)]
async fn initial_phase_follows_capability_readiness() {
    let not_ready = ScriptedWallet::new(false, ConnectScript::Pending);
    assert_eq!(mount(&not_ready).snapshot().phase, WalletPhase::Initializing);

    let ready = ScriptedWallet::new(true, ConnectScript::Pending);
    assert_eq!(mount(&ready).snapshot().phase, WalletPhase::Idle);

    let connected = ScriptedWallet::new(true, ConnectScript::Pending);
    connected.set_address(Some(TEST_ADDRESS));
    let view = mount(&connected);
    assert_eq!(view.snapshot().phase, WalletPhase::Connected);
    assert_eq!(view.button().label, "0xABCD…7890");
}

#[tokio::test(start_paused = true)]
async fn connect_before_ready_is_not_forwarded() {
    let wallet = ScriptedWallet::new(false, ConnectScript::Approve(TEST_ADDRESS.into()));
    let view = mount(&wallet);

    view.request_connect(metamask()).await;

    assert_eq!(wallet.connect_calls(), 0);
    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Initializing);
    assert_eq!(
        snapshot.error.as_ref().map(|err| err.message.as_str()),
        Some(NOT_READY_MESSAGE)
    );
    assert_eq!(view.button().error_text.as_deref(), Some(NOT_READY_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn initialized_event_clears_not_ready_error() {
    let wallet = ScriptedWallet::new(false, ConnectScript::Pending);
    let view = mount(&wallet);
    view.request_connect(ConnectHint::default()).await;
    assert!(view.snapshot().error.is_some());

    wallet.set_ready(true);
    wallet.emit(WalletEvent::Initialized);
    settle().await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Idle);
    assert!(snapshot.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn approved_connect_shows_truncated_address() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Approve(TEST_ADDRESS.into()));
    let view = mount(&wallet);

    view.request_connect(metamask()).await;
    settle().await;

    assert_eq!(wallet.connect_calls(), 1);
    assert_eq!(wallet.hints(), vec![metamask()]);
    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Connected);
    assert_eq!(snapshot.address.as_deref(), Some(TEST_ADDRESS));
    assert!(snapshot.error.is_none());

    let button = view.button();
    assert_eq!(button.label, "0xABCD…7890");
    assert_eq!(button.action, ButtonAction::OpenAccount);
    assert!(button.enabled);
}

#[tokio::test(start_paused = true)]
async fn rejected_connect_renders_capability_message() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Reject("User rejected the request".into()));
    let view = mount(&wallet);

    view.request_connect(metamask()).await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Error);
    assert!(snapshot.address.is_none());
    let error = snapshot.error.expect("error surfaced");
    assert_eq!(error.code, ErrorCode::ConnectionFailed);
    assert_eq!(error.message, "User rejected the request");

    let button = view.button();
    assert_eq!(button.label, CONNECT_LABEL);
    assert!(button.enabled);
    assert_eq!(button.action, ButtonAction::Connect);
}

#[tokio::test(start_paused = true)]
async fn error_event_without_message_uses_fallback() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);

    view.request_connect(metamask()).await;
    wallet.emit(WalletEvent::Error { message: None });
    settle().await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Error);
    assert_eq!(
        snapshot.error.map(|err| err.message),
        Some(CONNECTION_FALLBACK_MESSAGE.to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn pending_connect_disables_button() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);

    view.request_connect(metamask()).await;

    let button = view.button();
    assert_eq!(view.snapshot().phase, WalletPhase::Connecting);
    assert_eq!(button.label, CONNECTING_LABEL);
    assert!(!button.enabled);

    view.request_connect(metamask()).await;
    assert_eq!(wallet.connect_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn watchdog_surfaces_timeout_exactly_once() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);
    let (seen, _subscription) = record(&view);

    view.request_connect(metamask()).await;

    tokio::time::sleep(Duration::from_millis(9_999)).await;
    assert_eq!(view.snapshot().phase, WalletPhase::Connecting);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Error);
    assert_eq!(
        snapshot.error.as_ref().map(|err| err.message.as_str()),
        Some(TIMEOUT_MESSAGE)
    );

    tokio::time::sleep(Duration::from_secs(60)).await;
    let timeouts = seen
        .lock()
        .expect("lock")
        .iter()
        .filter(|snapshot| {
            snapshot
                .error
                .as_ref()
                .map(|err| err.code == ErrorCode::Timeout)
                .unwrap_or(false)
        })
        .count();
    assert_eq!(timeouts, 1);
    assert_eq!(wallet.disconnect_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn resolution_before_expiry_clears_watchdog() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);

    view.request_connect(metamask()).await;
    tokio::time::sleep(Duration::from_secs(4)).await;

    wallet.set_address(Some(TEST_ADDRESS));
    wallet.emit(WalletEvent::Connected {
        address: TEST_ADDRESS.into(),
    });
    settle().await;
    assert_eq!(view.snapshot().phase, WalletPhase::Connected);

    tokio::time::sleep(Duration::from_secs(20)).await;
    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Connected);
    assert!(snapshot.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn late_success_after_timeout_still_connects() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);

    view.request_connect(metamask()).await;
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(view.snapshot().phase, WalletPhase::Error);

    wallet.emit(WalletEvent::Connected {
        address: TEST_ADDRESS.into(),
    });
    settle().await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Connected);
    assert!(snapshot.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn retry_after_timeout_arms_a_fresh_watchdog() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);

    view.request_connect(metamask()).await;
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(view.snapshot().phase, WalletPhase::Error);

    view.request_connect(metamask()).await;
    assert_eq!(wallet.connect_calls(), 2);
    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Connecting);
    assert!(snapshot.error.is_none());

    tokio::time::sleep(Duration::from_millis(9_000)).await;
    assert_eq!(view.snapshot().phase, WalletPhase::Connecting);
    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert_eq!(view.snapshot().phase, WalletPhase::Error);
}

#[tokio::test(start_paused = true)]
async fn disconnect_only_forwarded_when_connected() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Approve(TEST_ADDRESS.into()));
    let view = mount(&wallet);

    view.request_disconnect().await;
    assert_eq!(wallet.disconnect_calls(), 0);

    view.request_connect(metamask()).await;
    settle().await;
    view.request_disconnect().await;
    settle().await;

    assert_eq!(wallet.disconnect_calls(), 1);
    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Idle);
    assert!(snapshot.address.is_none());
    assert_eq!(view.button().label, CONNECT_LABEL);
}

#[tokio::test(start_paused = true)]
async fn failed_disconnect_keeps_session() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Approve(TEST_ADDRESS.into()));
    wallet.fail_disconnect();
    let view = mount(&wallet);

    view.request_connect(metamask()).await;
    view.request_disconnect().await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, WalletPhase::Connected);
    assert!(snapshot.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn address_and_error_never_coexist() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Approve(TEST_ADDRESS.into()));
    let view = mount(&wallet);
    let (seen, _subscription) = record(&view);

    view.request_connect(metamask()).await;
    settle().await;
    wallet.emit(WalletEvent::Error {
        message: Some("session expired".into()),
    });
    settle().await;
    wallet.set_script(ConnectScript::Reject("nope".into()));
    view.request_connect(metamask()).await;
    wallet.emit(WalletEvent::Connected {
        address: TEST_ADDRESS.into(),
    });
    settle().await;
    wallet.emit(WalletEvent::Disconnected);
    settle().await;

    let seen = seen.lock().expect("lock");
    assert!(seen.len() >= 5);
    assert!(seen
        .iter()
        .all(|snapshot| !(snapshot.address.is_some() && snapshot.error.is_some())));
}

#[tokio::test(start_paused = true)]
async fn unmount_stops_following_capability() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = mount(&wallet);
    let (seen, _subscription) = record(&view);

    view.unmount();
    wallet.emit(WalletEvent::Connected {
        address: TEST_ADDRESS.into(),
    });
    settle().await;

    assert_eq!(view.snapshot().phase, WalletPhase::Idle);
    assert!(seen.lock().expect("lock").is_empty());
}

#[tokio::test(start_paused = true)]
async fn connecting_event_from_kit_arms_watchdog() {
    let wallet = ScriptedWallet::new(true, ConnectScript::Pending);
    let view = WalletSessionView::mount_with_watchdog(
        Arc::clone(&wallet) as Arc<dyn WalletCapability>,
        Duration::from_secs(3),
    );

    wallet.emit(WalletEvent::Connecting);
    settle().await;
    assert_eq!(view.snapshot().phase, WalletPhase::Connecting);

    tokio::time::sleep(Duration::from_millis(3_001)).await;
    assert_eq!(
        view.snapshot().error.map(|err| err.code),
        Some(ErrorCode::Timeout)
    );
}
