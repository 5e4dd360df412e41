//! Interview and refresh against a simulated lock.

use std::time::Duration;

use doorlog_core::{
    CommandOptions, DoorLockLoggingApi, Endpoint, INTERVIEW_COMPLETE, InterviewState, MemoryStore,
    Priority, RECORDS_COUNT, Value, ValueId, ValueStore, refresh_values, run_interview,
};
use doorlog_harness::{SimDevice, SimTransport};
use doorlog_proto::Command;

fn lock() -> Endpoint {
    Endpoint::new(7).with_support(true)
}

fn stored(store: &MemoryStore, property: &str) -> Option<Value> {
    store.get_value(&ValueId::new(lock(), property)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn interview_stores_records_count() {
    let transport = SimTransport::connect(SimDevice::new(5));
    let api = DoorLockLoggingApi::new(&transport, lock());
    let store = MemoryStore::new();

    let state = run_interview(&api, &store).await.unwrap();

    assert_eq!(state, InterviewState::Complete);
    assert_eq!(stored(&store, RECORDS_COUNT), Some(Value::Number(5)));
    assert_eq!(stored(&store, INTERVIEW_COMPLETE), Some(Value::Bool(true)));
}

#[tokio::test(start_paused = true)]
async fn interview_queries_at_node_query_priority() {
    let transport = SimTransport::connect(SimDevice::new(1));
    let api = DoorLockLoggingApi::new(&transport, lock());
    let store = MemoryStore::new();

    run_interview(&api, &store).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].frame.command(), Command::RecordsSupportedGet);
    assert_eq!(sent[0].priority, Priority::NodeQuery);
    assert_eq!(stored(&store, RECORDS_COUNT), Some(Value::Number(1)));
}

#[tokio::test(start_paused = true)]
async fn zero_records_aborts_without_persisting() {
    let transport = SimTransport::connect(SimDevice::new(0));
    let api = DoorLockLoggingApi::new(&transport, lock());
    let store = MemoryStore::new();

    let state = run_interview(&api, &store).await.unwrap();

    assert_eq!(state, InterviewState::Aborted);
    assert_eq!(transport.sent().len(), 1);
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn silent_lock_aborts_without_persisting() {
    let transport = SimTransport::connect(SimDevice::new(5).silent());
    let api = DoorLockLoggingApi::new(&transport, lock())
        .with_options(CommandOptions::default().with_timeout(Duration::from_secs(2)));
    let store = MemoryStore::new();

    let state = run_interview(&api, &store).await.unwrap();

    assert_eq!(state, InterviewState::Aborted);
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_lock_within_timeout_completes() {
    let device = SimDevice::new(3).with_reply_delay(Duration::from_millis(500));
    let transport = SimTransport::connect(device);
    let api = DoorLockLoggingApi::new(&transport, lock())
        .with_options(CommandOptions::default().with_timeout(Duration::from_secs(1)));
    let store = MemoryStore::new();

    assert_eq!(run_interview(&api, &store).await.unwrap(), InterviewState::Complete);
}

#[tokio::test(start_paused = true)]
async fn refresh_updates_count_only() {
    let transport = SimTransport::connect(SimDevice::new(12));
    let api = DoorLockLoggingApi::new(&transport, lock());
    let store = MemoryStore::new();

    let state = refresh_values(&api, &store).await.unwrap();

    assert_eq!(state, InterviewState::Complete);
    assert_eq!(stored(&store, RECORDS_COUNT), Some(Value::Number(12)));
    assert_eq!(stored(&store, INTERVIEW_COMPLETE), None);
}

#[tokio::test(start_paused = true)]
async fn rerun_starts_fresh() {
    let transport = SimTransport::connect(SimDevice::new(2));
    let api = DoorLockLoggingApi::new(&transport, lock());
    let store = MemoryStore::new();

    run_interview(&api, &store).await.unwrap();
    run_interview(&api, &store).await.unwrap();

    assert_eq!(transport.sent().len(), 2);
    assert_eq!(store.len(), 2);
}
