//! Integration tests for the tracking family.
//!
//! These tests drive the public API end to end: status records flow
//! through the in-memory messaging provider into the tracker, and queries
//! are checked against both explicit reports and low-water-mark
//! inference.

use courier_core::{AgentId, Offset, PackageStatus, StatusMessage};
use courier_messaging::{InMemoryMessaging, MessagingError, Topics};
use courier_tracker::{StatusTracker, TrackerError};

fn status_message(offset: u64, agent: &str, status: PackageStatus) -> StatusMessage {
    StatusMessage::new(Offset::new(offset), AgentId::new(agent), status)
}

#[tokio::test]
async fn test_effective_status_end_to_end() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();
    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    let agent_a = AgentId::new("agent-a");
    let agent_b = AgentId::new("agent-b");

    // Nothing observed yet: every query is pending.
    assert_eq!(tracker.status(&agent_a, Offset::new(0)), None);
    assert_eq!(tracker.low_water_mark(), None);

    provider.publish(
        topics.status_topic(),
        status_message(10, "agent-a", PackageStatus::ImportFailed),
    );
    provider.publish(
        topics.status_topic(),
        status_message(5, "agent-b", PackageStatus::Imported),
    );

    // The low-water-mark is the minimum offset across both agents.
    assert_eq!(tracker.low_water_mark(), Some(Offset::new(5)));

    // Explicit report.
    assert_eq!(
        tracker.status(&agent_a, Offset::new(10)),
        Some(PackageStatus::ImportFailed)
    );
    // Implicit confirmation: 3 < 5, the status can no longer arrive.
    assert_eq!(
        tracker.status(&agent_a, Offset::new(3)),
        Some(PackageStatus::Imported)
    );
    // 5 is not strictly below the low-water-mark: still pending.
    assert_eq!(tracker.status(&agent_a, Offset::new(5)), None);
    // Agent B's own report at 5 is explicit.
    assert_eq!(
        tracker.status(&agent_b, Offset::new(5)),
        Some(PackageStatus::Imported)
    );

    tracker.close().await.unwrap();
}

#[tokio::test]
async fn test_backlog_replayed_to_new_tracker() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();

    // Records retained before the tracker exists, as after a restart.
    provider.publish(
        topics.status_topic(),
        status_message(20, "agent-a", PackageStatus::Imported),
    );
    provider.publish(
        topics.status_topic(),
        status_message(8, "agent-b", PackageStatus::Removed),
    );

    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    assert_eq!(tracker.low_water_mark(), Some(Offset::new(8)));
    assert_eq!(
        tracker.status(&AgentId::new("agent-a"), Offset::new(20)),
        Some(PackageStatus::Imported)
    );
    assert_eq!(
        tracker.status(&AgentId::new("agent-b"), Offset::new(8)),
        Some(PackageStatus::Removed)
    );

    tracker.close().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_report_overwrites() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();
    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    provider.publish(
        topics.status_topic(),
        status_message(10, "agent-a", PackageStatus::ImportFailed),
    );
    provider.publish(
        topics.status_topic(),
        status_message(10, "agent-a", PackageStatus::Imported),
    );

    // Last write wins, whatever the statuses were.
    assert_eq!(
        tracker.status(&AgentId::new("agent-a"), Offset::new(10)),
        Some(PackageStatus::Imported)
    );

    tracker.close().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_publishers() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();
    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    let threads = 8u64;
    let events_per_thread = 100u64;

    let handles: Vec<_> = (0..threads)
        .map(|thread| {
            let provider = provider.clone();
            let topic = topics.status_topic().to_string();
            std::thread::spawn(move || {
                for i in 0..events_per_thread {
                    let offset = 50 + ((thread * events_per_thread + i) * 13) % 500;
                    provider.publish(
                        &topic,
                        status_message(offset, &format!("agent-{thread}"), PackageStatus::Imported),
                    );
                }
                // Lowest offset per thread comes last.
                provider.publish(
                    &topic,
                    status_message(
                        thread + 1,
                        &format!("agent-{thread}"),
                        PackageStatus::Imported,
                    ),
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("publisher thread panicked");
    }

    // Delivery is synchronous, so all records are applied once the
    // publishers have joined. Global minimum is thread 0's final offset.
    assert_eq!(tracker.low_water_mark(), Some(Offset::new(1)));
    for thread in 0..threads {
        let agent = AgentId::new(format!("agent-{thread}"));
        assert_eq!(
            tracker.status(&agent, Offset::new(thread + 1)),
            Some(PackageStatus::Imported)
        );
    }

    tracker.close().await.unwrap();
}

#[tokio::test]
async fn test_close_releases_subscription() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();

    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();
    assert_eq!(provider.subscriber_count(topics.status_topic()), 1);

    tracker.close().await.unwrap();
    assert_eq!(provider.subscriber_count(topics.status_topic()), 0);
}

#[tokio::test]
async fn test_close_failure_propagates() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();

    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    provider.fault_config().force_close_fail = true;
    let err = tracker.close().await.unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Messaging(MessagingError::CloseFailed { .. })
    ));
}

#[tokio::test]
async fn test_tracker_uses_configured_topic() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::new().with_status_topic("tenant_status");

    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    // Records on an unrelated topic never reach the tracker.
    provider.publish(
        Topics::DEFAULT_STATUS_TOPIC,
        status_message(5, "agent-a", PackageStatus::Imported),
    );
    assert_eq!(tracker.low_water_mark(), None);

    provider.publish(
        "tenant_status",
        status_message(7, "agent-a", PackageStatus::Imported),
    );
    assert_eq!(tracker.low_water_mark(), Some(Offset::new(7)));

    tracker.close().await.unwrap();
}

#[tokio::test]
async fn test_one_agents_traffic_confirms_anothers_backlog() {
    let provider = InMemoryMessaging::new();
    let topics = Topics::default();
    let tracker = StatusTracker::new(&provider, &topics).await.unwrap();

    // Only agent-b ever reports; its traffic still lowers the global
    // low-water-mark for agent-a's queries.
    provider.publish(
        topics.status_topic(),
        status_message(100, "agent-b", PackageStatus::Imported),
    );

    let agent_a = AgentId::new("agent-a");
    assert_eq!(
        tracker.status(&agent_a, Offset::new(99)),
        Some(PackageStatus::Imported)
    );
    assert_eq!(tracker.status(&agent_a, Offset::new(100)), None);
    assert_eq!(tracker.status(&agent_a, Offset::new(101)), None);

    tracker.close().await.unwrap();
}
