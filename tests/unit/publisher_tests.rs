/*!
 * Tests for the version publisher
 */

use cms_migrate::errors::MigrationError;
use cms_migrate::versioning::VersionPublisher;
use cms_migrate::app_config::REPORT_TARGET;
use crate::common;
use crate::common::log_capture::{captured_lines, messages_starting_with};
use crate::common::mock_stores::{MockVersionedStore, StoreCall};

fn types(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_run_withLiveRecord_shouldMakeNoCalls() {
    let store = MockVersionedStore::new().with_live("Widget", 1, "Widget");
    let publisher = VersionPublisher::new(&store, types(&["Widget"]));

    let report = publisher.run().unwrap();

    assert!(store.recorded_calls().is_empty());
    assert!(report.published.is_empty());
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_run_withDraftOnlyRecord_shouldWriteDraftThenPublish() {
    common::init_logging();
    let store = MockVersionedStore::new().with_draft("CarouselItem", 4, "CarouselItem");
    let publisher = VersionPublisher::new(&store, types(&["CarouselItem"]));

    let report = publisher.run().unwrap();

    assert_eq!(
        store.recorded_calls(),
        vec![
            StoreCall::WriteToDraft("CarouselItem".to_string(), 4),
            StoreCall::Publish("CarouselItem".to_string(), 4),
        ]
    );
    assert_eq!(report.published.len(), 1);
    assert_eq!(report.published[0].class_name, "CarouselItem");
    assert_eq!(report.published[0].id, 4);
}

#[test]
fn test_run_twice_shouldNotPublishAgain() {
    let store = MockVersionedStore::new()
        .with_draft("Widget", 1, "Widget")
        .with_draft("Widget", 2, "Widget");
    let publisher = VersionPublisher::new(&store, types(&["Widget"]));

    let first = publisher.run().unwrap();
    let calls_after_first = store.recorded_calls().len();
    let second = publisher.run().unwrap();

    assert_eq!(first.published.len(), 2);
    assert!(second.published.is_empty());
    assert_eq!(second.skipped, 2);
    assert_eq!(store.recorded_calls().len(), calls_after_first);
}

#[test]
fn test_run_shouldSweepTypesInConfiguredOrder() {
    let store = MockVersionedStore::new()
        .with_draft("Widget", 7, "Widget")
        .with_draft("CarouselItem", 1, "CarouselItem")
        .with_draft("WidgetArea", 5, "WidgetArea");
    let publisher = VersionPublisher::new(&store, types(&["CarouselItem", "WidgetArea", "Widget"]));

    let report = publisher.run().unwrap();

    let order: Vec<_> = report
        .published
        .iter()
        .map(|record| record.record_type.as_str())
        .collect();
    assert_eq!(order, vec!["CarouselItem", "WidgetArea", "Widget"]);
}

#[test]
fn test_run_withPublishFailure_shouldStopSweep() {
    let store = MockVersionedStore::new()
        .with_draft("Widget", 1, "Widget")
        .with_draft("Widget", 2, "Widget")
        .with_draft("Widget", 3, "Widget")
        .failing_publish_for(2);
    let publisher = VersionPublisher::new(&store, types(&["Widget"]));

    let err = publisher.run().unwrap_err();

    assert!(matches!(err, MigrationError::Backend(_)));
    assert_eq!(
        store.recorded_calls(),
        vec![
            StoreCall::WriteToDraft("Widget".to_string(), 1),
            StoreCall::Publish("Widget".to_string(), 1),
            StoreCall::WriteToDraft("Widget".to_string(), 2),
        ]
    );
}

#[test]
fn test_run_withUnknownType_shouldPublishNothing() {
    let store = MockVersionedStore::new();
    let publisher = VersionPublisher::new(&store, types(&["Nothing"]));

    let report = publisher.run().unwrap();

    assert!(report.published.is_empty());
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_run_shouldLogOnePublishingLinePerDraftOnlyRecord() {
    common::init_logging();
    let store = MockVersionedStore::new()
        .with_live("Widget", 1, "Widget")
        .with_draft("Widget", 2, "Widget")
        .with_draft("WidgetArea", 5, "WidgetArea");
    let publisher = VersionPublisher::new(&store, types(&["Widget", "WidgetArea"]));

    publisher.run().unwrap();

    assert_eq!(
        messages_starting_with("Publishing "),
        vec!["Publishing Widget 2".to_string(), "Publishing WidgetArea 5".to_string()]
    );
    assert!(captured_lines()
        .iter()
        .filter(|line| line.message.starts_with("Publishing "))
        .all(|line| line.target == REPORT_TARGET));
}

#[test]
fn test_run_withOnlyLiveRecords_shouldLogNoPublishingLine() {
    common::init_logging();
    let store = MockVersionedStore::new()
        .with_live("CarouselItem", 1, "CarouselItem")
        .with_live("CarouselItem", 2, "CarouselItem");
    let publisher = VersionPublisher::new(&store, types(&["CarouselItem"]));

    publisher.run().unwrap();

    assert!(messages_starting_with("Publishing ").is_empty());
}
