//! Wire-shape tests for the aggregation-service envelope.

use bulletin_report_engine::report::{
    AnnouncementStatus, Category, ItemKind, ItemStatus, ReportEnvelope,
};

const SAMPLE: &str = r#"{
  "report": {
    "title": "Bulletin Report",
    "description": "Content activity for March 2025",
    "tallies": {
      "announcements": { "regular": 2, "alert": 1, "total": 3 },
      "calendarEvents": { "regular": 1, "alert": 0, "total": 1 }
    },
    "items": [
      {
        "id": "f1e2d3c4-b5a6-7890-1234-567890abcdef",
        "kind": "Announcement",
        "title": "Enrolment window opens",
        "body": "Enrolment for the next term opens Monday.",
        "occurredAt": "2025-03-03T01:00:00Z",
        "category": "alert",
        "images": ["https://cdn.example.test/enrolment.jpg"],
        "attribution": "Admin Office",
        "status": { "status": "published", "visibleUntil": "2025-04-01T00:00:00Z" }
      },
      {
        "id": "a1b2c3d4-e5f6-7890-1234-567890abcdef",
        "kind": "CalendarEvent",
        "title": "Sports Day",
        "body": "",
        "occurredAt": "2025-03-06T01:00:00Z",
        "category": "regular",
        "attribution": "Registrar",
        "status": { "active": true, "startsAt": "2025-03-10T00:00:00Z", "endsAt": "2025-03-10T08:00:00Z" }
      }
    ],
    "meta": { "generatedAt": "2025-08-05T02:00:00Z", "generatedBy": "aggregator" }
  }
}"#;

#[test]
fn parses_a_full_envelope() {
    let envelope: ReportEnvelope = serde_json::from_str(SAMPLE).unwrap();
    let report = &envelope.report;

    assert_eq!(report.title, "Bulletin Report");
    assert_eq!(report.tallies.announcements.total, 3);
    assert_eq!(report.tallies.first_inconsistent(), None);
    assert_eq!(report.items.len(), 2);

    let first = &report.items[0];
    assert_eq!(first.kind, ItemKind::Announcement);
    assert_eq!(first.category, Category::Alert);
    assert_eq!(first.images.len(), 1);
    assert!(matches!(
        first.status,
        ItemStatus::Announcement {
            status: AnnouncementStatus::Published,
            visible_until: Some(_)
        }
    ));

    let second = &report.items[1];
    assert_eq!(second.kind, ItemKind::CalendarEvent);
    // Items without an images field default to none.
    assert!(second.images.is_empty());
    assert!(matches!(second.status, ItemStatus::CalendarEvent { active: true, .. }));
}

#[test]
fn round_trips_through_serde() {
    let envelope: ReportEnvelope = serde_json::from_str(SAMPLE).unwrap();
    let json = serde_json::to_string(&envelope).unwrap();
    let again: ReportEnvelope = serde_json::from_str(&json).unwrap();
    assert_eq!(envelope, again);
}
