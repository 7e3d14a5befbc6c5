//! Intake, status history and author notification against the in-memory
//! document store.

use std::sync::Arc;

use civic_backend::domain::{
    ComplaintCreatedEvent, ComplaintDocument, ComplaintIntakeService, ComplaintStatus,
    DispatchOutcome, IntakeOutcome, NotificationDispatcher, RequiredField, STATUS_NOTICE_TITLE,
    StatusHistoryService, TransitionOutcome,
};
use civic_backend::outbound::memory::{InMemoryDocumentStore, RecordingPushGateway};
use rstest::{fixture, rstest};
use serde_json::json;

mod support;

use support::{clock, complaint, complaint_id, later, now, profile, seed_profile, uid, with_token};

type Dispatcher =
    NotificationDispatcher<InMemoryDocumentStore, InMemoryDocumentStore, RecordingPushGateway>;

struct World {
    store: Arc<InMemoryDocumentStore>,
    push: Arc<RecordingPushGateway>,
    intake: ComplaintIntakeService<InMemoryDocumentStore>,
    history: StatusHistoryService<InMemoryDocumentStore, Dispatcher>,
}

fn world_with(push: RecordingPushGateway) -> World {
    let store = Arc::new(InMemoryDocumentStore::new());
    let push = Arc::new(push);
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&push),
        clock(),
    );
    World {
        intake: ComplaintIntakeService::new(Arc::clone(&store), clock()),
        history: StatusHistoryService::new(Arc::clone(&store), Arc::new(dispatcher)),
        store,
        push,
    }
}

#[fixture]
fn world() -> World {
    world_with(RecordingPushGateway::accepting())
}

fn submitted() -> ComplaintDocument {
    ComplaintDocument {
        title: Some("Broken streetlight".to_owned()),
        description: Some("Dark since Tuesday".to_owned()),
        category: Some("Lighting".to_owned()),
        author_id: Some("u1".to_owned()),
        ..ComplaintDocument::default()
    }
}

#[rstest]
#[tokio::test]
async fn complete_submissions_are_hydrated_once(world: World) {
    let id = complaint_id("c1");
    world.store.insert_complaint(&id, submitted()).await;
    let event = ComplaintCreatedEvent {
        complaint_id: id.clone(),
        document: submitted(),
    };

    let outcome = world.intake.on_created(&event).await.expect("intake");
    assert!(matches!(outcome, IntakeOutcome::Hydrated(_)));

    let stored = world.store.complaint(&id).await.expect("complaint kept");
    assert_eq!(stored.status, Some(ComplaintStatus::pending()));
    assert_eq!(stored.upvote_count, Some(0));
    assert_eq!(stored.comment_count, Some(0));
    assert_eq!(stored.created_at, Some(now()));
    assert!(stored.status_history.is_empty());

    let redelivered = ComplaintCreatedEvent {
        complaint_id: id.clone(),
        document: stored.clone(),
    };
    let outcome = world.intake.on_created(&redelivered).await.expect("redelivery");
    assert_eq!(outcome, IntakeOutcome::Unchanged);
    assert_eq!(world.store.complaint(&id).await, Some(stored));
}

#[rstest]
#[tokio::test]
async fn client_supplied_values_are_not_overwritten(world: World) {
    let id = complaint_id("c1");
    let mut document = submitted();
    document.status = Some(ComplaintStatus::new("In Progress"));
    document.upvote_count = Some(7);
    world.store.insert_complaint(&id, document.clone()).await;

    world
        .intake
        .on_created(&ComplaintCreatedEvent {
            complaint_id: id.clone(),
            document,
        })
        .await
        .expect("intake");

    let stored = world.store.complaint(&id).await.expect("complaint kept");
    assert_eq!(stored.status, Some(ComplaintStatus::new("In Progress")));
    assert_eq!(stored.upvote_count, Some(7));
    assert_eq!(stored.comment_count, Some(0));
}

#[rstest]
#[tokio::test]
async fn whitespace_values_survive_hydration(world: World) {
    let id = complaint_id("c1");
    let mut document = submitted();
    document.title = Some("   ".to_owned());
    document.status = Some(ComplaintStatus::new("  "));
    world.store.insert_complaint(&id, document.clone()).await;

    let outcome = world
        .intake
        .on_created(&ComplaintCreatedEvent {
            complaint_id: id.clone(),
            document,
        })
        .await
        .expect("intake");

    assert!(matches!(outcome, IntakeOutcome::Hydrated(_)));
    let stored = world.store.complaint(&id).await.expect("complaint kept");
    assert_eq!(stored.title.as_deref(), Some("   "));
    assert_eq!(stored.status, Some(ComplaintStatus::new("  ")));
    assert_eq!(stored.upvote_count, Some(0));
}

#[rstest]
#[tokio::test]
async fn submissions_without_a_category_are_deleted(world: World) {
    let id = complaint_id("c1");
    let mut document = submitted();
    document.category = None;
    world.store.insert_complaint(&id, document.clone()).await;

    let outcome = world
        .intake
        .on_created(&ComplaintCreatedEvent {
            complaint_id: id.clone(),
            document,
        })
        .await
        .expect("intake");

    assert_eq!(
        outcome,
        IntakeOutcome::Rejected {
            missing: vec![RequiredField::Category]
        }
    );
    assert!(world.store.complaint(&id).await.is_none());
}

#[rstest]
#[tokio::test]
async fn resolving_a_complaint_records_history_and_notifies_without_push(world: World) {
    let id = complaint_id("c1");
    world
        .store
        .insert_complaint(&id, complaint("u1", "Lighting", "Pending"))
        .await;
    seed_profile(&world.store, profile("u1", "Ada", None)).await;

    let event = world
        .store
        .update_complaint(&id, later(5), |doc| {
            doc.status = Some(ComplaintStatus::new("Resolved"));
        })
        .await
        .expect("complaint exists");
    let outcome = world.history.on_updated(&event).await.expect("recorded");

    match outcome {
        TransitionOutcome::Recorded {
            transition,
            duplicate,
            notification,
        } => {
            assert_eq!(transition.from, ComplaintStatus::pending());
            assert_eq!(transition.to, ComplaintStatus::new("Resolved"));
            assert_eq!(transition.changed_at, later(5));
            assert!(!duplicate);
            assert_eq!(notification, Some(DispatchOutcome::InAppOnly));
        }
        other => panic!("expected a recorded transition, got {other:?}"),
    }

    let stored = world.store.complaint(&id).await.expect("complaint exists");
    assert_eq!(stored.status_history.len(), 1);

    let inbox = world.store.notifications(&uid("u1")).await;
    assert_eq!(inbox.len(), 1);
    let notification = &inbox[0].notification;
    assert_eq!(notification.title, STATUS_NOTICE_TITLE);
    assert_eq!(
        notification.body,
        "Your complaint \"Broken streetlight\" changed from Pending to Resolved."
    );
    assert!(!notification.read);
    assert_eq!(notification.extra.get("complaintId"), Some(&json!("c1")));
    assert_eq!(notification.extra.get("newStatus"), Some(&json!("Resolved")));
    assert!(world.push.sent().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn redelivered_updates_do_not_duplicate_history(world: World) {
    let id = complaint_id("c1");
    world
        .store
        .insert_complaint(&id, complaint("u1", "Lighting", "Pending"))
        .await;

    let event = world
        .store
        .update_complaint(&id, later(5), |doc| {
            doc.status = Some(ComplaintStatus::new("In Progress"));
        })
        .await
        .expect("complaint exists");
    world.history.on_updated(&event).await.expect("first delivery");
    let outcome = world.history.on_updated(&event).await.expect("redelivery");

    assert!(matches!(
        outcome,
        TransitionOutcome::Recorded {
            duplicate: true,
            ..
        }
    ));
    let stored = world.store.complaint(&id).await.expect("complaint exists");
    assert_eq!(stored.status_history.len(), 1);
    // Notification delivery is at-least-once: each delivery notifies.
    assert_eq!(world.store.notifications(&uid("u1")).await.len(), 2);
}

#[rstest]
#[tokio::test]
async fn successive_transitions_accumulate_in_order(world: World) {
    let id = complaint_id("c1");
    world
        .store
        .insert_complaint(&id, complaint("u1", "Lighting", "Pending"))
        .await;

    for (minutes, status) in [(5, "In Progress"), (30, "Resolved")] {
        let event = world
            .store
            .update_complaint(&id, later(minutes), |doc| {
                doc.status = Some(ComplaintStatus::new(status));
            })
            .await
            .expect("complaint exists");
        world.history.on_updated(&event).await.expect("recorded");
    }

    let history = world
        .store
        .complaint(&id)
        .await
        .expect("complaint exists")
        .status_history;
    let steps: Vec<_> = history
        .iter()
        .map(|transition| (transition.from.as_str(), transition.to.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![("Pending", "In Progress"), ("In Progress", "Resolved")]
    );
}

#[rstest]
#[tokio::test]
async fn non_status_edits_and_hydration_writes_are_ignored(world: World) {
    let id = complaint_id("c1");
    world.store.insert_complaint(&id, submitted()).await;

    let hydration = world
        .store
        .update_complaint(&id, later(1), |doc| {
            doc.status = Some(ComplaintStatus::pending());
        })
        .await
        .expect("complaint exists");
    let edit = world
        .store
        .update_complaint(&id, later(2), |doc| {
            doc.description = Some("Still dark".to_owned());
        })
        .await
        .expect("complaint exists");

    for event in [hydration, edit] {
        let outcome = world.history.on_updated(&event).await.expect("handled");
        assert_eq!(outcome, TransitionOutcome::NoChange);
    }
    assert!(world.store.notifications(&uid("u1")).await.is_empty());
}

#[rstest]
#[case::accepted(RecordingPushGateway::accepting(), DispatchOutcome::Pushed, 1)]
#[case::rejected(RecordingPushGateway::rejecting(), DispatchOutcome::PushFailed, 0)]
#[tokio::test]
async fn authors_with_a_token_get_a_best_effort_push(
    #[case] push: RecordingPushGateway,
    #[case] expected: DispatchOutcome,
    #[case] delivered: usize,
) {
    let world = world_with(push);
    let id = complaint_id("c1");
    world
        .store
        .insert_complaint(&id, complaint("u1", "Lighting", "Pending"))
        .await;
    seed_profile(&world.store, with_token(profile("u1", "Ada", None), "device-1")).await;

    let event = world
        .store
        .update_complaint(&id, later(5), |doc| {
            doc.status = Some(ComplaintStatus::new("Resolved"));
        })
        .await
        .expect("complaint exists");
    let outcome = world.history.on_updated(&event).await.expect("recorded");

    assert!(matches!(
        outcome,
        TransitionOutcome::Recorded { notification: Some(actual), .. } if actual == expected
    ));
    assert_eq!(world.store.notifications(&uid("u1")).await.len(), 1);
    let sent = world.push.sent().await;
    assert_eq!(sent.len(), delivered);
    if let Some(message) = sent.first() {
        assert_eq!(message.token.as_ref(), "device-1");
        assert_eq!(
            message.data.get("newStatus").map(String::as_str),
            Some("Resolved")
        );
    }
}
