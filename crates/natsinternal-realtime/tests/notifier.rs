//! Notifier pipeline tests: ordering, fan-out, and abort-before-delivery.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use natsinternal_core::config::RealtimeConfig;
use natsinternal_core::error::{AppError, ErrorKind};
use natsinternal_core::result::AppResult;
use natsinternal_core::types::{NotificationId, UserId};
use natsinternal_database::NotificationRepository;
use natsinternal_database::memory::{MemoryNotificationRepository, MemoryUserDirectory};
use natsinternal_entity::notification::{NotificationEvent, NotificationType, NotificationView};
use natsinternal_entity::user::{Permission, User};
use natsinternal_realtime::{
    ConnectionManager, DeliveryReport, Notifier, OutboundMessage, PushTransport, RealtimeEngine,
};
use natsinternal_service::{
    CreatedNotification, NotificationRules, NotificationService, NotificationStore,
};

/// Transport that records every send and reports one delivery each.
#[derive(Debug, Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(UserId, OutboundMessage)>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<(UserId, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn send_to_user(&self, user_id: UserId, message: &OutboundMessage) -> DeliveryReport {
        self.sent.lock().unwrap().push((user_id, message.clone()));
        DeliveryReport {
            delivered: 1,
            failed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Failure {
    None,
    Create,
    Fetch,
}

/// Store with fixed recipients that records the order of calls.
#[derive(Debug)]
struct ScriptedStore {
    recipients: Vec<UserId>,
    failure: Failure,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedStore {
    fn new(recipients: &[i32], failure: Failure) -> Self {
        Self {
            recipients: recipients.iter().copied().map(UserId::new).collect(),
            failure,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NotificationStore for ScriptedStore {
    async fn create(&self, _event: &NotificationEvent) -> AppResult<CreatedNotification> {
        self.calls.lock().unwrap().push("create");
        if self.failure == Failure::Create {
            return Err(AppError::database("connection refused"));
        }
        Ok(CreatedNotification {
            notification_id: NotificationId::new(31),
            recipient_ids: self.recipients.clone(),
        })
    }

    async fn get_single(&self, id: NotificationId) -> AppResult<NotificationView> {
        self.calls.lock().unwrap().push("get_single");
        if self.failure == Failure::Fetch {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        Ok(NotificationView {
            id,
            content: "Alice created a new customer (#42).".to_string(),
            emitted_delta_text: "just now".to_string(),
            is_read: false,
        })
    }
}

#[tokio::test]
async fn notify_pushes_identical_view_to_each_recipient() {
    let store = Arc::new(ScriptedStore::new(&[7, 9], Failure::None));
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new(store.clone(), transport.clone());

    let outcome = notifier
        .notify(NotificationType::CustomerCreation, [42])
        .await
        .unwrap();

    assert_eq!(outcome.notification_id, NotificationId::new(31));
    assert_eq!(outcome.recipient_ids, vec![UserId::new(7), UserId::new(9)]);
    assert_eq!(outcome.delivered_connections, 2);
    assert_eq!(*store.calls.lock().unwrap(), vec!["create", "get_single"]);

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    let mut users: Vec<UserId> = sent.iter().map(|(user, _)| *user).collect();
    users.sort();
    assert_eq!(users, vec![UserId::new(7), UserId::new(9)]);
    assert_eq!(sent[0].1, sent[1].1);
    match &sent[0].1 {
        OutboundMessage::NotificationDistributed(view) => {
            assert_eq!(view.id, NotificationId::new(31));
            assert!(!view.is_read);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn create_failure_pushes_nothing() {
    let store = Arc::new(ScriptedStore::new(&[7, 9], Failure::Create));
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new(store.clone(), transport.clone());

    let err = notifier
        .notify(NotificationType::CustomerCreation, [42])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    assert_eq!(*store.calls.lock().unwrap(), vec!["create"]);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn fetch_failure_pushes_nothing() {
    let store = Arc::new(ScriptedStore::new(&[7, 9], Failure::Fetch));
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new(store, transport.clone());

    let err = notifier
        .notify(NotificationType::CustomerCreation, [42])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn no_recipients_means_no_pushes() {
    let store = Arc::new(ScriptedStore::new(&[], Failure::None));
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new(store, transport.clone());

    let outcome = notifier
        .notify(NotificationType::ExpenseDeletion, [3])
        .await
        .unwrap();

    assert!(outcome.recipient_ids.is_empty());
    assert_eq!(outcome.delivered_connections, 0);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn spawned_notify_runs_in_background() {
    let store = Arc::new(ScriptedStore::new(&[7], Failure::None));
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new(store, transport.clone());

    notifier
        .spawn_notify(NotificationEvent::new(NotificationType::BrandCreation, [1]))
        .await
        .unwrap();

    assert_eq!(transport.sent().len(), 1);
}

fn user(id: i32, name: &str) -> User {
    User {
        id: UserId::new(id),
        user_name: name.to_lowercase(),
        display_name: name.to_string(),
        is_deleted: false,
    }
}

#[tokio::test]
async fn end_to_end_over_live_connections() {
    let users = Arc::new(MemoryUserDirectory::new());
    users.insert(user(3, "Alice"), [Permission::GetCustomerDetail]);
    users.insert(user(7, "Bob"), [Permission::GetCustomerDetail]);
    users.insert(user(9, "Carol"), [Permission::GetCustomerDetail]);

    let repo = Arc::new(MemoryNotificationRepository::new());
    let rules = NotificationRules::with_defaults(users.clone(), true);
    let service = Arc::new(NotificationService::new(repo.clone(), users, rules));
    let engine = RealtimeEngine::new(
        RealtimeConfig {
            max_connections_per_user: 5,
            channel_buffer_size: 8,
        },
        service.clone(),
    );

    let (_bob_phone, mut bob_phone) = engine.connections.register(UserId::new(7), "bob".into());
    let (_bob_laptop, mut bob_laptop) = engine.connections.register(UserId::new(7), "bob".into());
    let (_alice, mut alice) = engine.connections.register(UserId::new(3), "alice".into());

    let event =
        NotificationEvent::new(NotificationType::CustomerCreation, [42]).by(UserId::new(3));
    let outcome = engine.notifier.notify_event(&event).await.unwrap();

    assert_eq!(outcome.recipient_ids, vec![UserId::new(7), UserId::new(9)]);
    assert_eq!(outcome.delivered_connections, 2);
    assert!(repo.find_by_id(NotificationId::new(1)).await.unwrap().is_some());
    assert!(repo.find_by_id(NotificationId::new(2)).await.unwrap().is_none());

    let stored = service.get_single(outcome.notification_id).await.unwrap();
    for rx in [&mut bob_phone, &mut bob_laptop] {
        let frame: OutboundMessage = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame, OutboundMessage::NotificationDistributed(stored.clone()));
    }
    assert!(alice.try_recv().is_err());
}

#[tokio::test]
async fn connection_manager_is_a_push_transport() {
    let manager = Arc::new(ConnectionManager::new(RealtimeConfig::default()));
    let (_conn, mut rx) = manager.register(UserId::new(7), "bob".into());
    let transport: Arc<dyn PushTransport> = manager.clone();

    let report = transport
        .send_to_user(UserId::new(7), &OutboundMessage::pong(Some(1)))
        .await;

    assert_eq!(report.delivered, 1);
    assert_eq!(
        rx.recv().await.unwrap(),
        r#"{"event":"Pong","payload":{"timestamp":1}}"#
    );
}
