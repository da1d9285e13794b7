//! Push-notification permission negotiation for a dashboard session.
//!
//! [`NotificationCoordinator::run`] is driven once by the hosting lifecycle.
//! It never prompts a user who already answered, tolerates a missing delivery
//! token, and swallows setup failures so the dashboard keeps working without
//! push alerts.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Study Alert";
pub const DEFAULT_BODY: &str = "New update in your study plan.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationState {
    Loading,
    Unsupported,
    Default,
    Granted,
    Denied,
}

/// Permission as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Default,
    Granted,
    Denied,
}

impl From<Permission> for NotificationState {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::Default => NotificationState::Default,
            Permission::Granted => NotificationState::Granted,
            Permission::Denied => NotificationState::Denied,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("push messaging unavailable: {0}")]
    Unavailable(String),
    #[error("permission request failed: {0}")]
    Permission(String),
    #[error("delivery token fetch failed: {0}")]
    Token(String),
    #[error("message subscription failed: {0}")]
    Subscription(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Inbound push message as delivered by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: Option<PushNotification>,
}

/// What the shared alert sink shows for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    /// Missing or empty title/body fall back to the generic study alert.
    pub fn from_payload(payload: PushPayload) -> Self {
        let notification = payload.notification.unwrap_or_default();
        Toast {
            title: notification
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: notification
                .body
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| DEFAULT_BODY.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryToken {
    pub value: String,
    pub registered_at: DateTime<Utc>,
}

pub type MessageHandler = Box<dyn Fn(PushPayload) + Send + Sync>;

/// The push-messaging transport consumed by the coordinator.
pub trait PushMessaging: Send + Sync {
    fn is_supported(&self) -> impl Future<Output = Result<bool, MessagingError>> + Send;

    fn current_permission(&self) -> Result<Permission, MessagingError>;

    fn request_permission(&self) -> impl Future<Output = Result<Permission, MessagingError>> + Send;

    /// `Ok(None)` when no delivery key is configured.
    fn get_token(&self) -> impl Future<Output = Result<Option<String>, MessagingError>> + Send;

    fn on_message(&self, handler: MessageHandler) -> Result<(), MessagingError>;
}

/// Shared toast/alert sink.
pub trait NotificationSink: Send + Sync {
    fn display(&self, toast: Toast);
}

pub struct NotificationCoordinator<M> {
    messaging: M,
    sink: Arc<dyn NotificationSink>,
    state: NotificationState,
    token: Option<DeliveryToken>,
    started: bool,
}

impl<M: PushMessaging> NotificationCoordinator<M> {
    pub fn new(messaging: M, sink: Arc<dyn NotificationSink>) -> Self {
        NotificationCoordinator {
            messaging,
            sink,
            state: NotificationState::Loading,
            token: None,
            started: false,
        }
    }

    pub fn state(&self) -> NotificationState {
        self.state
    }

    pub fn token(&self) -> Option<&DeliveryToken> {
        self.token.as_ref()
    }

    /// Run setup once. Later calls return the current state untouched.
    pub async fn run(&mut self) -> NotificationState {
        if self.started {
            return self.state;
        }
        self.started = true;

        if let Err(err) = self.setup().await {
            tracing::debug!(error = %err, "Messaging setup skipped");
            self.state = NotificationState::Unsupported;
        }
        self.state
    }

    async fn setup(&mut self) -> Result<(), MessagingError> {
        if !self.messaging.is_supported().await? {
            self.state = NotificationState::Unsupported;
            return Ok(());
        }

        let mut permission = self.messaging.current_permission()?;
        self.state = permission.into();

        if permission == Permission::Default {
            match self.messaging.request_permission().await {
                Ok(answer) => {
                    permission = answer;
                    self.state = answer.into();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Notification permission request failed");
                }
            }
        }

        if permission == Permission::Granted {
            self.register_token().await;
        }

        let sink = Arc::clone(&self.sink);
        self.messaging.on_message(Box::new(move |payload| {
            sink.display(Toast::from_payload(payload));
        }))?;

        Ok(())
    }

    async fn register_token(&mut self) {
        match self.messaging.get_token().await {
            Ok(Some(value)) => {
                tracing::info!("Push delivery token registered");
                self.token = Some(DeliveryToken {
                    value,
                    registered_at: Utc::now(),
                });
            }
            Ok(None) => tracing::debug!("No push delivery token available"),
            Err(err) => tracing::debug!(error = %err, "Push delivery token fetch failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Calls {
        requests: usize,
        token_fetches: usize,
        handlers: Vec<MessageHandler>,
    }

    struct FakeMessaging {
        supported: Result<bool, ()>,
        permission: Permission,
        answer: Result<Permission, ()>,
        token: Result<Option<String>, ()>,
        subscribe_fails: bool,
        calls: Arc<Mutex<Calls>>,
    }

    impl FakeMessaging {
        fn with_permission(permission: Permission) -> Self {
            FakeMessaging {
                supported: Ok(true),
                permission,
                answer: Ok(Permission::Granted),
                token: Ok(Some("device-token-1".to_string())),
                subscribe_fails: false,
                calls: Arc::new(Mutex::new(Calls::default())),
            }
        }
    }

    impl PushMessaging for FakeMessaging {
        async fn is_supported(&self) -> Result<bool, MessagingError> {
            self.supported
                .map_err(|_| MessagingError::Unavailable("no service worker".to_string()))
        }

        fn current_permission(&self) -> Result<Permission, MessagingError> {
            Ok(self.permission)
        }

        async fn request_permission(&self) -> Result<Permission, MessagingError> {
            self.calls.lock().unwrap().requests += 1;
            self.answer
                .map_err(|_| MessagingError::Permission("prompt blocked".to_string()))
        }

        async fn get_token(&self) -> Result<Option<String>, MessagingError> {
            self.calls.lock().unwrap().token_fetches += 1;
            self.token
                .clone()
                .map_err(|_| MessagingError::Token("missing vapid key".to_string()))
        }

        fn on_message(&self, handler: MessageHandler) -> Result<(), MessagingError> {
            if self.subscribe_fails {
                return Err(MessagingError::Subscription("closed".to_string()));
            }
            self.calls.lock().unwrap().handlers.push(handler);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        shown: Mutex<Vec<Toast>>,
    }

    impl NotificationSink for RecordingSink {
        fn display(&self, toast: Toast) {
            self.shown.lock().unwrap().push(toast);
        }
    }

    fn build(
        messaging: FakeMessaging,
    ) -> (NotificationCoordinator<FakeMessaging>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (NotificationCoordinator::new(messaging, sink.clone()), sink)
    }

    #[tokio::test]
    async fn granted_permission_is_not_re_prompted() {
        let messaging = FakeMessaging::with_permission(Permission::Granted);
        let calls = messaging.calls.clone();
        let (mut coordinator, _) = build(messaging);

        assert_eq!(coordinator.state(), NotificationState::Loading);
        assert_eq!(coordinator.run().await, NotificationState::Granted);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.requests, 0);
        assert_eq!(calls.token_fetches, 1);
        assert_eq!(calls.handlers.len(), 1);
        assert_eq!(
            coordinator.token().map(|t| t.value.as_str()),
            Some("device-token-1")
        );
    }

    #[tokio::test]
    async fn default_permission_prompts_once_and_adopts_the_answer() {
        let mut messaging = FakeMessaging::with_permission(Permission::Default);
        messaging.answer = Ok(Permission::Denied);
        let calls = messaging.calls.clone();
        let (mut coordinator, _) = build(messaging);

        assert_eq!(coordinator.run().await, NotificationState::Denied);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.requests, 1);
        assert_eq!(calls.token_fetches, 0);
        assert_eq!(calls.handlers.len(), 1, "denied users still get a subscription");
    }

    #[tokio::test]
    async fn denied_permission_is_adopted_without_prompt() {
        let messaging = FakeMessaging::with_permission(Permission::Denied);
        let calls = messaging.calls.clone();
        let (mut coordinator, _) = build(messaging);

        assert_eq!(coordinator.run().await, NotificationState::Denied);
        assert_eq!(calls.lock().unwrap().requests, 0);
    }

    #[tokio::test]
    async fn unsupported_environment_is_terminal_without_subscription() {
        let mut messaging = FakeMessaging::with_permission(Permission::Granted);
        messaging.supported = Ok(false);
        let calls = messaging.calls.clone();
        let (mut coordinator, _) = build(messaging);

        assert_eq!(coordinator.run().await, NotificationState::Unsupported);
        let calls = calls.lock().unwrap();
        assert!(calls.handlers.is_empty());
        assert_eq!(calls.token_fetches, 0);
    }

    #[tokio::test]
    async fn token_failures_keep_granted_state() {
        for token in [Ok(None), Err(())] {
            let mut messaging = FakeMessaging::with_permission(Permission::Granted);
            messaging.token = token;
            let calls = messaging.calls.clone();
            let (mut coordinator, _) = build(messaging);

            assert_eq!(coordinator.run().await, NotificationState::Granted);
            assert!(coordinator.token().is_none());
            assert_eq!(calls.lock().unwrap().handlers.len(), 1);
        }
    }

    #[tokio::test]
    async fn failed_prompt_stays_default_and_still_subscribes() {
        let mut messaging = FakeMessaging::with_permission(Permission::Default);
        messaging.answer = Err(());
        let calls = messaging.calls.clone();
        let (mut coordinator, _) = build(messaging);

        assert_eq!(coordinator.run().await, NotificationState::Default);
        assert_eq!(calls.lock().unwrap().handlers.len(), 1);
    }

    #[tokio::test]
    async fn setup_errors_collapse_to_unsupported() {
        let mut messaging = FakeMessaging::with_permission(Permission::Granted);
        messaging.subscribe_fails = true;
        let (mut coordinator, _) = build(messaging);
        assert_eq!(coordinator.run().await, NotificationState::Unsupported);

        let mut messaging = FakeMessaging::with_permission(Permission::Granted);
        messaging.supported = Err(());
        let (mut coordinator, _) = build(messaging);
        assert_eq!(coordinator.run().await, NotificationState::Unsupported);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let messaging = FakeMessaging::with_permission(Permission::Default);
        let calls = messaging.calls.clone();
        let (mut coordinator, _) = build(messaging);

        assert_eq!(coordinator.run().await, NotificationState::Granted);
        assert_eq!(coordinator.run().await, NotificationState::Granted);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.requests, 1);
        assert_eq!(calls.handlers.len(), 1);
    }

    #[tokio::test]
    async fn inbound_messages_reach_the_sink_with_defaults() {
        let messaging = FakeMessaging::with_permission(Permission::Granted);
        let calls = messaging.calls.clone();
        let (mut coordinator, sink) = build(messaging);
        coordinator.run().await;

        {
            let calls = calls.lock().unwrap();
            let handler = &calls.handlers[0];
            handler(PushPayload {
                notification: Some(PushNotification {
                    title: Some("Exam tomorrow".to_string()),
                    body: Some("Physics, room 4".to_string()),
                }),
            });
            handler(PushPayload::default());
            handler(PushPayload {
                notification: Some(PushNotification {
                    title: Some(String::new()),
                    body: None,
                }),
            });
        }

        let shown = sink.shown.lock().unwrap();
        assert_eq!(shown.len(), 3);
        assert_eq!(
            shown[0],
            Toast {
                title: "Exam tomorrow".to_string(),
                description: "Physics, room 4".to_string(),
            }
        );
        for toast in &shown[1..] {
            assert_eq!(toast.title, DEFAULT_TITLE);
            assert_eq!(toast.description, DEFAULT_BODY);
        }
    }

    #[test]
    fn payload_parses_from_transport_json() {
        let payload: PushPayload = serde_json::from_value(serde_json::json!({
            "notification": { "title": "Quiz" }
        }))
        .expect("payload should parse");
        let toast = Toast::from_payload(payload);
        assert_eq!(toast.title, "Quiz");
        assert_eq!(toast.description, DEFAULT_BODY);
    }
}
