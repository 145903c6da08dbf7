use std::time::Duration;

use review_common::error::{CycleError, CycleErrorKind};
use review_common::types::Homework;
use review_engine::catalog;
use review_engine::differ::{self, StatusDiff};
use review_engine::formatter;
use review_engine::validator::{self, ValidationPolicy};
use review_notifier::Notifier;

use crate::fetcher::StatusSource;

/// What a single poll cycle ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was found and a notification sent.
    Notified,
    /// Empty result or the newest homework was already seen.
    NoChange,
    /// The cycle failed; the failure was logged and reported to the chat.
    Failed(CycleErrorKind),
}

/// Polls the review API and reports status changes of the newest homework.
///
/// Holds the only mutable state in the process: the request cursor and the
/// last homework record a notification was sent for.
pub struct StatusPoller<S, N> {
    source: S,
    notifier: N,
    policy: ValidationPolicy,
    poll_interval: Duration,
    cursor: i64,
    last_seen: Option<Homework>,
}

impl<S: StatusSource, N: Notifier> StatusPoller<S, N> {
    pub fn new(source: S, notifier: N, policy: ValidationPolicy, poll_interval: Duration) -> Self {
        Self::with_cursor(
            source,
            notifier,
            policy,
            poll_interval,
            chrono::Utc::now().timestamp(),
        )
    }

    /// Start from an explicit `from_date` instead of "now".
    pub fn with_cursor(
        source: S,
        notifier: N,
        policy: ValidationPolicy,
        poll_interval: Duration,
        cursor: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            policy,
            poll_interval,
            cursor,
            last_seen: None,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_seen(&self) -> Option<&Homework> {
        self.last_seen.as_ref()
    }

    /// Run cycles forever, sleeping `poll_interval` after each one.
    pub async fn run(&mut self) {
        tracing::info!(
            cursor = self.cursor,
            poll_interval_secs = self.poll_interval.as_secs(),
            require_cursor_field = self.policy.require_cursor_field,
            validate_element_types = self.policy.validate_element_types,
            "Status poller started"
        );

        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Run one fetch → validate → diff → notify cycle.
    ///
    /// Never fails: every [`CycleError`] is logged here and reported to the
    /// chat as a failure message.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(true) => CycleOutcome::Notified,
            Ok(false) => CycleOutcome::NoChange,
            Err(error) => {
                match &error {
                    CycleError::Remote(e) => {
                        tracing::error!(error = %e, "Review API request failed");
                    }
                    CycleError::Schema(e) => {
                        tracing::error!(error = %e, "Review API response does not match schema");
                    }
                    CycleError::MissingField(field) => {
                        tracing::error!(field = %field, "Homework record is missing a required field");
                    }
                    CycleError::UnknownStatus(status) => {
                        let known: Vec<_> = catalog::known_statuses().collect();
                        tracing::error!(status = %status, known = ?known, "Unknown homework status");
                    }
                }

                self.notifier
                    .deliver(&formatter::format_failure(&error))
                    .await;
                CycleOutcome::Failed(error.kind())
            }
        }
    }

    async fn poll_once(&mut self) -> Result<bool, CycleError> {
        let payload = self.source.fetch(self.cursor).await?;
        let response = validator::validate(&payload, self.policy)?;

        // Advance before formatting so a record that cannot be rendered is
        // not fetched and reported again on every cycle.
        if let Some(current_date) = response.current_date {
            self.cursor = current_date;
        }

        let changed = match differ::diff(&response.homeworks, self.last_seen.as_ref()) {
            StatusDiff::Empty => {
                tracing::debug!("No homeworks in response");
                return Ok(false);
            }
            StatusDiff::Unchanged => {
                tracing::debug!("No new homework statuses");
                return Ok(false);
            }
            StatusDiff::Changed(homework) => homework.clone(),
        };

        // Recorded before formatting: a record that cannot be rendered is
        // reported once, not on every cycle it is returned.
        let changed = self.last_seen.insert(changed);
        let message = formatter::format_status(changed)?;
        tracing::info!(
            homework = changed.name().unwrap_or_default(),
            status = changed.status().unwrap_or_default(),
            lesson = changed.lesson_name(),
            comment = changed.reviewer_comment(),
            "Homework status changed"
        );
        self.notifier.deliver(&message).await;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use review_common::error::{FieldKind, RemoteError};
    use review_notifier::DeliveryError;
    use serde_json::{Value, json};

    use super::*;

    /// Replays canned fetch results and records the cursors it was asked for.
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<Value, CycleError>>>,
        requested: Arc<Mutex<Vec<i64>>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<Value, CycleError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requested: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch(&self, from_date: i64) -> Result<Value, CycleError> {
            self.requested.lock().unwrap().push(from_date);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": [], "current_date": from_date})))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn response(homeworks: Value, current_date: i64) -> Result<Value, CycleError> {
        Ok(json!({"homeworks": homeworks, "current_date": current_date}))
    }

    fn poller(
        replies: Vec<Result<Value, CycleError>>,
    ) -> (StatusPoller<ScriptedSource, RecordingNotifier>, RecordingNotifier) {
        let notifier = RecordingNotifier::default();
        let poller = StatusPoller::with_cursor(
            ScriptedSource::new(replies),
            notifier.clone(),
            ValidationPolicy::strict(),
            Duration::from_secs(600),
            1000,
        );
        (poller, notifier)
    }

    #[tokio::test]
    async fn test_change_notifies_once_then_stays_quiet() {
        let record = json!({"homework_name": "Project X", "status": "approved"});
        let (mut poller, notifier) = poller(vec![
            response(json!([record.clone()]), 1001),
            response(json!([record.clone()]), 1002),
        ]);

        assert_eq!(poller.run_cycle().await, CycleOutcome::Notified);
        assert_eq!(poller.run_cycle().await, CycleOutcome::NoChange);

        assert_eq!(
            notifier.messages(),
            vec![
                "Изменился статус проверки работы \"Project X\". Работа проверена: ревьюеру всё понравилось. Ура!"
                    .to_string()
            ]
        );
        assert_eq!(poller.last_seen().and_then(Homework::status), Some("approved"));
    }

    #[tokio::test]
    async fn test_empty_list_keeps_last_seen() {
        let record = json!({"homework_name": "hw", "status": "reviewing"});
        let (mut poller, notifier) = poller(vec![
            response(json!([record.clone()]), 1001),
            response(json!([]), 1002),
        ]);

        poller.run_cycle().await;
        let before = poller.last_seen().cloned();
        assert_eq!(poller.run_cycle().await, CycleOutcome::NoChange);
        assert_eq!(poller.last_seen().cloned(), before);
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_status_transition_updates_last_seen() {
        let (mut poller, notifier) = poller(vec![
            response(json!([{"homework_name": "hw", "status": "reviewing"}]), 1001),
            response(json!([{"homework_name": "hw", "status": "rejected"}]), 1002),
        ]);

        assert_eq!(poller.run_cycle().await, CycleOutcome::Notified);
        assert_eq!(poller.run_cycle().await, CycleOutcome::Notified);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].ends_with("Работа проверена: у ревьюера есть замечания."));
        assert_eq!(poller.last_seen().and_then(Homework::status), Some("rejected"));
    }

    #[tokio::test]
    async fn test_cursor_advances_to_current_date() {
        let (mut poller, _notifier) = poller(vec![response(json!([]), 2000)]);
        let requested = poller.source.requested.clone();

        poller.run_cycle().await;
        poller.run_cycle().await;

        assert_eq!(poller.cursor(), 2000);
        assert_eq!(*requested.lock().unwrap(), vec![1000, 2000]);
    }

    #[tokio::test]
    async fn test_remote_failure_reported_and_recovered() {
        let (mut poller, notifier) = poller(vec![
            Err(RemoteError::Status { status: 503 }.into()),
            response(json!([{"homework_name": "hw", "status": "approved"}]), 1001),
        ]);

        assert_eq!(
            poller.run_cycle().await,
            CycleOutcome::Failed(CycleErrorKind::Remote)
        );
        assert_eq!(poller.cursor(), 1000);
        assert_eq!(poller.run_cycle().await, CycleOutcome::Notified);

        let messages = notifier.messages();
        assert_eq!(messages[0], "Сбой в работе программы: Ошибка ответа API.");
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_schema_failure_reported() {
        let (mut poller, notifier) =
            poller(vec![Ok(json!({"homeworks": "oops", "current_date": 1}))]);

        assert_eq!(
            poller.run_cycle().await,
            CycleOutcome::Failed(CycleErrorKind::Schema)
        );
        assert!(poller.last_seen().is_none());
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_status_is_caught() {
        let (mut poller, notifier) = poller(vec![response(json!([{"homework_name": "hw"}]), 1001)]);

        assert_eq!(
            poller.run_cycle().await,
            CycleOutcome::Failed(CycleErrorKind::MissingField(FieldKind::Status))
        );
        assert_eq!(poller.last_seen().and_then(Homework::name), Some("hw"));
        assert_eq!(
            notifier.messages(),
            vec!["Сбой в работе программы: Отсутствует ключ 'status' в ответе API.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_status_is_caught() {
        let (mut poller, notifier) = poller(vec![response(
            json!([{"homework_name": "hw", "status": "archived"}]),
            1001,
        )]);

        assert_eq!(
            poller.run_cycle().await,
            CycleOutcome::Failed(CycleErrorKind::UnknownStatus)
        );
        assert_eq!(poller.cursor(), 1001);
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_unformattable_record_reported_once() {
        let record = json!({"homeworks": [{"homework_name": "hw", "status": "archived"}]});
        let notifier = RecordingNotifier::default();
        let mut poller = StatusPoller::with_cursor(
            ScriptedSource::new(vec![
                Ok(record.clone()),
                Ok(record.clone()),
                Ok(record),
            ]),
            notifier.clone(),
            ValidationPolicy::lenient(),
            Duration::from_secs(600),
            1000,
        );

        assert_eq!(
            poller.run_cycle().await,
            CycleOutcome::Failed(CycleErrorKind::UnknownStatus)
        );
        assert_eq!(poller.run_cycle().await, CycleOutcome::NoChange);
        assert_eq!(poller.run_cycle().await, CycleOutcome::NoChange);

        assert_eq!(poller.cursor(), 1000);
        assert_eq!(poller.last_seen().and_then(Homework::status), Some("archived"));
        assert_eq!(notifier.messages().len(), 1);
    }
}
