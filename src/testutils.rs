//! Test doubles for the external seams: error tracker, key-value store,
//! mailer and bot-score verifier. Used by unit tests and by the integration
//! tests under `tests/`.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::guard::ScoreVerifier;
use crate::kv::{self, KvError, KvStore};
use crate::notify::{MailError, Mailer, MessageId, OutgoingEmail};
use crate::tracking::{ErrorTracker, TrackedEvent};

/// Keeps every captured event in memory.
#[derive(Debug, Default)]
pub struct RecordingTracker {
    events: Mutex<Vec<TrackedEvent>>,
}

impl RecordingTracker {
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ErrorTracker for RecordingTracker {
    fn capture(&self, event: TrackedEvent) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}

/// A store whose every command fails, as if the server were unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl FailingStore {
    fn down<T>() -> kv::Result<T> {
        Err(KvError::Connection("connection refused".to_string()))
    }
}

#[async_trait]
impl KvStore for FailingStore {
    async fn incr(&self, _key: &str) -> kv::Result<i64> {
        Self::down()
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> kv::Result<()> {
        Self::down()
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> kv::Result<()> {
        Self::down()
    }

    async fn lpush(&self, _key: &str, _value: &str) -> kv::Result<()> {
        Self::down()
    }

    async fn ltrim(&self, _key: &str, _len: usize) -> kv::Result<()> {
        Self::down()
    }

    async fn ping(&self) -> kv::Result<()> {
        Self::down()
    }
}

/// Records outgoing emails instead of sending them. Messages addressed to
/// a recipient in `fail_for` (or every message, with [`RecordingMailer::failing`])
/// are rejected.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    attempts: Mutex<Vec<OutgoingEmail>>,
    fail_for: Vec<String>,
    fail_all: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_for(recipient: impl Into<String>) -> Self {
        Self {
            fail_for: vec![recipient.into()],
            ..Self::default()
        }
    }

    /// Messages the fake provider accepted.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Every message handed to the mailer, accepted or not.
    pub fn attempts(&self) -> Vec<OutgoingEmail> {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<MessageId, MailError> {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        attempts.push(email.clone());

        if self.fail_all || self.fail_for.contains(&email.to) {
            return Err(MailError::Rejected {
                status: 500,
                body: "provider unavailable".to_string(),
            });
        }

        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        sent.push(email.clone());
        Ok(format!("msg_{}", attempts.len()))
    }
}

/// Verifier with a fixed verdict that remembers the actions it was asked about.
#[derive(Debug)]
pub struct StaticVerifier {
    verdict: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticVerifier {
    pub fn accepting() -> Self {
        Self {
            verdict: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            verdict: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(token, expected_action)` pairs seen so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ScoreVerifier for StaticVerifier {
    async fn verify(&self, token: &str, expected_action: &str) -> bool {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((token.to_string(), expected_action.to_string()));
        self.verdict
    }
}
