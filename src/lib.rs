pub mod api;
pub mod config;
pub mod content;
pub mod forms;
pub mod guard;
pub mod http;
pub mod kv;
pub mod leads;
pub mod locale;
pub mod notify;
pub mod observability;
pub mod sanitize;
pub mod testutils; // Expose for integration tests (RecordingMailer, FailingStore)
pub mod tracking;
