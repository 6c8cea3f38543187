pub mod classify;
pub mod error;
pub mod models;
mod server;
pub mod services;
pub mod state;
pub(crate) mod utils;
pub mod webhook;

pub use classify::{ErrorEnvelope, ErrorKind, ErrorReporter, classify};
pub use error::ApiError;
pub use server::{router, run};
pub use state::{AppState, Services, StartupError};
