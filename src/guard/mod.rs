//! Abuse mitigation for the public submission endpoints.
//!
//! Two independent checks, composed by the request handlers:
//!
//! - [`RateLimiter`]: per endpoint and client address, counted in the shared
//!   store. Fails open when the store is down.
//! - [`ScoreVerifier`]: bot-score verification of a client token. Fails
//!   closed when the scoring service is unreachable.
//!
//! The two failure policies are kept in separate code paths on purpose.

mod rate_limit;
mod recaptcha;

pub use rate_limit::{RateLimiter, client_ip};
pub use recaptcha::{RecaptchaVerifier, ScoreVerifier, VerifyResponse, accept};
