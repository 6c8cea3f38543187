use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::classify::ErrorReporter;
use crate::config::Config;
use crate::content::{HookRevalidator, LogRevalidator, Revalidator};
use crate::guard::{RateLimiter, RecaptchaVerifier, ScoreVerifier};
use crate::http::{HttpConfig, HttpError, build_client};
use crate::kv::{self, KvError, KvStore};
use crate::leads::LeadStore;
use crate::notify::{Mailer, Notifier, ResendMailer};
use crate::observability::Metrics;
use crate::tracking::ErrorTracker;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] KvError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// External collaborators of the handlers.
pub struct Services {
    pub store: Arc<dyn KvStore>,
    pub tracker: Arc<dyn ErrorTracker>,
    pub verifier: Arc<dyn ScoreVerifier>,
    pub mailer: Arc<dyn Mailer>,
    pub revalidator: Arc<dyn Revalidator>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KvStore>,
    pub tracker: Arc<dyn ErrorTracker>,
    pub limiter: RateLimiter,
    pub verifier: Arc<dyn ScoreVerifier>,
    pub leads: LeadStore,
    pub notifier: Notifier,
    pub revalidator: Arc<dyn Revalidator>,
    pub reporter: ErrorReporter,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, services: Services) -> Self {
        let Services {
            store,
            tracker,
            verifier,
            mailer,
            revalidator,
        } = services;

        Self {
            limiter: RateLimiter::new(store.clone(), tracker.clone(), config.rate_limit.clone()),
            leads: LeadStore::new(store.clone(), tracker.clone(), config.leads.clone()),
            notifier: Notifier::new(mailer, config.email.clone()),
            reporter: ErrorReporter::new(tracker.clone(), config.server.environment),
            config: Arc::new(config),
            store,
            tracker,
            verifier,
            revalidator,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Wires the production collaborators from configuration.
    pub fn from_config(config: Config, tracker: Arc<dyn ErrorTracker>) -> Result<Self, StartupError> {
        let client = build_client(&HttpConfig::with_timeout(config.server.http_timeout()))?;
        let store = kv::connect(&config.store)?;

        let verifier = Arc::new(RecaptchaVerifier::new(
            client.clone(),
            config.recaptcha.clone(),
            tracker.clone(),
        ));
        let mailer = Arc::new(ResendMailer::new(client.clone(), &config.email));
        let revalidator: Arc<dyn Revalidator> = match &config.webhook.hook_url {
            Some(url) => {
                info!(%url, "Forwarding revalidations to frontend hook");
                Arc::new(HookRevalidator::new(client, url.clone()))
            }
            None => Arc::new(LogRevalidator),
        };

        Ok(Self::new(
            config,
            Services {
                store,
                tracker,
                verifier,
                mailer,
                revalidator,
            },
        ))
    }
}
