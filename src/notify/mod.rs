//! Lead notification emails.
//!
//! The operator notification is the one required side effect of a
//! submission: its failure fails the request. The customer confirmation is
//! best-effort and its failure is left to the caller to log.

mod document;
mod mailer;
mod templates;

pub use document::{Block, Document};
pub use mailer::{MailError, Mailer, MessageId, OutgoingEmail, ResendMailer};
pub use templates::{Audience, render};

use std::sync::Arc;
use tracing::info;

use crate::config::EmailConfig;
use crate::forms::Submission;

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    config: EmailConfig,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, config: EmailConfig) -> Self {
        Self { mailer, config }
    }

    /// Builds the email for the sales team, in the operator locale, with
    /// the submitter as reply-to.
    pub fn operator_email(&self, submission: &Submission, reference: &str) -> OutgoingEmail {
        let doc = render(self.config.operator_locale, Audience::Operator, submission, reference);
        OutgoingEmail::builder()
            .from(self.config.from.as_str())
            .to(self.config.operator_address.as_str())
            .subject(doc.subject.as_str())
            .html(doc.to_html())
            .text(doc.to_text())
            .reply_to(submission.email())
            .build()
    }

    /// Builds the receipt sent to the submitter in their own locale.
    pub fn confirmation_email(&self, submission: &Submission, reference: &str) -> OutgoingEmail {
        let doc = render(submission.locale(), Audience::Customer, submission, reference);
        OutgoingEmail::builder()
            .from(self.config.from.as_str())
            .to(submission.email())
            .subject(doc.subject.as_str())
            .html(doc.to_html())
            .text(doc.to_text())
            .reply_to(self.config.operator_address.as_str())
            .build()
    }

    pub async fn send_operator_notification(
        &self,
        submission: &Submission,
        reference: &str,
    ) -> Result<MessageId, MailError> {
        let id = self.mailer.send(&self.operator_email(submission, reference)).await?;
        info!(lead_id = reference, message_id = %id, "Operator notified");
        Ok(id)
    }

    pub async fn send_confirmation(&self, submission: &Submission, reference: &str) -> Result<MessageId, MailError> {
        let id = self.mailer.send(&self.confirmation_email(submission, reference)).await?;
        info!(lead_id = reference, message_id = %id, "Confirmation sent");
        Ok(id)
    }
}
