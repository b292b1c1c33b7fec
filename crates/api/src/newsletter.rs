//! Newsletter service: subscriptions and outbound mail.
//!
//! Mail is best effort. Without a configured [`Mailer`] or on any rendering
//! or transport failure the error is logged and the caller carries on; the
//! subscription or article write that triggered the mail is never undone.

use std::sync::Arc;

use nimba_core::newsletter::{
    is_valid_email, normalize_email, subscribe_action, SubscribeAction, SubscribeOutcome,
};
use nimba_db::repositories::SubscriptionRepo;
use nimba_mail::{ArticleDigest, EmailError, EmailTemplates, Mailer};

use crate::error::AppResult;

pub struct Newsletter {
    subscriptions: Arc<dyn SubscriptionRepo>,
    mailer: Option<Arc<dyn Mailer>>,
    templates: EmailTemplates,
    site_url: String,
}

impl Newsletter {
    /// Fails only if the bundled templates do not compile.
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepo>,
        mailer: Option<Arc<dyn Mailer>>,
        site_url: impl Into<String>,
    ) -> Result<Self, EmailError> {
        Ok(Self {
            subscriptions,
            mailer,
            templates: EmailTemplates::new()?,
            site_url: site_url.into(),
        })
    }

    /// Subscribe `raw_email`, creating or reactivating its record.
    ///
    /// Only a brand-new subscriber is sent the welcome email.
    pub async fn subscribe(&self, raw_email: &str) -> AppResult<SubscribeOutcome> {
        let email = normalize_email(raw_email)?;
        let existing = self.subscriptions.find_by_email(&email).await?;

        let outcome = match (subscribe_action(existing.as_ref().map(|s| s.is_active)), existing) {
            (SubscribeAction::Create, _) => {
                let subscription = self.subscriptions.create(&email).await?;
                tracing::info!(subscription_id = subscription.id, "Newsletter subscription created");
                self.send_welcome(&email).await;
                SubscribeOutcome::Subscribed
            }
            (SubscribeAction::Reactivate, Some(subscription)) => {
                self.subscriptions.set_active(subscription.id, true).await?;
                tracing::info!(subscription_id = subscription.id, "Newsletter subscription reactivated");
                SubscribeOutcome::Reactivated
            }
            _ => SubscribeOutcome::AlreadySubscribed,
        };
        Ok(outcome)
    }

    /// Deactivate the subscription for `raw_email`.
    ///
    /// Returns `false` if there is no active subscription for it. The
    /// address is only trimmed, so malformed records can still be removed.
    pub async fn unsubscribe(&self, raw_email: &str) -> AppResult<bool> {
        let email = raw_email.trim();
        let Some(subscription) = self.subscriptions.find_by_email(email).await? else {
            return Ok(false);
        };
        if !subscription.is_active {
            return Ok(false);
        }
        self.subscriptions.set_active(subscription.id, false).await?;
        tracing::info!(subscription_id = subscription.id, "Newsletter subscription deactivated");
        Ok(true)
    }

    /// Tell every active subscriber about a newly published article.
    ///
    /// Sends a single message with all subscribers in Bcc and returns how
    /// many were addressed, or 0 when nothing was sent. Malformed stored
    /// addresses are skipped.
    pub async fn notify_new_article(&self, article: &ArticleDigest) -> usize {
        let recipients = match self.subscriptions.list_active_emails().await {
            Ok(emails) => {
                let (valid, malformed): (Vec<_>, Vec<_>) =
                    emails.into_iter().partition(|e| is_valid_email(e));
                if !malformed.is_empty() {
                    tracing::warn!(
                        article_id = article.id,
                        skipped = malformed.len(),
                        "Skipping malformed subscriber addresses",
                    );
                }
                valid
            }
            Err(e) => {
                tracing::error!(error = %e, article_id = article.id, "Failed to load newsletter subscribers");
                return 0;
            }
        };
        if recipients.is_empty() {
            tracing::info!(article_id = article.id, "No active newsletter subscribers");
            return 0;
        }

        let count = recipients.len();
        let result = match self.templates.new_article(article, &self.site_url, recipients) {
            Ok(email) => self.deliver(&email).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                tracing::info!(article_id = article.id, recipients = count, "Newsletter sent");
                count
            }
            Err(e) => {
                tracing::error!(error = %e, article_id = article.id, "Failed to send newsletter");
                0
            }
        }
    }

    /// Send the welcome email. Returns whether it was sent.
    pub async fn send_welcome(&self, email: &str) -> bool {
        let result = match self.templates.welcome(email, &self.site_url) {
            Ok(message) => self.deliver(&message).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send newsletter welcome email");
                false
            }
        }
    }

    async fn deliver(&self, email: &nimba_mail::OutgoingEmail) -> Result<(), EmailError> {
        match &self.mailer {
            Some(mailer) => mailer.send(email).await,
            None => Err(EmailError::NotConfigured),
        }
    }
}
