//! Mail delivery.
//!
//! [`Mailer`] is the seam the newsletter service talks to. [`SmtpMailer`]
//! wraps the `lettre` async SMTP transport, built once at startup.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;
use crate::error::EmailError;
use crate::message::OutgoingEmail;

/// Something that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// SMTP mailer using a STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from configuration.
    ///
    /// Fails if the relay host is invalid or the sender address does not parse.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

/// Assemble the MIME message. Bcc recipients go into the envelope only.
///
/// A Bcc address that does not parse is logged and left out so the rest of
/// the list still receives the message.
fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, EmailError> {
    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject.as_str());
    for to in &email.to {
        builder = builder.to(to.parse()?);
    }
    for bcc in &email.bcc {
        match bcc.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.bcc(mailbox),
            Err(e) => tracing::warn!(error = %e, "Skipping unparsable Bcc address"),
        }
    }
    builder
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| EmailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = build_message(&self.from, email)?;
        self.transport.send(message).await?;

        tracing::info!(
            recipients = email.recipient_count(),
            subject = %email.subject,
            "Email sent",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn email(to: Vec<&str>, bcc: Vec<&str>) -> OutgoingEmail {
        OutgoingEmail {
            to: to.into_iter().map(String::from).collect(),
            bcc: bcc.into_iter().map(String::from).collect(),
            subject: "Sujet".into(),
            html: "<p>Bonjour</p>".into(),
            text: "Bonjour".into(),
        }
    }

    fn from() -> Mailbox {
        "noreply@nimba24.local".parse().unwrap()
    }

    #[test]
    fn bcc_recipients_are_in_envelope_not_headers() {
        let message = build_message(&from(), &email(vec![], vec!["a@x.org", "b@x.org"])).unwrap();
        assert_eq!(message.envelope().to().len(), 2);
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(!formatted.contains("a@x.org"));
        assert!(formatted.contains("multipart/alternative"));
    }

    #[test]
    fn invalid_recipient_is_an_address_error() {
        let err = build_message(&from(), &email(vec!["not-an-email"], vec![])).unwrap_err();
        assert_matches!(err, EmailError::Address(_));
    }

    #[test]
    fn unparsable_bcc_is_skipped() {
        let message = build_message(
            &from(),
            &email(vec![], vec!["a@x.org", "b@x.org", "pas une adresse"]),
        )
        .unwrap();
        let envelope: Vec<_> = message.envelope().to().iter().map(|a| a.to_string()).collect();
        assert_eq!(envelope, vec!["a@x.org", "b@x.org"]);
    }

    #[test]
    fn no_recipient_fails_to_build() {
        let err = build_message(&from(), &email(vec![], vec![])).unwrap_err();
        assert_matches!(err, EmailError::Build(_));
    }
}
