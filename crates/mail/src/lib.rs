//! Outbound email for the newsletter.
//!
//! [`EmailConfig::from_env`] returns `None` when `SMTP_HOST` is unset; callers
//! then run without a [`Mailer`] and skip sending. Message bodies are rendered
//! from the bundled tera templates by [`EmailTemplates`].

pub mod config;
pub mod error;
pub mod message;
pub mod templates;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod transport;

pub use config::EmailConfig;
pub use error::EmailError;
pub use message::OutgoingEmail;
pub use templates::{ArticleDigest, EmailTemplates};
pub use transport::{Mailer, SmtpMailer};
