/// A rendered email ready for a [`Mailer`](crate::Mailer).
///
/// Sent as `multipart/alternative` with `text` as the plain part and `html`
/// as the rich part. At least one of `to` or `bcc` must be non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingEmail {
    /// Number of envelope recipients.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.bcc.len()
    }
}
