//! Newsletter subscription rules.
//!
//! A subscription moves between three states: absent, active and inactive.
//! Subscribing creates or reactivates it; subscribing while active is a no-op.

use serde::Serialize;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Whether `email` is a well-formed address.
pub fn is_valid_email(email: &str) -> bool {
    email.to_string().validate_email()
}

/// Trim and check a submitted email address.
pub fn normalize_email(raw: &str) -> Result<String, CoreError> {
    let email = raw.trim();
    if !is_valid_email(email) {
        return Err(CoreError::Validation(
            "Please enter a valid email address".into(),
        ));
    }
    Ok(email.to_string())
}

/// What a subscribe request must do, given the existing record (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeAction {
    /// No record for this email: create an active one and welcome the subscriber.
    Create,
    /// Record exists and is active: nothing to do.
    AlreadyActive,
    /// Record exists but was deactivated: switch it back on.
    Reactivate,
}

/// Decide the subscribe action from the current `is_active` flag of the
/// stored subscription, `None` when no subscription exists.
pub fn subscribe_action(existing: Option<bool>) -> SubscribeAction {
    match existing {
        None => SubscribeAction::Create,
        Some(true) => SubscribeAction::AlreadyActive,
        Some(false) => SubscribeAction::Reactivate,
    }
}

/// Result reported back to the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
    Reactivated,
}

impl SubscribeOutcome {
    pub fn message(self) -> &'static str {
        match self {
            SubscribeOutcome::Subscribed => "Thank you for subscribing to the newsletter!",
            SubscribeOutcome::AlreadySubscribed => "This email address is already subscribed.",
            SubscribeOutcome::Reactivated => "Your subscription has been reactivated.",
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_email("  reader@example.com \n").unwrap(), "reader@example.com");
    }

    #[test]
    fn normalize_rejects_blank() {
        assert_matches!(normalize_email("   "), Err(CoreError::Validation(_)));
        assert_matches!(normalize_email(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn normalize_rejects_malformed_addresses() {
        for raw in ["pas une adresse", "lecteur@", "@nimba24.test", "a b@nimba24.test"] {
            assert_matches!(normalize_email(raw), Err(CoreError::Validation(_)), "{raw}");
        }
        assert!(is_valid_email("lecteur@nimba24.test"));
    }

    #[test]
    fn action_follows_state_machine() {
        assert_eq!(subscribe_action(None), SubscribeAction::Create);
        assert_eq!(subscribe_action(Some(true)), SubscribeAction::AlreadyActive);
        assert_eq!(subscribe_action(Some(false)), SubscribeAction::Reactivate);
    }

    #[test]
    fn outcome_serializes_as_snake_case() {
        let json = serde_json::to_value(SubscribeOutcome::AlreadySubscribed).unwrap();
        assert_eq!(json, "already_subscribed");
    }
}
