//! Outcomes of the email confirmation flows.

/// Result of presenting a confirmation token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    AlreadyConfirmed,
}

impl ConfirmationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmationOutcome::Confirmed => "Email confirmed",
            ConfirmationOutcome::AlreadyConfirmed => "Your email is already confirmed",
        }
    }
}

/// Result of asking for a new confirmation mail
///
/// Unknown addresses and fresh dispatches read the same, so the answer
/// never reveals whether an account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailRequestOutcome {
    AlreadyConfirmed,
    CheckInbox,
}

impl EmailRequestOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            EmailRequestOutcome::AlreadyConfirmed => "Your email is already confirmed",
            EmailRequestOutcome::CheckInbox => "Check your email for confirmation.",
        }
    }
}
