//! Normalized authentication outcomes
//!
//! [`AuthOutcome`] is the only type that crosses the dispatcher boundary. No
//! strategy-specific result shape and no collaborator error detail escapes
//! through it.

use crate::UserRecord;

/// Why an authentication attempt failed.
///
/// `AuthenticationFailed` deliberately covers both "identifier unknown" and
/// "secret mismatch" so failure responses never reveal whether an identifier
/// exists (non-enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A required input field was missing or malformed
    InvalidInput,
    /// No strategy is registered under the requested name
    UnknownStrategy,
    /// The identity could not be verified
    AuthenticationFailed,
    /// A collaborator failed unexpectedly; no detail is carried
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::InvalidInput => "invalid input",
            FailureKind::UnknownStrategy => "unknown strategy",
            FailureKind::AuthenticationFailed => "authentication failed",
            FailureKind::Internal => "internal error",
        };
        f.write_str(label)
    }
}

/// Normalized result of one authentication attempt
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// Identity resolved; the record is held transiently by the caller
    Success(UserRecord),
    /// Attempt rejected for the given reason
    Failure(FailureKind),
}

impl AuthOutcome {
    /// Whether the attempt succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success(_))
    }

    /// The resolved user record, if any
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            AuthOutcome::Success(user) => Some(user),
            AuthOutcome::Failure(_) => None,
        }
    }

    /// The failure reason, if the attempt failed
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            AuthOutcome::Success(_) => None,
            AuthOutcome::Failure(kind) => Some(*kind),
        }
    }
}
