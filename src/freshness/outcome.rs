//! Conditional request outcomes and the halt signal

use crate::error::Error;
use hyper::StatusCode;
use thiserror::Error as ThisError;

/// Result of evaluating the preconditions of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalOutcome {
    /// Preconditions passed (or none were sent)
    Continue,
    /// 304: the client's copy is current
    NotModified,
    /// 412: a client-asserted precondition is false
    PreconditionFailed,
}

impl ConditionalOutcome {
    /// Outcome of an evaluator call
    ///
    /// `None` for a rejected evaluation, which is a server error rather than
    /// a precondition result.
    pub fn from_result<T>(result: &Result<T, Halt>) -> Option<Self> {
        match result {
            Ok(_) => Some(Self::Continue),
            Err(Halt::NotModified) => Some(Self::NotModified),
            Err(Halt::PreconditionFailed) => Some(Self::PreconditionFailed),
            Err(Halt::Rejected(_)) => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::NotModified => "not_modified",
            Self::PreconditionFailed => "precondition_failed",
        }
    }
}

/// Stop handling the request and answer immediately
///
/// Returned as the `Err` side of evaluator calls so `?` unwinds the handler
/// before anything else is written.
#[derive(Debug, ThisError)]
pub enum Halt {
    #[error("not modified")]
    NotModified,
    #[error("precondition failed")]
    PreconditionFailed,
    /// The evaluator was called with something it cannot use
    #[error(transparent)]
    Rejected(#[from] Error),
}

impl Halt {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotModified => StatusCode::NOT_MODIFIED,
            Self::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            Self::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        let ok: Result<(), Halt> = Ok(());
        assert_eq!(
            ConditionalOutcome::from_result(&ok),
            Some(ConditionalOutcome::Continue)
        );
        let halted: Result<(), Halt> = Err(Halt::NotModified);
        assert_eq!(
            ConditionalOutcome::from_result(&halted),
            Some(ConditionalOutcome::NotModified)
        );
        let failed: Result<(), Halt> = Err(Halt::PreconditionFailed);
        assert_eq!(
            ConditionalOutcome::from_result(&failed),
            Some(ConditionalOutcome::PreconditionFailed)
        );
    }

    #[test]
    fn test_rejected_has_no_outcome() {
        let rejected: Result<(), Halt> = Err(Halt::from(Error::InvalidEtagKind("medium".into())));
        assert_eq!(ConditionalOutcome::from_result(&rejected), None);
    }

    #[test]
    fn test_halt_status() {
        assert_eq!(Halt::NotModified.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(Halt::PreconditionFailed.status(), StatusCode::PRECONDITION_FAILED);
        let halt = Halt::from(Error::InvalidEtagKind("medium".into()));
        assert_eq!(halt.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
