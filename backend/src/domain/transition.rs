//! Status transition policy.
//!
//! The permissive policy lets staff set any of the three states. The
//! forward-only policy enforces `Pending -> Under Process -> Resolved`,
//! allowing a state to be re-set to itself.

use super::{ComplaintStatus, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    ForwardOnly,
}

impl TransitionPolicy {
    /// Select a policy from the `strict_transitions` setting.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::ForwardOnly
        } else {
            Self::Permissive
        }
    }

    /// Check whether `from -> to` is allowed.
    ///
    /// # Examples
    /// ```
    /// use grievance::domain::{ComplaintStatus, TransitionPolicy};
    ///
    /// let policy = TransitionPolicy::ForwardOnly;
    /// assert!(policy.check(ComplaintStatus::Pending, ComplaintStatus::UnderProcess).is_ok());
    /// assert!(policy.check(ComplaintStatus::Resolved, ComplaintStatus::Pending).is_err());
    /// ```
    pub fn check(self, from: ComplaintStatus, to: ComplaintStatus) -> Result<(), Error> {
        match self {
            Self::Permissive => Ok(()),
            Self::ForwardOnly if rank(to) >= rank(from) => Ok(()),
            Self::ForwardOnly => Err(Error::invalid_request("InvalidTransition").with_details(
                serde_json::json!({ "from": from.as_str(), "to": to.as_str() }),
            )),
        }
    }
}

fn rank(status: ComplaintStatus) -> u8 {
    match status {
        ComplaintStatus::Pending => 0,
        ComplaintStatus::UnderProcess => 1,
        ComplaintStatus::Resolved => 2,
    }
}
