//! Example status to Sensu check state mapping

use std::str::FromStr;

use crate::error::Error;
use crate::event::EventState;

/// Check status code for a passing check
pub const STATUS_OK: u32 = 0;
/// Check status code for a failed example
pub const STATUS_WARNING: u32 = 1;
/// Check status code for an example that neither passed nor failed
pub const STATUS_CRITICAL: u32 = 2;

/// Outcomes the RSpec JSON formatter reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Unknown,
    Pending,
}

impl FromStr for TestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(TestStatus::Passed),
            "failed" => Ok(TestStatus::Failed),
            "unknown" => Ok(TestStatus::Unknown),
            "pending" => Ok(TestStatus::Pending),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

impl TestStatus {
    /// Sensu state and status code for this outcome.
    ///
    /// Unknown and pending results are not confirmations, so they fail with a
    /// severity distinct from an outright failure.
    pub fn to_check_state(self) -> (EventState, u32) {
        match self {
            TestStatus::Passed => (EventState::Passing, STATUS_OK),
            TestStatus::Failed => (EventState::Failing, STATUS_WARNING),
            TestStatus::Unknown | TestStatus::Pending => (EventState::Failing, STATUS_CRITICAL),
        }
    }
}

/// Map a raw example status straight to a Sensu state and status code
pub fn map_status(status: &str) -> Result<(EventState, u32), Error> {
    status.parse::<TestStatus>().map(TestStatus::to_check_state)
}
