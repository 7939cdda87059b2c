//! Request orchestration
//!
//! The copy and clear orchestrators fold per-cookie outcomes into a
//! summary instead of aborting on the first failure; login automation and
//! the auto-copy retry wrapper chain a session bootstrap into a copy.

use serde::Serialize;

pub mod autocopy;
pub mod clear;
pub mod copy;
pub mod login;

pub use autocopy::copy_with_retry;
pub use clear::{clear_cookies, ClearSummary};
pub use copy::{copy_cookies, CopySummary};
pub use login::{automate_login, CdpTabDriver, LoginOutcome, TabDriver};

/// One failed cookie within an otherwise processed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    pub name: String,
    pub message: String,
}
