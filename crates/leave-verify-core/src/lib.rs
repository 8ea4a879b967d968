//! `leave-verify-core` — scripted end-to-end verification of a
//! leave-management backend over its HTTP contract.
//!
//! A run walks four stages in order:
//!
//! ```text
//! session    log every actor in, keep one Session per actor
//!    │
//! driver     submit leave requests as employees
//!    │
//! reconcile  find those requests in the reviewer's pending list
//!    │
//! assertion  approve / reject, re-read status, run business-rule edge cases
//! ```
//!
//! [`run::run`] drives the stages and returns a [`report::Report`].

pub mod assertion;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod run;
pub mod session;
pub mod types;

pub use error::{Result, VerifyError};
