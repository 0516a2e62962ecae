//! The assignment ledger: append-only history of allocated work.
//!
//! The scheduler reads a [`LedgerSnapshot`] through the [`Ledger`] trait and
//! never writes to it. New assignments are produced as
//! [`AssignmentRecord`] intents that the caller records.

pub mod record;
pub mod snapshot;

pub use record::{AssignmentRecord, AssignmentStatus, AssignmentType};
pub use snapshot::{Ledger, LedgerSnapshot};
