//! Assignment and review scheduling.
//!
//! Given a task and a snapshot of its assignment ledger, the scheduler
//! decides which documents an annotator should label next, or which of
//! another annotator's completed documents a reviewer should audit.
//!
//! - **pool**: eligibility as set algebra over the task and the ledger
//! - **sampler**: random, non-overlapping draws out of a pool
//! - **Scheduler**: identity checks, pool computation, size checks, sampling
//!
//! # Example
//!
//! ```rust,ignore
//! use labelforge::ledger::LedgerSnapshot;
//! use labelforge::model::AnnotatorId;
//! use labelforge::scheduler::Scheduler;
//!
//! let scheduler = Scheduler::seeded(&task, &ledger, 42);
//! let fresh = scheduler.assign_labeling(&AnnotatorId::from("ann-1"), 10)?;
//! let audit = scheduler.assign_review(
//!     &AnnotatorId::from("ann-2"),
//!     &AnnotatorId::from("ann-1"),
//!     Some(5),
//! )?;
//! ```

pub mod engine;
pub mod pool;
pub mod sampler;

pub use engine::{PoolSummary, Scheduler};
pub use sampler::{PoolSampler, UniformSampler};
