//! The scheduling engine: who should see which documents next.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SchedulerError;
use crate::ledger::{AssignmentRecord, Ledger};
use crate::model::{AnnotatorId, DocumentId, TaskView};

use super::pool::{labeling_pool, review_pool};
use super::sampler::{PoolSampler, UniformSampler};

/// Result type for scheduling calls.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Pool sizes available to one annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    /// The annotator the summary is for.
    pub annotator: AnnotatorId,
    /// Fresh documents they could be given for labeling.
    pub labeling: usize,
    /// Documents they could review, per reviewee.
    pub review: Vec<(AnnotatorId, usize)>,
}

/// Computes labeling and review assignments over a task and a ledger
/// snapshot.
///
/// The scheduler only reads its inputs. It guarantees exclusivity against
/// the snapshot it was given; callers sharing a live ledger must serialize
/// "schedule then record" themselves.
pub struct Scheduler<'a, T, L, S = UniformSampler> {
    task: &'a T,
    ledger: &'a L,
    sampler: S,
}

impl<'a, T: TaskView, L: Ledger> Scheduler<'a, T, L, UniformSampler> {
    /// Creates a scheduler with a non-deterministic uniform sampler.
    pub fn new(task: &'a T, ledger: &'a L) -> Self {
        Self {
            task,
            ledger,
            sampler: UniformSampler::new(),
        }
    }

    /// Creates a scheduler whose draws are reproducible for `seed`.
    pub fn seeded(task: &'a T, ledger: &'a L, seed: u64) -> Self {
        Self::new(task, ledger).with_sampler(UniformSampler::new().with_seed(seed))
    }
}

impl<'a, T: TaskView, L: Ledger, S: PoolSampler> Scheduler<'a, T, L, S> {
    /// Replaces the sampling strategy.
    pub fn with_sampler<S2: PoolSampler>(self, sampler: S2) -> Scheduler<'a, T, L, S2> {
        Scheduler {
            task: self.task,
            ledger: self.ledger,
            sampler,
        }
    }

    /// Picks documents for `reviewer` to audit out of `reviewee`'s completed
    /// work.
    ///
    /// Without `n` the whole eligible pool is returned.
    ///
    /// # Errors
    ///
    /// - `UnknownAnnotator` if either id is not on the task roster
    /// - `SelfReview` if both ids are the same annotator
    /// - `InsufficientPool` if `n` exceeds the eligible pool
    pub fn assign_review(
        &self,
        reviewer: &AnnotatorId,
        reviewee: &AnnotatorId,
        n: Option<usize>,
    ) -> Result<BTreeSet<DocumentId>> {
        self.ensure_annotator(reviewer)?;
        self.ensure_annotator(reviewee)?;
        if reviewer == reviewee {
            return Err(SchedulerError::SelfReview(reviewer.clone()));
        }

        let pool = review_pool(self.ledger, reviewer, reviewee);
        debug!(
            reviewer = %reviewer,
            reviewee = %reviewee,
            pool = pool.len(),
            "Computed review pool"
        );

        match n {
            None => Ok(pool),
            Some(n) => self.draw(pool, n),
        }
    }

    /// Picks `n` never-annotated documents the assignee has not been given.
    ///
    /// # Errors
    ///
    /// - `UnknownAnnotator` if the assignee is not on the task roster
    /// - `InsufficientPool` if fewer than `n` documents are eligible
    pub fn assign_labeling(&self, assignee: &AnnotatorId, n: usize) -> Result<BTreeSet<DocumentId>> {
        self.ensure_annotator(assignee)?;

        let pool = labeling_pool(self.task, self.ledger, assignee);
        debug!(assignee = %assignee, pool = pool.len(), "Computed labeling pool");

        self.draw(pool, n)
    }

    /// Like [`assign_review`](Self::assign_review), returned as ASSIGNED
    /// review intents ready to be recorded.
    pub fn plan_review(
        &self,
        reviewer: &AnnotatorId,
        reviewee: &AnnotatorId,
        n: Option<usize>,
    ) -> Result<Vec<AssignmentRecord>> {
        let documents = self.assign_review(reviewer, reviewee, n)?;
        Ok(documents
            .into_iter()
            .map(|doc| {
                AssignmentRecord::review(
                    self.task.task_id().clone(),
                    doc,
                    reviewer.clone(),
                    reviewee.clone(),
                )
            })
            .collect())
    }

    /// Like [`assign_labeling`](Self::assign_labeling), returned as ASSIGNED
    /// labeling intents ready to be recorded.
    pub fn plan_labeling(&self, assignee: &AnnotatorId, n: usize) -> Result<Vec<AssignmentRecord>> {
        let documents = self.assign_labeling(assignee, n)?;
        Ok(documents
            .into_iter()
            .map(|doc| AssignmentRecord::label(self.task.task_id().clone(), doc, assignee.clone()))
            .collect())
    }

    /// Reports how much work is currently available to `annotator`.
    pub fn pool_summary(&self, annotator: &AnnotatorId) -> Result<PoolSummary> {
        self.ensure_annotator(annotator)?;

        let review = self
            .task
            .annotators()
            .iter()
            .filter(|a| &a.id != annotator)
            .map(|a| (a.id.clone(), review_pool(self.ledger, annotator, &a.id).len()))
            .collect();

        Ok(PoolSummary {
            annotator: annotator.clone(),
            labeling: labeling_pool(self.task, self.ledger, annotator).len(),
            review,
        })
    }

    fn ensure_annotator(&self, id: &AnnotatorId) -> Result<()> {
        if self.task.has_annotator(id) {
            Ok(())
        } else {
            Err(SchedulerError::UnknownAnnotator(id.clone()))
        }
    }

    fn draw(&self, pool: BTreeSet<DocumentId>, n: usize) -> Result<BTreeSet<DocumentId>> {
        if n > pool.len() {
            warn!(requested = n, available = pool.len(), "Not enough eligible documents");
            return Err(SchedulerError::InsufficientPool {
                requested: n,
                available: pool.len(),
            });
        }
        Ok(self.sampler.sample(&pool, n).into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::ledger::{AssignmentStatus, LedgerSnapshot};
    use crate::model::{Annotation, Annotator, Document, Task};

    fn ids(docs: &[&str]) -> BTreeSet<DocumentId> {
        docs.iter().map(|d| DocumentId::from(*d)).collect()
    }

    fn aid(id: &str) -> AnnotatorId {
        AnnotatorId::from(id)
    }

    fn create_test_task(annotated: &[&str]) -> Task {
        Task::new("t1", "demo")
            .with_annotators(vec![
                Annotator::new("A1", "One"),
                Annotator::new("A3", "Three"),
                Annotator::new("B", "Reviewee"),
                Annotator::new("R", "Reviewer"),
            ])
            .with_documents(
                ["D1", "D2", "D3", "D4", "D5"]
                    .iter()
                    .map(|id| Document::new(*id, ""))
                    .collect(),
            )
            .with_annotations(
                annotated
                    .iter()
                    .enumerate()
                    .map(|(i, doc)| {
                        Annotation::new(format!("n{}", i), *doc, "A1", serde_json::Value::Null)
                    })
                    .collect(),
            )
    }

    fn create_review_ledger() -> LedgerSnapshot {
        vec![
            AssignmentRecord::label("t1", "D1", "B").complete(),
            AssignmentRecord::label("t1", "D2", "B").complete(),
            AssignmentRecord::label("t1", "D3", "B").complete(),
            AssignmentRecord::label("t1", "D2", "R"),
        ]
        .into_iter()
        .collect()
    }

    /// Ledger double that counts how often it is scanned.
    struct CountingLedger {
        inner: LedgerSnapshot,
        scans: Cell<usize>,
    }

    impl Ledger for CountingLedger {
        fn records(&self) -> &[AssignmentRecord] {
            self.scans.set(self.scans.get() + 1);
            self.inner.records()
        }
    }

    /// Sampler that always takes the smallest ids.
    struct FirstN;

    impl PoolSampler for FirstN {
        fn sample(&self, pool: &BTreeSet<DocumentId>, n: usize) -> Vec<DocumentId> {
            pool.iter().take(n).cloned().collect()
        }
    }

    #[test]
    fn test_labeling_draws_only_fresh_untouched_documents() {
        let task = create_test_task(&["D1", "D2"]);
        let ledger: LedgerSnapshot = vec![AssignmentRecord::label("t1", "D3", "A3")]
            .into_iter()
            .collect();
        let scheduler = Scheduler::new(&task, &ledger);

        let docs = scheduler
            .assign_labeling(&aid("A3"), 2)
            .expect("two fresh documents are available");
        assert_eq!(docs, ids(&["D4", "D5"]));
    }

    #[test]
    fn test_labeling_rejects_oversized_request() {
        let task = create_test_task(&["D1", "D2"]);
        let ledger: LedgerSnapshot = vec![AssignmentRecord::label("t1", "D3", "A3")]
            .into_iter()
            .collect();
        let scheduler = Scheduler::new(&task, &ledger);

        let err = scheduler
            .assign_labeling(&aid("A3"), 3)
            .expect_err("only two documents are eligible");
        assert_eq!(
            err,
            SchedulerError::InsufficientPool {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_review_without_n_returns_whole_pool() {
        let task = create_test_task(&[]);
        let ledger = create_review_ledger();
        let scheduler = Scheduler::new(&task, &ledger);

        let docs = scheduler
            .assign_review(&aid("R"), &aid("B"), None)
            .expect("review pool is available");
        assert_eq!(docs, ids(&["D1", "D3"]));
    }

    #[test]
    fn test_review_rejects_oversized_request() {
        let task = create_test_task(&[]);
        let ledger = create_review_ledger();
        let scheduler = Scheduler::new(&task, &ledger);

        let err = scheduler
            .assign_review(&aid("R"), &aid("B"), Some(3))
            .expect_err("only two reviews are eligible");
        assert_eq!(
            err,
            SchedulerError::InsufficientPool {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_review_sample_is_subset_of_pool() {
        let task = create_test_task(&[]);
        let ledger = create_review_ledger();
        let scheduler = Scheduler::seeded(&task, &ledger, 11);

        let docs = scheduler
            .assign_review(&aid("R"), &aid("B"), Some(1))
            .expect("one review is available");
        assert_eq!(docs.len(), 1);
        assert!(docs.is_subset(&ids(&["D1", "D3"])));
    }

    #[test]
    fn test_unknown_annotator_is_rejected_before_ledger_scan() {
        let task = create_test_task(&[]);
        let ledger = CountingLedger {
            inner: create_review_ledger(),
            scans: Cell::new(0),
        };
        let scheduler = Scheduler::new(&task, &ledger);

        let err = scheduler
            .assign_labeling(&aid("ghost"), 1)
            .expect_err("ghost is not on the roster");
        assert_eq!(err, SchedulerError::UnknownAnnotator(aid("ghost")));

        let err = scheduler
            .assign_review(&aid("R"), &aid("ghost"), None)
            .expect_err("ghost is not on the roster");
        assert_eq!(err, SchedulerError::UnknownAnnotator(aid("ghost")));

        assert_eq!(ledger.scans.get(), 0, "no ledger scan may happen");
    }

    #[test]
    fn test_self_review_is_rejected_before_ledger_scan() {
        let task = create_test_task(&[]);
        let ledger = CountingLedger {
            inner: create_review_ledger(),
            scans: Cell::new(0),
        };
        let scheduler = Scheduler::new(&task, &ledger);

        let err = scheduler
            .assign_review(&aid("B"), &aid("B"), None)
            .expect_err("self review is not allowed");
        assert_eq!(err, SchedulerError::SelfReview(aid("B")));
        assert_eq!(ledger.scans.get(), 0);
    }

    #[test]
    fn test_seeded_scheduler_is_deterministic() {
        let task = create_test_task(&[]);
        let ledger = LedgerSnapshot::default();

        let first = Scheduler::seeded(&task, &ledger, 99)
            .assign_labeling(&aid("A1"), 3)
            .expect("five documents are fresh");
        let second = Scheduler::seeded(&task, &ledger, 99)
            .assign_labeling(&aid("A1"), 3)
            .expect("five documents are fresh");
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_sampler_is_used() {
        let task = create_test_task(&["D1"]);
        let ledger = LedgerSnapshot::default();
        let scheduler = Scheduler::new(&task, &ledger).with_sampler(FirstN);

        let docs = scheduler
            .assign_labeling(&aid("A3"), 2)
            .expect("four documents are fresh");
        assert_eq!(docs, ids(&["D2", "D3"]));
    }

    #[test]
    fn test_plan_labeling_produces_assigned_intents() {
        let task = create_test_task(&["D1", "D2", "D3"]);
        let ledger = LedgerSnapshot::default();
        let scheduler = Scheduler::seeded(&task, &ledger, 5);

        let intents = scheduler
            .plan_labeling(&aid("A3"), 2)
            .expect("two documents are fresh");
        assert_eq!(intents.len(), 2);
        for intent in &intents {
            assert_eq!(intent.status, AssignmentStatus::Assigned);
            assert_eq!(intent.annotator_id, aid("A3"));
            assert_eq!(intent.task_id, task.id);
            assert!(intent.reviewee_id.is_none());
        }
    }

    #[test]
    fn test_plan_review_sets_reviewee() {
        let task = create_test_task(&[]);
        let ledger = create_review_ledger();
        let scheduler = Scheduler::new(&task, &ledger);

        let intents = scheduler
            .plan_review(&aid("R"), &aid("B"), None)
            .expect("review pool is available");
        let docs: BTreeSet<_> = intents.iter().map(|r| r.document_id.clone()).collect();
        assert_eq!(docs, ids(&["D1", "D3"]));
        assert!(intents.iter().all(|r| r.reviewee_id == Some(aid("B"))));
    }

    #[test]
    fn test_recording_plan_shrinks_next_pool() {
        let task = create_test_task(&[]);
        let mut ledger = LedgerSnapshot::default();

        let intents = Scheduler::seeded(&task, &ledger, 3)
            .plan_labeling(&aid("A1"), 3)
            .expect("five documents are fresh");
        ledger.append(intents);

        let err = Scheduler::seeded(&task, &ledger, 3)
            .assign_labeling(&aid("A1"), 3)
            .expect_err("only two documents remain for A1");
        assert!(err.is_insufficient_pool());
    }

    #[test]
    fn test_pool_summary() {
        let task = create_test_task(&["D1"]);
        let ledger = create_review_ledger();
        let scheduler = Scheduler::new(&task, &ledger);

        let summary = scheduler.pool_summary(&aid("R")).expect("R is on the roster");
        assert_eq!(summary.labeling, 3);
        assert!(summary.review.contains(&(aid("B"), 2)));
        assert!(summary.review.contains(&(aid("A1"), 0)));
        assert!(summary.review.iter().all(|(id, _)| id != &aid("R")));
    }
}
