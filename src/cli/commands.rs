//! CLI command definitions for labelforge.
//!
//! Each command loads a task and ledger snapshot, runs one scheduling
//! decision and prints the result. Nothing is written back unless
//! `--record` is given.

use std::collections::BTreeSet;

use clap::{Args, Parser};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::ledger::{AssignmentRecord, LedgerSnapshot};
use crate::model::{AnnotatorId, DocumentId, Task};
use crate::scheduler::Scheduler;
use crate::storage::{FileTaskSource, TaskSource};

/// Default task snapshot file.
const DEFAULT_TASK_FILE: &str = "task.json";

/// Default ledger snapshot file.
const DEFAULT_LEDGER_FILE: &str = "ledger.json";

/// Assignment and review scheduler for document annotation tasks.
#[derive(Parser)]
#[command(name = "labelforge")]
#[command(about = "Schedule labeling and review work for annotation tasks")]
#[command(version)]
#[command(
    long_about = "labelforge decides which documents each annotator should label or review next.\n\nIt reads a task snapshot and its assignment ledger, never hands out a document twice to the same person, and fails when the eligible pool is too small.\n\nExample usage:\n  labelforge label --annotator ann-1 -n 20 --record\n  labelforge review --reviewer ann-2 --reviewee ann-1 -n 5"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Assign fresh documents to an annotator.
    #[command(alias = "assign")]
    Label(LabelArgs),

    /// Assign a reviewer a sample of another annotator's completed documents.
    Review(ReviewArgs),

    /// Show how many documents are available to an annotator.
    Pools(PoolsArgs),

    /// Check a task snapshot and its ledger for integrity violations.
    Validate(SnapshotArgs),
}

/// Snapshot file locations shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Task snapshot (annotators, documents, annotations) as JSON.
    #[arg(short = 't', long, default_value = DEFAULT_TASK_FILE)]
    pub task: String,

    /// Assignment ledger as a JSON array. A missing file is an empty ledger.
    #[arg(long, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: String,
}

/// Arguments for `labelforge label`.
#[derive(Parser, Debug)]
pub struct LabelArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Annotator receiving the documents.
    #[arg(short = 'a', long)]
    pub annotator: String,

    /// Number of documents to assign.
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Seed for reproducible draws (overrides LABELFORGE_SEED).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append the resulting assignments to the ledger file.
    #[arg(long)]
    pub record: bool,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `labelforge review`.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Annotator doing the review.
    #[arg(long)]
    pub reviewer: String,

    /// Annotator whose completed work is reviewed.
    #[arg(long)]
    pub reviewee: String,

    /// Number of documents to review (default: LABELFORGE_REVIEW_SIZE, else all).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for reproducible draws (overrides LABELFORGE_SEED).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append the resulting assignments to the ledger file.
    #[arg(long)]
    pub record: bool,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `labelforge pools`.
#[derive(Parser, Debug)]
pub struct PoolsArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Annotator to report on.
    #[arg(short = 'a', long)]
    pub annotator: String,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// JSON summary printed by `label` and `review`.
#[derive(Debug, Serialize)]
struct AssignmentSummary<'a> {
    task: &'a str,
    annotator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewee: Option<&'a str>,
    documents: BTreeSet<DocumentId>,
    recorded: bool,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let config = SchedulerConfig::from_env()?;
    match cli.command {
        Commands::Label(args) => run_label_command(args, config).await,
        Commands::Review(args) => run_review_command(args, config).await,
        Commands::Pools(args) => run_pools_command(args).await,
        Commands::Validate(args) => run_validate_command(args).await,
    }
}

async fn load_snapshot(
    args: &SnapshotArgs,
) -> anyhow::Result<(FileTaskSource, Task, LedgerSnapshot)> {
    let source = FileTaskSource::new(&args.task, &args.ledger);
    let task = source.load_task().await?;
    let ledger = source.load_ledger().await?;
    Ok((source, task, ledger))
}

fn report_scheduler_error(err: SchedulerError) -> anyhow::Error {
    if let SchedulerError::InsufficientPool {
        requested,
        available,
    } = err
    {
        warn!(
            requested,
            available, "Not enough eligible documents; request fewer or wait for more completions"
        );
    }
    err.into()
}

async fn run_label_command(args: LabelArgs, config: SchedulerConfig) -> anyhow::Result<()> {
    config.check_batch(args.count)?;
    let config = match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };

    let (source, task, ledger) = load_snapshot(&args.snapshot).await?;
    let assignee = AnnotatorId::from(args.annotator.as_str());

    let intents = match config.seed {
        Some(seed) => Scheduler::seeded(&task, &ledger, seed).plan_labeling(&assignee, args.count),
        None => Scheduler::new(&task, &ledger).plan_labeling(&assignee, args.count),
    }
    .map_err(report_scheduler_error)?;

    info!(
        task = %task.id,
        annotator = %assignee,
        documents = intents.len(),
        "Planned labeling assignments"
    );

    finish(&source, &task, &assignee, None, intents, args.record, args.json).await
}

async fn run_review_command(args: ReviewArgs, config: SchedulerConfig) -> anyhow::Result<()> {
    let count = args.count.or(config.default_review_size);
    if let Some(n) = count {
        config.check_batch(n)?;
    }
    let config = match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };

    let (source, task, ledger) = load_snapshot(&args.snapshot).await?;
    let reviewer = AnnotatorId::from(args.reviewer.as_str());
    let reviewee = AnnotatorId::from(args.reviewee.as_str());

    let intents = match config.seed {
        Some(seed) => {
            Scheduler::seeded(&task, &ledger, seed).plan_review(&reviewer, &reviewee, count)
        }
        None => Scheduler::new(&task, &ledger).plan_review(&reviewer, &reviewee, count),
    }
    .map_err(report_scheduler_error)?;

    info!(
        task = %task.id,
        reviewer = %reviewer,
        reviewee = %reviewee,
        documents = intents.len(),
        "Planned review assignments"
    );

    finish(
        &source,
        &task,
        &reviewer,
        Some(&reviewee),
        intents,
        args.record,
        args.json,
    )
    .await
}

async fn finish(
    source: &FileTaskSource,
    task: &Task,
    annotator: &AnnotatorId,
    reviewee: Option<&AnnotatorId>,
    intents: Vec<AssignmentRecord>,
    record: bool,
    json: bool,
) -> anyhow::Result<()> {
    if record && !intents.is_empty() {
        source.record(&intents).await?;
    }

    let documents: BTreeSet<DocumentId> = intents.into_iter().map(|r| r.document_id).collect();

    if json {
        let summary = AssignmentSummary {
            task: task.id.as_str(),
            annotator: annotator.as_str(),
            reviewee: reviewee.map(AnnotatorId::as_str),
            documents,
            recorded: record,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for document in &documents {
            println!("{}", document);
        }
    }
    Ok(())
}

async fn run_pools_command(args: PoolsArgs) -> anyhow::Result<()> {
    let (_, task, ledger) = load_snapshot(&args.snapshot).await?;
    let annotator = AnnotatorId::from(args.annotator.as_str());
    let summary = Scheduler::new(&task, &ledger).pool_summary(&annotator)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Annotator: {}", summary.annotator);
        println!("  labeling pool: {}", summary.labeling);
        for (reviewee, size) in &summary.review {
            println!("  review pool for {}: {}", reviewee, size);
        }
    }
    Ok(())
}

async fn run_validate_command(args: SnapshotArgs) -> anyhow::Result<()> {
    let source = FileTaskSource::new(&args.task, &args.ledger);
    let (task, ledger) = source.load_checked().await?;

    info!(
        task = %task.id,
        annotators = task.annotators.len(),
        documents = task.documents.len(),
        annotations = task.annotations.len(),
        records = ledger.len(),
        "Snapshot is consistent"
    );
    println!("OK");
    Ok(())
}
