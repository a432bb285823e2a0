//! Sequential per-record batch runner with checkpoints and interruption.
//!
//! Each record is processed on a copy and committed only when the job
//! succeeds, so a failure or an interrupt never leaves a half-updated card.
//! Per-record failures are logged and counted; they never stop the batch.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config;
use crate::error::Result;
use crate::models::Card;
use crate::store;

/// What a job did to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Updated,
    Unchanged,
    Skipped(String),
}

/// Totals for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Set when the run stopped early on an interrupt.
    pub interrupted: bool,
    /// Index to pass as `start_from` to resume an interrupted run.
    pub resume_at: Option<usize>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {}, created {}, updated {}, deleted {}, unchanged {}, skipped {}, failed {}",
            self.processed,
            self.created,
            self.updated,
            self.deleted,
            self.unchanged,
            self.skipped,
            self.failed
        )?;
        if let Some(at) = self.resume_at {
            write!(f, " (interrupted; resume with --start-from {at})")?;
        }
        Ok(())
    }
}

/// Runs a job over every card in order.
pub struct BatchRunner {
    checkpoint: Option<PathBuf>,
    checkpoint_every: usize,
    start_from: usize,
    interrupt: Arc<AtomicBool>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self {
            checkpoint: None,
            checkpoint_every: config::CHECKPOINT_EVERY,
            start_from: 0,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the catalog to `path` every `every` records and on interrupt.
    pub fn checkpoint(mut self, path: impl Into<PathBuf>, every: usize) -> Self {
        self.checkpoint = Some(path.into());
        self.checkpoint_every = every.max(1);
        self
    }

    /// Skip records before `index` (they are kept as they are).
    pub fn start_from(mut self, index: usize) -> Self {
        self.start_from = index;
        self
    }

    /// Stop before the next record once `flag` is set.
    pub fn interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    fn save_checkpoint(&self, cards: &[Card]) -> Result<()> {
        if let Some(path) = &self.checkpoint {
            log::info!("Saving progress to {}", path.display());
            store::save_catalog(path, cards)?;
        }
        Ok(())
    }

    /// Run `job` on each card from `start_from` on.
    ///
    /// Only checkpoint writes can fail the run; job errors are counted.
    pub fn run<F>(&self, cards: &mut [Card], mut job: F) -> Result<RunSummary>
    where
        F: FnMut(&mut Card) -> Result<RecordOutcome>,
    {
        let mut summary = RunSummary::default();
        let total = cards.len();

        for i in self.start_from..total {
            if self.interrupt.load(Ordering::SeqCst) {
                log::warn!("Interrupted; saving progress");
                self.save_checkpoint(cards)?;
                summary.interrupted = true;
                summary.resume_at = Some(i);
                return Ok(summary);
            }

            log::info!("[{}/{}] {}", i + 1, total, cards[i]);
            let mut work = cards[i].clone();
            match job(&mut work) {
                Ok(RecordOutcome::Updated) => {
                    cards[i] = work;
                    summary.updated += 1;
                }
                Ok(RecordOutcome::Unchanged) => summary.unchanged += 1,
                Ok(RecordOutcome::Skipped(reason)) => {
                    log::warn!("  skipped {}: {}", cards[i], reason);
                    summary.skipped += 1;
                }
                Err(e) => {
                    log::error!("  failed {}: {}", cards[i], e);
                    summary.failed += 1;
                }
            }
            summary.processed += 1;

            if (i + 1) % self.checkpoint_every == 0 {
                self.save_checkpoint(cards)?;
            }
        }

        Ok(summary)
    }
}
