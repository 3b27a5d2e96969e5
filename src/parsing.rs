//! Shared context for DOM-based extraction.
//!
//! A [`ParseContext`] is an explicit handle owned by whoever drives a batch.
//! The first [`ParseLease`] creates the underlying [`ParsePool`]; concurrent
//! callers take the same lock and reuse it rather than creating their own.
//! Dropping the last lease tears the pool down, so nothing lingers between
//! batches, including when a session is cancelled or panics.

use std::future::Future;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::extractor::{self, CleanedContent};
use crate::patterns::PatternTables;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Bounded pool of blocking extraction slots.
#[derive(Debug)]
pub struct ParsePool {
    permits: Semaphore,
}

impl ParsePool {
    fn new(concurrency: usize) -> Self {
        Self {
            permits: Semaphore::new(concurrency.max(1)),
        }
    }

    /// Run the extraction cascade on a blocking thread.
    ///
    /// A panic inside the DOM pass is contained and answered with the
    /// regex-only path, so this never fails.
    pub async fn extract(&self, html: String, tables: Arc<PatternTables>) -> CleanedContent {
        let Ok(_permit) = self.permits.acquire().await else {
            debug!("Parse pool already closed, extracting inline");
            return extractor::extract(&html, &tables);
        };

        let html = Arc::new(html);
        let task = {
            let html = Arc::clone(&html);
            let tables = Arc::clone(&tables);
            tokio::task::spawn_blocking(move || extractor::extract(&html, &tables))
        };

        match task.await {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "DOM extraction failed, falling back to tag stripping");
                extractor::extract_without_dom(&html, &tables)
            }
        }
    }

    fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }
}

#[derive(Debug, Default)]
struct Slot {
    pool: Option<Arc<ParsePool>>,
    leases: usize,
}

/// Handle to a lazily created [`ParsePool`].
#[derive(Debug)]
pub struct ParseContext {
    concurrency: usize,
    slot: Mutex<Slot>,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl ParseContext {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Take a lease on the pool, creating it if no lease is outstanding.
    pub fn acquire(&self) -> ParseLease<'_> {
        let mut slot = self.lock_slot();
        slot.leases += 1;
        let pool = match &slot.pool {
            Some(pool) => Arc::clone(pool),
            None => {
                debug!(concurrency = self.concurrency, "Creating parse pool");
                let pool = Arc::new(ParsePool::new(self.concurrency));
                slot.pool = Some(Arc::clone(&pool));
                pool
            }
        };
        ParseLease { ctx: self, pool }
    }

    /// Run `f` with a leased pool. The lease is returned when `f` completes,
    /// when the returned future is dropped early, or when `f` panics.
    pub async fn with_session<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce(Arc<ParsePool>) -> Fut,
        Fut: Future<Output = T>,
    {
        let lease = self.acquire();
        f(Arc::clone(lease.pool())).await
    }

    /// Whether a pool currently exists.
    pub fn is_active(&self) -> bool {
        self.lock_slot().pool.is_some()
    }

    fn release(&self, pool: &Arc<ParsePool>) {
        let mut slot = self.lock_slot();
        let is_current = slot
            .pool
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, pool));
        if !is_current {
            debug!("Lease belongs to a torn down parse pool");
            pool.close();
            return;
        }

        slot.leases = slot.leases.saturating_sub(1);
        if slot.leases == 0 {
            slot.pool = None;
            pool.close();
            debug!("Parse pool torn down");
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One outstanding use of a [`ParseContext`]'s pool, returned on drop.
#[derive(Debug)]
pub struct ParseLease<'a> {
    ctx: &'a ParseContext,
    pool: Arc<ParsePool>,
}

impl ParseLease<'_> {
    pub fn pool(&self) -> &Arc<ParsePool> {
        &self.pool
    }
}

impl Deref for ParseLease<'_> {
    type Target = ParsePool;

    fn deref(&self) -> &ParsePool {
        &self.pool
    }
}

impl Drop for ParseLease<'_> {
    fn drop(&mut self) {
        self.ctx.release(&self.pool);
    }
}
