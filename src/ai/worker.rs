use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Once};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::config::SearchConfig;
use crate::game::{Board, Player};

use super::selector::MoveSelector;

/// Name of the search thread.
pub const WORKER_THREAD_NAME: &str = "search-worker";

/// A search request. The board is the worker's own copy.
#[derive(Debug, Clone, Copy)]
pub struct SearchJob {
    pub generation: u64,
    pub board: Board,
    pub ai: Player,
    pub config: SearchConfig,
}

/// A finished search, tagged with the generation it was dispatched under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub generation: u64,
    /// The chosen column, or the panic message if the search failed.
    pub outcome: Result<Option<usize>, String>,
    pub elapsed: Duration,
}

/// One background thread running at most one search at a time.
///
/// Jobs are queued over a channel and results come back over another; the
/// worker never sees the live board. Cancellation is cooperative: jobs whose
/// generation is older than the latest one set with
/// [`SearchWorker::set_generation`] are skipped when dequeued, and the owner
/// discards results that arrive for an old generation.
pub struct SearchWorker {
    jobs: Option<Sender<SearchJob>>,
    results: Receiver<SearchResult>,
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Start the worker thread. Each result is held back until at least
    /// `min_reply` has passed since its search started.
    pub fn spawn(selector: Box<dyn MoveSelector>, min_reply: Duration) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<SearchJob>();
        let (result_tx, result_rx) = mpsc::channel();
        let generation = Arc::new(AtomicU64::new(0));
        let live_generation = Arc::clone(&generation);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                for job in job_rx {
                    if job.generation != live_generation.load(Ordering::Acquire) {
                        debug!(generation = job.generation, "skipping cancelled search");
                        continue;
                    }

                    let started = Instant::now();
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        selector.select_move(&job.board, job.ai, job.config)
                    }))
                    .map_err(panic_message);
                    if let Err(msg) = &outcome {
                        error!(generation = job.generation, selector = selector.name(), "search panicked: {msg}");
                    } else if let Some(rest) = min_reply.checked_sub(started.elapsed()) {
                        thread::sleep(rest);
                    }

                    let result = SearchResult {
                        generation: job.generation,
                        outcome,
                        elapsed: started.elapsed(),
                    };
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
                debug!("search worker stopped");
            })?;

        Ok(SearchWorker {
            jobs: Some(job_tx),
            results: result_rx,
            generation,
            handle: Some(handle),
        })
    }

    /// Mark `generation` as current; queued jobs from older generations are dropped.
    pub fn set_generation(&self, generation: u64) {
        self.generation.store(generation, Ordering::Release);
    }

    /// Queue a job. Returns `false` if the worker is no longer running.
    pub fn submit(&self, job: SearchJob) -> bool {
        match &self.jobs {
            Some(jobs) => jobs.send(job).is_ok(),
            None => false,
        }
    }

    pub fn try_recv(&self) -> Result<SearchResult, TryRecvError> {
        self.results.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<SearchResult, RecvTimeoutError> {
        self.results.recv_timeout(timeout)
    }

    /// Stop accepting jobs. A search already running finishes on its own
    /// thread and its result is never read.
    pub fn shutdown(&mut self) {
        self.set_generation(u64::MAX);
        self.jobs = None;
        self.handle = None;
    }

    pub fn is_running(&self) -> bool {
        self.jobs.is_some() && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Send panics on the search thread to the log instead of stderr, which the
/// terminal UI draws over. Panics elsewhere still reach the previous hook.
pub fn log_worker_panics() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if thread::current().name() == Some(WORKER_THREAD_NAME) {
                error!("search worker panicked: {info}");
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
