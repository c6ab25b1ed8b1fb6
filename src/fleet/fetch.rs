//! Background fetches and their supersession.
//!
//! Starting a fetch takes a `FetchTicket` from the screen's
//! `FetchGeneration`, which invalidates every ticket handed out before it.
//! Workers report back over an `mpsc` channel; the UI loop only applies
//! results whose ticket is still current.  An in-flight request is never
//! interrupted, it just has its answer thrown away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::FleetError;

#[derive(Clone, Debug, Default)]
pub struct FetchGeneration {
    counter: Arc<AtomicU64>,
}

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede every outstanding ticket and hand out a new one.
    pub fn begin(&self) -> FetchTicket {
        let generation = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            generation,
            counter: Arc::clone(&self.counter),
        }
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub struct FetchTicket {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }

    /// Bail out of a multi-request job once a newer fetch has started.
    pub fn check(&self) -> Result<(), FleetError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(FleetError::Superseded)
        }
    }
}

/// What a worker sends back to the UI loop.
#[derive(Debug)]
pub struct Fetched<T> {
    pub ticket: FetchTicket,
    pub result: Result<T, FleetError>,
}

impl<T> Fetched<T> {
    /// The result, if nothing newer has been requested since.
    pub fn accept(self) -> Option<Result<T, FleetError>> {
        if self.ticket.is_current() {
            Some(self.result)
        } else {
            warn!(generation = self.ticket.generation, "discarding stale fetch result");
            None
        }
    }
}

/// Run `job` on a worker thread and send its outcome to `tx`.
pub fn spawn_fetch<T, F>(ticket: FetchTicket, tx: Sender<Fetched<T>>, job: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce(&FetchTicket) -> Result<T, FleetError> + Send + 'static,
{
    thread::spawn(move || {
        debug!(generation = ticket.generation, "fetch started");
        let result = job(&ticket);
        if tx.send(Fetched { ticket, result }).is_err() {
            debug!("fetch receiver dropped");
        }
    })
}
