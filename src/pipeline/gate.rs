//! Invocation-order gate for tick application
//!
//! Ticks fetch concurrently but must apply their results in the order they
//! were invoked. Each tick takes a [`GateTicket`] when it is invoked, waits
//! for its turn after the fetch resolves, and releases the turn when the
//! ticket is dropped. A ticket dropped without ever waiting (for example a
//! tick task cancelled mid-fetch) still releases its slot, so one lost tick
//! never stalls the ones behind it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Clone)]
pub struct SequenceGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    issued: AtomicU64,
    progress: Mutex<Progress>,
    turn: watch::Sender<u64>,
}

/// `next` is the lowest sequence not yet released; `released` holds
/// sequences above it that finished early.
struct Progress {
    next: u64,
    released: BTreeSet<u64>,
}

impl SequenceGate {
    pub fn new() -> Self {
        let (turn, _) = watch::channel(0);
        Self {
            inner: Arc::new(GateInner {
                issued: AtomicU64::new(0),
                progress: Mutex::new(Progress {
                    next: 0,
                    released: BTreeSet::new(),
                }),
                turn,
            }),
        }
    }

    /// Reserve the next position. Call at invocation time, before fetching.
    pub fn issue(&self) -> GateTicket {
        let sequence = self.inner.issued.fetch_add(1, Ordering::SeqCst);
        GateTicket {
            sequence,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of tickets issued so far.
    pub fn issued(&self) -> u64 {
        self.inner.issued.load(Ordering::SeqCst)
    }
}

impl Default for SequenceGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GateTicket {
    sequence: u64,
    inner: Arc<GateInner>,
}

impl GateTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Wait until every earlier ticket has been released.
    pub async fn wait_turn(&self) {
        let mut turn = self.inner.turn.subscribe();
        // The sender lives in `inner`, which this ticket keeps alive, so the
        // channel cannot close while we wait.
        let _ = turn.wait_for(|next| *next >= self.sequence).await;
    }
}

impl Drop for GateTicket {
    fn drop(&mut self) {
        let mut progress = self
            .inner
            .progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        progress.released.insert(self.sequence);
        loop {
            let next = progress.next;
            if !progress.released.remove(&next) {
                break;
            }
            progress.next += 1;
        }

        self.inner.turn.send_replace(progress.next);
    }
}

impl std::fmt::Debug for GateTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateTicket")
            .field("sequence", &self.sequence)
            .finish()
    }
}
