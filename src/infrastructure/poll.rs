//! Periodic "check newer" polling
//!
//! Drives [`TimelineCursor::check_newer`] on a timer, independent of
//! user-driven pagination. Phases: Idle -> (tick) -> Checking -> Idle;
//! Disabled is entered externally when the owning view unmounts or polling
//! is turned off. Disabling cancels the pending timer and bumps a
//! generation counter so an in-flight check that resolves afterwards is
//! discarded rather than written into a dead buffer. Poll errors are logged
//! and swallowed; the next tick is unaffected.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::model::merge::MergeController;
use crate::model::timeline::TimelineCursor;

/// Observable scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Enabled, waiting for the next tick
    Idle,
    /// A `check_newer` call is in flight
    Checking,
    /// Polling is off; no timer is pending
    Disabled,
}

/// Timer-driven forward detection for one feed view
pub struct PollScheduler {
    cursor: Arc<TimelineCursor>,
    merge: Arc<MergeController>,
    interval: Duration,
    token: Mutex<Option<CancellationToken>>,
    generation: Arc<AtomicU64>,
    phase: Arc<Mutex<PollPhase>>,
}

impl PollScheduler {
    pub fn new(
        cursor: Arc<TimelineCursor>,
        merge: Arc<MergeController>,
        interval: Duration,
    ) -> Self {
        Self {
            cursor,
            merge,
            interval,
            token: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            phase: Arc::new(Mutex::new(PollPhase::Disabled)),
        }
    }

    /// # Panics
    /// Panics if the token lock is poisoned (this indicates a bug in the implementation)
    fn token(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.token.lock().expect("BUG: poll token lock poisoned")
    }

    pub fn phase(&self) -> PollPhase {
        *self.phase.lock().expect("BUG: poll phase lock poisoned")
    }

    pub fn is_enabled(&self) -> bool {
        self.token().is_some()
    }

    /// Starts the polling loop; a second call while enabled is a no-op
    pub fn enable(&self) {
        let mut slot = self.token();
        if slot.is_some() {
            return;
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        set_phase(&self.phase, PollPhase::Idle);

        let cursor = Arc::clone(&self.cursor);
        let merge = Arc::clone(&self.merge);
        let generation = Arc::clone(&self.generation);
        let phase = Arc::clone(&self.phase);
        let my_generation = generation.load(Ordering::SeqCst);
        let interval = self.interval;
        // Anchor the first tick to enable() time, not to whenever the task
        // first gets polled, so a tick cannot be lost to spawn scheduling
        let start = tokio::time::Instant::now();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start + interval, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        log::debug!("poll loop received cancellation");
                        break;
                    }
                    _ = ticker.tick() => {
                        set_phase(&phase, PollPhase::Checking);
                        let result = cursor.check_newer().await;

                        // The view may have unmounted while we were in flight
                        if token.is_cancelled()
                            || generation.load(Ordering::SeqCst) != my_generation
                        {
                            log::debug!("discarding poll result from stale generation");
                            break;
                        }

                        match result {
                            Ok(items) if !items.is_empty() => {
                                log::debug!("poll detected {} newer item(s)", items.len());
                                merge.on_detected(items);
                            }
                            Ok(_) => {}
                            Err(err) => {
                                log::warn!("newer-items poll failed, retrying next tick: {err}");
                            }
                        }
                        set_phase(&phase, PollPhase::Idle);
                    }
                }
            }
        });
    }

    /// Cancels the pending timer and invalidates any in-flight check
    pub fn disable(&self) {
        let mut slot = self.token();
        if let Some(token) = slot.take() {
            token.cancel();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        set_phase(&self.phase, PollPhase::Disabled);
    }
}

fn set_phase(phase: &Mutex<PollPhase>, next: PollPhase) {
    *phase.lock().expect("BUG: poll phase lock poisoned") = next;
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.disable();
    }
}

impl std::fmt::Debug for PollScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollScheduler")
            .field("interval", &self.interval)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
