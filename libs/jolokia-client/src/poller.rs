// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Periodic poller
//!
//! A [`Poller`] keeps a registry of recurring requests and drives them
//! with one repeating timer. Jobs are dispatched through the poller's
//! [`Client`] in registration order; results flow exclusively through
//! each job's own success/error hooks.
//!
//! Jobs survive timer restarts: `stop()` only cancels the timer, the
//! registry keeps its entries, and a later `start()` picks them all up
//! again.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use indexmap::IndexMap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::Client;
use crate::error::JolokiaError;
use crate::options::RequestOptions;
use crate::request::RequestBatch;

/// Poll job identifier, unique for the lifetime of one poller and
/// never reused, not even after the job is removed.
pub type JobId = String;

#[derive(Clone)]
struct PollJob {
    requests: RequestBatch,
    options: RequestOptions,
}

struct JobRegistry {
    /// Last minted id number; only ever grows.
    next_id: u64,
    /// Jobs in registration order.
    jobs: IndexMap<JobId, PollJob>,
}

struct TimerState {
    /// Interval of the running timer; `Some` iff `ticker` is `Some`.
    interval: Option<Duration>,
    ticker: Option<JoinHandle<()>>,
}

/// Registry of recurring requests plus the timer that re-dispatches
/// them.
///
/// All state is private to one poller instance; the only thing shared
/// with anyone else is the [`Client`] handed to [`Poller::new`].
pub struct Poller {
    client: Client,
    registry: Arc<Mutex<JobRegistry>>,
    timer: Mutex<TimerState>,
}

impl Poller {
    pub fn new(client: Client) -> Poller {
        Poller {
            client,
            registry: Arc::new(Mutex::new(JobRegistry { next_id: 0, jobs: IndexMap::new() })),
            timer: Mutex::new(TimerState { interval: None, ticker: None }),
        }
    }

    /// Store a recurring request under a fresh `job-<N>` id and return
    /// the id. Registration never dispatches; a running timer picks the
    /// job up on its next tick.
    ///
    /// The job's options carry its success/error hooks — without at
    /// least one of them, poll results go nowhere.
    pub fn register(&self, requests: impl Into<RequestBatch>, options: RequestOptions) -> JobId {
        let mut registry = lock_or_recover(&self.registry, "job registry");
        registry.next_id += 1;
        let id = format!("job-{}", registry.next_id);
        registry.jobs.insert(id.clone(), PollJob { requests: requests.into(), options });
        tracing::debug!(job = %id, "Registered poll job");
        id
    }

    /// Remove a job. Unknown ids are an error; ids are never recycled,
    /// so a double unregister always fails.
    pub fn unregister(&self, id: &str) -> Result<(), JolokiaError> {
        let mut registry = lock_or_recover(&self.registry, "job registry");
        // shift_remove keeps the registration order of the remaining
        // jobs intact.
        match registry.jobs.shift_remove(id) {
            Some(_) => {
                tracing::debug!(job = %id, "Unregistered poll job");
                Ok(())
            }
            None => Err(JolokiaError::UnknownJob(id.to_string())),
        }
    }

    /// Remove all jobs. Idempotent; does not touch the timer.
    pub fn clear(&self) {
        let mut registry = lock_or_recover(&self.registry, "job registry");
        registry.jobs.clear();
    }

    /// Dispatch every registered job once, now.
    ///
    /// Jobs are dispatched in registration order, each on its own task:
    /// a failing or slow job never holds up the others, and failures
    /// reach the job's own error hook (plus a warning log carrying the
    /// job id). Must be called within a Tokio runtime.
    pub fn execute(&self) {
        execute_jobs(&self.registry, &self.client);
    }

    /// Run the timer at `every`, transitioning into the running state.
    ///
    /// Starting an already-running poller at its current interval is a
    /// no-op (the running timer is left untouched). Starting at a
    /// different interval stops the old timer first. Either way a
    /// freshly started timer performs one immediate dispatch pass and
    /// then ticks at `every`. Sub-millisecond intervals are raised to
    /// one millisecond. Must be called within a Tokio runtime.
    pub fn start(&self, every: Duration) {
        let every = every.max(Duration::from_millis(1));
        let mut timer = lock_or_recover(&self.timer, "poll timer");
        if timer.ticker.is_some() && timer.interval == Some(every) {
            return;
        }
        stop_locked(&mut timer);

        let registry = Arc::clone(&self.registry);
        let client = self.client.clone();
        let ticker = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(every);
            // A delayed tick shifts the schedule instead of bursting to
            // catch up.
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // The first tick completes immediately, giving the
                // dispatch-on-start pass.
                ticks.tick().await;
                execute_jobs(&registry, &client);
            }
        });

        timer.interval = Some(every);
        timer.ticker = Some(ticker);
        tracing::info!(interval = ?every, "Poller started");
    }

    /// Cancel the timer, transitioning into the stopped state. A
    /// stopped poller stays stopped; calling this again is a no-op.
    ///
    /// Dispatches already in flight from an earlier tick are not
    /// cancelled and still reach their hooks.
    pub fn stop(&self) {
        let mut timer = lock_or_recover(&self.timer, "poll timer");
        stop_locked(&mut timer);
    }

    /// Interval of the running timer; `None` while stopped.
    pub fn interval(&self) -> Option<Duration> {
        lock_or_recover(&self.timer, "poll timer").interval
    }

    pub fn is_running(&self) -> bool {
        lock_or_recover(&self.timer, "poll timer").ticker.is_some()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stop_locked(timer: &mut TimerState) {
    if let Some(ticker) = timer.ticker.take() {
        ticker.abort();
        tracing::info!("Poller stopped");
    }
    timer.interval = None;
}

/// Snapshot the registry, then dispatch each job on its own task so
/// registration changes during a tick wait for the next tick and no
/// job can block or fail another.
fn execute_jobs(registry: &Arc<Mutex<JobRegistry>>, client: &Client) {
    let jobs: Vec<(JobId, PollJob)> = {
        let registry = lock_or_recover(registry, "job registry");
        registry.jobs.iter().map(|(id, job)| (id.clone(), job.clone())).collect()
    };
    tracing::debug!(jobs = jobs.len(), "Dispatching poll jobs");
    for (id, job) in jobs {
        let client = client.clone();
        tokio::spawn(async move {
            if let Err(error) = client.request(job.requests, Some(job.options)).await {
                tracing::warn!(job = %id, error = %error, "Poll job dispatch failed");
            }
        });
    }
}

fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, resource: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::error!(resource, "Mutex poisoned; recovering");
        poisoned.into_inner()
    })
}
