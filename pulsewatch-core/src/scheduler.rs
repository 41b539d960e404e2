//! Scheduler Implementations
//!
//! - [`VirtualScheduler`]: deterministic virtual time. `next_tick` jumps
//!   straight to the next due registration, so a 30 s session runs in
//!   milliseconds. Used by tests and offline simulation. `no_std`.
//! - [`IntervalScheduler`] (`std`): sleeps the calling thread until the next
//!   tick is due. Ticks that cannot be delivered on time are skipped and
//!   counted; the effective sampling rate drops silently.
//!
//! Both keep their registrations in a fixed-capacity table of
//! [`MAX_REGISTRATIONS`] entries.

use heapless::Vec;

use crate::{
    errors::{VitalsError, VitalsResult},
    time::Timestamp,
    traits::Scheduler,
};

/// Periodic registrations a scheduler can hold at once
pub const MAX_REGISTRATIONS: usize = 4;

/// Handle for one periodic registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickHandle(u8);

impl TickHandle {
    /// Registration number, unique per scheduler
    pub const fn id(&self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    handle: TickHandle,
    interval_ms: u64,
    next_due_ms: Timestamp,
}

/// Registration table shared by both schedulers
#[derive(Debug, Default)]
struct Registrations {
    entries: Vec<Registration, MAX_REGISTRATIONS>,
    next_id: u8,
}

impl Registrations {
    fn register(&mut self, interval_ms: u32, now_ms: Timestamp) -> VitalsResult<TickHandle> {
        if interval_ms == 0 {
            return Err(VitalsError::SchedulerRegistration { reason: "interval must be non-zero" });
        }

        let handle = TickHandle(self.next_id);
        let interval_ms = u64::from(interval_ms);
        self.entries
            .push(Registration { handle, interval_ms, next_due_ms: now_ms + interval_ms })
            .map_err(|_| VitalsError::SchedulerRegistration { reason: "no free timer slot" })?;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(handle)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    /// Earliest due registration; ties go to the oldest registration
    fn earliest_mut(&mut self) -> Option<&mut Registration> {
        self.entries.iter_mut().min_by_key(|entry| entry.next_due_ms)
    }
}

/// Deterministic scheduler on a virtual clock starting at 0 ms
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    registrations: Registrations,
    now_ms: Timestamp,
    horizon_ms: Option<Timestamp>,
    delivered: u64,
}

impl VirtualScheduler {
    /// Scheduler that delivers ticks until every registration is cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler that stops delivering after `horizon_ms` of virtual time;
    /// needed to bound continuous sessions
    pub fn with_horizon(horizon_ms: Timestamp) -> Self {
        Self {
            horizon_ms: Some(horizon_ms),
            ..Self::default()
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> Timestamp {
        self.now_ms
    }

    /// Ticks delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl Scheduler for VirtualScheduler {
    type Handle = TickHandle;

    fn register_periodic(&mut self, interval_ms: u32) -> VitalsResult<TickHandle> {
        self.registrations.register(interval_ms, self.now_ms)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.registrations.cancel(handle);
    }

    fn next_tick(&mut self) -> Option<(TickHandle, Timestamp)> {
        let horizon = self.horizon_ms;
        let entry = self.registrations.earliest_mut()?;
        let due = entry.next_due_ms;
        if horizon.map_or(false, |limit| due > limit) {
            return None;
        }

        entry.next_due_ms = due + entry.interval_ms;
        let handle = entry.handle;
        self.now_ms = due;
        self.delivered += 1;
        Some((handle, due))
    }
}

#[cfg(feature = "std")]
pub use interval::IntervalScheduler;

#[cfg(feature = "std")]
mod interval {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{Registrations, TickHandle};
    use crate::{errors::VitalsResult, time::Timestamp, traits::Scheduler};

    /// Thread-sleep scheduler on the host monotonic clock
    ///
    /// Timestamps are milliseconds since construction.
    #[derive(Debug)]
    pub struct IntervalScheduler {
        registrations: Registrations,
        origin: Instant,
        missed_ticks: u64,
    }

    impl Default for IntervalScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IntervalScheduler {
        /// Scheduler whose clock starts now
        pub fn new() -> Self {
            Self {
                registrations: Registrations::default(),
                origin: Instant::now(),
                missed_ticks: 0,
            }
        }

        /// Ticks skipped because the previous tick overran
        pub fn missed_ticks(&self) -> u64 {
            self.missed_ticks
        }

        fn now_ms(&self) -> Timestamp {
            self.origin.elapsed().as_millis() as Timestamp
        }
    }

    impl Scheduler for IntervalScheduler {
        type Handle = TickHandle;

        fn register_periodic(&mut self, interval_ms: u32) -> VitalsResult<TickHandle> {
            let now = self.now_ms();
            self.registrations.register(interval_ms, now)
        }

        fn cancel(&mut self, handle: TickHandle) {
            self.registrations.cancel(handle);
        }

        fn next_tick(&mut self) -> Option<(TickHandle, Timestamp)> {
            let now = self.now_ms();
            let entry = self.registrations.earliest_mut()?;
            let due = entry.next_due_ms;

            if now < due {
                thread::sleep(Duration::from_millis(due - now));
            }

            let fired_at = self.origin.elapsed().as_millis() as Timestamp;
            let interval = entry.interval_ms;
            let behind = fired_at.saturating_sub(due) / interval;
            entry.next_due_ms = due + (behind + 1) * interval;
            let handle = entry.handle;

            if behind > 0 {
                self.missed_ticks += behind;
                log_debug!("tick overran by {} ms, skipped {} ticks", fired_at - due, behind);
            }
            Some((handle, fired_at))
        }
    }
}
