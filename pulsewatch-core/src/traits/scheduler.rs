//! Scheduler Abstraction
//!
//! Decouples the pipeline from any particular hardware timer. A scheduler
//! hands out periodic registrations and then delivers their ticks, one at a
//! time, in due order. Production code backs this with an RTC or app-timer;
//! tests use [`VirtualScheduler`], which jumps straight to the next due
//! time.
//!
//! ## Cooperative Cancellation
//!
//! Cancelling a registration only stops future deliveries. A tick already
//! handed out runs to completion; there is nothing to unwind.
//!
//! ## Example: driving a session by hand
//!
//! ```rust
//! use pulsewatch_core::traits::Scheduler;
//! use pulsewatch_core::scheduler::VirtualScheduler;
//!
//! let mut scheduler = VirtualScheduler::new();
//! let handle = scheduler.register_periodic(2)?;
//!
//! let (first, at) = scheduler.next_tick().unwrap();
//! assert_eq!(first, handle);
//! assert_eq!(at, 2);
//!
//! scheduler.cancel(handle);
//! assert!(scheduler.next_tick().is_none());
//! # Ok::<(), pulsewatch_core::VitalsError>(())
//! ```
//!
//! [`VirtualScheduler`]: crate::scheduler::VirtualScheduler

use core::fmt::Debug;

use crate::{errors::VitalsResult, time::Timestamp};

/// Periodic tick source
pub trait Scheduler {
    /// Identifies one registration
    type Handle: Copy + PartialEq + Debug;

    /// Register a periodic tick every `interval_ms`.
    ///
    /// Failure is fatal at startup: callers surface it and do not retry.
    fn register_periodic(&mut self, interval_ms: u32) -> VitalsResult<Self::Handle>;

    /// Stop future ticks for `handle`. Unknown handles are ignored.
    fn cancel(&mut self, handle: Self::Handle);

    /// Wait for the next due tick and return its registration and time.
    ///
    /// Returns `None` once no registration is active.
    fn next_tick(&mut self) -> Option<(Self::Handle, Timestamp)>;
}
