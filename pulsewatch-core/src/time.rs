//! Time handling for the sampling pipeline
//!
//! All pipeline timing is expressed in milliseconds on a monotonic clock
//! that starts at an arbitrary origin (device boot, or zero under a virtual
//! scheduler). Wall-clock time is never needed.

/// Monotonic timestamp in milliseconds
pub type Timestamp = u64;

/// Milliseconds elapsed from `earlier` to `later`, saturating at zero if the
/// clock was observed out of order.
#[inline]
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// One raw sensor sample with the tick time it was taken at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Raw sensor value (ADC counts or FIFO counts)
    pub value: f32,
    /// Monotonic tick time of the read
    pub timestamp_ms: Timestamp,
}

impl Sample {
    /// Create a sample
    pub const fn new(value: f32, timestamp_ms: Timestamp) -> Self {
        Self { value, timestamp_ms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates() {
        assert_eq!(elapsed_ms(1000, 1500), 500);
        assert_eq!(elapsed_ms(1500, 1000), 0);
    }
}
