//! Test utilities shared across modules.

use crate::clock::ManualClock;
use crate::driver::Driver;
use crate::fixtures::SeedData;
use crate::lifecycle::Dashboard;
use crate::ticker::Timing;

/// Wall-clock start for manual clocks in tests (2025-12-17 19:33:20 UTC).
pub const TEST_EPOCH_MILLIS: i64 = 1_766_000_000_000;

/// A driver over the seed data with default timing and a manual clock.
pub fn seeded_driver() -> Driver<ManualClock> {
    let timing = Timing::default();
    Driver::new(
        Dashboard::new(&SeedData, &timing),
        ManualClock::starting_at(TEST_EPOCH_MILLIS),
        timing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::lifecycle::Phase;

    #[test]
    fn test_seeded_driver_starts_idle() {
        let driver = seeded_driver();
        assert_eq!(driver.dashboard().phase(), Phase::Idle);
        assert_eq!(driver.dashboard().catalog().len(), 5);
        assert_eq!(driver.clock().epoch_millis(), TEST_EPOCH_MILLIS);
        assert!(!driver.has_active_ticker());
    }
}
