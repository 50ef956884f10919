//! Reference instant for relative keywords.
//!
//! "Today" is the current instant seen in the canonical time zone, truncated
//! to its calendar day. The canonical zone is fixed once per process so every
//! parse in one run agrees on what day it is; it defaults to UTC.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

static CANONICAL_ZONE: OnceLock<FixedOffset> = OnceLock::new();

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    #[error("canonical time zone is already {current}, cannot change it to {requested}")]
    AlreadySet {
        current: FixedOffset,
        requested: FixedOffset,
    },
}

/// Fixes the canonical zone for the rest of the process.
///
/// Setting the zone it already has is a no-op.
///
/// # Errors
/// Returns `ZoneError::AlreadySet` if a different zone was set, or the
/// default was already used by a parse.
pub fn set_canonical_zone(zone: FixedOffset) -> Result<(), ZoneError> {
    if CANONICAL_ZONE.set(zone).is_ok() {
        tracing::info!(%zone, "canonical time zone set");
        return Ok(());
    }
    let current = canonical_zone();
    if current == zone {
        tracing::debug!(%zone, "canonical time zone unchanged");
        Ok(())
    } else {
        Err(ZoneError::AlreadySet {
            current,
            requested: zone,
        })
    }
}

/// The canonical zone, initializing it to UTC on first use.
pub fn canonical_zone() -> FixedOffset {
    *CANONICAL_ZONE.get_or_init(|| Utc.fix())
}

/// Calendar day of `now` in `zone`.
pub fn reference_day(now: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    let day = now.with_timezone(&zone).date_naive();
    tracing::trace!(%now, %zone, %day, "resolved reference day");
    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_clock_is_stopped() {
        let clock = FixedClock::new(instant(2020, 1, 4, 12));
        assert_eq!(clock.now(), clock.now());
        assert_eq!((&clock).now(), instant(2020, 1, 4, 12));
    }

    #[test]
    fn test_reference_day_truncates_time() {
        let utc = Utc.fix();
        assert_eq!(reference_day(instant(2020, 1, 4, 0), utc), day(2020, 1, 4));
        assert_eq!(reference_day(instant(2020, 1, 4, 23), utc), day(2020, 1, 4));
    }

    #[test]
    fn test_reference_day_follows_zone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(reference_day(instant(2020, 1, 4, 23), plus_two), day(2020, 1, 5));
        assert_eq!(reference_day(instant(2020, 1, 4, 2), minus_five), day(2020, 1, 3));
    }

    #[test]
    fn test_canonical_zone_is_stable() {
        let first = canonical_zone();
        assert_eq!(canonical_zone(), first);
        // re-setting the same zone is allowed, a different one is not
        assert!(set_canonical_zone(first).is_ok());
        let other = FixedOffset::east_opt(first.local_minus_utc() + 3600).unwrap();
        assert!(matches!(
            set_canonical_zone(other),
            Err(ZoneError::AlreadySet { .. })
        ));
    }

    #[derive(Clone, Default)]
    struct LevelCounter {
        info: Arc<AtomicUsize>,
        debug: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for LevelCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let level = *event.metadata().level();
            if level == Level::INFO {
                self.info.fetch_add(1, Ordering::SeqCst);
            } else if level == Level::DEBUG {
                self.debug.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_resetting_same_zone_logs_at_debug() {
        let zone = canonical_zone();
        let counter = LevelCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || {
            assert!(set_canonical_zone(zone).is_ok());
        });
        assert_eq!(counter.info.load(Ordering::SeqCst), 0);
        assert_eq!(counter.debug.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let before = Utc::now();
        assert!(SystemClock.now() >= before);
    }
}
