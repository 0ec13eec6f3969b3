//! The time source: the run's observation hour comes from here.

use chrono::{DateTime, TimeZone, Utc};

use crate::context::Context;
use crate::retry::{retry_forever, Backoff};
use crate::Result;

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a fixed time.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Before this, the clock hasn't been set (e.g. no RTC and no NTP yet).
fn earliest_valid() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Read the clock once it has plausibly been set.
pub fn wait_for_valid_clock(
    ctx: &Context,
    clock: &impl Clock,
    backoff: &Backoff,
) -> Result<DateTime<Utc>> {
    let earliest = earliest_valid();
    let now = retry_forever(ctx, backoff, "obtain time", || {
        let now = clock.now();
        if now >= earliest {
            Ok(now)
        } else {
            Err(format!("clock reads {now}, before {earliest}"))
        }
    })?;
    tracing::info!("it is currently {} UTC", now.format("%m/%d/%Y at %H:%M:%S"));
    Ok(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::Cell;
    use std::time::Duration;

    const FAST: Backoff = Backoff {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(1),
        factor: 1,
    };

    /// Reads the epoch until it has been read `unset_reads` times.
    struct SettlingClock {
        reads: Cell<u32>,
        unset_reads: u32,
        set_to: DateTime<Utc>,
    }

    impl Clock for SettlingClock {
        fn now(&self) -> DateTime<Utc> {
            let n = self.reads.get();
            self.reads.set(n + 1);
            if n < self.unset_reads {
                DateTime::<Utc>::UNIX_EPOCH
            } else {
                self.set_to
            }
        }
    }

    #[test]
    fn valid_clock_read_once() {
        let t = Utc.with_ymd_and_hms(2024, 2, 29, 13, 5, 0).unwrap();
        let got = wait_for_valid_clock(&Context::new(), &FixedClock(t), &FAST).unwrap();
        assert_eq!(got, t);
    }

    #[test]
    fn waits_for_clock_to_be_set() {
        let t = Utc.with_ymd_and_hms(2021, 1, 2, 18, 0, 0).unwrap();
        let clock = SettlingClock {
            reads: Cell::new(0),
            unset_reads: 3,
            set_to: t,
        };
        let got = wait_for_valid_clock(&Context::new(), &clock, &FAST).unwrap();
        assert_eq!(got, t);
        assert_eq!(clock.reads.get(), 4);
    }

    #[test]
    fn gives_up_when_cancelled() {
        let ctx = Context::new();
        ctx.cancel();
        let clock = FixedClock(DateTime::<Utc>::UNIX_EPOCH);
        let err = wait_for_valid_clock(&ctx, &clock, &FAST).expect_err("cancelled");
        assert!(matches!(err, Error::Cancelled));
    }
}
