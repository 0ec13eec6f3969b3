//! Retry-forever loops at the edge of the run, with exponential backoff.

use std::fmt::Display;
use std::time::Duration;

use crate::context::Context;
use crate::{Error, Result};

/// Backoff policy: delays start at `initial` and grow by `factor`, up to `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub factor: u32,
}

impl Backoff {
    /// Waiting for the network to come up.
    pub const NETWORK: Backoff = Backoff {
        initial: Duration::from_secs(1),
        max: Duration::from_secs(60),
        factor: 2,
    };

    /// Waiting for the clock to be set.
    pub const CLOCK: Backoff = Backoff {
        initial: Duration::from_secs(5),
        max: Duration::from_secs(60),
        factor: 2,
    };

    /// The delay before each retry, forever.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let Backoff {
            initial,
            max,
            factor,
        } = *self;
        std::iter::successors(Some(initial.min(max)), move |d| {
            Some(d.saturating_mul(factor).min(max))
        })
    }
}

/// Run `op` until it succeeds, sleeping between attempts per `backoff`.
///
/// Only stops early if the context is cancelled.
pub fn retry_forever<T, E, F>(ctx: &Context, backoff: &Backoff, what: &str, mut op: F) -> Result<T>
where
    E: Display,
    F: FnMut() -> std::result::Result<T, E>,
{
    let mut delays = backoff.delays();
    for attempt in 1.. {
        ctx.check()?;
        match op() {
            Ok(v) => {
                if attempt > 1 {
                    tracing::info!("{} succeeded after {} attempts", what, attempt);
                }
                return Ok(v);
            }
            Err(e) => {
                let delay = delays.next().unwrap_or(backoff.max);
                tracing::warn!(
                    "could not {}, retrying in {:?} (attempt {}): {}",
                    what,
                    delay,
                    attempt,
                    e
                );
                if ctx.wait_timeout(delay) {
                    break;
                }
            }
        }
    }
    Err(Error::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Backoff = Backoff {
        initial: Duration::from_millis(1),
        max: Duration::from_millis(4),
        factor: 2,
    };

    #[test]
    fn delays_grow_and_cap() {
        let got: Vec<_> = FAST.delays().take(5).collect();
        let ms = Duration::from_millis;
        assert_eq!(got, vec![ms(1), ms(2), ms(4), ms(4), ms(4)]);

        let flat = Backoff {
            factor: 1,
            ..Backoff::CLOCK
        };
        assert!(flat.delays().take(3).all(|d| d == Duration::from_secs(5)));
    }

    #[test]
    fn retries_until_success() {
        let ctx = Context::new();
        let mut calls = 0;
        let got = retry_forever(&ctx, &FAST, "count", || {
            calls += 1;
            if calls < 4 {
                Err(format!("only {calls}"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(got.unwrap(), 4);
    }

    #[test]
    fn cancellation_stops_retrying() {
        let ctx = Context::new();
        let mut calls = 0;
        let got: Result<()> = retry_forever(&ctx, &FAST, "fail", || {
            calls += 1;
            if calls == 3 {
                ctx.cancel();
            }
            Err("nope")
        });
        assert!(matches!(got, Err(Error::Cancelled)));
        assert_eq!(calls, 3);
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let ctx = Context::new();
        ctx.cancel();
        let got: Result<()> = retry_forever(
            &ctx,
            &FAST,
            "never",
            || -> std::result::Result<(), String> { panic!("should not be called") },
        );
        assert!(matches!(got, Err(Error::Cancelled)));
    }
}
