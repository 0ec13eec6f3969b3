//! Context provides a cancellation, similar to Golang's Context.
//!
//! The run checks it between stations; boundary retries sleep on it, so a
//! Ctrl-C cuts a backoff short.

use std::{
    ops::Deref,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::{Error, Result};

#[derive(Clone, Debug, Default)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create a new Context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the context on SIGINT.
    pub fn cancel_on_interrupt(&self) -> std::result::Result<(), ctrlc::Error> {
        let ctx = self.clone();
        ctrlc::set_handler(move || {
            tracing::info!("got SIGINT, closing context");
            ctx.cancel();
        })
    }
}

impl Deref for Context {
    type Target = ContextInner;

    fn deref(&self) -> &Self::Target {
        self.inner.deref()
    }
}

#[derive(Debug, Default)]
pub struct ContextInner {
    cancelled: Mutex<bool>,
    cv: Condvar,
}

impl ContextInner {
    // A panic while holding the flag can't leave it half-written.
    fn flag(&self) -> MutexGuard<'_, bool> {
        self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the context.
    pub fn cancel(&self) {
        *self.flag() = true;
        self.cv.notify_all();
    }

    /// Returns true iff the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.flag()
    }

    /// Fails with [`Error::Cancelled`] if the context has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait until the duration expires, or the context is cancelled.
    /// Returns true if the context has been cancelled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let g = self.flag();
        let (v, _) = self
            .cv
            .wait_timeout_while(g, duration, |g| !*g)
            .unwrap_or_else(PoisonError::into_inner);
        *v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn wait_times_out() {
        let ctx = Context::new();
        assert!(!ctx.wait_timeout(Duration::from_millis(5)));
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn cancel_wakes_waiter() {
        let ctx = Context::new();
        let start = Instant::now();
        std::thread::scope(|scope| {
            let waiter = ctx.clone();
            let h = scope.spawn(move || waiter.wait_timeout(Duration::from_secs(30)));
            std::thread::sleep(Duration::from_millis(10));
            ctx.cancel();
            assert!(h.join().expect("waiter panicked"));
        });
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(matches!(ctx.check(), Err(Error::Cancelled)));
    }
}
