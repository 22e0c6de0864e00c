use std::thread;
use std::time::{Duration, Instant};

use conduit_api::{ContextError, RunContext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_returns_deadline_exceeded_after_timeout() {
        let (ctx, _guard) = RunContext::with_timeout(Duration::from_millis(100));
        let started = Instant::now();

        assert_eq!(ctx.done(), ContextError::DeadlineExceeded);
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(ctx.is_done());
    }

    #[test]
    fn test_cancel_wakes_every_clone() {
        let (ctx, guard) = RunContext::with_timeout(Duration::from_secs(30));
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let ctx = ctx.clone();
                thread::spawn(move || ctx.done())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        guard.cancel();

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), ContextError::Canceled);
        }
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn test_dropping_guard_cancels() {
        let (ctx, guard) = RunContext::background();
        assert_eq!(ctx.err(), None);
        drop(guard);
        assert_eq!(ctx.done(), ContextError::Canceled);
    }

    #[test]
    fn test_sleep_completes_when_context_outlives_it() {
        let (ctx, _guard) = RunContext::with_timeout(Duration::from_secs(10));
        assert_eq!(ctx.sleep(Duration::from_millis(20)), Ok(()));
    }

    #[test]
    fn test_sleep_is_cut_short_by_deadline() {
        let (ctx, _guard) = RunContext::with_timeout(Duration::from_millis(50));
        let started = Instant::now();
        assert_eq!(ctx.sleep(Duration::from_secs(10)), Err(ContextError::DeadlineExceeded));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_recv_prefers_available_message() {
        let (ctx, _guard) = RunContext::with_timeout(Duration::from_secs(10));
        let (tx, rx) = flume::unbounded();
        tx.send(7u32).unwrap();

        assert_eq!(ctx.recv(&rx), Ok(Some(7)));
        drop(tx);
        assert_eq!(ctx.recv(&rx), Ok(None));
    }

    #[test]
    fn test_recv_times_out_with_deadline() {
        let (ctx, _guard) = RunContext::with_timeout(Duration::from_millis(50));
        let (_tx, rx) = flume::unbounded::<u32>();

        assert_eq!(ctx.recv(&rx), Err(ContextError::DeadlineExceeded));
    }

    #[test]
    fn test_recv_returns_canceled_when_guard_released() {
        let (ctx, guard) = RunContext::background();
        let (_tx, rx) = flume::unbounded::<u32>();

        let handle = {
            let ctx = ctx.clone();
            thread::spawn(move || ctx.recv(&rx))
        };
        thread::sleep(Duration::from_millis(50));
        guard.cancel();

        assert_eq!(handle.join().unwrap(), Err(ContextError::Canceled));
    }

    #[test]
    fn test_remaining_shrinks() {
        let (ctx, _guard) = RunContext::with_timeout(Duration::from_secs(5));
        let remaining = ctx.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(5));
        assert!(remaining > Duration::from_secs(4));
    }

    #[test]
    fn test_cancel_cause_survives_deadline() {
        let (ctx, guard) = RunContext::with_timeout(Duration::from_millis(50));
        guard.cancel();
        thread::sleep(Duration::from_millis(100));

        assert_eq!(ctx.err(), Some(ContextError::Canceled));
        assert_eq!(ctx.done(), ContextError::Canceled);
        assert_eq!(ctx.sleep(Duration::from_millis(10)), Err(ContextError::Canceled));
        let (_tx, rx) = flume::unbounded::<u32>();
        assert_eq!(ctx.recv(&rx), Err(ContextError::Canceled));
    }
}
