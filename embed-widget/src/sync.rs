//! User sync orchestration.
//!
//! The authentication identity is known client-side before the backend can
//! reliably attribute requests to it, so the idempotent get-or-create call
//! tolerates a transient "not ready" result and retries with bounded
//! exponential backoff. The same timing race surfaces as a thrown error in
//! some environments, so genuine errors get the same bounded retry rather
//! than failing immediately. After exhausting retries the flow stops
//! silently and logs; page rendering is never blocked on it.

use std::cell::Cell;
use std::future::Future;
use std::time::Duration;

use shared::WidgetResult;
use uuid::Uuid;

use crate::api::PreviewClient;
use crate::diag;

/// First retry delay; subsequent delays double.
pub const SYNC_BASE_DELAY: Duration = Duration::from_millis(50);

/// Upper bound on sync attempts per browsing context.
pub const SYNC_MAX_ATTEMPTS: u32 = 5;

#[cfg(target_arch = "wasm32")]
async fn async_sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

// Native builds only exercise the retry policy in tests, where real
// delays would just slow the suite down.
#[cfg(not(target_arch = "wasm32"))]
async fn async_sleep(_duration: Duration) {}

/// Exponential backoff schedule: `base × 2^attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
}

impl Backoff {
    /// Create a schedule starting at `base`.
    #[must_use]
    pub const fn new(base: Duration) -> Self {
        Self { base }
    }

    /// Delay to wait after the given zero-based attempt.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(2u32.saturating_pow(attempt))
    }
}

thread_local! {
    // First attempt wins: set before the first remote call so duplicate
    // triggers from re-renders observe it and no-op.
    static SYNC_STARTED: Cell<bool> = const { Cell::new(false) };
}

/// Ensure the signed-in identity has an application user record, retrying
/// the "not ready" window with bounded exponential backoff. Runs at most
/// once per browsing context; later triggers return `None` without
/// calling the backend.
pub async fn ensure_user_synced<F, Fut>(sync: F) -> Option<Uuid>
where
    F: Fn() -> Fut,
    Fut: Future<Output = WidgetResult<Option<Uuid>>>,
{
    ensure_user_synced_with(sync, async_sleep).await
}

// The sleeper is a parameter so the retry loop's requested delays are
// observable; production callers always pass `async_sleep`.
async fn ensure_user_synced_with<F, Fut, S, SFut>(sync: F, sleep: S) -> Option<Uuid>
where
    F: Fn() -> Fut,
    Fut: Future<Output = WidgetResult<Option<Uuid>>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    if SYNC_STARTED.with(|flag| flag.replace(true)) {
        return None;
    }

    let backoff = Backoff::new(SYNC_BASE_DELAY);
    for attempt in 0..SYNC_MAX_ATTEMPTS {
        match sync().await {
            Ok(Some(user_id)) => return Some(user_id),
            Ok(None) => {
                // Identity known client-side, not yet attributable
                // server-side.
            }
            Err(err) => {
                diag::warn(&format!("user sync attempt {} failed: {err}", attempt + 1));
            }
        }
        if attempt + 1 < SYNC_MAX_ATTEMPTS {
            sleep(backoff.delay(attempt)).await;
        }
    }

    diag::warn(&format!(
        "user sync abandoned after {SYNC_MAX_ATTEMPTS} attempts"
    ));
    None
}

/// Sync through the shared [`PreviewClient`].
pub async fn sync_current_user() -> Option<Uuid> {
    let client = PreviewClient::shared();
    ensure_user_synced(|| {
        let client = client.clone();
        async move { client.sync_user().await }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use shared::WidgetError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sync stub that replays a scripted sequence of results and counts
    /// calls.
    fn scripted_sync(
        calls: &Rc<Cell<u32>>,
        script: Vec<WidgetResult<Option<Uuid>>>,
    ) -> impl Fn() -> std::future::Ready<WidgetResult<Option<Uuid>>> {
        let calls = calls.clone();
        let script = Rc::new(script);
        move || {
            let index = calls.get() as usize;
            calls.set(calls.get() + 1);
            std::future::ready(script[index].clone())
        }
    }

    #[test]
    fn backoff_doubles_from_the_base() {
        let backoff = Backoff::new(Duration::from_millis(50));
        assert_eq!(backoff.delay(0), Duration::from_millis(50));
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(400));
    }

    /// Tests that the retry loop actually requests the doubling delays in
    /// order, sleeping between attempts but never after the last one.
    #[test]
    fn requested_delays_follow_the_backoff_schedule() {
        let calls = Rc::new(Cell::new(0));
        let sync = scripted_sync(&calls, vec![Ok(None); SYNC_MAX_ATTEMPTS as usize]);
        let slept = Rc::new(RefCell::new(Vec::new()));
        let sleeper = {
            let slept = slept.clone();
            move |duration| {
                slept.borrow_mut().push(duration);
                std::future::ready(())
            }
        };

        assert_eq!(block_on(ensure_user_synced_with(sync, sleeper)), None);
        assert_eq!(
            *slept.borrow(),
            [50, 100, 200, 400].map(Duration::from_millis)
        );
    }

    /// Tests that four "not ready" sentinels followed by a success take
    /// exactly five attempts, and that the flow never calls again once
    /// synced.
    #[test]
    fn succeeds_on_the_fifth_attempt() {
        let user_id = Uuid::new_v4();
        let calls = Rc::new(Cell::new(0));
        let sync = scripted_sync(
            &calls,
            vec![Ok(None), Ok(None), Ok(None), Ok(None), Ok(Some(user_id))],
        );

        assert_eq!(block_on(ensure_user_synced(&sync)), Some(user_id));
        assert_eq!(calls.get(), 5);

        assert_eq!(block_on(ensure_user_synced(&sync)), None);
        assert_eq!(calls.get(), 5);
    }

    /// Tests that thrown errors get the same bounded retry as the
    /// sentinel.
    #[test]
    fn errors_are_retried_like_the_sentinel() {
        let user_id = Uuid::new_v4();
        let calls = Rc::new(Cell::new(0));
        let sync = scripted_sync(
            &calls,
            vec![
                Err(WidgetError::Transport("connection reset".into())),
                Ok(None),
                Ok(Some(user_id)),
            ],
        );

        assert_eq!(block_on(ensure_user_synced(sync)), Some(user_id));
        assert_eq!(calls.get(), 3);
    }

    /// Tests silent abandonment after the attempt budget is exhausted.
    #[test]
    fn gives_up_after_the_attempt_budget() {
        let calls = Rc::new(Cell::new(0));
        let sync = scripted_sync(&calls, vec![Ok(None); SYNC_MAX_ATTEMPTS as usize]);

        assert_eq!(block_on(ensure_user_synced(sync)), None);
        assert_eq!(calls.get(), SYNC_MAX_ATTEMPTS);
    }

    #[test]
    fn immediate_success_takes_one_attempt() {
        let user_id = Uuid::new_v4();
        let calls = Rc::new(Cell::new(0));
        let sync = scripted_sync(&calls, vec![Ok(Some(user_id))]);

        assert_eq!(block_on(ensure_user_synced(sync)), Some(user_id));
        assert_eq!(calls.get(), 1);
    }
}
