//! TTL Reaper Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! The sweep loop always runs on its own `cache-reaper` thread driving a
//! current-thread runtime with the time driver enabled. It works the same
//! from plain synchronous code and from inside any caller runtime,
//! including one built without timers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::runtime::Builder;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Name given to the reaper thread.
pub const REAPER_THREAD_NAME: &str = "cache-reaper";

// == Reaper ==
/// Handle to a running sweep loop.
///
/// Stopping is idempotent: `stop` may be called any number of times, before
/// or after the loop has exited. Dropping the handle stops the loop too.
#[derive(Debug)]
pub struct Reaper {
    stop_tx: watch::Sender<bool>,
    stopped: AtomicBool,
    handle: JoinHandle<()>,
    interval: Duration,
}

impl Reaper {
    /// Starts sweeping `store` every `interval`.
    ///
    /// The loop only holds a weak reference to the store and exits on its
    /// own once the store is gone.
    ///
    /// # Errors
    /// Fails when the reaper runtime cannot be built or the reaper thread
    /// cannot be spawned.
    ///
    /// # Example
    /// ```ignore
    /// let store = Arc::new(CacheStore::new(Some(Duration::from_secs(1))));
    /// let reaper = Reaper::spawn(&store, Duration::from_secs(1))?;
    /// // Later, during shutdown:
    /// reaper.stop();
    /// ```
    pub fn spawn<V>(store: &Arc<CacheStore<V>>, interval: Duration) -> Result<Self>
    where
        V: Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let sweeps = run_sweeps(Arc::downgrade(store), interval, stop_rx);

        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(CacheError::Runtime)?;
        let handle = thread::Builder::new()
            .name(REAPER_THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(sweeps))
            .map_err(CacheError::ReaperSpawn)?;

        info!(
            "Starting TTL reaper with interval of {} ms",
            interval.as_millis()
        );

        Ok(Self {
            stop_tx,
            stopped: AtomicBool::new(false),
            handle,
            interval,
        })
    }

    // == Stop ==
    /// Signals the loop to exit.
    ///
    /// A sweep already underway finishes; no new sweep starts once the loop
    /// has observed the signal. Returns true only for the call that actually
    /// stopped the reaper.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.stop_tx.send_replace(true);
        info!("TTL reaper stopped");
        true
    }

    /// Returns true until the reaper is stopped or its loop has exited.
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire) && !self.handle.is_finished()
    }

    /// Returns true once the background loop has fully terminated.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Returns the sweep period.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_sweeps<V>(
    store: Weak<CacheStore<V>>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            // Also fires if the handle was dropped without stopping
            _ = stop_rx.changed() => break,

            _ = ticker.tick() => {
                let Some(store) = store.upgrade() else {
                    debug!("Cache dropped, TTL reaper exiting");
                    break;
                };
                let removed = store.cleanup_expired();

                if removed > 0 {
                    info!("TTL sweep: removed {} expired entries", removed);
                } else {
                    debug!("TTL sweep: no expired entries found");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn store_with_short_lived_entry() -> Arc<CacheStore<&'static str>> {
        let store = Arc::new(CacheStore::new(Some(ms(40))));
        store.set("expire_soon".to_string(), "value");
        store.set_with_ttl("long_lived".to_string(), "value", Duration::from_secs(3600));
        store
    }

    #[test]
    fn test_reaper_thread_removes_expired_entries() {
        let store = store_with_short_lived_entry();
        let reaper = Reaper::spawn(&store, ms(40)).unwrap();

        thread::sleep(ms(250));

        assert_eq!(store.len(), 1, "Expired entry should have been swept");
        assert_eq!(store.get("long_lived"), Some("value"));
        assert!(store.stats().sweeps >= 1);

        reaper.stop();
    }

    #[test]
    fn test_reaper_thread_exits_after_stop() {
        let store: Arc<CacheStore<u8>> = Arc::new(CacheStore::new(Some(ms(20))));
        let reaper = Reaper::spawn(&store, ms(20)).unwrap();
        assert!(reaper.is_running());

        assert!(reaper.stop());
        thread::sleep(ms(100));

        assert!(reaper.is_finished());
        assert!(!reaper.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let store: Arc<CacheStore<u8>> = Arc::new(CacheStore::new(Some(ms(20))));
        let reaper = Reaper::spawn(&store, ms(20)).unwrap();

        assert!(reaper.stop());
        assert!(!reaper.stop());
        thread::sleep(ms(60));
        // Loop already gone; stopping again must neither block nor panic
        assert!(!reaper.stop());
    }

    #[test]
    fn test_no_sweeps_after_stop() {
        let store: Arc<CacheStore<u8>> = Arc::new(CacheStore::new(Some(ms(10))));
        let reaper = Reaper::spawn(&store, ms(10)).unwrap();

        thread::sleep(ms(60));
        reaper.stop();
        thread::sleep(ms(30));
        let sweeps = store.stats().sweeps;

        thread::sleep(ms(100));
        assert_eq!(store.stats().sweeps, sweeps);
    }

    #[test]
    fn test_reaper_exits_when_store_dropped() {
        let store: Arc<CacheStore<u8>> = Arc::new(CacheStore::new(Some(ms(20))));
        let reaper = Reaper::spawn(&store, ms(20)).unwrap();

        drop(store);
        thread::sleep(ms(120));

        assert!(reaper.is_finished());
    }

    #[test]
    fn test_reaper_reports_interval() {
        let store: Arc<CacheStore<u8>> = Arc::new(CacheStore::new(Some(ms(20))));
        let reaper = Reaper::spawn(&store, ms(35)).unwrap();

        assert_eq!(reaper.interval(), ms(35));
        reaper.stop();
    }

    #[tokio::test]
    async fn test_reaper_sweeps_inside_tokio_runtime() {
        let store = store_with_short_lived_entry();
        let reaper = Reaper::spawn(&store, ms(40)).unwrap();

        tokio::time::sleep(ms(250)).await;

        assert_eq!(store.len(), 1, "Expired entry should have been swept");
        assert_eq!(store.get("long_lived"), Some("value"));

        reaper.stop();
    }

    #[tokio::test]
    async fn test_reaper_can_be_stopped_inside_tokio_runtime() {
        let store: Arc<CacheStore<u8>> = Arc::new(CacheStore::new(Some(ms(20))));
        let reaper = Reaper::spawn(&store, Duration::from_secs(1)).unwrap();

        reaper.stop();

        tokio::time::sleep(ms(100)).await;
        assert!(reaper.is_finished(), "Loop should be finished after stop");
    }

    #[test]
    fn test_reaper_sweeps_inside_runtime_without_timers() {
        let runtime = Builder::new_multi_thread().build().unwrap();
        let _guard = runtime.enter();

        let store = store_with_short_lived_entry();
        let reaper = Reaper::spawn(&store, ms(40)).unwrap();

        thread::sleep(ms(250));

        assert!(reaper.is_running());
        assert_eq!(store.len(), 1, "Expired entry should have been swept");
        reaper.stop();
    }
}
