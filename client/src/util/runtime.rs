//! Browser clock, timers and task spawning for the session manager.
//!
//! TRADE-OFFS
//! ==========
//! Under SSR there is no event loop to drive the refresh schedule, so
//! `sleep` never resolves and spawned tasks are dropped. The wall clock still
//! works so session snapshots stay meaningful during server rendering.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::time::Duration;

use futures::future::LocalBoxFuture;
use session::Runtime;

/// `session::Runtime` for the browser event loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserRuntime;

impl Runtime for BrowserRuntime {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> i64 {
        #[cfg(feature = "hydrate")]
        {
            (js_sys::Date::now() / 1000.0) as i64
        }
        #[cfg(not(feature = "hydrate"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        }
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        #[cfg(feature = "hydrate")]
        {
            Box::pin(gloo_timers::future::sleep(duration))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = duration;
            Box::pin(futures::future::pending())
        }
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(task);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            drop(task);
        }
    }
}
