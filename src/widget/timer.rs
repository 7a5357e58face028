use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Owns at most one background timer task. Installing a new one aborts the
/// previous task first, so two timers never drive the same display.
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.handle = Some(handle);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Sends `msg` every `every`. With `immediate` the first send happens at once,
/// otherwise after one full period.
pub fn spawn_repeating<M>(
    every: Duration,
    immediate: bool,
    tx: UnboundedSender<M>,
    msg: M,
) -> JoinHandle<()>
where
    M: Clone + Send + 'static,
{
    let start = if immediate {
        Instant::now()
    } else {
        Instant::now() + every
    };
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(start, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(msg.clone()).is_err() {
                break;
            }
        }
    })
}

/// Sends `msg` once after `delay`.
pub fn spawn_once<M>(delay: Duration, tx: UnboundedSender<M>, msg: M) -> JoinHandle<()>
where
    M: Send + 'static,
{
    let deadline = Instant::now() + delay;
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let _ = tx.send(msg);
    })
}
